// Sprint board widget: sprint header over three Kanban columns.
//
// Header: sprint name, status and days remaining.
// Columns: pending / in progress / approved; the selected card is
// highlighted in the focused column.

use aerotech_core::models::sprint::SprintState;
use aerotech_core::models::work_package::{WorkPackage, WorkPackageStatus};
use aerotech_core::protocol::ViewId;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use super::{render_load_status, selected_style};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if render_load_status(frame, area, "Sprint", &state.status(ViewId::Sprint)) {
        return;
    }

    let [header_area, columns_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    let header = Paragraph::new(sprint_header(state.sprint.as_ref()))
        .block(Block::default().borders(Borders::ALL).title("Sprint"));
    frame.render_widget(header, header_area);

    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(columns_area);
    for (index, status) in WorkPackageStatus::BOARD.iter().enumerate() {
        let cards = state.column(index);
        let focused = index == state.board_column;
        let items: Vec<ListItem> = cards
            .iter()
            .enumerate()
            .map(|(row, wp)| {
                let style = if focused && row == state.board_row {
                    selected_style()
                } else {
                    Style::default()
                };
                ListItem::new(card_lines(wp)).style(style)
            })
            .collect();

        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!("{} ({})", status.label(), cards.len())),
        );
        frame.render_widget(list, columns[index]);
    }
}

/// One-line sprint summary for the board header.
pub fn sprint_header(sprint: Option<&SprintState>) -> Line<'static> {
    let Some(sprint) = sprint.filter(|s| s.is_active()) else {
        return Line::from(Span::styled(
            "No active sprint. Press s to start one.",
            Style::default().fg(Color::DarkGray),
        ));
    };
    let mut spans = vec![Span::styled(
        sprint.name.clone().unwrap_or_else(|| "Sprint".into()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(goal) = sprint.goal.as_deref().filter(|g| !g.is_empty()) {
        spans.push(Span::raw(format!(" -- {goal}")));
    }
    if let Some(days) = sprint.days_remaining {
        spans.push(Span::styled(
            format!(" | {days} days left"),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn card_lines(wp: &WorkPackage) -> Vec<Line<'static>> {
    let mut detail = Vec::new();
    if let Some(aircraft) = wp.aircraft.as_deref() {
        detail.push(aircraft.to_string());
    }
    if let Some(ata) = wp.ata.as_deref() {
        detail.push(format!("ATA {ata}"));
    }
    detail.push(wp.assigned_to.clone().unwrap_or_else(|| "unassigned".into()));
    vec![
        Line::from(vec![
            Span::styled(
                wp.key().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", wp.display_title())),
        ]),
        Line::from(Span::styled(
            format!("  {}", detail.join(" | ")),
            Style::default().fg(Color::Gray),
        )),
    ]
}
