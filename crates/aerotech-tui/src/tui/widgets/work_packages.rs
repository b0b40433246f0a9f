// Work package table: every package with status, aircraft, ATA, assignee
// and due date. Column headers bold, selected row highlighted.

use aerotech_core::models::work_package::WorkPackageStatus;
use aerotech_core::protocol::ViewId;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::{render_load_status, selected_style};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Work Packages ({})", state.work_packages.len());
    if render_load_status(frame, area, &title, &state.status(ViewId::WorkPackages)) {
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Title"),
        Cell::from("Aircraft"),
        Cell::from("ATA"),
        Cell::from("Status"),
        Cell::from("Assignee"),
        Cell::from("Due"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .work_packages
        .iter()
        .enumerate()
        .map(|(i, wp)| {
            let style = if i == state.package_cursor {
                selected_style()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(wp.key().to_string()),
                Cell::from(wp.display_title().to_string()),
                Cell::from(wp.aircraft.clone().unwrap_or_default()),
                Cell::from(wp.ata.clone().unwrap_or_default()),
                Cell::from(wp.status.label().to_string())
                    .style(Style::default().fg(status_color(&wp.status))),
                Cell::from(wp.assigned_to.clone().unwrap_or_else(|| "--".into())),
                Cell::from(wp.due_date.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

pub fn status_color(status: &WorkPackageStatus) -> Color {
    match status {
        WorkPackageStatus::Pending => Color::Yellow,
        WorkPackageStatus::InProgress => Color::Cyan,
        WorkPackageStatus::Approved => Color::Green,
        WorkPackageStatus::Other(_) => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::rendered_text;
    use aerotech_core::models::work_package::WorkPackage;

    #[test]
    fn status_colors() {
        assert_eq!(status_color(&WorkPackageStatus::Approved), Color::Green);
        assert_eq!(status_color(&WorkPackageStatus::Other("x".into())), Color::Gray);
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn rows_show_package_fields() {
        let backend = ratatui::backend::TestBackend::new(100, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            work_packages: vec![WorkPackage {
                id: "WP-9".into(),
                title: "Replace pitot probe".into(),
                status: WorkPackageStatus::InProgress,
                due_date: Some("2026-10-25".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = rendered_text(terminal.backend());
        assert!(text.contains("Work Packages (1)"));
        assert!(text.contains("Replace pitot probe"));
        assert!(text.contains("In progress"));
        assert!(text.contains("2026-10-25"));
    }
}
