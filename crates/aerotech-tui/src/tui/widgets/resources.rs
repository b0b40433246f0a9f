// Resources view: personnel, tools and parts, one section at a time.
//
// Title line lists the sections with the active one highlighted. Parts are
// coloured by stock band, tools by checkout status.

use aerotech_core::models::resources::{Personnel, Part, ResourceKind, StockBand, Tool, ToolStatus};
use aerotech_core::protocol::ViewId;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::{render_load_status, selected_style};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if render_load_status(frame, area, "Resources", &state.status(ViewId::Resources)) {
        return;
    }

    let section = state.resource_section;
    let (header, rows, widths): (Vec<&str>, Vec<Row>, Vec<Constraint>) = match section {
        ResourceKind::Personnel => (
            vec!["ID", "Name", "Role", "Ratings", "Shift", "Availability"],
            state.resources.personnel.iter().map(personnel_row).collect(),
            vec![
                Constraint::Length(8),
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Min(14),
                Constraint::Length(6),
                Constraint::Length(12),
            ],
        ),
        ResourceKind::Tools => (
            vec!["ID", "Name", "Category", "Location", "Calibration", "Status"],
            state.resources.tools.iter().map(tool_row).collect(),
            vec![
                Constraint::Length(8),
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(11),
                Constraint::Length(10),
            ],
        ),
        ResourceKind::Parts => (
            vec!["ID", "Part no", "Name", "ATA", "Stock", "Location", "Lead"],
            state.resources.parts.iter().map(part_row).collect(),
            vec![
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Min(16),
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Length(12),
                Constraint::Length(6),
            ],
        ),
    };

    let rows: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            if i == state.resource_cursor {
                row.style(selected_style())
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(header.into_iter().map(Cell::from)).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(section_title(state)));
    frame.render_widget(table, area);
}

/// "Personnel (3) | Tools (2) | Parts (5)" with the active section bold.
pub fn section_title(state: &ViewState) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, kind) in ResourceKind::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *kind == state.resource_section {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!("{} ({})", kind.label(), state.resource_count(*kind)),
            style,
        ));
    }
    Line::from(spans)
}

pub fn stock_color(band: StockBand) -> Color {
    match band {
        StockBand::Out => Color::Red,
        StockBand::Low => Color::Yellow,
        StockBand::Healthy => Color::Green,
    }
}

pub fn tool_status_color(status: &ToolStatus) -> Color {
    match status {
        ToolStatus::Available => Color::Green,
        ToolStatus::InUse => Color::Yellow,
        ToolStatus::Other(_) => Color::Gray,
    }
}

fn personnel_row(p: &Personnel) -> Row<'static> {
    let availability = if p.is_available() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };
    Row::new(vec![
        Cell::from(p.id.clone()),
        Cell::from(p.name.clone()),
        Cell::from(p.role.clone()),
        Cell::from(p.ratings.join(", ")),
        Cell::from(if p.is_day_shift() { "Day" } else { "Night" }),
        Cell::from(p.availability.clone()).style(availability),
    ])
}

fn tool_row(t: &Tool) -> Row<'static> {
    Row::new(vec![
        Cell::from(t.id.clone()),
        Cell::from(t.name.clone()),
        Cell::from(t.category.clone()),
        Cell::from(t.location.clone()),
        Cell::from(t.calibration_due.clone().unwrap_or_else(|| "--".into())),
        Cell::from(t.status.as_str().to_string())
            .style(Style::default().fg(tool_status_color(&t.status))),
    ])
}

fn part_row(p: &Part) -> Row<'static> {
    Row::new(vec![
        Cell::from(p.id.clone()),
        Cell::from(p.part_no.clone()),
        Cell::from(p.name.clone()),
        Cell::from(p.ata_chapter.clone()),
        Cell::from(p.stock_level.to_string())
            .style(Style::default().fg(stock_color(p.stock_band()))),
        Cell::from(p.location.clone()),
        Cell::from(format!("{}d", p.lead_time_days)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::rendered_text;
    use aerotech_core::protocol::ResourceSnapshot;

    fn snapshot() -> ResourceSnapshot {
        ResourceSnapshot {
            personnel: vec![Personnel {
                id: "P-1".into(),
                name: "Deniz".into(),
                shift: "night".into(),
                ..Default::default()
            }],
            tools: vec![Tool {
                id: "T-1".into(),
                name: "Borescope".into(),
                status: ToolStatus::InUse,
                ..Default::default()
            }],
            parts: vec![Part {
                id: "PRT-1".into(),
                part_no: "D23189000-1".into(),
                name: "Brake wear pin".into(),
                stock_level: 1,
                ..Default::default()
            }],
        }
    }

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        rendered_text(terminal.backend())
    }

    #[test]
    fn stock_colors_by_band() {
        assert_eq!(stock_color(StockBand::Out), Color::Red);
        assert_eq!(stock_color(StockBand::Low), Color::Yellow);
        assert_eq!(stock_color(StockBand::Healthy), Color::Green);
    }

    #[test]
    fn title_counts_every_section() {
        let state = ViewState {
            resources: snapshot(),
            resource_section: ResourceKind::Tools,
            ..Default::default()
        };
        let title = section_title(&state);
        assert_eq!(title.spans.len(), 5);
        assert!(title.spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!title.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn each_section_renders_its_rows() {
        let mut state = ViewState {
            resources: snapshot(),
            ..Default::default()
        };
        assert!(draw(&state).contains("Night"));

        state.resource_section = ResourceKind::Tools;
        assert!(draw(&state).contains("in_use"));

        state.resource_section = ResourceKind::Parts;
        let text = draw(&state);
        assert!(text.contains("D23189000-1"));
        assert!(text.contains("Brake wear pin"));
    }
}
