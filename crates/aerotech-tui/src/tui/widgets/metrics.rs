// Technician metrics: sprint progress with delay risk level, and the
// efficiency metrics table.

use aerotech_core::models::sprint::{RiskLevel, SprintSummary};
use aerotech_core::protocol::ViewId;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::efficiency::metrics_table;
use super::{bar, render_load_status, risk_color};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if render_load_status(frame, area, "Metrics", &state.status(ViewId::Metrics)) {
        return;
    }
    let Some(field) = &state.field_metrics else {
        let paragraph = Paragraph::new("No metrics yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Metrics"));
        frame.render_widget(paragraph, area);
        return;
    };

    let [sprint_area, table_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Min(4)]).areas(area);

    let default_summary = SprintSummary::default();
    let sprint = field.dashboard.sprint.as_ref().unwrap_or(&default_summary);
    let paragraph = Paragraph::new(sprint_lines(sprint))
        .block(Block::default().borders(Borders::ALL).title("Sprint"));
    frame.render_widget(paragraph, sprint_area);

    frame.render_widget(metrics_table(&field.metrics), table_area);
}

fn sprint_lines(sprint: &SprintSummary) -> Vec<Line<'static>> {
    let level = sprint.delay_risk_level();
    vec![
        Line::from(vec![
            Span::styled(sprint.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" | {} days left", sprint.days_remaining)),
        ]),
        Line::from(vec![
            Span::raw(bar(sprint.progress_pct() as f64, 100.0, 20)),
            Span::raw(format!(" {}%", sprint.progress_pct())),
        ]),
        Line::from(vec![
            Span::raw("Delay risk: "),
            Span::styled(
                risk_label(level),
                Style::default()
                    .fg(risk_color(level))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ]
}

pub fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low",
        RiskLevel::Medium => "Medium",
        RiskLevel::High => "High",
    }
}
