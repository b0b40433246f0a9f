// Dashboard side panel: sprint progress, delay risk, resource utilisation,
// recent items, and the result of the last natural-language sprint request.

use aerotech_core::models::sprint::{ScrumDashboard, SprintPlanResponse, SprintSummary};
use aerotech_core::protocol::ViewId;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{bar, render_load_status, risk_color};
use crate::tui::ViewState;

const BAR_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if render_load_status(frame, area, "Dashboard", &state.status(ViewId::Dashboard)) {
        return;
    }

    let mut lines = match &state.dashboard {
        Some(dashboard) => dashboard_lines(dashboard),
        None => vec![Line::from(Span::styled(
            "No dashboard data yet.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    lines.push(Line::raw(""));
    lines.push(heading("Sprint request (p)"));
    lines.push(request_line(state.sprint_result.as_ref()));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Dashboard"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub fn dashboard_lines(dashboard: &ScrumDashboard) -> Vec<Line<'static>> {
    let default_summary = SprintSummary::default();
    let sprint = dashboard.sprint.as_ref().unwrap_or(&default_summary);
    let progress = sprint.progress_pct();
    let risk = sprint.delay_risk();

    let mut lines = vec![
        heading(&format!("{} ({})", sprint.name, sprint.status)),
        Line::from(vec![
            Span::raw("Progress "),
            Span::styled(bar(progress as f64, 100.0, BAR_WIDTH), Style::default().fg(Color::Green)),
            Span::raw(format!(" {progress}% ({}/{})", sprint.completed, sprint.total)),
        ]),
        Line::from(vec![
            Span::raw("Delay risk "),
            Span::styled(
                format!("{risk}%"),
                Style::default()
                    .fg(risk_color(sprint.delay_risk_level()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" | {} days left", sprint.days_remaining)),
        ]),
        Line::raw(format!("Velocity {:.1} / target {:.1}", sprint.velocity, sprint.target)),
    ];

    if !dashboard.resource_util.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Resource utilisation"));
        for util in &dashboard.resource_util {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<12}", util.label)),
                Span::styled(bar(util.value, 100.0, BAR_WIDTH / 2), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {:.0}% {}", util.value, util.status)),
            ]));
        }
    }

    if !dashboard.recent_items.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Recent items"));
        lines.extend(
            dashboard
                .recent_items
                .iter()
                .map(|item| Line::raw(format!("{} {} [{}]", item.id, item.title, item.status))),
        );
    }
    lines
}

fn request_line(result: Option<&SprintPlanResponse>) -> Line<'static> {
    match result {
        None => Line::from(Span::styled(
            "No request yet.",
            Style::default().fg(Color::DarkGray),
        )),
        Some(r) if r.error.is_some() => {
            Line::from(Span::styled(r.summary(), Style::default().fg(Color::Red)))
        }
        Some(r) => Line::raw(r.summary()),
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}
