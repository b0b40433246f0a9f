// Planning view: maintenance plan cards beside the assistant chat.
//
// +---------------------------+------------------+
// | Technical context         |                  |
// | Work package              | Assistant chat   |
// | Resource plan             |                  |
// | QA review                 |                  |
// +---------------------------+------------------+

use aerotech_core::models::plan::MaintenancePlan;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::chat;
use crate::tui::ViewState;

/// Card titles, in display order.
const CARDS: [&str; 4] = ["Technical context", "Work package", "Resource plan", "QA review"];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [plan_area, chat_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    render_cards(frame, plan_area, state);
    chat::render(frame, chat_area, state);
}

fn render_cards(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(plan) = state.plan.as_ref().filter(|_| !state.plan_loading) else {
        let text = if state.plan_loading {
            "Generating maintenance plan..."
        } else {
            "Press f to describe a fault and generate a plan."
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Maintenance plan"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let areas = Layout::vertical([Constraint::Ratio(1, 4); 4]).split(area);
    for (i, (title, body)) in CARDS.iter().zip(card_bodies(plan)).enumerate() {
        let mut title = Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        );
        if i == 3 && state.plan_reviewing {
            title = Span::styled(
                "QA review (reviewing...)",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        }
        let paragraph = Paragraph::new(body.unwrap_or("--").to_string())
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, areas[i]);
    }
}

/// Section texts in card order; `None` for sections the planner left out.
pub fn card_bodies(plan: &MaintenancePlan) -> [Option<&str>; 4] {
    [
        plan.tech_context.as_deref(),
        plan.work_package.as_deref(),
        plan.resource_plan.as_deref(),
        plan.qa_review.as_deref(),
    ]
}
