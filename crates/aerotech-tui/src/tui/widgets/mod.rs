// TUI widget modules for each console view.

pub mod board;
pub mod chat;
pub mod dashboard;
pub mod efficiency;
pub mod metrics;
pub mod overlay;
pub mod plan;
pub mod resources;
pub mod status_bar;
pub mod tasks;
pub mod user_select;
pub mod work_packages;

use aerotech_core::models::sprint::RiskLevel;
use aerotech_core::protocol::LoadStatus;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Draw a loading or error panel in place of a view's content.
///
/// Returns `true` if the panel was drawn and the caller should stop.
pub fn render_load_status(frame: &mut Frame, area: Rect, title: &str, status: &LoadStatus) -> bool {
    let (text, color) = match status {
        LoadStatus::Loading => ("Loading...".to_string(), Color::Yellow),
        LoadStatus::Error(message) => (message.clone(), Color::Red),
        LoadStatus::Idle | LoadStatus::Ready => return false,
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
    true
}

/// Style for the highlighted row of a list or table.
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    }
}

/// Text bar of `width` cells filled in proportion to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return String::new();
    }
    let filled = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Everything drawn into a test backend, row by row.
#[cfg(test)]
pub(crate) fn rendered_text(backend: &ratatui::backend::TestBackend) -> String {
    let buffer = backend.buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width.max(1))
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
