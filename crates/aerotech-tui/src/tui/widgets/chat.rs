// Assistant chat widget: transcript with reference cards.
//
// User messages are cyan, assistant messages white. Each reference found
// in an answer is listed under it as "[AMM] title (code)". Keeps the latest
// messages in view by scrolling to the bottom.

use aerotech_core::models::chat::{ChatMessage, ChatRole, Reference};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines: Vec<Line> = Vec::new();
    for message in &state.chat {
        lines.extend(message_lines(message));
        lines.push(Line::raw(""));
    }
    if state.chat_pending {
        lines.push(Line::from(Span::styled(
            "Assistant is thinking...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press i to ask the maintenance assistant.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height) as u16;

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Assistant"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (who, color) = match message.role {
        ChatRole::User => ("You", Color::Cyan),
        ChatRole::Assistant => ("Assistant", Color::White),
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("{who}:"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        message
            .content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(color)))),
    );
    lines.extend(message.references.iter().map(reference_line));
    lines
}

/// Manual references in blue, regulatory sources in magenta.
pub fn reference_line(reference: &Reference) -> Line<'static> {
    let color = if reference.kind.is_regulatory() {
        Color::Magenta
    } else {
        Color::Blue
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("[{}]", reference.kind),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ({})", reference.title, reference.code)),
    ])
}
