// Status bar widget: signed-in user, tab indicator, latest notice.

use aerotech_core::protocol::{Notice, NoticeLevel, ViewId};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [AeroTech] [user (role)] | [tab bar] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " AeroTech ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    match &state.user {
        Some(user) => spans.push(Span::styled(
            format!("{} ({})", user.name, user.role),
            Style::default().fg(Color::White),
        )),
        None => spans.push(Span::styled(
            "not signed in",
            Style::default().fg(Color::DarkGray),
        )),
    }

    if let Some(active) = state.active_view.filter(|_| state.user.is_some()) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.extend(tab_spans(state.tabs(), active));
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(notice_span(notice));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Tab indicator spans, e.g. "[1:Planning] [2:Sprint]", active one highlighted.
pub fn tab_spans(tabs: &[ViewId], active: ViewId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in tabs.iter().enumerate() {
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab.title()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::White,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    }
}

fn notice_span(notice: &Notice) -> Span<'static> {
    Span::styled(notice.text.clone(), Style::default().fg(notice_color(notice.level)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
