// Modal overlays: text entry prompt, create/edit form, y/n confirmation.
//
// Each is drawn centred over the main layout after clearing the area
// behind it.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::form::{Confirm, FieldInput, Form, TextEntry};

const PROMPT_WIDTH: u16 = 70;
const PROMPT_HEIGHT: u16 = 5;
const FORM_WIDTH: u16 = 64;
const CONFIRM_WIDTH: u16 = 44;
const CONFIRM_HEIGHT: u16 = 5;

pub fn render_text_entry(frame: &mut Frame, area: Rect, entry: &TextEntry) {
    let dialog_area = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let text = Line::from(vec![
        Span::raw(entry.text.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let paragraph = Paragraph::new(text)
        .block(dialog_block(entry.target.prompt(), Color::Cyan))
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

pub fn render_form(frame: &mut Frame, area: Rect, form: &Form) {
    // One row per field plus borders.
    let height = form.fields.len() as u16 + 2;
    let dialog_area = centered_rect(FORM_WIDTH, height, area);
    frame.render_widget(Clear, dialog_area);

    let paragraph = Paragraph::new(form_lines(form))
        .block(dialog_block(&form.title, Color::Cyan))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

pub fn render_confirm(frame: &mut Frame, area: Rect, confirm: &Confirm) {
    let dialog_area = centered_rect(CONFIRM_WIDTH, CONFIRM_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let text = vec![
        Line::raw(format!("  {}", confirm.prompt)),
        Line::from(vec![
            Span::raw("  ("),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(")"),
        ]),
    ];
    let paragraph = Paragraph::new(text)
        .block(dialog_block("Confirm", Color::Yellow))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// "Label: value" rows; the focused field is highlighted and choice
/// fields show arrows.
pub fn form_lines(form: &Form) -> Vec<Line<'static>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let value = match (&field.input, focused) {
                (FieldInput::Choice(_), true) => format!("< {} >", field.display_value()),
                (FieldInput::Text, true) => format!("{}_", field.value),
                _ => field.display_value().to_string(),
            };
            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{:>28}: ", field.label), label_style),
                Span::raw(value),
            ])
        })
        .collect()
}

fn dialog_block(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
