// User selection screen shown before a session starts.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use super::selected_style;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Select user");

    if state.users.is_empty() {
        let text = if state.users_loaded {
            "No users found. Press R to reload."
        } else {
            "Loading users..."
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Role"),
        Cell::from("Device"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == state.user_cursor {
                selected_style()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.role.label().to_string()),
                Cell::from(user.device_label().to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
