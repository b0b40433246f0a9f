// Technician task list: assigned work packages first, then sprint items
// for reference, already ordered by priority.

use aerotech_core::protocol::{TaskItem, TaskSource, ViewId};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use super::work_packages::status_color;
use super::{render_load_status, selected_style};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("My tasks ({})", state.tasks.len());
    if render_load_status(frame, area, &title, &state.status(ViewId::Tasks)) {
        return;
    }
    if state.tasks.is_empty() {
        let paragraph = Paragraph::new("Nothing assigned to you.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["P", "ID", "Title", "Status", "Source"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = state
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let style = if i == state.task_cursor {
                selected_style()
            } else {
                Style::default()
            };
            task_row(task).style(style)
        })
        .collect();
    let widths = [
        Constraint::Length(2),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn task_row(task: &TaskItem) -> Row<'static> {
    Row::new(vec![
        Cell::from(task.priority.to_string()),
        Cell::from(task.id.clone()),
        Cell::from(task.title.clone()),
        Cell::from(task.status.label().to_string())
            .style(Style::default().fg(status_color(&task.status))),
        Cell::from(source_label(task.source)),
    ])
}

pub fn source_label(source: TaskSource) -> &'static str {
    match source {
        TaskSource::WorkPackage => "assigned",
        TaskSource::Sprint => "sprint",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::rendered_text;
    use aerotech_core::models::work_package::WorkPackageStatus;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        rendered_text(terminal.backend())
    }

    #[test]
    fn empty_list_hint() {
        assert!(draw(&ViewState::default()).contains("Nothing assigned"));
    }

    #[test]
    fn rows_show_priority_and_source() {
        let state = ViewState {
            tasks: vec![
                TaskItem {
                    id: "WP-1".into(),
                    title: "Brake change".into(),
                    status: WorkPackageStatus::InProgress,
                    source: TaskSource::WorkPackage,
                    priority: 1,
                },
                TaskItem {
                    id: "BL-2".into(),
                    title: "Cabin check".into(),
                    status: WorkPackageStatus::Pending,
                    source: TaskSource::Sprint,
                    priority: 3,
                },
            ],
            ..Default::default()
        };
        let text = draw(&state);
        assert!(text.contains("My tasks (2)"));
        assert!(text.contains("assigned"));
        assert!(text.contains("Cabin check"));
        assert!(text.contains("sprint"));
    }
}
