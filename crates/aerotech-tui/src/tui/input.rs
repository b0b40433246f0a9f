// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// orchestrator, or into local ViewState changes (tab switching, cursors,
// opening forms and prompts).

use aerotech_core::models::resources::{ResourceKind, ResourceRecord};
use aerotech_core::models::work_package::WorkPackageStatus;
use aerotech_core::protocol::{Notice, UserCommand, ViewId};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::form::{Confirm, Form, TextEntry, TextTarget};
use super::{Mode, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    // Some terminals report Press and Release for each keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    match std::mem::take(&mut state.mode) {
        Mode::Normal => handle_normal(key_event, state),
        Mode::Confirm(confirm) => handle_confirm(key_event, state, confirm),
        Mode::Text(entry) => handle_text(key_event, state, entry),
        Mode::Form(form) => handle_form(key_event, state, form),
    }
}

// ---------------------------------------------------------------------------
// Modal handlers
// ---------------------------------------------------------------------------

fn handle_confirm(key_event: KeyEvent, state: &mut ViewState, confirm: Confirm) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(confirm.command),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
        _ => {
            state.mode = Mode::Confirm(confirm);
            None
        }
    }
}

fn handle_text(key_event: KeyEvent, state: &mut ViewState, mut entry: TextEntry) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => None,
        KeyCode::Enter => {
            let text = entry.text.trim().to_string();
            if text.is_empty() {
                state.mode = Mode::Text(entry);
                return None;
            }
            Some(entry.target.command(text))
        }
        KeyCode::Backspace => {
            entry.text.pop();
            state.mode = Mode::Text(entry);
            None
        }
        KeyCode::Char(c) => {
            entry.text.push(c);
            state.mode = Mode::Text(entry);
            None
        }
        _ => {
            state.mode = Mode::Text(entry);
            None
        }
    }
}

fn handle_form(key_event: KeyEvent, state: &mut ViewState, mut form: Box<Form>) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => return None,
        KeyCode::Enter => match form.submit() {
            Ok(cmd) => return Some(cmd),
            Err(message) => state.notice = Some(Notice::error(message)),
        },
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert(c),
        _ => {}
    }
    state.mode = Mode::Form(form);
    None
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    let Some(view) = state.active_view.filter(|_| state.user.is_some()) else {
        return handle_user_select(key_event, state);
    };

    // Global keys
    match key_event.code {
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(tab) = state.tabs().get(index) {
                state.active_view = Some(*tab);
            }
            return None;
        }
        KeyCode::Char('q') => {
            confirm(state, "Quit AeroTech?", UserCommand::Quit);
            return None;
        }
        KeyCode::Char('u') => return Some(UserCommand::SwitchUser),
        KeyCode::Char('R') => return Some(UserCommand::Refresh(view)),
        KeyCode::Char('p') if state.is_lead() => {
            open_text(state, TextTarget::SprintRequest);
            return None;
        }
        _ => {}
    }

    match view {
        ViewId::Planning => handle_planning(key_event, state),
        ViewId::Sprint => handle_board(key_event, state),
        ViewId::WorkPackages => handle_work_packages(key_event, state),
        ViewId::Resources => handle_resources(key_event, state),
        ViewId::Tasks => {
            move_cursor(key_event.code, &mut state.task_cursor, state.tasks.len());
            None
        }
        ViewId::Assistant => match key_event.code {
            KeyCode::Char('i') | KeyCode::Enter => {
                open_text(state, TextTarget::Question);
                None
            }
            _ => None,
        },
        ViewId::Efficiency | ViewId::Metrics | ViewId::Dashboard => None,
    }
}

fn handle_user_select(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => state
            .users
            .get(state.user_cursor)
            .cloned()
            .map(|u| UserCommand::SelectUser(Box::new(u))),
        KeyCode::Char('R') => Some(UserCommand::LoadUsers),
        KeyCode::Char('q') => {
            confirm(state, "Quit AeroTech?", UserCommand::Quit);
            None
        }
        code => {
            move_cursor(code, &mut state.user_cursor, state.users.len());
            None
        }
    }
}

fn handle_planning(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('f') => {
            open_text(state, TextTarget::FaultDescription);
            None
        }
        KeyCode::Char('i') => {
            open_text(state, TextTarget::Question);
            None
        }
        KeyCode::Char('a') if !state.plan_loading => Some(UserCommand::AddPlanToBacklog),
        KeyCode::Char('r') if !state.plan_loading && !state.plan_reviewing => {
            Some(UserCommand::ReviewPlan)
        }
        _ => None,
    }
}

fn handle_board(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    let columns = WorkPackageStatus::BOARD.len();
    match key_event.code {
        KeyCode::Left => {
            state.board_column = state.board_column.saturating_sub(1);
            state.board_row = 0;
            None
        }
        KeyCode::Right => {
            state.board_column = (state.board_column + 1).min(columns - 1);
            state.board_row = 0;
            None
        }
        KeyCode::Char('h') | KeyCode::Char('l') => {
            let card = state.selected_card()?;
            let target = match key_event.code {
                KeyCode::Char('h') => card.status.previous(),
                _ => card.status.next(),
            }?;
            Some(UserCommand::MoveWorkPackage {
                id: card.key().to_string(),
                status: target,
            })
        }
        KeyCode::Char('s') => {
            state.mode = Mode::Form(Box::new(Form::sprint_start()));
            None
        }
        KeyCode::Char('e') => {
            confirm(state, "End the current sprint?", UserCommand::EndSprint);
            None
        }
        KeyCode::Char('c') => {
            let card = state.selected_card()?.clone();
            if card.status == WorkPackageStatus::Approved {
                Some(UserCommand::RecordCompletion(Box::new(card)))
            } else {
                state.notice = Some(Notice::error("Only approved cards can be completed"));
                None
            }
        }
        code => {
            let len = state.column(state.board_column).len();
            move_cursor(code, &mut state.board_row, len);
            None
        }
    }
}

fn handle_work_packages(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('n') => {
            let form = Form::work_package(None, &state.assignees);
            state.mode = Mode::Form(Box::new(form));
            None
        }
        KeyCode::Enter => {
            let form = Form::work_package(Some(state.selected_package()?), &state.assignees);
            state.mode = Mode::Form(Box::new(form));
            None
        }
        KeyCode::Char('d') => {
            let id = state.selected_package()?.key().to_string();
            confirm(state, &format!("Delete {id}?"), UserCommand::DeleteWorkPackage(id));
            None
        }
        code => {
            move_cursor(code, &mut state.package_cursor, state.work_packages.len());
            None
        }
    }
}

fn handle_resources(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    let section = state.resource_section;
    match key_event.code {
        KeyCode::Left | KeyCode::Right => {
            let all = ResourceKind::ALL;
            let i = all.iter().position(|k| *k == section).unwrap_or(0);
            let next = if key_event.code == KeyCode::Right {
                (i + 1) % all.len()
            } else {
                (i + all.len() - 1) % all.len()
            };
            state.resource_section = all[next];
            state.resource_cursor = 0;
            None
        }
        KeyCode::Char('n') => {
            state.mode = Mode::Form(Box::new(Form::resource(section, None)));
            None
        }
        KeyCode::Enter => {
            let record = state.selected_resource()?;
            state.mode = Mode::Form(Box::new(Form::resource(section, Some(&record))));
            None
        }
        KeyCode::Char('d') => {
            let record = state.selected_resource()?;
            let id = record.id().to_string();
            confirm(
                state,
                &format!("Delete {id}?"),
                UserCommand::DeleteResource { kind: section, id },
            );
            None
        }
        KeyCode::Char('t') => match state.selected_resource()? {
            ResourceRecord::Tool(tool) => Some(UserCommand::ToggleTool(Box::new(tool))),
            _ => None,
        },
        code => {
            let len = state.resource_count(section);
            move_cursor(code, &mut state.resource_cursor, len);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn move_cursor(code: KeyCode, cursor: &mut usize, len: usize) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        }
        _ => {}
    }
}

fn open_text(state: &mut ViewState, target: TextTarget) {
    state.mode = Mode::Text(TextEntry {
        target,
        text: String::new(),
    });
}

fn confirm(state: &mut ViewState, prompt: &str, command: UserCommand) {
    state.mode = Mode::Confirm(Confirm {
        prompt: prompt.to_string(),
        command,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
