// Terminal console: view state, update handling, and the render loop.
//
// The TUI owns a `ViewState` that mirrors what the orchestrator has told it.
// The orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps. Keys become
// `UserCommand`s or local cursor/mode changes.

pub mod form;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use aerotech_core::models::chat::ChatMessage;
use aerotech_core::models::plan::MaintenancePlan;
use aerotech_core::models::resources::{Personnel, ResourceKind, ResourceRecord};
use aerotech_core::models::sprint::{ScrumDashboard, SprintPlanResponse, SprintState};
use aerotech_core::models::user::User;
use aerotech_core::models::work_package::{WorkPackage, WorkPackageStatus};
use aerotech_core::protocol::{
    EfficiencySnapshot, FieldMetrics, LoadStatus, Notice, ResourceSnapshot, TaskItem, UiUpdate,
    UserCommand, ViewId,
};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use form::{Confirm, Form, TextEntry};
use layout::build_layout;

// ---------------------------------------------------------------------------
// Input mode
// ---------------------------------------------------------------------------

/// What keystrokes currently go to.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    #[default]
    Normal,
    Text(TextEntry),
    Form(Box<Form>),
    Confirm(Confirm),
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the orchestrator's view data for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Users offered on the selection screen.
    pub users: Vec<User>,
    pub users_loaded: bool,
    pub user_cursor: usize,
    /// The signed-in user; `None` shows the selection screen.
    pub user: Option<User>,
    pub active_view: Option<ViewId>,
    pub load_status: HashMap<ViewId, LoadStatus>,

    pub work_packages: Vec<WorkPackage>,
    pub assignees: Vec<Personnel>,
    pub sprint: Option<SprintState>,
    pub dashboard: Option<ScrumDashboard>,
    pub sprint_result: Option<SprintPlanResponse>,
    pub resources: ResourceSnapshot,
    pub efficiency: Option<EfficiencySnapshot>,
    pub tasks: Vec<TaskItem>,
    pub field_metrics: Option<FieldMetrics>,

    pub chat: Vec<ChatMessage>,
    pub chat_pending: bool,
    pub plan: Option<MaintenancePlan>,
    pub plan_loading: bool,
    pub plan_reviewing: bool,

    /// Sprint board cursor: column index into `WorkPackageStatus::BOARD`
    /// and row within that column.
    pub board_column: usize,
    pub board_row: usize,
    pub package_cursor: usize,
    pub resource_section: ResourceKind,
    pub resource_cursor: usize,
    pub task_cursor: usize,

    pub mode: Mode,
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Tabs for the signed-in role, in key order.
    pub fn tabs(&self) -> &'static [ViewId] {
        match &self.user {
            Some(user) => ViewId::tabs_for(&user.role),
            None => &[],
        }
    }

    pub fn is_lead(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_lead())
    }

    pub fn status(&self, view: ViewId) -> LoadStatus {
        self.load_status.get(&view).cloned().unwrap_or_default()
    }

    /// Cards in a board column, in backend order.
    pub fn column(&self, index: usize) -> Vec<&WorkPackage> {
        let Some(status) = WorkPackageStatus::BOARD.get(index) else {
            return Vec::new();
        };
        self.work_packages
            .iter()
            .filter(|wp| &wp.status == status)
            .collect()
    }

    pub fn selected_card(&self) -> Option<&WorkPackage> {
        self.column(self.board_column).get(self.board_row).copied()
    }

    pub fn selected_package(&self) -> Option<&WorkPackage> {
        self.work_packages.get(self.package_cursor)
    }

    pub fn resource_count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Personnel => self.resources.personnel.len(),
            ResourceKind::Tools => self.resources.tools.len(),
            ResourceKind::Parts => self.resources.parts.len(),
        }
    }

    pub fn selected_resource(&self) -> Option<ResourceRecord> {
        let i = self.resource_cursor;
        match self.resource_section {
            ResourceKind::Personnel => self
                .resources
                .personnel
                .get(i)
                .cloned()
                .map(ResourceRecord::Personnel),
            ResourceKind::Tools => self.resources.tools.get(i).cloned().map(ResourceRecord::Tool),
            ResourceKind::Parts => self.resources.parts.get(i).cloned().map(ResourceRecord::Part),
        }
    }

    /// Keep every cursor inside its list after data changes.
    fn clamp_cursors(&mut self) {
        self.user_cursor = clamp(self.user_cursor, self.users.len());
        self.package_cursor = clamp(self.package_cursor, self.work_packages.len());
        self.board_column = self.board_column.min(WorkPackageStatus::BOARD.len() - 1);
        self.board_row = clamp(self.board_row, self.column(self.board_column).len());
        self.resource_cursor = clamp(self.resource_cursor, self.resource_count(self.resource_section));
        self.task_cursor = clamp(self.task_cursor, self.tasks.len());
    }

    /// Drop everything tied to the previous session.
    fn reset_session(&mut self) {
        let users = std::mem::take(&mut self.users);
        let users_loaded = self.users_loaded;
        *self = ViewState {
            users,
            users_loaded,
            ..Default::default()
        };
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Users(users) => {
            state.users = users;
            state.users_loaded = true;
        }
        UiUpdate::SessionStarted(user) => {
            state.reset_session();
            state.active_view = ViewId::tabs_for(&user.role).first().copied();
            state.user = Some(*user);
        }
        UiUpdate::SessionEnded => {
            state.reset_session();
            state.users_loaded = false;
        }
        UiUpdate::ViewLoading(view) => {
            state.load_status.insert(view, LoadStatus::Loading);
        }
        UiUpdate::ViewError { view, message } => {
            state.load_status.insert(view, LoadStatus::Error(message));
        }
        UiUpdate::ChatAppended(message) => {
            state.chat.push(*message);
        }
        UiUpdate::ChatPending(pending) => {
            state.chat_pending = pending;
        }
        UiUpdate::PlanLoading => {
            state.plan = None;
            state.plan_loading = true;
        }
        UiUpdate::PlanReady(plan) => {
            state.plan = Some(*plan);
            state.plan_loading = false;
        }
        UiUpdate::PlanReviewing(reviewing) => {
            state.plan_reviewing = reviewing;
        }
        UiUpdate::WorkPackages(packages) => {
            state.work_packages = packages;
            state.load_status.insert(ViewId::WorkPackages, LoadStatus::Ready);
        }
        UiUpdate::Assignees(personnel) => {
            state.assignees = personnel;
        }
        UiUpdate::SprintState(sprint) => {
            state.sprint = Some(*sprint);
            state.load_status.insert(ViewId::Sprint, LoadStatus::Ready);
        }
        UiUpdate::Dashboard(dashboard) => {
            state.dashboard = Some(*dashboard);
            state.load_status.insert(ViewId::Dashboard, LoadStatus::Ready);
        }
        UiUpdate::SprintPlanResult(result) => {
            state.sprint_result = Some(*result);
        }
        UiUpdate::Resources(snapshot) => {
            state.resources = *snapshot;
            state.load_status.insert(ViewId::Resources, LoadStatus::Ready);
        }
        UiUpdate::Efficiency(snapshot) => {
            state.efficiency = Some(*snapshot);
            state.load_status.insert(ViewId::Efficiency, LoadStatus::Ready);
        }
        UiUpdate::TechnicianTasks(tasks) => {
            state.tasks = tasks;
            state.load_status.insert(ViewId::Tasks, LoadStatus::Ready);
        }
        UiUpdate::FieldMetrics(metrics) => {
            state.field_metrics = Some(*metrics);
            state.load_status.insert(ViewId::Metrics, LoadStatus::Ready);
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
    state.clamp_cursors();
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete console frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.is_lead());

    widgets::status_bar::render(frame, layout.status_bar, state);

    match state.active_view.filter(|_| state.user.is_some()) {
        None => widgets::user_select::render(frame, layout.main_panel, state),
        Some(ViewId::Planning) => widgets::plan::render(frame, layout.main_panel, state),
        Some(ViewId::Sprint) => widgets::board::render(frame, layout.main_panel, state),
        Some(ViewId::WorkPackages) => widgets::work_packages::render(frame, layout.main_panel, state),
        Some(ViewId::Resources) => widgets::resources::render(frame, layout.main_panel, state),
        Some(ViewId::Efficiency) => widgets::efficiency::render(frame, layout.main_panel, state),
        Some(ViewId::Tasks) => widgets::tasks::render(frame, layout.main_panel, state),
        Some(ViewId::Assistant) => widgets::chat::render(frame, layout.main_panel, state),
        Some(ViewId::Metrics) => widgets::metrics::render(frame, layout.main_panel, state),
        Some(ViewId::Dashboard) => widgets::dashboard::render(frame, layout.main_panel, state),
    }

    if let Some(sidebar) = layout.sidebar {
        widgets::dashboard::render(frame, sidebar, state);
    }

    render_help_bar(frame, layout.help_bar, state);

    match &state.mode {
        Mode::Normal => {}
        Mode::Text(entry) => widgets::overlay::render_text_entry(frame, frame.area(), entry),
        Mode::Form(form) => widgets::overlay::render_form(frame, frame.area(), form),
        Mode::Confirm(confirm) => widgets::overlay::render_confirm(frame, frame.area(), confirm),
    }
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for the current mode and view.
pub fn help_text(state: &ViewState) -> &'static str {
    match &state.mode {
        Mode::Text(_) => " Enter:Send | Esc:Cancel",
        Mode::Form(_) => " Tab/Up/Down:Field | Left/Right:Choose | Enter:Save | Esc:Cancel",
        Mode::Confirm(_) => " y:Confirm | n/Esc:Cancel",
        Mode::Normal => match state.active_view.filter(|_| state.user.is_some()) {
            None => " Up/Down:Select | Enter:Sign in | R:Reload | q:Quit",
            Some(ViewId::Planning) => {
                " f:Fault | a:Add to backlog | r:QA review | i:Ask | p:Sprint request | u:Switch user | q:Quit"
            }
            Some(ViewId::Sprint) => {
                " Left/Right:Column | Up/Down:Card | h/l:Move | s:Start | e:End | c:Complete | p:Sprint request | q:Quit"
            }
            Some(ViewId::WorkPackages) => {
                " Up/Down:Select | n:New | Enter:Edit | d:Delete | p:Sprint request | q:Quit"
            }
            Some(ViewId::Resources) => {
                " Left/Right:Section | Up/Down:Select | n:New | Enter:Edit | d:Delete | t:Toggle tool | q:Quit"
            }
            Some(ViewId::Assistant) => " i/Enter:Ask | 1-3:Tabs | u:Switch user | q:Quit",
            Some(_) if state.is_lead() => " 1-5:Tabs | R:Reload | p:Sprint request | u:Switch user | q:Quit",
            Some(_) => " 1-3:Tabs | R:Reload | u:Switch user | q:Quit",
        },
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Runs a select loop over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        info!("UI channel closed, leaving console");
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use aerotech_core::models::user::UserRole;
    use aerotech_core::protocol::NoticeLevel;

    pub(crate) fn lead() -> User {
        User {
            id: "U1".into(),
            name: "Ayse Kaya".into(),
            role: UserRole::Lead,
            device_type: Some("desktop".into()),
        }
    }

    fn wp(id: &str, status: WorkPackageStatus) -> WorkPackage {
        WorkPackage {
            id: id.into(),
            title: format!("Package {id}"),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn view_state_default_shows_user_selection() {
        let state = ViewState::default();
        assert!(state.user.is_none());
        assert!(state.tabs().is_empty());
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.status(ViewId::Sprint), LoadStatus::Idle);
        assert_eq!(state.resource_section, ResourceKind::Personnel);
    }

    #[test]
    fn session_started_selects_first_tab() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::SessionStarted(Box::new(lead())));
        assert_eq!(state.active_view, Some(ViewId::Planning));
        assert_eq!(state.tabs().len(), 5);
        assert!(state.is_lead());
    }

    #[test]
    fn session_end_clears_view_data_but_keeps_users() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Users(vec![lead()]));
        apply_ui_update(&mut state, UiUpdate::SessionStarted(Box::new(lead())));
        apply_ui_update(
            &mut state,
            UiUpdate::ChatAppended(Box::new(ChatMessage::user("hello"))),
        );
        apply_ui_update(&mut state, UiUpdate::SessionEnded);

        assert!(state.user.is_none());
        assert!(state.chat.is_empty());
        assert_eq!(state.users.len(), 1);
        assert!(!state.users_loaded);
    }

    #[test]
    fn loading_then_error_then_ready() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ViewLoading(ViewId::Resources));
        assert_eq!(state.status(ViewId::Resources), LoadStatus::Loading);
        apply_ui_update(
            &mut state,
            UiUpdate::ViewError {
                view: ViewId::Resources,
                message: "Resources fetch failed (500)".into(),
            },
        );
        assert_eq!(
            state.status(ViewId::Resources),
            LoadStatus::Error("Resources fetch failed (500)".into())
        );
        apply_ui_update(
            &mut state,
            UiUpdate::Resources(Box::new(ResourceSnapshot::default())),
        );
        assert_eq!(state.status(ViewId::Resources), LoadStatus::Ready);
    }

    #[test]
    fn plan_loading_clears_previous_plan() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::PlanReady(Box::new(MaintenancePlan::failed("Error: x"))),
        );
        apply_ui_update(&mut state, UiUpdate::PlanLoading);
        assert!(state.plan.is_none());
        assert!(state.plan_loading);
    }

    #[test]
    fn board_columns_group_by_status() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::WorkPackages(vec![
                wp("A", WorkPackageStatus::Pending),
                wp("B", WorkPackageStatus::Approved),
                wp("C", WorkPackageStatus::Pending),
                wp("D", WorkPackageStatus::Other("deferred".into())),
            ]),
        );
        let ids = |col| state.column(col).iter().map(|w| w.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(0), vec!["A", "C"]);
        assert!(ids(1).is_empty());
        assert_eq!(ids(2), vec!["B"]);
    }

    #[test]
    fn cursors_are_clamped_when_lists_shrink() {
        let mut state = ViewState::default();
        state.package_cursor = 5;
        state.board_row = 3;
        apply_ui_update(
            &mut state,
            UiUpdate::WorkPackages(vec![wp("A", WorkPackageStatus::Pending)]),
        );
        assert_eq!(state.package_cursor, 0);
        assert_eq!(state.board_row, 0);
        assert_eq!(state.selected_card().map(|w| w.id.as_str()), Some("A"));
    }

    #[test]
    fn notice_is_shown() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice(Notice::error("nope")));
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn help_text_follows_mode() {
        let mut state = ViewState::default();
        assert!(help_text(&state).contains("Sign in"));
        state.mode = Mode::Form(Box::new(Form::sprint_start()));
        assert!(help_text(&state).contains("Esc:Cancel"));
    }

    #[test]
    fn full_frame_renders_for_every_view() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::SessionStarted(Box::new(lead())));
        for view in [
            ViewId::Planning,
            ViewId::Sprint,
            ViewId::WorkPackages,
            ViewId::Resources,
            ViewId::Efficiency,
            ViewId::Tasks,
            ViewId::Assistant,
            ViewId::Metrics,
        ] {
            state.active_view = Some(view);
            let backend = ratatui::backend::TestBackend::new(140, 40);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        }
    }

    #[test]
    fn frame_renders_on_tiny_terminal() {
        let state = ViewState::default();
        let backend = ratatui::backend::TestBackend::new(20, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
