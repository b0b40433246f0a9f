// Application state and orchestration logic.
//
// The central event loop that turns user commands from the TUI into backend
// calls, publishes the refresh signal after mutations, and re-reads the data
// of mounted views when that signal fires. Every backend call runs in its
// own task so the loop (and the UI) never waits on the network.

use std::sync::Arc;

use aerotech_api::{ApiError, MaintenanceApi};
use aerotech_core::config::Config;
use aerotech_core::drafts;
use aerotech_core::events::{RefreshBus, Subscription};
use aerotech_core::ids;
use aerotech_core::models::analytics::CompletedPackage;
use aerotech_core::models::chat::ChatMessage;
use aerotech_core::models::plan::MaintenancePlan;
use aerotech_core::models::resources::{Part, Personnel, ResourceRecord, Tool};
use aerotech_core::models::sprint::{SprintPlanResponse, SprintStartRequest, SprintState};
use aerotech_core::models::user::{User, UserFilter};
use aerotech_core::models::work_package::{WorkPackage, WorkPackagePatch, WorkPackageStatus};
use aerotech_core::protocol::{
    EfficiencySnapshot, FieldMetrics, Notice, ResourceSnapshot, SprintStartForm, UiUpdate,
    UserCommand, ViewId,
};
use aerotech_core::references::extract_references;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::tasks::build_task_list;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Capacity of the queue between refresh listeners and the event loop. A
/// full queue makes the listener report an error; the view keeps its data.
pub const REFRESH_QUEUE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// A signed-in user and the views mounted for them.
pub struct Session {
    pub user: User,
    pub views: Vec<ViewId>,
    /// Held for the session's lifetime; dropping them unsubscribes.
    subscriptions: Vec<Subscription>,
}

impl Session {
    pub fn is_mounted(&self, view: ViewId) -> bool {
        self.views.contains(&view)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// The last generated plan and the fault description it was generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanContext {
    pub fault_description: String,
    pub plan: MaintenancePlan,
}

/// State written by spawned tasks and read by later commands.
#[derive(Debug, Default)]
struct Shared {
    plan: Option<PlanContext>,
    sprint: Option<SprintState>,
}

/// Everything a spawned backend task needs.
///
/// `epoch` is the session the task was spawned for. Once that session is
/// unmounted the task may still finish its request, but its updates and
/// shared-state writes are dropped.
#[derive(Clone)]
struct TaskContext {
    api: Arc<dyn MaintenanceApi>,
    bus: RefreshBus,
    ui_tx: mpsc::Sender<UiUpdate>,
    shared: Arc<Mutex<Shared>>,
    user_id: Option<String>,
    epoch: u64,
    current_epoch: Arc<Mutex<u64>>,
}

impl TaskContext {
    /// Run `f` on the shared state unless this task's session has ended.
    fn with_shared<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> Option<R> {
        let current = self.current_epoch.lock();
        if *current != self.epoch {
            return None;
        }
        Some(f(&mut self.shared.lock()))
    }

    async fn send(&self, update: UiUpdate) {
        let Ok(permit) = self.ui_tx.reserve().await else {
            return;
        };
        // Checked under the lock `AppState::unmount` bumps, so a stale update
        // either lands before SessionEnded/SessionStarted or not at all.
        let current = self.current_epoch.lock();
        if *current == self.epoch {
            permit.send(update);
        } else {
            debug!("Dropping update from ended session {}", self.epoch);
        }
    }

    async fn notice(&self, notice: Notice) {
        self.send(UiUpdate::Notice(notice)).await;
    }

    /// Publish the refresh signal after a successful mutation.
    fn publish_refresh(&self, reason: &str) {
        info!("Publishing refresh after {}", reason);
        self.bus.notify();
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub bus: RefreshBus,
    pub session: Option<Session>,
    api: Arc<dyn MaintenanceApi>,
    shared: Arc<Mutex<Shared>>,
    refresh_tx: mpsc::Sender<ViewId>,
    /// Bumped on every unmount; see `TaskContext::epoch`.
    epoch: Arc<Mutex<u64>>,
}

impl AppState {
    /// Create the state plus the receiving end of the refresh queue, which
    /// `run` consumes.
    pub fn new(
        config: Config,
        api: Arc<dyn MaintenanceApi>,
        bus: RefreshBus,
    ) -> (Self, mpsc::Receiver<ViewId>) {
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_QUEUE_CAPACITY);
        let state = AppState {
            config,
            bus,
            session: None,
            api,
            shared: Arc::new(Mutex::new(Shared::default())),
            refresh_tx,
            epoch: Arc::new(Mutex::new(0)),
        };
        (state, refresh_rx)
    }

    pub fn plan(&self) -> Option<PlanContext> {
        self.shared.lock().plan.clone()
    }

    fn context(&self, ui_tx: &mpsc::Sender<UiUpdate>) -> TaskContext {
        TaskContext {
            api: Arc::clone(&self.api),
            bus: self.bus.clone(),
            ui_tx: ui_tx.clone(),
            shared: Arc::clone(&self.shared),
            user_id: self.session.as_ref().map(|s| s.user.id.clone()),
            epoch: self.epoch(),
            current_epoch: Arc::clone(&self.epoch),
        }
    }

    /// Identifies the current session; changes whenever a session ends.
    pub fn epoch(&self) -> u64 {
        *self.epoch.lock()
    }

    /// Mount the views for `user`, replacing any current session.
    ///
    /// Views that follow the refresh signal get a bus subscription that
    /// queues a silent reload; the subscriptions live as long as the session.
    pub fn mount(&mut self, user: User) -> &Session {
        self.unmount();

        let views = ViewId::mounted_for(&user.role);
        let subscriptions = views
            .iter()
            .copied()
            .filter(|view| view.follows_refresh())
            .map(|view| {
                let tx = self.refresh_tx.clone();
                self.bus.subscribe(view.title(), move || {
                    tx.try_send(view)
                        .map_err(|e| anyhow::anyhow!("cannot queue {:?} refresh: {}", view, e))
                })
            })
            .collect::<Vec<_>>();

        info!(
            "Session started for {} ({}), {} views, {} refresh subscriptions",
            user.id,
            user.role,
            views.len(),
            subscriptions.len()
        );

        self.session.insert(Session {
            user,
            views,
            subscriptions,
        })
    }

    /// Drop the current session, unsubscribing its views. Tasks still
    /// running for it can no longer reach the UI.
    pub fn unmount(&mut self) {
        *self.epoch.lock() += 1;
        if let Some(session) = self.session.take() {
            info!("Session for {} ended", session.user.id);
        }
        let mut shared = self.shared.lock();
        shared.plan = None;
        shared.sprint = None;
    }

    fn is_mounted(&self, view: ViewId) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_mounted(view))
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Views queued for a silent reload by the refresh signal
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut refresh_rx: mpsc::Receiver<ViewId>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    start_session_from_config(&mut state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Refresh signal ---
            Some(view) = refresh_rx.recv() => {
                if state.is_mounted(view) {
                    debug!("Silent reload of {:?}", view);
                    let ctx = state.context(&ui_tx);
                    tokio::spawn(async move { load_view(&ctx, view, true).await });
                } else {
                    debug!("Ignoring refresh for unmounted view {:?}", view);
                }
            }
        }
    }

    state.unmount();
    info!("Application event loop exiting");
    Ok(())
}

/// Preselect a session from `[console]`, or show user selection.
async fn start_session_from_config(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match state.config.console.role.clone() {
        Some(role) => {
            let user = User {
                id: state.config.console.user_id.clone().unwrap_or_default(),
                name: role.label().to_string(),
                role,
                device_type: None,
            };
            select_user(state, user, ui_tx).await;
        }
        None => load_users(state.context(ui_tx)),
    }
}

fn load_users(ctx: TaskContext) {
    tokio::spawn(async move {
        match ctx.api.users(&UserFilter::default()).await {
            Ok(users) => ctx.send(UiUpdate::Users(users)).await,
            Err(e) => {
                warn!("Failed to load users: {}", e);
                ctx.send(UiUpdate::Users(Vec::new())).await;
                ctx.notice(Notice::error(format!("Could not load users: {e}"))).await;
            }
        }
    });
}

async fn select_user(state: &mut AppState, user: User, ui_tx: &mpsc::Sender<UiUpdate>) {
    let views = state.mount(user.clone()).views.clone();
    let _ = ui_tx.send(UiUpdate::SessionStarted(Box::new(user))).await;

    let ctx = state.context(ui_tx);
    tokio::spawn(async move {
        for view in views {
            load_view(&ctx, view, false).await;
        }
    });
}

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::LoadUsers => load_users(state.context(ui_tx)),
        UserCommand::SelectUser(user) => {
            select_user(state, *user, ui_tx).await;
        }
        UserCommand::SwitchUser => {
            state.unmount();
            let _ = ui_tx.send(UiUpdate::SessionEnded).await;
            load_users(state.context(ui_tx));
        }
        UserCommand::Refresh(view) => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move { load_view(&ctx, view, false).await });
        }
        UserCommand::AskQuestion(question) => {
            let question = question.trim().to_string();
            if question.is_empty() {
                return;
            }
            let _ = ui_tx
                .send(UiUpdate::ChatAppended(Box::new(ChatMessage::user(question.clone()))))
                .await;
            let _ = ui_tx.send(UiUpdate::ChatPending(true)).await;
            let ctx = state.context(ui_tx);
            tokio::spawn(async move { ask_question(&ctx, &question).await });
        }
        UserCommand::GeneratePlan(fault) => {
            let fault = fault.trim().to_string();
            if fault.is_empty() {
                return;
            }
            let _ = ui_tx.send(UiUpdate::PlanLoading).await;
            let ctx = state.context(ui_tx);
            tokio::spawn(async move { generate_plan(&ctx, fault).await });
        }
        UserCommand::ReviewPlan => {
            let Some(request) = state.plan().and_then(|p| p.plan.review_request()) else {
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::error(
                        "Generate a complete plan before requesting a review",
                    )))
                    .await;
                return;
            };
            let _ = ui_tx.send(UiUpdate::PlanReviewing(true)).await;
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                match ctx.api.review_plan(&request).await {
                    Ok(review) => {
                        let updated = ctx
                            .with_shared(|shared| {
                                shared.plan.as_mut().map(|p| {
                                    p.plan.qa_review = Some(review.qa_review);
                                    p.plan.clone()
                                })
                            })
                            .flatten();
                        if let Some(plan) = updated {
                            ctx.send(UiUpdate::PlanReady(Box::new(plan))).await;
                        }
                    }
                    Err(e) => {
                        warn!("Plan review failed: {}", e);
                        ctx.notice(Notice::error(format!("Plan review failed: {e}"))).await;
                    }
                }
                ctx.send(UiUpdate::PlanReviewing(false)).await;
            });
        }
        UserCommand::AddPlanToBacklog => {
            let plan = state.plan();
            let text = plan
                .as_ref()
                .and_then(|p| p.plan.work_package.clone())
                .filter(|t| !t.trim().is_empty());
            let (Some(plan), Some(text)) = (plan, text) else {
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::error("The plan has no work package to add")))
                    .await;
                return;
            };
            let draft = drafts::parse(&text, &plan.fault_description, &state.config.drafts);
            info!("Adding plan work package {} ({:?}) to backlog", draft.id, draft.source);
            let record = WorkPackage::from(draft);
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                match ctx.api.create_work_package(&record).await {
                    Ok(()) => {
                        ctx.publish_refresh("adding plan to backlog");
                        ctx.notice(Notice::success(format!("{} added to backlog", record.id)))
                            .await;
                    }
                    Err(e) => {
                        warn!("Add to backlog failed: {}", e);
                        ctx.notice(Notice::error(format!("Could not add to backlog: {e}"))).await;
                    }
                }
            });
        }
        UserCommand::SprintRequest(request) => {
            let request = request.trim().to_string();
            if request.is_empty() {
                return;
            }
            let ctx = state.context(ui_tx);
            tokio::spawn(async move { sprint_request(&ctx, &request).await });
        }
        UserCommand::StartSprint(form) => {
            let request = start_request(&form, state.config.sprint.default_duration_days);
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.start_sprint(&request).await;
                finish_mutation(&ctx, result, "sprint start", "Sprint started", ViewId::Sprint).await;
            });
        }
        UserCommand::EndSprint => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.end_sprint().await;
                finish_mutation(&ctx, result, "sprint end", "Sprint ended", ViewId::Sprint).await;
            });
        }
        UserCommand::MoveWorkPackage { id, status } => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let patch = WorkPackagePatch::status(status.clone());
                let result = ctx.api.update_work_package(&id, &patch).await;
                let done = format!("{} moved to {}", id, status.label());
                finish_mutation(&ctx, result, "status move", &done, ViewId::Sprint).await;
            });
        }
        UserCommand::CreateWorkPackage(record) => {
            let mut record = *record;
            if record.title.trim().is_empty() {
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::error("A work package needs a title")))
                    .await;
                return;
            }
            if record.id.trim().is_empty() {
                record.id = ids::work_package_id(Utc::now());
            }
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.create_work_package(&record).await;
                let done = format!("{} created", record.id);
                finish_mutation(&ctx, result, "work package create", &done, ViewId::WorkPackages)
                    .await;
            });
        }
        UserCommand::UpdateWorkPackage { id, patch } => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.update_work_package(&id, &patch).await;
                let done = format!("{} updated", id);
                finish_mutation(&ctx, result, "work package update", &done, ViewId::WorkPackages)
                    .await;
            });
        }
        UserCommand::DeleteWorkPackage(id) => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.delete_work_package(&id).await;
                let done = format!("{} deleted", id);
                finish_mutation(&ctx, result, "work package delete", &done, ViewId::WorkPackages)
                    .await;
            });
        }
        UserCommand::SaveResource { record, is_new } => {
            let record = with_resource_id(*record);
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let (result, verb) = if is_new {
                    (ctx.api.create_resource(&record).await, "created")
                } else {
                    (ctx.api.update_resource(&record).await, "updated")
                };
                let done = format!("{} {}", record.id(), verb);
                finish_mutation(&ctx, result, "resource save", &done, ViewId::Resources).await;
            });
        }
        UserCommand::DeleteResource { kind, id } => {
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let result = ctx.api.delete_resource(kind, &id).await;
                let done = format!("{} deleted", id);
                finish_mutation(&ctx, result, "resource delete", &done, ViewId::Resources).await;
            });
        }
        UserCommand::ToggleTool(tool) => {
            let toggled = Tool {
                status: tool.status.toggled(),
                ..*tool
            };
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                let done = format!("{} is now {}", toggled.id, toggled.status.as_str());
                let result = ctx
                    .api
                    .update_resource(&ResourceRecord::Tool(toggled))
                    .await;
                finish_mutation(&ctx, result, "tool toggle", &done, ViewId::Resources).await;
            });
        }
        UserCommand::RecordCompletion(record) => {
            if record.status != WorkPackageStatus::Approved {
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::error(
                        "Only approved work packages can be logged as complete",
                    )))
                    .await;
                return;
            }
            let sprint_id = state
                .shared
                .lock()
                .sprint
                .as_ref()
                .filter(|s| s.is_active())
                .and_then(|s| s.name.clone());
            let completion = completion_record(&record, sprint_id);
            let ctx = state.context(ui_tx);
            tokio::spawn(async move {
                match ctx.api.record_completion(&completion).await {
                    Ok(status) => {
                        debug!("Completion logged: {}", status.status);
                        ctx.notice(Notice::success(format!(
                            "Completion logged for {}",
                            completion.work_package_id
                        )))
                        .await;
                    }
                    Err(e) => {
                        warn!("Completion logging failed: {}", e);
                        ctx.notice(Notice::error(format!("Could not log completion: {e}"))).await;
                    }
                }
            });
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Command bodies
// ---------------------------------------------------------------------------

async fn ask_question(ctx: &TaskContext, question: &str) {
    let message = match ctx.api.ask(question).await {
        Ok(answer) => {
            let extracted = extract_references(&answer.answer);
            debug!("Answer carried {} reference(s)", extracted.references.len());
            let content = if extracted.text.is_empty() {
                answer.answer
            } else {
                extracted.text
            };
            ChatMessage::assistant(content, extracted.references)
        }
        Err(e) => {
            warn!("Question failed: {}", e);
            ChatMessage::assistant(format!("Connection error: {e}"), Vec::new())
        }
    };
    ctx.send(UiUpdate::ChatAppended(Box::new(message))).await;
    ctx.send(UiUpdate::ChatPending(false)).await;
}

async fn generate_plan(ctx: &TaskContext, fault_description: String) {
    let plan = match ctx.api.plan_maintenance(&fault_description).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!("Plan generation failed: {}", e);
            MaintenancePlan::failed(format!("Error: {e}"))
        }
    };
    ctx.with_shared(|shared| {
        shared.plan = Some(PlanContext {
            fault_description,
            plan: plan.clone(),
        })
    });
    ctx.send(UiUpdate::PlanReady(Box::new(plan))).await;
}

async fn sprint_request(ctx: &TaskContext, request: &str) {
    let mut published = false;
    let response = match ctx.api.sprint_plan(request).await {
        Ok(response) => {
            if response.mutates_backlog() {
                ctx.publish_refresh("backlog request");
                published = true;
            }
            response
        }
        Err(e) => {
            warn!("Sprint request failed: {}", e);
            SprintPlanResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };
    ctx.send(UiUpdate::SprintPlanResult(Box::new(response))).await;
    // The signal already reloads the dashboard.
    if !published {
        load_view(ctx, ViewId::Dashboard, true).await;
    }
}

/// Publish the refresh signal after a successful mutation, then reload the
/// initiating view and report. Failures only produce an error notice.
///
/// Views that follow the signal are reloaded by it, not here.
async fn finish_mutation(
    ctx: &TaskContext,
    result: Result<(), ApiError>,
    what: &str,
    done: &str,
    view: ViewId,
) {
    match result {
        Ok(()) => {
            ctx.publish_refresh(what);
            if !view.follows_refresh() {
                load_view(ctx, view, true).await;
            }
            ctx.notice(Notice::success(done)).await;
        }
        Err(e) => {
            warn!("{} failed: {}", what, e);
            ctx.notice(Notice::error(e.to_string())).await;
        }
    }
}

fn start_request(form: &SprintStartForm, default_duration_days: u32) -> SprintStartRequest {
    SprintStartRequest::new(
        &form.name,
        &form.goal,
        &form.start_date,
        &form.end_date,
        form.duration_days,
        default_duration_days,
    )
}

/// Give a new resource a generated id if the form left it blank.
fn with_resource_id(record: ResourceRecord) -> ResourceRecord {
    if !record.id().trim().is_empty() {
        return record;
    }
    let id = ids::resource_id(record.kind(), Utc::now());
    match record {
        ResourceRecord::Personnel(p) => ResourceRecord::Personnel(Personnel { id, ..p }),
        ResourceRecord::Tool(t) => ResourceRecord::Tool(Tool { id, ..t }),
        ResourceRecord::Part(p) => ResourceRecord::Part(Part { id, ..p }),
    }
}

fn completion_record(record: &WorkPackage, sprint_id: Option<String>) -> CompletedPackage {
    let now = Utc::now();
    let stamp = now.to_rfc3339();
    CompletedPackage {
        id: format!("CP-{}-{}", record.key(), ids::millis_stamp(now, 6)),
        work_package_id: record.key().to_string(),
        sprint_id,
        started_at: stamp.clone(),
        completed_at: stamp,
        first_pass_success: true,
        rework_count: 0,
        planned_minutes: None,
        actual_minutes: None,
        assigned_personnel_count: None,
        criticality: None,
    }
}

// ---------------------------------------------------------------------------
// View loading
// ---------------------------------------------------------------------------

/// Fetch a view's data and push it to the UI.
///
/// A `silent` load emits no loading state and swallows its own failure
/// (logged, data left as it was); a visible load reports failure as a view
/// error.
async fn load_view(ctx: &TaskContext, view: ViewId, silent: bool) {
    if !silent {
        ctx.send(UiUpdate::ViewLoading(view)).await;
    }

    let result = match view {
        ViewId::Planning | ViewId::Assistant => Ok(()),
        ViewId::Sprint => load_sprint(ctx).await,
        ViewId::WorkPackages => load_work_packages(ctx).await,
        ViewId::Resources => load_resources(ctx).await,
        ViewId::Efficiency => load_efficiency(ctx).await,
        ViewId::Dashboard => load_dashboard(ctx).await,
        ViewId::Tasks => load_tasks(ctx).await,
        ViewId::Metrics => load_field_metrics(ctx).await,
    };

    if let Err(e) = result {
        if silent {
            warn!("Background reload of {:?} failed: {}", view, e);
        } else {
            warn!("Loading {:?} failed: {}", view, e);
            ctx.send(UiUpdate::ViewError {
                view,
                message: e.to_string(),
            })
            .await;
        }
    }
}

async fn load_sprint(ctx: &TaskContext) -> Result<(), ApiError> {
    let (packages, sprint) = tokio::join!(ctx.api.work_packages(), ctx.api.sprint_state());
    let packages = packages?;
    // Without sprint state the board still works; it just shows no sprint.
    let sprint = sprint.unwrap_or_else(|e| {
        warn!("Sprint state unavailable: {}", e);
        SprintState::default()
    });
    ctx.with_shared(|shared| shared.sprint = Some(sprint.clone()));
    ctx.send(UiUpdate::WorkPackages(packages)).await;
    ctx.send(UiUpdate::SprintState(Box::new(sprint))).await;
    Ok(())
}

async fn load_work_packages(ctx: &TaskContext) -> Result<(), ApiError> {
    let (packages, personnel) = tokio::join!(ctx.api.work_packages(), ctx.api.personnel());
    ctx.send(UiUpdate::WorkPackages(packages?)).await;
    match personnel {
        Ok(personnel) => ctx.send(UiUpdate::Assignees(personnel)).await,
        Err(e) => warn!("Assignee list unavailable: {}", e),
    }
    Ok(())
}

async fn load_resources(ctx: &TaskContext) -> Result<(), ApiError> {
    let (personnel, tools, parts) =
        tokio::join!(ctx.api.personnel(), ctx.api.tools(), ctx.api.parts());
    let snapshot = ResourceSnapshot {
        personnel: personnel?,
        tools: tools?,
        parts: parts?,
    };
    ctx.send(UiUpdate::Resources(Box::new(snapshot))).await;
    Ok(())
}

async fn load_efficiency(ctx: &TaskContext) -> Result<(), ApiError> {
    let (metrics, monthly, analysis) = tokio::join!(
        ctx.api.efficiency_metrics(),
        ctx.api.efficiency_monthly(),
        ctx.api.efficiency_analysis()
    );
    let analysis = match analysis {
        Ok(a) => Some(a),
        Err(e) => {
            warn!("Efficiency analysis unavailable: {}", e);
            None
        }
    };
    let snapshot = EfficiencySnapshot {
        metrics: metrics?,
        monthly: monthly?,
        analysis,
    };
    ctx.send(UiUpdate::Efficiency(Box::new(snapshot))).await;
    Ok(())
}

async fn load_dashboard(ctx: &TaskContext) -> Result<(), ApiError> {
    let dashboard = ctx.api.scrum_dashboard().await?;
    ctx.send(UiUpdate::Dashboard(Box::new(dashboard))).await;
    Ok(())
}

async fn load_tasks(ctx: &TaskContext) -> Result<(), ApiError> {
    let user_id = ctx.user_id.clone().unwrap_or_default();
    let (dashboard, assigned) = tokio::join!(
        ctx.api.scrum_dashboard(),
        ctx.api.user_work_packages(&user_id)
    );
    let dashboard = dashboard?;
    let tasks = build_task_list(&assigned?, &dashboard.recent_items);
    ctx.send(UiUpdate::TechnicianTasks(tasks)).await;
    Ok(())
}

async fn load_field_metrics(ctx: &TaskContext) -> Result<(), ApiError> {
    let (dashboard, metrics) =
        tokio::join!(ctx.api.scrum_dashboard(), ctx.api.efficiency_metrics());
    let snapshot = FieldMetrics {
        dashboard: dashboard?,
        metrics: metrics?,
    };
    ctx.send(UiUpdate::FieldMetrics(Box::new(snapshot))).await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
