// Messages between the orchestrator and the terminal UI.
//
// The TUI sends `UserCommand`s; the orchestrator answers with `UiUpdate`s.
// Neither side shares state with the other.

use crate::models::analytics::{EfficiencyAnalysis, EfficiencyMetrics, MonthlyEfficiency};
use crate::models::chat::ChatMessage;
use crate::models::plan::MaintenancePlan;
use crate::models::resources::{Part, Personnel, ResourceKind, ResourceRecord, Tool};
use crate::models::sprint::{ScrumDashboard, SprintPlanResponse, SprintState};
use crate::models::user::{User, UserRole};
use crate::models::work_package::{WorkPackage, WorkPackagePatch, WorkPackageStatus};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Every data-bearing view. Lead and technician sessions mount different
/// subsets; `Dashboard` is the lead's side panel rather than a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Planning,
    Sprint,
    WorkPackages,
    Resources,
    Efficiency,
    Dashboard,
    Tasks,
    Assistant,
    Metrics,
}

impl ViewId {
    /// Lead tabs, in key order `1`..`5`.
    pub const LEAD_TABS: [ViewId; 5] = [
        ViewId::Planning,
        ViewId::Sprint,
        ViewId::WorkPackages,
        ViewId::Resources,
        ViewId::Efficiency,
    ];

    /// Technician tabs, in key order `1`..`3`.
    pub const TECHNICIAN_TABS: [ViewId; 3] = [ViewId::Tasks, ViewId::Assistant, ViewId::Metrics];

    pub fn tabs_for(role: &UserRole) -> &'static [ViewId] {
        if role.is_lead() {
            &Self::LEAD_TABS
        } else {
            &Self::TECHNICIAN_TABS
        }
    }

    /// Every view a session with `role` mounts, tabs first.
    pub fn mounted_for(role: &UserRole) -> Vec<ViewId> {
        let mut views = Self::tabs_for(role).to_vec();
        if role.is_lead() {
            views.push(ViewId::Dashboard);
        }
        views
    }

    /// Whether the view re-reads its data when the refresh signal fires.
    pub fn follows_refresh(self) -> bool {
        matches!(
            self,
            ViewId::Dashboard
                | ViewId::Sprint
                | ViewId::WorkPackages
                | ViewId::Tasks
                | ViewId::Metrics
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewId::Planning => "Planning",
            ViewId::Sprint => "Sprint",
            ViewId::WorkPackages => "Work Packages",
            ViewId::Resources => "Resources",
            ViewId::Efficiency => "Efficiency",
            ViewId::Dashboard => "Dashboard",
            ViewId::Tasks => "Tasks",
            ViewId::Assistant => "Assistant",
            ViewId::Metrics => "Metrics",
        }
    }
}

// ---------------------------------------------------------------------------
// Supporting payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One-line message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Load state of a single view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Where a technician task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSource {
    /// A work package assigned to the technician.
    WorkPackage,
    /// A recent sprint item, shown for reference only.
    Sprint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub status: WorkPackageStatus,
    pub source: TaskSource,
    /// 1 = in progress, 2 = other assigned work, 3 = sprint reference.
    pub priority: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSnapshot {
    pub personnel: Vec<Personnel>,
    pub tools: Vec<Tool>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EfficiencySnapshot {
    pub metrics: EfficiencyMetrics,
    pub monthly: Vec<MonthlyEfficiency>,
    /// Absent when the analysis call failed; the rest still renders.
    pub analysis: Option<EfficiencyAnalysis>,
}

/// Sprint progress plus headline metrics for the technician.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMetrics {
    pub dashboard: ScrumDashboard,
    pub metrics: EfficiencyMetrics,
}

/// Values collected by the sprint start form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintStartForm {
    pub name: String,
    pub goal: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_days: Option<u32>,
}

// ---------------------------------------------------------------------------
// Commands and updates
// ---------------------------------------------------------------------------

/// Commands from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Load the user list for the selection screen.
    LoadUsers,
    SelectUser(Box<User>),
    /// Leave the current session and return to user selection.
    SwitchUser,
    AskQuestion(String),
    GeneratePlan(String),
    ReviewPlan,
    AddPlanToBacklog,
    SprintRequest(String),
    StartSprint(SprintStartForm),
    EndSprint,
    MoveWorkPackage {
        id: String,
        status: WorkPackageStatus,
    },
    CreateWorkPackage(Box<WorkPackage>),
    UpdateWorkPackage {
        id: String,
        patch: Box<WorkPackagePatch>,
    },
    DeleteWorkPackage(String),
    /// Create (`is_new`) or update a resource record.
    SaveResource {
        record: Box<ResourceRecord>,
        is_new: bool,
    },
    DeleteResource {
        kind: ResourceKind,
        id: String,
    },
    ToggleTool(Box<Tool>),
    /// Log an approved work package to the efficiency analytics.
    RecordCompletion(Box<WorkPackage>),
    Refresh(ViewId),
    Quit,
}

/// Updates from the orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Users(Vec<User>),
    SessionStarted(Box<User>),
    SessionEnded,
    ViewLoading(ViewId),
    ViewError { view: ViewId, message: String },
    ChatAppended(Box<ChatMessage>),
    ChatPending(bool),
    PlanLoading,
    PlanReady(Box<MaintenancePlan>),
    PlanReviewing(bool),
    WorkPackages(Vec<WorkPackage>),
    /// Personnel offered as work-package assignees.
    Assignees(Vec<Personnel>),
    SprintState(Box<SprintState>),
    Dashboard(Box<ScrumDashboard>),
    SprintPlanResult(Box<SprintPlanResponse>),
    Resources(Box<ResourceSnapshot>),
    Efficiency(Box<EfficiencySnapshot>),
    TechnicianTasks(Vec<TaskItem>),
    FieldMetrics(Box<FieldMetrics>),
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_mounts_tabs_plus_dashboard() {
        let views = ViewId::mounted_for(&UserRole::Lead);
        assert_eq!(views.len(), 6);
        assert_eq!(views.last(), Some(&ViewId::Dashboard));
    }

    #[test]
    fn non_lead_roles_get_technician_views() {
        assert_eq!(ViewId::tabs_for(&UserRole::Technician), &ViewId::TECHNICIAN_TABS);
        assert_eq!(
            ViewId::tabs_for(&UserRole::Other("inspector".into())),
            &ViewId::TECHNICIAN_TABS
        );
    }

    #[test]
    fn refresh_followers() {
        let followers: Vec<_> = ViewId::mounted_for(&UserRole::Lead)
            .into_iter()
            .filter(|v| v.follows_refresh())
            .collect();
        assert_eq!(
            followers,
            vec![ViewId::Sprint, ViewId::WorkPackages, ViewId::Dashboard]
        );
        assert!(ViewId::Tasks.follows_refresh());
        assert!(ViewId::Metrics.follows_refresh());
        assert!(!ViewId::Assistant.follows_refresh());
    }
}
