// Work packages: persisted records, partial updates, and drafts derived
// from planner text.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a work package (pending -> in progress -> approved).
///
/// Missing or blank statuses read as `Pending`; unrecognised ones are kept
/// verbatim so they survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum WorkPackageStatus {
    #[default]
    Pending,
    InProgress,
    Approved,
    Other(String),
}

impl WorkPackageStatus {
    /// The statuses shown as Kanban columns, in board order.
    pub const BOARD: [WorkPackageStatus; 3] = [
        WorkPackageStatus::Pending,
        WorkPackageStatus::InProgress,
        WorkPackageStatus::Approved,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WorkPackageStatus::Pending => "pending",
            WorkPackageStatus::InProgress => "in_progress",
            WorkPackageStatus::Approved => "approved",
            WorkPackageStatus::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WorkPackageStatus::Pending => "Pending",
            WorkPackageStatus::InProgress => "In progress",
            WorkPackageStatus::Approved => "Approved",
            WorkPackageStatus::Other(s) => s,
        }
    }

    /// Column to the right, if any.
    pub fn next(&self) -> Option<WorkPackageStatus> {
        match self {
            WorkPackageStatus::Pending => Some(WorkPackageStatus::InProgress),
            WorkPackageStatus::InProgress => Some(WorkPackageStatus::Approved),
            _ => None,
        }
    }

    /// Column to the left, if any.
    pub fn previous(&self) -> Option<WorkPackageStatus> {
        match self {
            WorkPackageStatus::InProgress => Some(WorkPackageStatus::Pending),
            WorkPackageStatus::Approved => Some(WorkPackageStatus::InProgress),
            _ => None,
        }
    }
}

impl From<Option<String>> for WorkPackageStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("pending") => WorkPackageStatus::Pending,
            Some("in_progress") => WorkPackageStatus::InProgress,
            Some("approved") => WorkPackageStatus::Approved,
            Some(other) => WorkPackageStatus::Other(other.to_string()),
        }
    }
}

impl From<WorkPackageStatus> for String {
    fn from(status: WorkPackageStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for WorkPackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A work package as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkPackage {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub id: String,
    /// Some endpoints key packages by `work_package_id` instead of `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_package_id: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub aircraft: Option<String>,
    #[serde(default)]
    pub ata: Option<String>,
    #[serde(default)]
    pub status: WorkPackageStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl WorkPackage {
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            self.work_package_id.as_deref().unwrap_or_default()
        } else {
            &self.id
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.description.as_deref().unwrap_or_default()
        } else {
            &self.title
        }
    }
}

/// Partial update; only `Some` fields are sent. `assigned_to: Some(None)`
/// clears the assignee.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkPackagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkPackageStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl WorkPackagePatch {
    pub fn status(status: WorkPackageStatus) -> Self {
        WorkPackagePatch {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Full replacement of every editable field.
    pub fn from_record(wp: &WorkPackage) -> Self {
        WorkPackagePatch {
            title: Some(wp.title.clone()),
            aircraft: wp.aircraft.clone(),
            ata: wp.ata.clone(),
            status: Some(wp.status.clone()),
            assigned_to: Some(wp.assigned_to.clone()),
            due_date: wp.due_date.clone(),
        }
    }
}

/// Where a draft's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftSource {
    /// The planner text held a JSON object.
    Structured,
    /// The planner text was prose; fields are synthetic.
    #[default]
    Freeform,
}

/// A work package built from planner output, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkPackageDraft {
    pub id: String,
    pub title: String,
    pub aircraft: String,
    pub ata: String,
    pub status: WorkPackageStatus,
    pub assigned_to: Option<String>,
    pub due_date: NaiveDate,
    #[serde(skip)]
    pub source: DraftSource,
}

impl From<WorkPackageDraft> for WorkPackage {
    fn from(draft: WorkPackageDraft) -> Self {
        WorkPackage {
            id: draft.id,
            work_package_id: None,
            title: draft.title,
            description: None,
            aircraft: Some(draft.aircraft),
            ata: Some(draft.ata),
            status: draft.status,
            assigned_to: draft.assigned_to,
            due_date: Some(draft.due_date.format("%Y-%m-%d").to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reads_blank_and_null_as_pending() {
        let wp: WorkPackage = serde_json::from_str(r#"{"id":"WP-1","title":"t","status":""}"#).unwrap();
        assert_eq!(wp.status, WorkPackageStatus::Pending);
        let wp: WorkPackage = serde_json::from_str(r#"{"id":"WP-1","title":"t","status":null}"#).unwrap();
        assert_eq!(wp.status, WorkPackageStatus::Pending);
        let wp: WorkPackage = serde_json::from_str(r#"{"id":"WP-1","title":"t"}"#).unwrap();
        assert_eq!(wp.status, WorkPackageStatus::Pending);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let wp: WorkPackage =
            serde_json::from_str(r#"{"id":"WP-2","title":"t","status":"on_hold"}"#).unwrap();
        assert_eq!(wp.status, WorkPackageStatus::Other("on_hold".into()));
        assert_eq!(serde_json::to_value(&wp).unwrap()["status"], "on_hold");
    }

    #[test]
    fn board_moves() {
        assert_eq!(WorkPackageStatus::Pending.next(), Some(WorkPackageStatus::InProgress));
        assert_eq!(WorkPackageStatus::Approved.next(), None);
        assert_eq!(WorkPackageStatus::Pending.previous(), None);
        assert_eq!(WorkPackageStatus::Approved.previous(), Some(WorkPackageStatus::InProgress));
    }

    #[test]
    fn status_patch_sends_only_status() {
        let json = serde_json::to_value(WorkPackagePatch::status(WorkPackageStatus::InProgress)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "in_progress"}));
    }

    #[test]
    fn clearing_assignee_sends_null() {
        let patch = WorkPackagePatch {
            assigned_to: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({"assigned_to": null}));
    }

    #[test]
    fn key_falls_back_to_work_package_id() {
        let wp: WorkPackage =
            serde_json::from_str(r#"{"work_package_id":"WP-9","description":"Check trim"}"#).unwrap();
        assert_eq!(wp.key(), "WP-9");
        assert_eq!(wp.display_title(), "Check trim");
    }

    #[test]
    fn draft_serializes_calendar_date_and_hides_source() {
        let draft = WorkPackageDraft {
            id: "X1".into(),
            title: "Elevator".into(),
            aircraft: "A320".into(),
            ata: "27".into(),
            status: WorkPackageStatus::Pending,
            assigned_to: None,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            source: DraftSource::Structured,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["due_date"], "2026-03-09");
        assert_eq!(json["status"], "pending");
        assert!(json["assigned_to"].is_null());
        assert!(json.get("source").is_none());
    }
}
