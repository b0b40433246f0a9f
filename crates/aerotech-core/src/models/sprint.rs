// Sprint lifecycle, natural-language backlog operations, and the scrum
// dashboard summary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SprintState {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub status: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days_remaining: Option<i64>,
    #[serde(default)]
    pub duration_days: Option<u32>,
}

impl SprintState {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Body of `POST sprint/start`. Blank strings are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintStartRequest {
    pub name: Option<String>,
    pub goal: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration_days: u32,
}

impl SprintStartRequest {
    pub fn new(
        name: &str,
        goal: &str,
        start_date: &str,
        end_date: &str,
        duration_days: Option<u32>,
        default_duration_days: u32,
    ) -> Self {
        SprintStartRequest {
            name: non_blank(name),
            goal: non_blank(goal),
            start_date: non_blank(start_date),
            end_date: non_blank(end_date),
            duration_days: duration_days.unwrap_or(default_duration_days),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct SprintPlanRequest<'a> {
    pub request: &'a str,
}

/// A backlog entry returned by natural-language sprint operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BacklogItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sprint: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub estimate_hours: Option<f64>,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SprintPlanResponse {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created: Vec<String>,
    #[serde(default)]
    pub backlog_size: Option<u64>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub items: Vec<BacklogItem>,
    #[serde(default)]
    pub item: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SprintPlanResponse {
    /// Operations that changed shared backlog data.
    pub fn mutates_backlog(&self) -> bool {
        matches!(
            self.operation.as_deref(),
            Some("create_items") | Some("update_status")
        )
    }

    /// One-line summary for the dashboard result box.
    pub fn summary(&self) -> String {
        if let Some(err) = &self.error {
            return format!("Error: {err}");
        }
        let op = self.operation.as_deref().unwrap_or("unknown");
        let mut parts = vec![format!("operation: {op}")];
        if !self.created.is_empty() {
            parts.push(format!("created: {}", self.created.join(", ")));
        }
        if let Some(size) = self.backlog_size {
            parts.push(format!("backlog: {size}"));
        }
        if !self.items.is_empty() {
            parts.push(format!("{} items", self.items.len()));
        }
        parts.join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SprintSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub days_remaining: i64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub velocity: f64,
    #[serde(default)]
    pub target: f64,
}

impl Default for SprintSummary {
    fn default() -> Self {
        SprintSummary {
            name: "--".into(),
            status: "--".into(),
            days_remaining: 0,
            completed: 0,
            total: 1,
            velocity: 0.0,
            target: 10.0,
        }
    }
}

impl SprintSummary {
    /// Completion percentage, rounded; zero when the sprint has no items.
    pub fn progress_pct(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u64
    }

    /// Remaining items per remaining day, scaled to 0..=100. With no days
    /// left, any unfinished work is full risk.
    pub fn delay_risk(&self) -> u64 {
        if self.days_remaining > 0 {
            let remaining = self.total.saturating_sub(self.completed) as f64;
            ((remaining / self.days_remaining as f64) * 10.0)
                .round()
                .clamp(0.0, 100.0) as u64
        } else if self.progress_pct() < 100 {
            100
        } else {
            0
        }
    }

    pub fn delay_risk_level(&self) -> RiskLevel {
        match self.delay_risk() {
            70.. => RiskLevel::High,
            40..=69 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceUtil {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecentItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScrumDashboard {
    #[serde(default)]
    pub sprint: Option<SprintSummary>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub resource_util: Vec<ResourceUtil>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub recent_items: Vec<RecentItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(completed: u64, total: u64, days_remaining: i64) -> SprintSummary {
        SprintSummary {
            completed,
            total,
            days_remaining,
            ..Default::default()
        }
    }

    #[test]
    fn delay_risk_scales_remaining_work_per_day() {
        assert_eq!(summary(2, 10, 4).delay_risk(), 20);
        assert_eq!(summary(0, 60, 5).delay_risk(), 100);
        assert_eq!(summary(0, 60, 5).delay_risk_level(), RiskLevel::High);
        assert_eq!(summary(5, 10, 1).delay_risk_level(), RiskLevel::Medium);
    }

    #[test]
    fn delay_risk_with_no_days_left() {
        assert_eq!(summary(3, 10, 0).delay_risk(), 100);
        assert_eq!(summary(10, 10, 0).delay_risk(), 0);
        assert_eq!(summary(10, 10, 0).delay_risk_level(), RiskLevel::Low);
    }

    #[test]
    fn start_request_nulls_blank_strings() {
        let req = SprintStartRequest::new("Sprint 4", "  ", "", "2026-11-01", None, 14);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["name"], "Sprint 4");
        assert!(json["goal"].is_null());
        assert!(json["start_date"].is_null());
        assert_eq!(json["end_date"], "2026-11-01");
        assert_eq!(json["duration_days"], 14);
    }

    #[test]
    fn only_create_and_update_mutate() {
        let mut res = SprintPlanResponse {
            operation: Some("create_items".into()),
            ..Default::default()
        };
        assert!(res.mutates_backlog());
        res.operation = Some("update_status".into());
        assert!(res.mutates_backlog());
        res.operation = Some("list_items".into());
        assert!(!res.mutates_backlog());
        res.operation = None;
        assert!(!res.mutates_backlog());
    }

    #[test]
    fn plan_response_parses_items() {
        let res: SprintPlanResponse = serde_json::from_str(
            r#"{"operation":"list_items","items":[{"id":"B1","type":"task","title":"Trim check","description":"","status":"todo"}]}"#,
        )
        .unwrap();
        assert_eq!(res.items.len(), 1);
        assert_eq!(res.items[0].item_type, "task");
        assert_eq!(res.summary(), "operation: list_items | 1 items");
    }

    #[test]
    fn progress_rounds_and_handles_zero_total() {
        let mut s = SprintSummary {
            completed: 1,
            total: 3,
            ..Default::default()
        };
        assert_eq!(s.progress_pct(), 33);
        s.total = 0;
        assert_eq!(s.progress_pct(), 0);
    }

    #[test]
    fn dashboard_tolerates_nulls() {
        let d: ScrumDashboard =
            serde_json::from_str(r#"{"sprint":null,"resource_util":null,"recent_items":[]}"#).unwrap();
        assert!(d.sprint.is_none());
        assert!(d.resource_util.is_empty());
    }
}
