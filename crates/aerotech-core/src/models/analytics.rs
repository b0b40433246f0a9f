// Efficiency metrics, monthly throughput, and completion records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The headline metrics, each paired with the key of its target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyMetric {
    AvgCompletionDays,
    FirstPassSuccessRate,
    TasksPerHour,
    ResourceUtilization,
}

impl EfficiencyMetric {
    pub const ALL: [EfficiencyMetric; 4] = [
        EfficiencyMetric::AvgCompletionDays,
        EfficiencyMetric::FirstPassSuccessRate,
        EfficiencyMetric::TasksPerHour,
        EfficiencyMetric::ResourceUtilization,
    ];

    pub fn key(self) -> &'static str {
        match self {
            EfficiencyMetric::AvgCompletionDays => "avg_completion_days",
            EfficiencyMetric::FirstPassSuccessRate => "first_pass_success_rate",
            EfficiencyMetric::TasksPerHour => "tasks_per_hour",
            EfficiencyMetric::ResourceUtilization => "resource_utilization",
        }
    }

    pub fn target_key(self) -> &'static str {
        match self {
            EfficiencyMetric::AvgCompletionDays => "target_avg_completion_days",
            EfficiencyMetric::FirstPassSuccessRate => "target_first_pass",
            EfficiencyMetric::TasksPerHour => "target_tasks_per_hour",
            EfficiencyMetric::ResourceUtilization => "target_resource_utilization",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EfficiencyMetric::AvgCompletionDays => "Average completion time",
            EfficiencyMetric::FirstPassSuccessRate => "First-pass success rate",
            EfficiencyMetric::TasksPerHour => "Work packages per hour",
            EfficiencyMetric::ResourceUtilization => "Resource utilisation",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            EfficiencyMetric::AvgCompletionDays => "days",
            EfficiencyMetric::FirstPassSuccessRate | EfficiencyMetric::ResourceUtilization => "%",
            EfficiencyMetric::TasksPerHour => "pkgs",
        }
    }

    /// Lower is better only for completion time.
    pub fn lower_is_better(self) -> bool {
        matches!(self, EfficiencyMetric::AvgCompletionDays)
    }
}

/// Flat name -> number map returned by `efficiency/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct EfficiencyMetrics(pub BTreeMap<String, Value>);

impl EfficiencyMetrics {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn value(&self, metric: EfficiencyMetric) -> Option<f64> {
        self.get(metric.key())
    }

    pub fn target(&self, metric: EfficiencyMetric) -> Option<f64> {
        self.get(metric.target_key())
    }

    /// Whether the metric meets its target; `None` if either is missing.
    pub fn on_target(&self, metric: EfficiencyMetric) -> Option<bool> {
        let value = self.value(metric)?;
        let target = self.target(metric)?;
        Some(if metric.lower_is_better() {
            value <= target
        } else {
            value >= target
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthlyEfficiency {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub completed: f64,
    #[serde(default)]
    pub planned: f64,
}

/// Largest completed/planned value across months, at least 1.
pub fn monthly_scale(months: &[MonthlyEfficiency]) -> f64 {
    months
        .iter()
        .map(|m| m.completed.max(m.planned))
        .fold(1.0_f64, f64::max)
}

/// LLM-written efficiency commentary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EfficiencyAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub suggestions: Vec<String>,
}

/// A finished work package, logged for efficiency analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedPackage {
    pub id: String,
    pub work_package_id: String,
    pub sprint_id: Option<String>,
    pub started_at: String,
    pub completed_at: String,
    pub first_pass_success: bool,
    pub rework_count: u32,
    pub planned_minutes: Option<u32>,
    pub actual_minutes: Option<u32>,
    pub assigned_personnel_count: Option<u32>,
    pub criticality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_lookup_and_targets() {
        let m: EfficiencyMetrics = serde_json::from_str(
            r#"{"avg_completion_days": 2.5, "target_avg_completion_days": 3,
                "first_pass_success_rate": 88, "target_first_pass": 90}"#,
        )
        .unwrap();
        assert_eq!(m.value(EfficiencyMetric::AvgCompletionDays), Some(2.5));
        assert_eq!(m.on_target(EfficiencyMetric::AvgCompletionDays), Some(true));
        assert_eq!(m.on_target(EfficiencyMetric::FirstPassSuccessRate), Some(false));
        assert_eq!(m.on_target(EfficiencyMetric::TasksPerHour), None);
    }

    #[test]
    fn monthly_scale_is_at_least_one() {
        assert_eq!(monthly_scale(&[]), 1.0);
        let months = vec![
            MonthlyEfficiency { month: "Jan".into(), completed: 4.0, planned: 6.0 },
            MonthlyEfficiency { month: "Feb".into(), completed: 9.0, planned: 7.0 },
        ];
        assert_eq!(monthly_scale(&months), 9.0);
    }
}
