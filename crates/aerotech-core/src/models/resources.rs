// Personnel, tools, and parts managed through the resource endpoints.

use serde::{Deserialize, Serialize};

/// The three resource collections. Each maps to `resources/<path>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    #[default]
    Personnel,
    Tools,
    Parts,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Personnel, ResourceKind::Tools, ResourceKind::Parts];

    /// Path segment under `resources/`, which is also the list envelope key.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Personnel => "personnel",
            ResourceKind::Tools => "tools",
            ResourceKind::Parts => "parts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Personnel => "Personnel",
            ResourceKind::Tools => "Tools",
            ResourceKind::Parts => "Parts",
        }
    }

    /// Prefix for locally generated identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Personnel => "P",
            ResourceKind::Tools => "T",
            ResourceKind::Parts => "PRT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub ratings: Vec<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub specializations: Vec<String>,
    /// `day` or `night`.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub shift: String,
    /// `available` or `busy`.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_user_id: Option<String>,
}

impl Personnel {
    pub fn is_day_shift(&self) -> bool {
        self.shift == "day"
    }

    pub fn is_available(&self) -> bool {
        self.availability == "available"
    }
}

/// Tool checkout state. Missing means available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ToolStatus {
    #[default]
    Available,
    InUse,
    Other(String),
}

impl ToolStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ToolStatus::Available => "available",
            ToolStatus::InUse => "in_use",
            ToolStatus::Other(s) => s,
        }
    }

    /// In use becomes available; everything else becomes in use.
    pub fn toggled(&self) -> ToolStatus {
        match self {
            ToolStatus::InUse => ToolStatus::Available,
            _ => ToolStatus::InUse,
        }
    }
}

impl From<Option<String>> for ToolStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("available") => ToolStatus::Available,
            Some("in_use") => ToolStatus::InUse,
            Some(other) => ToolStatus::Other(other.to_string()),
        }
    }
}

impl From<ToolStatus> for String {
    fn from(status: ToolStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub location: String,
    #[serde(default)]
    pub calibration_due: Option<String>,
    #[serde(default)]
    pub status: ToolStatus,
}

/// Stock band used to colour part inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBand {
    Out,
    Low,
    Healthy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub part_no: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub ata_chapter: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub stock_level: i64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub lead_time_days: i64,
}

impl Part {
    pub fn stock_band(&self) -> StockBand {
        match self.stock_level {
            i64::MIN..=0 => StockBand::Out,
            1..=2 => StockBand::Low,
            _ => StockBand::Healthy,
        }
    }
}

/// A record of any resource kind, for the generic create/update paths.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRecord {
    Personnel(Personnel),
    Tool(Tool),
    Part(Part),
}

impl ResourceRecord {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRecord::Personnel(_) => ResourceKind::Personnel,
            ResourceRecord::Tool(_) => ResourceKind::Tools,
            ResourceRecord::Part(_) => ResourceKind::Parts,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ResourceRecord::Personnel(p) => &p.id,
            ResourceRecord::Tool(t) => &t.id,
            ResourceRecord::Part(p) => &p.id,
        }
    }
}

/// Split a comma-separated form value into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_status_toggles() {
        assert_eq!(ToolStatus::InUse.toggled(), ToolStatus::Available);
        assert_eq!(ToolStatus::Available.toggled(), ToolStatus::InUse);
        assert_eq!(ToolStatus::Other("repair".into()).toggled(), ToolStatus::InUse);
    }

    #[test]
    fn tool_without_status_is_available() {
        let t: Tool = serde_json::from_str(r#"{"id":"T1","name":"Torque wrench"}"#).unwrap();
        assert_eq!(t.status, ToolStatus::Available);
    }

    #[test]
    fn part_stock_bands() {
        let mut p = Part::default();
        assert_eq!(p.stock_band(), StockBand::Out);
        p.stock_level = 2;
        assert_eq!(p.stock_band(), StockBand::Low);
        p.stock_level = 3;
        assert_eq!(p.stock_band(), StockBand::Healthy);
    }

    #[test]
    fn personnel_tolerates_null_lists() {
        let p: Personnel =
            serde_json::from_str(r#"{"id":"P1","name":"Deniz","ratings":null,"shift":"night"}"#).unwrap();
        assert!(p.ratings.is_empty());
        assert!(!p.is_day_shift());
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" B1, B2 ,,"), vec!["B1".to_string(), "B2".to_string()]);
        assert!(split_list("").is_empty());
    }
}
