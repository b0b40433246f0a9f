// Chat transcript entries and the citations extracted from assistant text.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Document family a citation points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Aircraft Maintenance Manual.
    #[serde(rename = "AMM")]
    Amm,
    #[serde(rename = "EASA")]
    Easa,
    #[serde(rename = "FAA")]
    Faa,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [ReferenceKind::Amm, ReferenceKind::Easa, ReferenceKind::Faa];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Amm => "AMM",
            ReferenceKind::Easa => "EASA",
            ReferenceKind::Faa => "FAA",
        }
    }

    /// Exact, case-sensitive match on the marker token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == token)
    }

    /// Regulatory sources (EASA/FAA) as opposed to maintenance manuals.
    pub fn is_regulatory(self) -> bool {
        matches!(self, ReferenceKind::Easa | ReferenceKind::Faa)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation lifted out of an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub title: String,
    pub code: String,
}

/// One entry in the chat transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
            references: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, references: Vec<Reference>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
            references,
        }
    }
}
