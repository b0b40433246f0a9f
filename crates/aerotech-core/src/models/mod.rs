// Data model shared by the API client, orchestrator, and TUI.
//
// Shapes follow the backend's JSON contracts. Fields the console never
// branches on stay loosely typed; fields it does branch on (statuses,
// roles) are enums that keep unknown values instead of failing.

pub mod analytics;
pub mod chat;
pub mod plan;
pub mod resources;
pub mod sprint;
pub mod user;
pub mod work_package;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
