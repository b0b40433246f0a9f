// Core library: configuration, data model, text extraction, and the
// cross-view refresh bus shared by the API client, orchestrator, and TUI.

pub mod config;
pub mod drafts;
pub mod events;
pub mod ids;
pub mod models;
pub mod protocol;
pub mod references;
