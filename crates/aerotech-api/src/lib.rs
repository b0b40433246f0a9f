// HTTP client for the AeroTech maintenance backend.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::MaintenanceApi;
pub use client::ApiClient;
pub use error::ApiError;
