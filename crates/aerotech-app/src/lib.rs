pub mod app;
pub mod tasks;
