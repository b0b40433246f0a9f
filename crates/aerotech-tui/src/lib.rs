// Terminal console for the AeroTech maintenance backend.

pub mod tui;
