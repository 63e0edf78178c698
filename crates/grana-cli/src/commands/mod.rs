//! Command implementations for the grana CLI.

mod analyze;
mod preset;
mod render;

// Re-export all command functions
pub use analyze::cmd_analyze;
pub use preset::{cmd_preset_create, cmd_preset_list, cmd_preset_show};
pub use render::{cmd_render, RenderArgs};
