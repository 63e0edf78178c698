//! Grana Core Library
//!
//! Core functionality for non-destructive photo editing: procedural film
//! grain, color grading, undo history, and regression-based preset
//! prediction.

pub mod color;
pub mod config;
pub mod decoders;
pub mod exporters;
pub mod features;
pub mod history;
pub mod models;
pub mod noise;
pub mod pipeline;
pub mod predict;
pub mod presets;
pub mod scheduler;
pub mod session;

// Re-export commonly used types
pub use config::CoreDefaults;
pub use decoders::DecodedImage;
pub use features::ImageFeatures;
pub use history::HistoryStack;
pub use models::{EditParams, ParamField, PredictedPreset, Rgb};
pub use noise::NoiseField;
pub use pipeline::{render, RenderContext, RenderedFrame};
pub use predict::ModelRegistry;
pub use session::{EditSession, MuteCategory};
