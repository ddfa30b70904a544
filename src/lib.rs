// src/lib.rs
//
// Core of the studio: turns a parameter snapshot into a NovelAI request,
// sends it, unpacks the zip it gets back, stores the image and keeps the
// gallery in order. Rendering and input widgets live outside this crate and
// plug in through `display::DisplaySink` and `commands::StudioHandle`.

pub mod commands;
pub mod display;
pub mod error;
pub mod gallery;
pub mod novelai;
pub mod settings;
pub mod state;
pub mod studio;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{spawn_studio, StudioHandle};
pub use display::{ChannelDisplay, ConsoleDisplay, DisplaySink};
pub use error::{FailureKind, StudioError, TriggerError};
pub use settings::{Config, ConfigStore};
pub use state::{AppState, StudioPaths};
pub use studio::{Studio, StudioState};
