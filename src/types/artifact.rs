// src/types/artifact.rs

use std::path::PathBuf;

use image::RgbaImage;
use serde::Serialize;

/// A generated image on disk.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Hex stem of the file name, unique per artifact.
    pub id: String,
    pub path: PathBuf,
    /// File modification time, unix milliseconds.
    pub created_at: i64,
}

/// An artifact as the gallery shows it.
#[derive(Clone, Debug)]
pub struct GalleryEntry {
    pub artifact: Artifact,
    pub preview: Option<RgbaImage>,
}

/// Notifications for the rendering side, in the order the core emits them.
#[derive(Clone, Debug)]
pub enum UiEvent {
    GalleryLoaded(Vec<GalleryEntry>),
    ArtifactRegistered(GalleryEntry),
    MainImageChanged(PathBuf),
    Status(String),
}
