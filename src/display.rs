// src/display.rs

use std::path::Path;

use tokio::sync::mpsc;

use crate::types::{GalleryEntry, UiEvent};

/// Whatever renders the studio. The core only ever talks to it through
/// these notifications.
pub trait DisplaySink: Send + Sync {
    /// The main view should now show `path`.
    fn main_image_changed(&self, path: &Path);

    /// A new artifact joined the gallery, at the front.
    fn artifact_registered(&self, entry: &GalleryEntry);

    /// One line for the status area.
    fn status(&self, message: &str);

    /// The gallery was (re)built from disk.
    fn gallery_loaded(&self, _entries: &[GalleryEntry]) {}
}

/// Forwards notifications as [`UiEvent`]s to the thread that owns
/// rendering.
#[derive(Clone, Debug)]
pub struct ChannelDisplay {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelDisplay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: UiEvent) {
        // A closed receiver means the UI is gone; nothing left to notify.
        if self.tx.send(event).is_err() {
            tracing::debug!("UI receiver dropped, event discarded");
        }
    }
}

impl DisplaySink for ChannelDisplay {
    fn main_image_changed(&self, path: &Path) {
        self.emit(UiEvent::MainImageChanged(path.to_path_buf()));
    }

    fn artifact_registered(&self, entry: &GalleryEntry) {
        self.emit(UiEvent::ArtifactRegistered(entry.clone()));
    }

    fn status(&self, message: &str) {
        self.emit(UiEvent::Status(message.to_string()));
    }

    fn gallery_loaded(&self, entries: &[GalleryEntry]) {
        self.emit(UiEvent::GalleryLoaded(entries.to_vec()));
    }
}

/// Plain terminal output for the command-line shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn main_image_changed(&self, path: &Path) {
        println!("Image: {}", path.display());
    }

    fn artifact_registered(&self, entry: &GalleryEntry) {
        println!("  + {}", describe(entry));
    }

    fn status(&self, message: &str) {
        println!("{}", message);
    }

    fn gallery_loaded(&self, entries: &[GalleryEntry]) {
        if entries.is_empty() {
            println!("Gallery is empty.");
            return;
        }
        println!("Recent images:");
        for entry in entries {
            println!("  - {}", describe(entry));
        }
    }
}

fn describe(entry: &GalleryEntry) -> String {
    match &entry.preview {
        Some(preview) => format!(
            "{} ({}x{} preview)",
            entry.artifact.path.display(),
            preview.width(),
            preview.height()
        ),
        None => format!("{} (no preview)", entry.artifact.path.display()),
    }
}
