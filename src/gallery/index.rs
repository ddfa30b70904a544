// src/gallery/index.rs

use std::sync::Arc;

use super::preview;
use super::store::ArtifactStore;
use crate::display::DisplaySink;
use crate::error::StudioError;
use crate::types::{Artifact, GalleryEntry};

/// How many existing images are shown at startup.
pub const INITIAL_LOAD_LIMIT: usize = 6;

/// Newest-first view of the gallery.
///
/// Startup only picks up the most recent few images; everything produced
/// during the session is kept.
pub struct GalleryIndex {
    store: ArtifactStore,
    entries: Vec<GalleryEntry>,
    display: Arc<dyn DisplaySink>,
}

impl GalleryIndex {
    pub fn new(store: ArtifactStore, display: Arc<dyn DisplaySink>) -> Self {
        Self {
            store,
            entries: Vec::new(),
            display,
        }
    }

    /// Rebuild the view from disk, keeping the newest [`INITIAL_LOAD_LIMIT`].
    pub fn initialize(&mut self) -> Result<Vec<Artifact>, StudioError> {
        let mut artifacts = self.store.list()?;
        artifacts.truncate(INITIAL_LOAD_LIMIT);

        self.entries = artifacts.iter().cloned().map(with_preview).collect();
        self.display.gallery_loaded(&self.entries);

        tracing::info!(
            "Gallery initialized with {} images from {}",
            self.entries.len(),
            self.store.root().display()
        );
        Ok(artifacts)
    }

    /// Put a freshly generated artifact at the front.
    pub fn register(&mut self, artifact: Artifact) {
        let entry = with_preview(artifact);
        self.display.artifact_registered(&entry);
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn with_preview(artifact: Artifact) -> GalleryEntry {
    let preview = match preview::render(&artifact.path) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!("No preview for {}: {}", artifact.path.display(), e);
            None
        }
    };
    GalleryEntry { artifact, preview }
}
