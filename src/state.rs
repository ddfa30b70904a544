// src/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::display::DisplaySink;
use crate::gallery::{ArtifactStore, GalleryIndex};
use crate::novelai::GenerationClient;
use crate::settings::{Config, ConfigStore};

/// Where the studio keeps its files and which endpoint it talks to.
#[derive(Clone, Debug)]
pub struct StudioPaths {
    pub config_path: PathBuf,
    pub image_dir: PathBuf,
    pub endpoint: String,
}

/// Everything a generation touches. Owned by the studio worker; nothing
/// here is shared with the rendering side except the display handle.
pub struct AppState {
    pub config: Config,
    pub config_store: ConfigStore,
    pub artifacts: ArtifactStore,
    pub gallery: GalleryIndex,
    pub client: GenerationClient,
    pub display: Arc<dyn DisplaySink>,
}

impl AppState {
    /// Open the stores, read the config and build the gallery from disk.
    ///
    /// A gallery that can't be listed starts empty rather than failing
    /// startup.
    pub fn open(paths: &StudioPaths, display: Arc<dyn DisplaySink>) -> Result<Self, String> {
        let config_store = ConfigStore::open(&paths.config_path)?;
        let config = config_store.load();

        let artifacts = ArtifactStore::open(&paths.image_dir).map_err(|e| e.to_string())?;
        let mut gallery = GalleryIndex::new(artifacts.clone(), display.clone());
        if let Err(e) = gallery.initialize() {
            tracing::warn!("Gallery not loaded: {}", e);
        }

        Ok(Self {
            config,
            config_store,
            artifacts,
            gallery,
            client: GenerationClient::new(paths.endpoint.clone()),
            display,
        })
    }
}
