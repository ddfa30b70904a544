// src/gallery/store.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::StudioError;
use crate::types::Artifact;

pub const DEFAULT_IMAGE_DIR: &str = "generated_images";
pub const ARTIFACT_EXTENSION: &str = "png";

/// Extensions `list` picks up.
const GALLERY_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Owns the directory generated images are written to.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the directory if it doesn't exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StudioError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StudioError::StorageFailure(format!(
                "Failed to create image directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh random name.
    ///
    /// The data lands in a `.part` file first and is renamed into place, so
    /// a failed write never leaves a half-written image in the gallery.
    pub fn persist(&self, bytes: &[u8]) -> Result<Artifact, StudioError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let path = self.root.join(format!("{}.{}", id, ARTIFACT_EXTENSION));
        let part_path = self.root.join(format!("{}.{}.part", id, ARTIFACT_EXTENSION));

        let written = fs::write(&part_path, bytes).and_then(|_| fs::rename(&part_path, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&part_path);
            return Err(StudioError::StorageFailure(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }

        let created_at = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(unix_ms)
            .unwrap_or_else(|_| unix_ms(SystemTime::now()));

        tracing::info!("Saved image to {}", path.display());
        Ok(Artifact {
            id,
            path,
            created_at,
        })
    }

    /// Every image in the directory, newest first.
    pub fn list(&self) -> Result<Vec<Artifact>, StudioError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            StudioError::StorageFailure(format!(
                "Failed to read image directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !has_gallery_extension(&path) {
                continue;
            }

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let id = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            artifacts.push(Artifact {
                id,
                path,
                created_at: unix_ms(modified),
            });
        }

        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(artifacts)
    }
}

fn has_gallery_extension(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            GALLERY_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

fn unix_ms(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as i64
}
