// src/gallery/mod.rs

pub mod index;
pub mod preview;
pub mod store;

pub use index::{GalleryIndex, INITIAL_LOAD_LIMIT};
pub use store::{ArtifactStore, DEFAULT_IMAGE_DIR};
