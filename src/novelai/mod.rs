// src/novelai/mod.rs

pub mod archive;
pub mod builder;
pub mod client;

pub use archive::{decode, DecodedImage};
pub use builder::build;
pub use client::{authorization, GenerationClient, GENERATE_IMAGE_URL};
