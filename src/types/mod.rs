// src/types/mod.rs

pub mod artifact;
pub mod params;
pub mod request;

pub use artifact::*;
pub use params::*;
pub use request::*;
