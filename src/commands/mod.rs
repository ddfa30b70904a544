// src/commands/mod.rs

pub mod generate;

pub use generate::*;
