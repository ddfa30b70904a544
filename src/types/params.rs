// src/types/params.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 28;
pub const MIN_SCALE: f64 = 0.0;
pub const MAX_SCALE: f64 = 15.0;
pub const MIN_DIMENSION: u32 = 512;
pub const MAX_DIMENSION: u32 = 1024;
pub const DIMENSION_STEP: u32 = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampler {
    #[default]
    #[serde(rename = "k_dpmpp_2s_ancestral")]
    KDpmpp2sAncestral,
    #[serde(rename = "DPM++ 2M")]
    Dpmpp2m,
    #[serde(rename = "Euler")]
    Euler,
    #[serde(rename = "Euler Ancestral")]
    EulerAncestral,
    #[serde(rename = "DPM++ SDE")]
    DpmppSde,
    #[serde(rename = "DDIM")]
    Ddim,
}

impl Sampler {
    pub const ALL: [Sampler; 6] = [
        Sampler::KDpmpp2sAncestral,
        Sampler::Dpmpp2m,
        Sampler::Euler,
        Sampler::EulerAncestral,
        Sampler::DpmppSde,
        Sampler::Ddim,
    ];

    /// The name the remote service expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sampler::KDpmpp2sAncestral => "k_dpmpp_2s_ancestral",
            Sampler::Dpmpp2m => "DPM++ 2M",
            Sampler::Euler => "Euler",
            Sampler::EulerAncestral => "Euler Ancestral",
            Sampler::DpmppSde => "DPM++ SDE",
            Sampler::Ddim => "DDIM",
        }
    }
}

impl fmt::Display for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sampler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sampler::ALL
            .iter()
            .find(|sampler| sampler.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = Sampler::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown sampler '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// A full snapshot of what the user has entered, taken on each trigger.
///
/// Ranges are enforced by whoever edits the parameters. The seed stays as
/// raw text here; the request builder decides what it means.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParameters {
    pub prompt: String,
    pub negative_prompt: String,
    /// Raw seed text. Empty means "let the server pick".
    pub seed: String,
    pub sampler: Sampler,
    pub steps: u32,
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub credential: String,
}

/// Whether `value` is a valid width or height for the service.
pub fn is_valid_dimension(value: u32) -> bool {
    (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) && value % DIMENSION_STEP == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_wire_names() {
        let json = serde_json::to_string(&Sampler::Dpmpp2m).unwrap();
        assert_eq!(json, "\"DPM++ 2M\"");

        let parsed: Sampler = serde_json::from_str("\"k_dpmpp_2s_ancestral\"").unwrap();
        assert_eq!(parsed, Sampler::KDpmpp2sAncestral);
    }

    #[test]
    fn test_sampler_from_str() {
        assert_eq!("euler ancestral".parse::<Sampler>().unwrap(), Sampler::EulerAncestral);
        assert_eq!("DDIM".parse::<Sampler>().unwrap(), Sampler::Ddim);
        assert!("plms".parse::<Sampler>().is_err());
    }

    #[test]
    fn test_dimension_bounds() {
        assert!(is_valid_dimension(512));
        assert!(is_valid_dimension(544));
        assert!(is_valid_dimension(1024));
        assert!(!is_valid_dimension(500));
        assert!(!is_valid_dimension(520));
        assert!(!is_valid_dimension(1056));
    }
}
