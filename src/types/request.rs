// src/types/request.rs

use serde::Serialize;

use super::params::Sampler;

/// Body of `POST /ai/generate-image`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub input: String,
    pub model: String,
    pub action: String,
    pub parameters: RequestParameters,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RequestParameters {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub sampler: Sampler,
    pub steps: u32,
    pub seed: Option<i64>, // serialized as null when the server should pick
    pub negative_prompt: String,
    pub n_samples: u32,
    #[serde(rename = "ucPreset")]
    pub uc_preset: u32,
    #[serde(rename = "qualityToggle")]
    pub quality_toggle: bool,
    pub sm: bool,
    pub sm_dyn: bool,
    pub dynamic_thresholding: bool,
    pub controlnet_strength: u32,
    pub legacy: bool,
    pub add_original_image: bool,
    pub uncond_scale: u32,
    pub cfg_rescale: u32,
    pub noise_schedule: String,
}

/// A 200 response as received, before decoding.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}
