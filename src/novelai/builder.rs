// src/novelai/builder.rs

use crate::error::StudioError;
use crate::types::{GenerationParameters, GenerationRequest, RequestParameters};

// The service rejects payloads that differ from these.
pub const MODEL: &str = "nai-diffusion-3";
pub const ACTION: &str = "generate";
pub const NOISE_SCHEDULE: &str = "native";

/// Turn a parameter snapshot into the request body.
///
/// Only the seed is checked here: blank means the server picks one,
/// anything else must parse as an integer.
pub fn build(params: &GenerationParameters) -> Result<GenerationRequest, StudioError> {
    let seed = parse_seed(&params.seed)?;

    Ok(GenerationRequest {
        input: params.prompt.clone(),
        model: MODEL.to_string(),
        action: ACTION.to_string(),
        parameters: RequestParameters {
            width: params.width,
            height: params.height,
            scale: params.scale,
            sampler: params.sampler,
            steps: params.steps,
            seed,
            negative_prompt: params.negative_prompt.clone(),
            n_samples: 1,
            uc_preset: 0,
            quality_toggle: true,
            sm: false,
            sm_dyn: false,
            dynamic_thresholding: false,
            controlnet_strength: 1,
            legacy: false,
            add_original_image: false,
            uncond_scale: 1,
            cfg_rescale: 0,
            noise_schedule: NOISE_SCHEDULE.to_string(),
        },
    })
}

fn parse_seed(raw: &str) -> Result<Option<i64>, StudioError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| StudioError::InvalidParameter(format!("seed '{}' is not an integer", raw)))
}
