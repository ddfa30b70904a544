// src/settings.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{GenerationParameters, Sampler};

pub const DEFAULT_NEGATIVE_PROMPT: &str = "nsfw, lowres, {bad}, error, fewer, extra, missing, worst quality, \
jpeg artifacts, bad quality, watermark, unfinished, displeasing, \
chromatic aberration, signature, extra digits, artistic error, \
username, scan, [abstract]";

/// Generation defaults remembered between sessions.
///
/// Keys match the file written by earlier releases, so a config file from
/// a previous install keeps working. Missing keys fall back one by one.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "Authorization")]
    pub authorization: String,
    pub negative_prompt: String,
    pub scale: f64,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            authorization: String::new(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            scale: 8.0,
            steps: 28,
            width: 512,
            height: 512,
        }
    }
}

impl Config {
    /// Keep the durable part of a parameter snapshot.
    pub fn from_params(params: &GenerationParameters) -> Self {
        Self {
            authorization: params.credential.clone(),
            negative_prompt: params.negative_prompt.clone(),
            scale: params.scale,
            steps: params.steps,
            width: params.width,
            height: params.height,
        }
    }

    /// Fill a parameter snapshot from the remembered defaults.
    pub fn to_params(&self, prompt: &str, seed: &str, sampler: Sampler) -> GenerationParameters {
        GenerationParameters {
            prompt: prompt.to_string(),
            negative_prompt: self.negative_prompt.clone(),
            seed: seed.to_string(),
            sampler,
            steps: self.steps,
            scale: self.scale,
            width: self.width,
            height: self.height,
            credential: self.authorization.clone(),
        }
    }

    pub fn mask_credential(&self) -> String {
        "*".repeat(self.authorization.chars().count())
    }
}

// The credential never goes to logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("authorization", &self.mask_credential())
            .field("negative_prompt", &self.negative_prompt)
            .field("scale", &self.scale)
            .field("steps", &self.steps)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Owns the config file on disk.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store at `path`, creating the parent directory if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }

        Ok(Self { path })
    }

    /// The default location (~/.config/nai-studio/config.json)
    pub fn default_path() -> Result<PathBuf, String> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        Ok(config_dir.join("nai-studio").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, falling back to defaults on any problem.
    ///
    /// An absent file is created with the defaults so the user has
    /// something to edit.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            let default_config = Config::default();
            match self.save(&default_config) {
                Ok(()) => tracing::info!("Created default config at {}", self.path.display()),
                Err(e) => tracing::warn!("{}", e),
            }
            return default_config;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config, using defaults: {}", e);
                return Config::default();
            }
        };

        match serde_json::from_str::<Config>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", self.path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config, using defaults: {}", e);
                Config::default()
            }
        }
    }

    /// Replace the whole file. Readers see either the old or the new content.
    pub fn save(&self, config: &Config) -> Result<(), String> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| format!("Failed to write config: {}", e))?;

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(format!("Failed to replace config: {}", e));
        }

        tracing::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
