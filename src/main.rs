// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nai_studio_lib::gallery::DEFAULT_IMAGE_DIR;
use nai_studio_lib::novelai::GENERATE_IMAGE_URL;
use nai_studio_lib::types::{
    is_valid_dimension, GenerationParameters, Sampler, DIMENSION_STEP, MAX_DIMENSION, MAX_SCALE,
    MAX_STEPS, MIN_DIMENSION, MIN_SCALE, MIN_STEPS,
};
use nai_studio_lib::{spawn_studio, AppState, Config, ConfigStore, ConsoleDisplay, Studio, StudioPaths};

#[derive(Parser)]
#[command(name = "nai-studio")]
#[command(about = "Generate NovelAI images and keep a local gallery of the results")]
#[command(version)]
struct Cli {
    /// Config file [default: <config dir>/nai-studio/config.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory generated images are saved to
    #[arg(long, default_value = DEFAULT_IMAGE_DIR, global = true)]
    images: PathBuf,

    /// Generation endpoint
    #[arg(long, default_value = GENERATE_IMAGE_URL, global = true, hide = true)]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one image and add it to the gallery
    Generate(GenerateArgs),
    /// List the most recent images
    Gallery,
    /// Show the remembered generation defaults
    Config,
}

/// Unset options fall back to the values remembered from the last run.
#[derive(Args)]
struct GenerateArgs {
    /// What to draw
    prompt: String,

    #[arg(long)]
    negative_prompt: Option<String>,

    /// Integer seed; leave out to let the server pick one
    #[arg(long, default_value = "")]
    seed: String,

    #[arg(long, default_value_t = Sampler::default())]
    sampler: Sampler,

    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_STEPS as i64..=MAX_STEPS as i64))]
    steps: Option<u32>,

    /// Prompt guidance, 0 to 15
    #[arg(long, value_parser = parse_scale)]
    scale: Option<f64>,

    /// 512 to 1024, multiple of 32
    #[arg(long, value_parser = parse_dimension)]
    width: Option<u32>,

    /// 512 to 1024, multiple of 32
    #[arg(long, value_parser = parse_dimension)]
    height: Option<u32>,

    /// API token, sent as the Authorization header
    #[arg(long)]
    auth: Option<String>,
}

impl GenerateArgs {
    fn into_params(self, config: &Config) -> GenerationParameters {
        let mut params = config.to_params(&self.prompt, &self.seed, self.sampler);
        if let Some(negative_prompt) = self.negative_prompt {
            params.negative_prompt = negative_prompt;
        }
        if let Some(steps) = self.steps {
            params.steps = steps;
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(auth) = self.auth {
            params.credential = auth;
        }
        params
    }
}

fn parse_scale(raw: &str) -> Result<f64, String> {
    let scale: f64 = raw.parse().map_err(|_| format!("'{}' is not a number", raw))?;
    if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(format!("scale must be between {} and {}", MIN_SCALE, MAX_SCALE));
    }
    Ok(scale)
}

fn parse_dimension(raw: &str) -> Result<u32, String> {
    let value: u32 = raw.parse().map_err(|_| format!("'{}' is not a whole number", raw))?;
    if !is_valid_dimension(value) {
        return Err(format!(
            "must be between {} and {} in steps of {}",
            MIN_DIMENSION, MAX_DIMENSION, DIMENSION_STEP
        ));
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let paths = StudioPaths {
        config_path: match cli.config {
            Some(path) => path,
            None => ConfigStore::default_path()?,
        },
        image_dir: cli.images,
        endpoint: cli.endpoint,
    };

    match cli.command {
        Command::Config => {
            let store = ConfigStore::open(&paths.config_path)?;
            let config = store.load();
            println!("File:            {}", store.path().display());
            println!("Authorization:   {}", config.mask_credential());
            println!("Negative prompt: {}", config.negative_prompt);
            println!("Scale:           {}", config.scale);
            println!("Steps:           {}", config.steps);
            println!("Size:            {}x{}", config.width, config.height);
        }
        Command::Gallery => {
            // Opening the state loads the gallery, which the console prints.
            AppState::open(&paths, Arc::new(ConsoleDisplay))?;
        }
        Command::Generate(args) => {
            let state = AppState::open(&paths, Arc::new(ConsoleDisplay))?;
            let params = args.into_params(&state.config);

            let (handle, worker) = spawn_studio(Studio::new(state));
            handle.trigger(params).map_err(|e| e.to_string())?;
            drop(handle);

            let studio = worker.await.map_err(|e| e.to_string())?;
            if !matches!(studio.last_outcome(), Some(Ok(_))) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
