// src/studio.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{FailureKind, StudioError};
use crate::novelai;
use crate::settings::Config;
use crate::state::AppState;
use crate::types::{Artifact, GenerationParameters};

/// Where a generation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioState {
    Idle,
    Building,
    Requesting,
    Decoding,
    Persisting,
    Done,
    Errored(FailureKind),
}

/// Runs one generation at a time against the application state.
pub struct Studio {
    state: AppState,
    phase: StudioState,
    trail: Vec<StudioState>,
    busy: Arc<AtomicBool>,
    last_outcome: Option<Result<Artifact, StudioError>>,
}

impl Studio {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            phase: StudioState::Idle,
            trail: Vec::new(),
            busy: Arc::new(AtomicBool::new(false)),
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> StudioState {
        self.phase
    }

    /// States visited by the last generation, in order.
    pub fn last_trail(&self) -> &[StudioState] {
        &self.trail
    }

    pub fn last_outcome(&self) -> Option<&Result<Artifact, StudioError>> {
        self.last_outcome.as_ref()
    }

    pub fn app_state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Set while a generation is running; shared with trigger handles.
    pub(crate) fn busy_flag(&self) -> Arc<AtomicBool> {
        self.busy.clone()
    }

    /// Build, send, decode, store and show one image.
    ///
    /// Every failure ends up as a status message and the studio is back to
    /// idle when this returns. The parameters are remembered as soon as the
    /// server has answered, whatever the answer was.
    pub async fn generate(&mut self, params: GenerationParameters) -> Result<Artifact, StudioError> {
        self.busy.store(true, Ordering::SeqCst);
        self.trail.clear();
        self.enter(StudioState::Building);
        self.state.display.status("Generating image...");

        let outcome = self.run_pipeline(&params).await;

        match &outcome {
            Ok(_) => self.enter(StudioState::Done),
            Err(e) => self.enter(StudioState::Errored(e.kind())),
        }
        self.enter(StudioState::Idle);
        self.busy.store(false, Ordering::SeqCst);

        match &outcome {
            Ok(artifact) => {
                self.state.display.main_image_changed(&artifact.path);
                self.state
                    .display
                    .status(&format!("Image saved to {}", artifact.path.display()));
            }
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                self.state.display.status(&e.to_string());
            }
        }

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    async fn run_pipeline(&mut self, params: &GenerationParameters) -> Result<Artifact, StudioError> {
        let request = novelai::build(params)?;
        novelai::authorization(&params.credential)?;

        self.enter(StudioState::Requesting);
        let response = self.state.client.submit(&request, &params.credential).await;
        self.remember(params);
        let response = response?;

        self.enter(StudioState::Decoding);
        let png = novelai::decode(&response.body)?.into_png()?;

        self.enter(StudioState::Persisting);
        let artifact = self.state.artifacts.persist(&png)?;

        self.state.gallery.register(artifact.clone());
        Ok(artifact)
    }

    fn remember(&mut self, params: &GenerationParameters) {
        self.state.config = Config::from_params(params);
        if let Err(e) = self.state.config_store.save(&self.state.config) {
            tracing::warn!("{}", e);
        }
    }

    fn enter(&mut self, next: StudioState) {
        tracing::debug!("{:?} -> {:?}", self.phase, next);
        self.phase = next;
        self.trail.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ChannelDisplay;
    use crate::settings::ConfigStore;
    use crate::state::StudioPaths;
    use crate::test_support::{closed_endpoint, jpeg_bytes, png_bytes, serve, zip_with_entries};
    use crate::types::{Sampler, UiEvent};
    use axum::http::StatusCode;
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Harness {
        _dir: TempDir,
        paths: StudioPaths,
        studio: Studio,
        events: UnboundedReceiver<UiEvent>,
    }

    fn harness(endpoint: String) -> Harness {
        let dir = TempDir::new().unwrap();
        let paths = StudioPaths {
            config_path: dir.path().join("config").join("config.json"),
            image_dir: dir.path().join("generated_images"),
            endpoint,
        };
        let (display, events) = ChannelDisplay::new();
        let state = AppState::open(&paths, Arc::new(display)).unwrap();
        Harness {
            _dir: dir,
            paths,
            studio: Studio::new(state),
            events,
        }
    }

    fn drain(events: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        std::iter::from_fn(|| events.try_recv().ok()).collect()
    }

    fn params(studio: &Studio, seed: &str) -> GenerationParameters {
        let mut params = studio.config().to_params("a cat", seed, Sampler::default());
        params.credential = "Bearer secret".to_string();
        params.steps = 20;
        params
    }

    #[tokio::test]
    async fn test_successful_generation_end_to_end() {
        let png = png_bytes(64, 64);
        let service = serve(StatusCode::OK, zip_with_entries(&[("image_0.png", &png)])).await;
        let mut h = harness(service.url.clone());
        drain(&mut h.events);

        let p = params(&h.studio, "");
        let artifact = h.studio.generate(p).await.unwrap();

        // Builder left the seed to the server.
        let sent = service.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body["parameters"]["seed"].is_null());

        // Stored under a fresh hex name with the decoded bytes.
        assert_eq!(artifact.path.parent().unwrap(), h.paths.image_dir.as_path());
        assert_eq!(artifact.id.len(), 32);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), png);

        // Registered at the front and shown.
        assert_eq!(h.studio.app_state().gallery.entries()[0].artifact, artifact);
        let events = drain(&mut h.events);
        assert!(events.iter().any(
            |e| matches!(e, UiEvent::ArtifactRegistered(entry) if entry.artifact == artifact)
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::MainImageChanged(path) if *path == artifact.path)));

        assert_eq!(
            h.studio.last_trail(),
            &[
                StudioState::Building,
                StudioState::Requesting,
                StudioState::Decoding,
                StudioState::Persisting,
                StudioState::Done,
                StudioState::Idle,
            ]
        );
        assert_eq!(h.studio.phase(), StudioState::Idle);
    }

    #[tokio::test]
    async fn test_remote_rejection_still_saves_config() {
        let service = serve(StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).await;
        let mut h = harness(service.url.clone());
        let before = h.studio.app_state().gallery.len();
        drain(&mut h.events);

        let p = params(&h.studio, "");
        let err = h.studio.generate(p).await.unwrap_err();
        assert_eq!(err, StudioError::RemoteRejected(500));

        assert!(h
            .studio
            .last_trail()
            .contains(&StudioState::Errored(FailureKind::RemoteRejected(500))));
        assert_eq!(h.studio.phase(), StudioState::Idle);

        let saved = ConfigStore::open(&h.paths.config_path).unwrap().load();
        assert_eq!(saved.authorization, "Bearer secret");
        assert_eq!(saved.steps, 20);

        assert_eq!(h.studio.app_state().gallery.len(), before);
        let events = drain(&mut h.events);
        assert!(events.iter().any(|e| matches!(
            e,
            UiEvent::Status(message) if message.contains("status code: 500")
        )));
        assert!(!events
            .iter()
            .any(|e| matches!(e, UiEvent::ArtifactRegistered(_) | UiEvent::MainImageChanged(_))));
    }

    #[tokio::test]
    async fn test_invalid_seed_touches_nothing() {
        let service = serve(StatusCode::OK, Vec::new()).await;
        let mut h = harness(service.url.clone());
        let config_before = std::fs::read_to_string(&h.paths.config_path).unwrap();

        let p = params(&h.studio, "not-a-seed");
        let err = h.studio.generate(p).await.unwrap_err();

        assert!(matches!(err, StudioError::InvalidParameter(_)));
        assert!(service.requests().is_empty());
        assert_eq!(std::fs::read_to_string(&h.paths.config_path).unwrap(), config_before);
        assert_eq!(
            h.studio.last_trail(),
            &[
                StudioState::Building,
                StudioState::Errored(FailureKind::InvalidParameter),
                StudioState::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_saves_config() {
        let mut h = harness(closed_endpoint().await);

        let p = params(&h.studio, "5");
        let err = h.studio.generate(p).await.unwrap_err();

        assert!(matches!(err, StudioError::TransportFailure(_)));
        let saved = ConfigStore::open(&h.paths.config_path).unwrap().load();
        assert_eq!(saved.authorization, "Bearer secret");
        assert_eq!(h.studio.phase(), StudioState::Idle);
    }

    #[tokio::test]
    async fn test_undecodable_response_creates_no_artifact() {
        let service = serve(StatusCode::OK, zip_with_entries(&[("a.txt", b"text")])).await;
        let mut h = harness(service.url.clone());

        let err = h.studio.generate(params(&h.studio, "")).await.unwrap_err();

        assert!(matches!(err, StudioError::DecodeFailure(_)));
        assert!(h.studio.app_state().artifacts.list().unwrap().is_empty());
        assert!(h.studio.app_state().gallery.is_empty());
        assert!(h
            .studio
            .last_trail()
            .contains(&StudioState::Errored(FailureKind::DecodeFailure)));
    }

    #[tokio::test]
    async fn test_recovers_for_next_trigger() {
        let png = png_bytes(16, 16);
        let service = serve(StatusCode::OK, zip_with_entries(&[("image_0.png", &png)])).await;
        let mut h = harness(service.url.clone());

        assert!(h.studio.generate(params(&h.studio, "x")).await.is_err());
        assert!(h.studio.generate(params(&h.studio, "")).await.is_ok());
        assert_eq!(h.studio.app_state().gallery.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_credential_fails_before_request() {
        let service = serve(StatusCode::OK, Vec::new()).await;
        let mut h = harness(service.url.clone());
        let config_before = std::fs::read_to_string(&h.paths.config_path).unwrap();

        let mut p = params(&h.studio, "");
        p.credential = "bad\ntoken".to_string();
        let err = h.studio.generate(p).await.unwrap_err();

        assert!(matches!(err, StudioError::InvalidParameter(_)));
        assert!(service.requests().is_empty());
        assert_eq!(std::fs::read_to_string(&h.paths.config_path).unwrap(), config_before);
        assert_eq!(
            h.studio.last_trail(),
            &[
                StudioState::Building,
                StudioState::Errored(FailureKind::InvalidParameter),
                StudioState::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn test_jpeg_response_is_stored_as_png() {
        let jpeg = jpeg_bytes(16, 8);
        let service = serve(StatusCode::OK, zip_with_entries(&[("image_0.jpg", &jpeg)])).await;
        let mut h = harness(service.url.clone());

        let artifact = h.studio.generate(params(&h.studio, "")).await.unwrap();

        assert_eq!(artifact.path.extension().unwrap(), "png");
        let stored = std::fs::read(&artifact.path).unwrap();
        assert_eq!(image::guess_format(&stored).unwrap(), image::ImageFormat::Png);
        let img = image::load_from_memory(&stored).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_gallery_alone() {
        let png = png_bytes(8, 8);
        let service = serve(StatusCode::OK, zip_with_entries(&[("image_0.png", &png)])).await;
        let mut h = harness(service.url.clone());
        let before = h.studio.app_state().gallery.len();
        drain(&mut h.events);
        std::fs::remove_dir_all(&h.paths.image_dir).unwrap();

        let err = h.studio.generate(params(&h.studio, "")).await.unwrap_err();

        assert!(matches!(err, StudioError::StorageFailure(_)));
        assert_eq!(
            h.studio.last_trail(),
            &[
                StudioState::Building,
                StudioState::Requesting,
                StudioState::Decoding,
                StudioState::Persisting,
                StudioState::Errored(FailureKind::StorageFailure),
                StudioState::Idle,
            ]
        );
        assert_eq!(h.studio.phase(), StudioState::Idle);
        assert_eq!(h.studio.app_state().gallery.len(), before);

        let events = drain(&mut h.events);
        assert!(!events
            .iter()
            .any(|e| matches!(e, UiEvent::ArtifactRegistered(_) | UiEvent::MainImageChanged(_))));
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::Status(message) if message.starts_with("Could not save"))));
    }
}
