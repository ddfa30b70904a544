// src/commands/generate.rs

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::TriggerError;
use crate::studio::Studio;
use crate::types::GenerationParameters;

/// What the input side holds to start generations.
///
/// Triggers never block. A trigger while a generation is still running is
/// turned away with [`TriggerError::Busy`] instead of being queued.
#[derive(Clone)]
pub struct StudioHandle {
    tx: mpsc::UnboundedSender<GenerationParameters>,
    in_flight: Arc<AtomicBool>,
}

impl StudioHandle {
    pub fn trigger(&self, params: GenerationParameters) -> Result<(), TriggerError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Trigger ignored, generation in progress");
            return Err(TriggerError::Busy);
        }

        if self.tx.send(params).is_err() {
            self.in_flight.store(false, Ordering::SeqCst);
            return Err(TriggerError::Closed);
        }

        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Move the studio onto its own task.
///
/// That task is the only place config, artifacts and the gallery are
/// written. It ends once every handle is dropped and gives the studio back.
pub fn spawn_studio(mut studio: Studio) -> (StudioHandle, JoinHandle<Studio>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<GenerationParameters>();
    let in_flight = studio.busy_flag();

    let worker = tokio::spawn(async move {
        while let Some(params) = rx.recv().await {
            // Failures are already reported to the display by the studio.
            let _ = studio.generate(params).await;
        }
        tracing::debug!("Studio worker stopped");
        studio
    });

    (StudioHandle { tx, in_flight }, worker)
}
