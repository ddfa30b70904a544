// src/error.rs

use thiserror::Error;

/// Failures of a single generation attempt.
///
/// Every variant is caught at the studio boundary and turned into one
/// status line for the user; none of them ends the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudioError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to fetch image, status code: {0}")]
    RemoteRejected(u16),

    #[error("Could not reach the generation service: {0}")]
    TransportFailure(String),

    #[error("Could not decode the returned image: {0}")]
    DecodeFailure(String),

    #[error("Could not save the image: {0}")]
    StorageFailure(String),
}

/// Discriminant of [`StudioError`], used by the studio state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidParameter,
    RemoteRejected(u16),
    TransportFailure,
    DecodeFailure,
    StorageFailure,
}

impl StudioError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StudioError::InvalidParameter(_) => FailureKind::InvalidParameter,
            StudioError::RemoteRejected(status) => FailureKind::RemoteRejected(*status),
            StudioError::TransportFailure(_) => FailureKind::TransportFailure,
            StudioError::DecodeFailure(_) => FailureKind::DecodeFailure,
            StudioError::StorageFailure(_) => FailureKind::StorageFailure,
        }
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::TransportFailure(e.to_string())
    }
}

impl From<zip::result::ZipError> for StudioError {
    fn from(e: zip::result::ZipError) -> Self {
        StudioError::DecodeFailure(e.to_string())
    }
}

impl From<image::ImageError> for StudioError {
    fn from(e: image::ImageError) -> Self {
        StudioError::DecodeFailure(e.to_string())
    }
}

/// Raised by the studio handle when a trigger cannot be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    #[error("A generation is already in progress")]
    Busy,

    #[error("The studio worker has stopped")]
    Closed,
}
