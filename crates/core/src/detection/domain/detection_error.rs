use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::DETECTION_ROW_LEN;
use crate::shared::frame::Frame;

/// Failure to bring up the network. The engine is unusable afterwards.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("model artifact missing: {path}")]
    MissingArtifact { path: PathBuf },
    #[error("weights {weights} must sit next to topology {topology}")]
    WeightsNotColocated { topology: PathBuf, weights: PathBuf },
    #[error("model {path} expects {actual}x{actual} input, configured for {expected}x{expected}")]
    InputSizeMismatch {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },
    #[error("failed to load network from {path}: {message}")]
    Session { path: PathBuf, message: String },
}

/// The forward pass produced output this decoder cannot interpret.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected exactly one output tensor, got {actual}")]
    OutputCount { actual: usize },
    #[error("output has {total} elements, not a multiple of {}", DETECTION_ROW_LEN)]
    RowLength { total: usize },
}

/// Per-call detection failure. No partial result accompanies it.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("expected a {expected}-channel frame, got {actual} channels")]
    UnsupportedChannels { expected: u8, actual: u8 },
    #[error("cannot build a blob from an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("forward pass failed: {0}")]
    Inference(String),
}

/// `BufferLength` unless the frame's buffer matches its dimensions.
/// `Frame::new` only checks this in debug builds.
pub(crate) fn ensure_frame_len(frame: &Frame) -> Result<(), DetectionError> {
    let expected = frame.expected_len();
    let actual = frame.data().len();
    if actual == expected {
        Ok(())
    } else {
        Err(DetectionError::BufferLength { expected, actual })
    }
}
