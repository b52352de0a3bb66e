use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::capture::capture_error::CaptureError;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::detection_set::DetectionSet;
use crate::shared::frame::Frame;

/// Detection result for one frame of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameDetections {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub detections: DetectionSet,
}

impl FrameDetections {
    pub fn new(frame: &Frame, detections: DetectionSet) -> Self {
        Self {
            index: frame.index(),
            width: frame.width(),
            height: frame.height(),
            detections,
        }
    }
}

#[derive(Error, Debug)]
#[error("frame {index}: {source}")]
pub struct FrameError {
    pub index: usize,
    #[source]
    pub source: DetectionError,
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Detection(#[from] FrameError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Frames in batch order, produced on demand so only the frames in flight
/// are held in memory.
pub type FrameSource<'a> =
    Box<dyn ExactSizeIterator<Item = Result<Frame, CaptureError>> + Send + 'a>;

/// Called once per successfully detected frame, in completion order, before
/// the frame is dropped.
pub type FrameSink<'a> = dyn FnMut(&Frame, &FrameDetections) -> Result<(), CaptureError> + 'a;

/// Port for running a detector over a batch of frames.
///
/// Results come back in input order. A failure aborts the batch and no
/// partial results are returned. When several frames fail, the error of
/// the earliest one in batch order is reported.
pub trait DetectionExecutor: Send {
    fn execute(
        &self,
        detector: Arc<dyn FaceDetector>,
        frames: FrameSource<'_>,
        sink: &mut FrameSink<'_>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Vec<FrameDetections>, BatchError>;
}

/// Run one frame, returning the result and the elapsed milliseconds.
pub(crate) fn detect_timed(
    detector: &dyn FaceDetector,
    frame: &Frame,
) -> (Result<FrameDetections, FrameError>, f64) {
    let start = std::time::Instant::now();
    let result = detector
        .detect(frame)
        .map(|detections| FrameDetections::new(frame, detections))
        .map_err(|source| FrameError {
            index: frame.index(),
            source,
        });
    (result, start.elapsed().as_secs_f64() * 1000.0)
}

pub(crate) fn record(logger: &mut dyn PipelineLogger, detections: &FrameDetections, ms: f64) {
    logger.timing("detect", ms);
    logger.metric("faces", detections.detections.len() as f64);
}
