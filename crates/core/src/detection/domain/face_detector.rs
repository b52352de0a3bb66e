use crate::detection::domain::detection_error::DetectionError;
use crate::shared::detection_set::DetectionSet;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Detection holds no per-frame state, so one detector can serve
/// concurrent callers.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<DetectionSet, DetectionError>;
}
