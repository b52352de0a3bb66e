use std::sync::Arc;

use crate::capture::capture_error::CaptureError;
use crate::capture::screenshot_store::ScreenshotStore;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::detection_executor::{
    BatchError, DetectionExecutor, FrameDetections, FrameSource,
};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;

/// Batch pipeline: detect faces in every frame and, when a screenshot store
/// is configured, save each frame that contains at least one face.
///
/// Frames are pulled from the source as the executor needs them and dropped
/// once detected, so memory does not grow with the batch. Screenshots are
/// written as frames complete; a failure stops the batch but keeps the
/// screenshots already written.
pub struct DetectFramesUseCase {
    detector: Arc<dyn FaceDetector>,
    executor: Box<dyn DetectionExecutor>,
    screenshots: Option<ScreenshotStore>,
}

impl DetectFramesUseCase {
    pub fn new(
        detector: Arc<dyn FaceDetector>,
        executor: Box<dyn DetectionExecutor>,
        screenshots: Option<ScreenshotStore>,
    ) -> Self {
        Self {
            detector,
            executor,
            screenshots,
        }
    }

    /// Detect faces in `frames`, returning one result per frame in input
    /// order. The end-of-batch summary is left to the caller, which knows
    /// where it may be written.
    pub fn execute(
        &self,
        frames: FrameSource<'_>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Vec<FrameDetections>, BatchError> {
        let mut saved = 0usize;
        let mut save_screenshot =
            |frame: &Frame, result: &FrameDetections| -> Result<(), CaptureError> {
                if let Some(store) = &self.screenshots {
                    if !result.detections.is_empty() {
                        store.save(frame)?;
                        saved += 1;
                    }
                }
                Ok(())
            };

        let results =
            self.executor
                .execute(self.detector.clone(), frames, &mut save_screenshot, logger)?;

        let faces: usize = results.iter().map(|r| r.detections.len()).sum();
        logger.info(&format!(
            "Found {faces} face(s) in {} frame(s)",
            results.len()
        ));
        if self.screenshots.is_some() {
            logger.info(&format!("Saved {saved} screenshot(s)"));
        }
        Ok(results)
    }
}
