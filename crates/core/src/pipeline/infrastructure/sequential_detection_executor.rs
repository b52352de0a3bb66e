use std::sync::Arc;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::detection_executor::{
    detect_timed, record, BatchError, DetectionExecutor, FrameDetections, FrameSink, FrameSource,
};
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Reads and detects frames one after another on the calling thread.
#[derive(Default)]
pub struct SequentialDetectionExecutor;

impl SequentialDetectionExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl DetectionExecutor for SequentialDetectionExecutor {
    fn execute(
        &self,
        detector: Arc<dyn FaceDetector>,
        frames: FrameSource<'_>,
        sink: &mut FrameSink<'_>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Vec<FrameDetections>, BatchError> {
        let total = frames.len();
        let mut results = Vec::with_capacity(total);
        for frame in frames {
            let frame = frame?;
            let (result, ms) = detect_timed(detector.as_ref(), &frame);
            let detections = result?;
            record(logger, &detections, ms);
            sink(&frame, &detections)?;
            results.push(detections);
            logger.progress(results.len(), total);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture_error::CaptureError;
    use crate::pipeline::pipeline_logger::{NullPipelineLogger, StdoutPipelineLogger};
    use crate::pipeline::test_support::{frames, ignore, source, ScriptedDetector};
    use crate::shared::frame::Frame;

    #[test]
    fn test_results_in_input_order() {
        let detector = Arc::new(ScriptedDetector::new());
        let mut logger = StdoutPipelineLogger::new(1);

        let results = SequentialDetectionExecutor::new()
            .execute(detector, source(frames(&[3, 1, 2])), &mut ignore, &mut logger)
            .unwrap();

        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let faces: Vec<usize> = results.iter().map(|r| r.detections.len()).collect();
        assert_eq!(faces, vec![3, 1, 2]);
        assert_eq!(logger.timings_for("detect").map(<[f64]>::len), Some(3));
        assert_eq!(logger.metrics_for("faces"), Some(&[3.0, 1.0, 2.0][..]));
    }

    #[test]
    fn test_first_error_aborts() {
        let detector = Arc::new(ScriptedDetector::failing_at(&[1]));
        let mut logger = StdoutPipelineLogger::new(1);

        let err = SequentialDetectionExecutor::new()
            .execute(
                detector.clone(),
                source(frames(&[1, 1, 1])),
                &mut ignore,
                &mut logger,
            )
            .unwrap_err();

        assert!(matches!(err, BatchError::Detection(e) if e.index == 1));
        assert_eq!(detector.calls(), 2);
    }

    #[test]
    fn test_read_error_stops_before_later_frames() {
        let detector = Arc::new(ScriptedDetector::new());
        let mut input: Vec<_> = frames(&[1, 1, 1]).into_iter().map(Ok).collect();
        input[1] = Err(CaptureError::NoDataDir);

        let err = SequentialDetectionExecutor::new()
            .execute(
                detector.clone(),
                Box::new(input.into_iter()),
                &mut ignore,
                &mut NullPipelineLogger,
            )
            .unwrap_err();

        assert!(matches!(err, BatchError::Capture(CaptureError::NoDataDir)));
        assert_eq!(detector.calls(), 1);
    }

    #[test]
    fn test_sink_sees_each_frame_with_its_result() {
        let mut seen = Vec::new();
        let mut sink = |frame: &Frame, result: &FrameDetections| -> Result<(), CaptureError> {
            seen.push((frame.index(), result.detections.len()));
            Ok(())
        };

        SequentialDetectionExecutor::new()
            .execute(
                Arc::new(ScriptedDetector::new()),
                source(frames(&[2, 0])),
                &mut sink,
                &mut NullPipelineLogger,
            )
            .unwrap();

        assert_eq!(seen, vec![(0, 2), (1, 0)]);
    }

    #[test]
    fn test_empty_batch() {
        let results = SequentialDetectionExecutor::new()
            .execute(
                Arc::new(ScriptedDetector::new()),
                source(Vec::new()),
                &mut ignore,
                &mut NullPipelineLogger,
            )
            .unwrap();
        assert!(results.is_empty());
    }
}
