//! Test doubles shared by the executor and use-case tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::capture::capture_error::CaptureError;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::result_ranker::ResultRanker;
use crate::pipeline::detection_executor::{FrameDetections, FrameSource};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::detection_set::DetectionSet;
use crate::shared::frame::Frame;

/// 1x1 RGBA frames whose red channel holds the number of faces to report
/// and whose green channel holds a detection delay in milliseconds.
pub fn frames(face_counts: &[u8]) -> Vec<Frame> {
    frames_with_delays(face_counts, &vec![0; face_counts.len()])
}

pub fn frames_with_delays(face_counts: &[u8], delays_ms: &[u8]) -> Vec<Frame> {
    face_counts
        .iter()
        .zip(delays_ms)
        .enumerate()
        .map(|(i, (&faces, &delay))| Frame::new(vec![faces, delay, 0, 255], 1, 1, 4, i))
        .collect()
}

pub fn source(frames: Vec<Frame>) -> FrameSource<'static> {
    Box::new(frames.into_iter().map(Ok))
}

/// Sink that keeps nothing.
pub fn ignore(_frame: &Frame, _result: &FrameDetections) -> Result<(), CaptureError> {
    Ok(())
}

/// Detector that reports what each frame's pixels tell it to.
pub struct ScriptedDetector {
    fail_at: Vec<usize>,
    calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::failing_at(&[])
    }

    pub fn failing_at(indices: &[usize]) -> Self {
        Self {
            fail_at: indices.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&self, frame: &Frame) -> Result<DetectionSet, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pixel = frame.data();
        std::thread::sleep(Duration::from_millis(pixel[1] as u64));
        if self.fail_at.contains(&frame.index()) {
            return Err(DetectionError::Inference(format!(
                "scripted failure at {}",
                frame.index()
            )));
        }
        let boxes = (0..pixel[0] as i32)
            .map(|i| BoundingBox::new(i, 0, 10 + i, 10))
            .collect();
        Ok(ResultRanker::new().rank(boxes))
    }
}
