use std::sync::Arc;
use std::time::Instant;

use crate::detection::domain::blob_builder::BlobBuilder;
use crate::detection::domain::color_space_converter::ColorSpaceConverter;
use crate::detection::domain::detection_decoder::{DetectionDecoder, SsdDetectionDecoder};
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::inference_engine::InferenceEngine;
use crate::detection::domain::result_ranker::ResultRanker;
use crate::shared::detection_set::DetectionSet;
use crate::shared::detector_config::DetectorConfig;
use crate::shared::frame::Frame;

/// Single-shot face detector: convert → blob → forward → decode → rank.
///
/// The engine is shared and read-only; every intermediate (BGR frame, blob,
/// raw outputs) is created and dropped within one `detect` call.
pub struct SsdFaceDetector {
    converter: ColorSpaceConverter,
    blob_builder: BlobBuilder,
    engine: Arc<dyn InferenceEngine>,
    decoder: Box<dyn DetectionDecoder>,
    ranker: ResultRanker,
}

impl SsdFaceDetector {
    pub fn new(config: &DetectorConfig, engine: Arc<dyn InferenceEngine>) -> Self {
        Self::with_decoder(
            config,
            engine,
            Box::new(SsdDetectionDecoder::from_config(config)),
        )
    }

    /// Use a decoder for a different output layout.
    pub fn with_decoder(
        config: &DetectorConfig,
        engine: Arc<dyn InferenceEngine>,
        decoder: Box<dyn DetectionDecoder>,
    ) -> Self {
        Self {
            converter: ColorSpaceConverter::new(),
            blob_builder: BlobBuilder::from_config(config),
            engine,
            decoder,
            ranker: ResultRanker::new(),
        }
    }
}

impl FaceDetector for SsdFaceDetector {
    fn detect(&self, frame: &Frame) -> Result<DetectionSet, DetectionError> {
        let start = Instant::now();

        let bgr = self.converter.convert(frame)?;
        let blob = self.blob_builder.build(&bgr)?;
        drop(bgr);
        let preprocessed = Instant::now();

        let outputs = self.engine.forward(blob)?;
        let inferred = Instant::now();

        let boxes = self
            .decoder
            .decode(&outputs, frame.width(), frame.height())?;
        drop(outputs);
        let detections = self.ranker.rank(boxes);

        log::debug!(
            "Frame {}: preprocess {:.1}ms, forward {:.1}ms, decode {:.1}ms",
            frame.index(),
            (preprocessed - start).as_secs_f64() * 1000.0,
            (inferred - preprocessed).as_secs_f64() * 1000.0,
            inferred.elapsed().as_secs_f64() * 1000.0,
        );
        if detections.is_empty() {
            log::debug!("Frame {}: no faces above threshold", frame.index());
        }

        Ok(detections)
    }
}
