use crate::detection::domain::detection_error::ShapeError;
use crate::detection::domain::inference_engine::OutputTensor;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::DETECTION_ROW_LEN;
use crate::shared::detector_config::DetectorConfig;

/// Turns a network's raw outputs into frame-space boxes.
///
/// The output layout is specific to one trained topology; swapping the
/// network means swapping the decoder.
pub trait DetectionDecoder: Send + Sync {
    fn decode(
        &self,
        outputs: &[OutputTensor],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<BoundingBox>, ShapeError>;
}

/// Decoder for the single-shot detector's `DetectionOutput` layer.
///
/// The layer emits rows of `[batch_id, class_id, confidence, x1, y1, x2, y2]`
/// with corners normalized to `[0, 1]`. Only one class (face) exists, so the
/// class id is ignored.
#[derive(Clone, Debug)]
pub struct SsdDetectionDecoder {
    confidence_threshold: f32,
}

impl SsdDetectionDecoder {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.confidence_threshold)
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

impl DetectionDecoder for SsdDetectionDecoder {
    fn decode(
        &self,
        outputs: &[OutputTensor],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<BoundingBox>, ShapeError> {
        let [output] = outputs else {
            return Err(ShapeError::OutputCount {
                actual: outputs.len(),
            });
        };

        let total = output.len();
        if total % DETECTION_ROW_LEN != 0 {
            return Err(ShapeError::RowLength { total });
        }

        // Logical (row-major) order regardless of the tensor's memory layout.
        let values: Vec<f32> = output.iter().copied().collect();
        let fw = frame_width as f32;
        let fh = frame_height as f32;

        let mut boxes = Vec::new();
        for row in values.chunks_exact(DETECTION_ROW_LEN) {
            let confidence = row[2];
            if confidence.is_nan() || confidence <= self.confidence_threshold {
                continue;
            }

            let left = row[3] * fw;
            let top = row[4] * fh;
            let right = row[5] * fw;
            let bottom = row[6] * fh;
            let width = right - left + 1.0;
            let height = bottom - top + 1.0;

            log::trace!(
                "Accepted detection conf={confidence:.3} left={left:.1} top={top:.1} width={width:.1} height={height:.1}"
            );
            boxes.push(BoundingBox::new(
                left as i32,
                top as i32,
                width as i32,
                height as i32,
            ));
        }

        Ok(boxes)
    }
}
