use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::detection::domain::detection_error::{ensure_frame_len, DetectionError};
use crate::shared::detector_config::DetectorConfig;
use crate::shared::frame::Frame;

/// Network input tensor, NCHW `[1, 3, size, size]` float32.
///
/// Owned by the detection call that built it; the inference engine
/// consumes it.
#[derive(Clone, Debug)]
pub struct Blob {
    data: Array4<f32>,
}

impl Blob {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array4<f32> {
        self.data
    }
}

/// Resizes a BGR frame to the network input size and subtracts the
/// per-channel means: `(pixel - mean) * scale`.
#[derive(Clone, Debug)]
pub struct BlobBuilder {
    size: u32,
    means: [f32; 3],
    scale: f32,
}

impl BlobBuilder {
    pub fn new(size: u32, means: [f32; 3], scale: f32) -> Self {
        Self { size, means, scale }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.input_size, config.channel_means, config.scale)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Expects a 3-channel frame from the color-space converter.
    pub fn build(&self, image: &Frame) -> Result<Blob, DetectionError> {
        if image.is_empty() {
            return Err(DetectionError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }
        if image.channels() != 3 {
            return Err(DetectionError::UnsupportedChannels {
                expected: 3,
                actual: image.channels(),
            });
        }
        ensure_frame_len(image)?;

        // RgbImage is only a 3-channel container here; the bytes stay BGR.
        let buffer = image::RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
            .ok_or(DetectionError::BufferLength {
                expected: image.expected_len(),
                actual: image.data().len(),
            })?;
        let resized = if buffer.dimensions() == (self.size, self.size) {
            buffer
        } else {
            imageops::resize(&buffer, self.size, self.size, FilterType::Triangle)
        };

        let s = self.size as usize;
        let mut data = Array4::<f32>::zeros((1, 3, s, s));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for (c, &value) in pixel.0.iter().enumerate() {
                data[[0, c, y as usize, x as usize]] = (value as f32 - self.means[c]) * self.scale;
            }
        }

        Ok(Blob { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::CHANNEL_MEANS;
    use approx::assert_relative_eq;

    fn bgr_frame(width: u32, height: u32, bgr: [u8; 3]) -> Frame {
        let data = bgr.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    fn default_builder() -> BlobBuilder {
        BlobBuilder::from_config(&DetectorConfig::default())
    }

    #[test]
    fn test_blob_shape_is_single_batch_nchw() {
        let blob = default_builder().build(&bgr_frame(640, 480, [0, 0, 0])).unwrap();
        assert_eq!(blob.shape(), &[1, 3, 300, 300]);
    }

    #[test]
    fn test_frame_equal_to_means_yields_zero_blob() {
        let frame = bgr_frame(40, 30, [104, 177, 123]);
        let blob = default_builder().build(&frame).unwrap();
        assert!(blob.as_array().iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_means_subtracted_per_channel() {
        let blob = default_builder().build(&bgr_frame(300, 300, [0, 0, 0])).unwrap();
        let arr = blob.as_array();
        for c in 0..3 {
            assert_relative_eq!(arr[[0, c, 150, 150]], -CHANNEL_MEANS[c]);
        }
    }

    #[test]
    fn test_scale_applied_after_mean_subtraction() {
        let builder = BlobBuilder::new(4, [10.0, 20.0, 30.0], 0.5);
        let blob = builder.build(&bgr_frame(4, 4, [110, 120, 130])).unwrap();
        let arr = blob.as_array();
        assert_relative_eq!(arr[[0, 0, 0, 0]], 50.0);
        assert_relative_eq!(arr[[0, 1, 0, 0]], 50.0);
        assert_relative_eq!(arr[[0, 2, 3, 3]], 50.0);
    }

    #[test]
    fn test_channel_order_preserved_into_planes() {
        let builder = BlobBuilder::new(2, [0.0; 3], 1.0);
        let blob = builder.build(&bgr_frame(2, 2, [1, 2, 3])).unwrap();
        let arr = blob.as_array();
        assert_relative_eq!(arr[[0, 0, 1, 1]], 1.0);
        assert_relative_eq!(arr[[0, 1, 1, 1]], 2.0);
        assert_relative_eq!(arr[[0, 2, 1, 1]], 3.0);
    }

    #[test]
    fn test_zero_area_image_rejected() {
        let frame = Frame::new(Vec::new(), 0, 10, 3, 0);
        let err = default_builder().build(&frame).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::EmptyImage {
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn test_four_channel_input_rejected() {
        let frame = Frame::new(vec![0u8; 16], 2, 2, 4, 0);
        let err = default_builder().build(&frame).unwrap_err();
        assert!(matches!(err, DetectionError::UnsupportedChannels { .. }));
    }

    #[test]
    fn test_short_buffer_reports_length_not_empty() {
        let frame = Frame::unchecked(vec![0u8; 5], 2, 2, 3, 0);
        let err = default_builder().build(&frame).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::BufferLength {
                expected: 12,
                actual: 5
            }
        ));
    }
}
