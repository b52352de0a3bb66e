use crate::detection::domain::detection_error::{ensure_frame_len, DetectionError};
use crate::shared::frame::Frame;

/// Converts RGBA camera frames to the BGR layout the network was trained on.
///
/// Alpha is dropped. The channel swap is load-bearing: the per-channel means
/// in the blob builder are in BGR order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorSpaceConverter;

impl ColorSpaceConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, frame: &Frame) -> Result<Frame, DetectionError> {
        if frame.channels() != 4 {
            return Err(DetectionError::UnsupportedChannels {
                expected: 4,
                actual: frame.channels(),
            });
        }
        ensure_frame_len(frame)?;

        let mut bgr = Vec::with_capacity(frame.data().len() / 4 * 3);
        for px in frame.data().chunks_exact(4) {
            bgr.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        Ok(Frame::new(
            bgr,
            frame.width(),
            frame.height(),
            3,
            frame.index(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_pixel_becomes_bgr() {
        let frame = Frame::new(vec![10, 20, 30, 255, 1, 2, 3, 0], 2, 1, 4, 7);

        let bgr = ColorSpaceConverter::new().convert(&frame).unwrap();

        assert_eq!(bgr.channels(), 3);
        assert_eq!(bgr.data(), &[30, 20, 10, 3, 2, 1]);
        assert_eq!(bgr.index(), 7);
    }

    #[test]
    fn test_dimensions_preserved() {
        let frame = Frame::new(vec![0u8; 5 * 3 * 4], 5, 3, 4, 0);

        let bgr = ColorSpaceConverter::new().convert(&frame).unwrap();

        assert_eq!((bgr.width(), bgr.height()), (5, 3));
        assert_eq!(bgr.as_ndarray().shape(), &[3, 5, 3]);
    }

    #[test]
    fn test_alpha_does_not_leak_into_output() {
        let frame = Frame::new(vec![0, 0, 0, 200], 1, 1, 4, 0);
        let bgr = ColorSpaceConverter::new().convert(&frame).unwrap();
        assert!(bgr.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let frame = Frame::unchecked(vec![0u8; 7], 2, 1, 4, 0);
        let err = ColorSpaceConverter::new().convert(&frame).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::BufferLength {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_three_channel_input_rejected() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        let err = ColorSpaceConverter::new().convert(&frame).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::UnsupportedChannels {
                expected: 4,
                actual: 3
            }
        ));
    }
}
