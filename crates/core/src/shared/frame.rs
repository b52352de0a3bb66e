use ndarray::ArrayView3;

/// A single camera frame or image: interleaved 8-bit pixels in row-major order.
///
/// Frames enter the pipeline as 4-channel RGBA. The color-space converter
/// produces the 3-channel BGR frames the network consumes; the channel order
/// is carried by convention, not by the type.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Position of the frame within its batch or capture sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte length implied by the dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * (self.channels as usize)
    }

    /// Builds a frame without the length check so tests can exercise the
    /// release-build path.
    #[cfg(test)]
    pub(crate) fn unchecked(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Self {
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 16]; // 2x2x4
        let frame = Frame::new(data.clone(), 2, 2, 4, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 4);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_is_empty_for_zero_dimension() {
        assert!(Frame::new(Vec::new(), 0, 10, 4, 0).is_empty());
        assert!(Frame::new(Vec::new(), 10, 0, 4, 0).is_empty());
        assert!(!Frame::new(vec![0u8; 4], 1, 1, 4, 0).is_empty());
    }

    #[test]
    fn test_expected_len_from_dimensions() {
        let frame = Frame::unchecked(vec![0u8; 5], 2, 3, 4, 0);
        assert_eq!(frame.expected_len(), 24);
        assert_eq!(frame.data().len(), 5);
    }

    #[test]
    fn test_into_data_returns_buffer() {
        let frame = Frame::new(vec![7u8; 12], 1, 3, 4, 0);
        assert_eq!(frame.into_data(), vec![7u8; 12]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x4
        Frame::new(data, 2, 2, 4, 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 32]; // 2x4x4
        let frame = Frame::new(data, 4, 2, 4, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 4]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGBA: set pixel (row=1, col=0) to opaque red
        let mut data = vec![0u8; 16];
        data[8] = 255; // row=1, col=0, R
        data[11] = 255; // row=1, col=0, A
        let frame = Frame::new(data, 2, 2, 4, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
        assert_eq!(arr[[1, 0, 2]], 0);
        assert_eq!(arr[[1, 0, 3]], 255);
    }
}
