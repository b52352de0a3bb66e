/// Network topology file, referencing its weights as external data.
pub const TOPOLOGY_FILE_NAME: &str = "res10_300x300_ssd_deploy.onnx";
pub const WEIGHTS_FILE_NAME: &str = "res10_300x300_ssd_iter_140000_fp16.onnx.data";

/// Minimum score for a candidate to count as a face (strictly greater-than).
pub const CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Spatial size of the square network input.
pub const BLOB_SIZE: u32 = 300;

/// Per-channel means subtracted from BGR pixels before inference.
pub const CHANNEL_MEANS: [f32; 3] = [104.0, 177.0, 123.0];

pub const BLOB_SCALE: f32 = 1.0;

/// Fields per detection row: batch id, class id, confidence, x1, y1, x2, y2.
pub const DETECTION_ROW_LEN: usize = 7;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const APP_DIR_NAME: &str = "facescan";
