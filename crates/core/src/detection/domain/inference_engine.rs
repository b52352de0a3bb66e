use ndarray::ArrayD;

use crate::detection::domain::blob_builder::Blob;
use crate::detection::domain::detection_error::DetectionError;

/// One raw forward-pass output.
pub type OutputTensor = ArrayD<f32>;

/// Domain interface for running a loaded network.
///
/// The network is read-only after loading. Implementations must be safe to
/// call from several threads at once, either with per-call execution state
/// or by serializing forward passes internally.
pub trait InferenceEngine: Send + Sync {
    /// Run one forward pass. The blob is consumed so it cannot outlive the call.
    ///
    /// Every output the network produces is returned; callers decide whether
    /// the count is acceptable.
    fn forward(&self, blob: Blob) -> Result<Vec<OutputTensor>, DetectionError>;
}
