/// Inference engine backed by an ONNX Runtime session via `ort`.
///
/// The topology file carries the graph and references the weights file as
/// external data by name, so the two must share a directory.
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::detection::domain::blob_builder::Blob;
use crate::detection::domain::detection_error::{DetectionError, LoadError};
use crate::detection::domain::inference_engine::{InferenceEngine, OutputTensor};
use crate::shared::model_resolver::ModelArtifacts;

use super::execution_provider::preferred_execution_providers;

/// A loaded network. `ort` sessions need exclusive access to run, so
/// forward passes are serialized behind a mutex.
pub struct OnnxInferenceEngine {
    session: Mutex<ort::session::Session>,
    topology: PathBuf,
}

impl OnnxInferenceEngine {
    /// Load the network described by `artifacts`.
    ///
    /// When the model declares a static NCHW input, its spatial size must
    /// equal `input_size`.
    pub fn load(artifacts: &ModelArtifacts, input_size: u32) -> Result<Self, LoadError> {
        ensure_exists(&artifacts.topology)?;
        ensure_exists(&artifacts.weights)?;
        if artifacts.topology.parent() != artifacts.weights.parent() {
            return Err(LoadError::WeightsNotColocated {
                topology: artifacts.topology.clone(),
                weights: artifacts.weights.clone(),
            });
        }

        let path = &artifacts.topology;
        log::info!(
            "Loading network {} (weights {})",
            path.display(),
            artifacts.weights.display()
        );

        let builder = ort::session::Session::builder().map_err(|e| session_error(path, e))?;
        let builder = builder
            .with_execution_providers(preferred_execution_providers())
            .map_err(|e| session_error(path, e))?;
        let session = builder
            .commit_from_file(path)
            .map_err(|e| session_error(path, e))?;

        if let Some(actual) = static_input_size(&session) {
            if actual != input_size {
                return Err(LoadError::InputSizeMismatch {
                    path: path.clone(),
                    expected: input_size,
                    actual,
                });
            }
        }

        Ok(Self {
            session: Mutex::new(session),
            topology: path.clone(),
        })
    }

    pub fn topology(&self) -> &Path {
        &self.topology
    }
}

impl InferenceEngine for OnnxInferenceEngine {
    fn forward(&self, blob: Blob) -> Result<Vec<OutputTensor>, DetectionError> {
        let input = ort::value::Tensor::from_array(blob.into_array()).map_err(inference_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::Inference("session mutex poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(inference_error)?;

        let mut tensors = Vec::with_capacity(outputs.len());
        for i in 0..outputs.len() {
            let view = outputs[i]
                .try_extract_array::<f32>()
                .map_err(inference_error)?;
            tensors.push(view.to_owned());
        }
        Ok(tensors)
    }
}

fn ensure_exists(path: &Path) -> Result<(), LoadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::MissingArtifact {
            path: path.to_path_buf(),
        })
    }
}

/// Spatial size of the model's first input when it is static NCHW `[N, C, H, W]`.
fn static_input_size(session: &ort::session::Session) -> Option<u32> {
    let input = session.inputs().first()?;
    if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
        if shape.len() >= 4 && shape[2] > 0 {
            return Some(shape[2] as u32);
        }
    }
    None
}

fn session_error(path: &Path, e: impl Display) -> LoadError {
    LoadError::Session {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn inference_error(e: impl Display) -> DetectionError {
    DetectionError::Inference(e.to_string())
}
