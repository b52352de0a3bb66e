use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::capture_error::CaptureError;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Decode an image file into an RGBA frame tagged with `index`.
pub fn read_frame(path: &Path, index: usize) -> Result<Frame, CaptureError> {
    let rgba = image::open(path)
        .map_err(|e| CaptureError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Frame::new(rgba.into_raw(), width, height, 4, index))
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expand inputs into image paths. Directories contribute their image files
/// (non-recursive, sorted); files are kept as given.
pub fn collect_image_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, CaptureError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input).map_err(|e| CaptureError::ReadDir {
                path: input.clone(),
                source: e,
            })?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}
