use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::capture::capture_error::CaptureError;
use crate::shared::constants::APP_DIR_NAME;
use crate::shared::frame::Frame;

/// Saves frames as PNG screenshots under a root directory.
pub struct ScreenshotStore {
    root: PathBuf,
}

impl ScreenshotStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store rooted at `<data dir>/facescan/screenshots`.
    pub fn with_default_root() -> Result<Self, CaptureError> {
        dirs::data_dir()
            .map(|d| Self::new(d.join(APP_DIR_NAME).join("screenshots")))
            .ok_or(CaptureError::NoDataDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `frame` and return the file it was saved to. The root directory
    /// is created on first use.
    pub fn save(&self, frame: &Frame) -> Result<PathBuf, CaptureError> {
        self.save_at(frame, Local::now())
    }

    fn save_at(&self, frame: &Frame, taken_at: DateTime<Local>) -> Result<PathBuf, CaptureError> {
        if frame.channels() != 4 {
            return Err(CaptureError::UnsupportedChannels(frame.channels()));
        }
        fs::create_dir_all(&self.root).map_err(|e| CaptureError::CreateDir {
            path: self.root.clone(),
            source: e,
        })?;

        let path = self.root.join(screenshot_name(
            frame.width(),
            frame.height(),
            &taken_at,
            frame.index(),
        ));
        image::save_buffer(
            &path,
            frame.data(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CaptureError::Write {
            path: path.clone(),
            source: e,
        })?;

        log::info!("Saved screenshot to {}", path.display());
        Ok(path)
    }
}

/// `screen_<w>x<h>_<yyyy-MM-dd_HH-mm-ss>_<index>.png`
pub fn screenshot_name(width: u32, height: u32, taken_at: &DateTime<Local>, index: usize) -> String {
    format!(
        "screen_{width}x{height}_{}_{index}.png",
        taken_at.format("%Y-%m-%d_%H-%M-%S")
    )
}
