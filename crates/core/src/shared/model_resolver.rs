use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{APP_DIR_NAME, TOPOLOGY_FILE_NAME, WEIGHTS_FILE_NAME};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model artifact {name} not found locally and no download URL configured")]
    NotFound { name: String },
}

/// On-disk locations of the network topology and its weights.
///
/// Both files always live in the same directory: the topology references
/// its weights by file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub topology: PathBuf,
    pub weights: PathBuf,
}

impl ModelArtifacts {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            topology: dir.join(TOPOLOGY_FILE_NAME),
            weights: dir.join(WEIGHTS_FILE_NAME),
        }
    }

    fn exist(&self) -> bool {
        self.topology.exists() && self.weights.exists()
    }
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locates the detector's model artifacts, fetching them into a writable
/// cache on first use.
pub struct ModelResolver {
    cache_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
    base_url: Option<String>,
    progress: Option<ProgressFn>,
}

impl ModelResolver {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            bundled_dir: None,
            base_url: None,
            progress: None,
        }
    }

    /// Resolver rooted at the platform cache directory.
    pub fn with_default_cache() -> Result<Self, ModelResolveError> {
        Ok(Self::new(model_cache_dir()?))
    }

    pub fn with_bundled_dir(mut self, dir: PathBuf) -> Self {
        self.bundled_dir = Some(dir);
        self
    }

    /// Base URL that `<base>/<file name>` downloads are made from.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Resolve the topology/weights pair.
    ///
    /// Resolution order:
    /// 1. Cache directory, when it holds both files
    /// 2. Bundled directory, when it holds both files
    /// 3. Download whatever the cache is missing, then use the cache
    pub fn resolve(&self) -> Result<ModelArtifacts, ModelResolveError> {
        let cached = ModelArtifacts::in_dir(&self.cache_dir);
        if cached.exist() {
            log::debug!("Model artifacts found in cache {}", self.cache_dir.display());
            return Ok(cached);
        }

        if let Some(dir) = &self.bundled_dir {
            let bundled = ModelArtifacts::in_dir(dir);
            if bundled.exist() {
                log::debug!("Model artifacts found in bundled dir {}", dir.display());
                return Ok(bundled);
            }
        }

        for (name, path) in [
            (TOPOLOGY_FILE_NAME, &cached.topology),
            (WEIGHTS_FILE_NAME, &cached.weights),
        ] {
            if path.exists() {
                continue;
            }
            let base = self.base_url.as_deref().ok_or_else(|| ModelResolveError::NotFound {
                name: name.to_string(),
            })?;
            fs::create_dir_all(&self.cache_dir).map_err(ModelResolveError::CacheDir)?;
            let url = format!("{base}/{name}");
            log::info!("Fetching {url} into {}", path.display());
            download(&url, path, self.progress.as_ref())?;
        }

        Ok(cached)
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/facescan/models/`
/// - Linux: `$XDG_CACHE_HOME/facescan/models/` or `~/.cache/facescan/models/`
/// - Windows: `%LOCALAPPDATA%/facescan/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

/// `<file name>.part` next to `dest`, keeping every extension of the name.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn download(url: &str, dest: &Path, progress: Option<&ProgressFn>) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = part_path(dest);
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    let chunk_size = 1024 * 1024;
    for chunk in bytes.chunks(chunk_size) {
        if let Err(e) = file.write_all(chunk) {
            drop(file);
            let _ = fs::remove_file(&temp_path);
            return Err(ModelResolveError::Write {
                path: temp_path,
                source: e,
            });
        }
        downloaded += chunk.len() as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
