use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use facescan_core::capture::image_file_reader::{collect_image_paths, read_frame};
use facescan_core::capture::screenshot_store::ScreenshotStore;
use facescan_core::detection::domain::face_detector::FaceDetector;
use facescan_core::detection::domain::ssd_face_detector::SsdFaceDetector;
use facescan_core::detection::infrastructure::onnx_inference_engine::OnnxInferenceEngine;
use facescan_core::pipeline::detect_frames_use_case::DetectFramesUseCase;
use facescan_core::pipeline::detection_executor::{
    DetectionExecutor, FrameDetections, FrameSource,
};
use facescan_core::pipeline::infrastructure::sequential_detection_executor::SequentialDetectionExecutor;
use facescan_core::pipeline::infrastructure::threaded_detection_executor::ThreadedDetectionExecutor;
use facescan_core::pipeline::pipeline_logger::{
    NullPipelineLogger, PipelineLogger, StdoutPipelineLogger,
};
use facescan_core::shared::detector_config::DetectorConfig;
use facescan_core::shared::model_resolver::ModelResolver;

/// Detect faces in images with a pretrained SSD network.
#[derive(Parser)]
#[command(name = "facescan")]
struct Cli {
    /// Image files or directories of images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory holding bundled model artifacts.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Base URL to fetch missing model artifacts from.
    #[arg(long)]
    model_url: Option<String>,

    /// Model cache directory (defaults to the platform cache dir).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Detector parameters JSON shipped with the model.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads (1 = detect on the main thread).
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Save a screenshot of every image containing a face to this directory.
    #[arg(long)]
    screenshots: Option<PathBuf>,

    /// Print a per-stage timing summary to stderr.
    #[arg(long)]
    summary: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = match &cli.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    let detector = build_detector(&cli, &config)?;

    let paths = collect_image_paths(&cli.inputs)?;
    if paths.is_empty() {
        return Err("no images found in the given inputs".into());
    }
    // Decoded on demand by the executor; only frames in flight are held.
    let frames: FrameSource<'_> = Box::new(
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| read_frame(path, i)),
    );

    let use_case = DetectFramesUseCase::new(
        detector,
        build_executor(cli.workers),
        cli.screenshots.clone().map(ScreenshotStore::new),
    );
    let mut summary_logger = cli.summary.then(StdoutPipelineLogger::default);
    let mut null_logger = NullPipelineLogger;
    let logger: &mut dyn PipelineLogger = match summary_logger.as_mut() {
        Some(logger) => logger,
        None => &mut null_logger,
    };
    let results = use_case.execute(frames, logger)?;

    let summary = summary_logger
        .as_ref()
        .and_then(StdoutPipelineLogger::summary_string);
    report(
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        &paths,
        &results,
        cli.json,
        summary.as_deref(),
    )
}

/// Write results to `out` and the optional summary to `err`, keeping `out`
/// machine-readable when `json` is set.
fn report(
    out: &mut impl Write,
    err: &mut impl Write,
    paths: &[PathBuf],
    results: &[FrameDetections],
    json: bool,
    summary: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        write_json(out, paths, results)?;
    } else {
        write_text(out, paths, results)?;
    }
    if let Some(text) = summary {
        writeln!(err, "\n{text}")?;
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.workers == 0 {
        return Err("--workers must be at least 1".into());
    }
    if let Some(dir) = &cli.models_dir {
        if !dir.is_dir() {
            return Err(format!("models directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}

fn build_detector(
    cli: &Cli,
    config: &DetectorConfig,
) -> Result<Arc<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let mut resolver = match &cli.cache_dir {
        Some(dir) => ModelResolver::new(dir.clone()),
        None => ModelResolver::with_default_cache()?,
    };
    if let Some(dir) = &cli.models_dir {
        resolver = resolver.with_bundled_dir(dir.clone());
    }
    if let Some(url) = &cli.model_url {
        resolver = resolver.with_base_url(url.clone()).with_progress(Box::new(
            |downloaded: u64, total: u64| {
                if total > 0 {
                    eprint!("\rDownloading model: {downloaded}/{total} bytes");
                }
            },
        ));
    }

    let artifacts = resolver.resolve()?;
    let engine = OnnxInferenceEngine::load(&artifacts, config.input_size)?;
    Ok(Arc::new(SsdFaceDetector::new(config, Arc::new(engine))))
}

fn build_executor(workers: usize) -> Box<dyn DetectionExecutor> {
    if workers > 1 {
        Box::new(ThreadedDetectionExecutor::new(workers))
    } else {
        Box::new(SequentialDetectionExecutor::new())
    }
}

fn write_text(
    out: &mut impl Write,
    paths: &[PathBuf],
    results: &[FrameDetections],
) -> io::Result<()> {
    for result in results {
        let path = display_path(paths, result.index);
        if result.detections.is_empty() {
            writeln!(out, "{path}: no faces")?;
            continue;
        }
        writeln!(
            out,
            "{path}: {} face(s) in {}x{}",
            result.detections.len(),
            result.width,
            result.height
        )?;
        for b in &result.detections {
            writeln!(out, "  x={} y={} w={} h={}", b.x, b.y, b.width, b.height)?;
        }
    }
    Ok(())
}

fn write_json(
    out: &mut impl Write,
    paths: &[PathBuf],
    results: &[FrameDetections],
) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": display_path(paths, r.index),
                "width": r.width,
                "height": r.height,
                "faces": r.detections,
            })
        })
        .collect();
    writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}

fn display_path(paths: &[PathBuf], index: usize) -> String {
    paths
        .get(index)
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
