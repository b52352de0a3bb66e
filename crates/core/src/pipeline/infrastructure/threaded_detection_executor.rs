use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::detection_executor::{
    detect_timed, record, BatchError, DetectionExecutor, FrameDetections, FrameSink, FrameSource,
};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// No frame has failed yet.
const NO_FAILURE: usize = usize::MAX;

type WorkerResult = (usize, Result<(Frame, FrameDetections), BatchError>, f64);

/// Detects frames on a pool of worker threads sharing one detector.
///
/// Layout: `feeder (reads frames) → [workers] → collector (caller thread)`
///
/// Both channels are bounded, so at most a few frames per worker are decoded
/// at any time. The collector hands each frame to the sink, restores input
/// order and reports to the logger.
///
/// Once a frame fails, frames after it in batch order are skipped, but the
/// ones before it still run. The error returned is therefore the one for the
/// earliest failing frame, the same one a sequential run would report.
pub struct ThreadedDetectionExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedDetectionExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedDetectionExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl DetectionExecutor for ThreadedDetectionExecutor {
    fn execute(
        &self,
        detector: Arc<dyn FaceDetector>,
        frames: FrameSource<'_>,
        sink: &mut FrameSink<'_>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Vec<FrameDetections>, BatchError> {
        let total = frames.len();
        let failed_at = AtomicUsize::new(NO_FAILURE);
        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<(usize, Frame)>(self.channel_capacity);
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<WorkerResult>(self.channel_capacity);

        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                let frame_rx = frame_rx.clone();
                let result_tx = result_tx.clone();
                let detector = detector.as_ref();
                let failed_at = &failed_at;
                scope.spawn(move || {
                    for (position, frame) in frame_rx {
                        if position > failed_at.load(Ordering::Acquire) {
                            continue;
                        }
                        let (result, ms) = detect_timed(detector, &frame);
                        if result.is_err() {
                            failed_at.fetch_min(position, Ordering::AcqRel);
                        }
                        let result = result.map(|d| (frame, d)).map_err(BatchError::from);
                        if result_tx.send((position, result, ms)).is_err() {
                            break;
                        }
                    }
                });
            }
            // The feeder takes the last result sender, so the collector's
            // loop ends once the feeder and every worker have exited.
            drop(frame_rx);

            let failed_at_ref = &failed_at;
            scope.spawn(move || {
                for (position, frame) in frames.enumerate() {
                    if position > failed_at_ref.load(Ordering::Acquire) {
                        break;
                    }
                    match frame {
                        Ok(frame) => {
                            if frame_tx.send((position, frame)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            failed_at_ref.fetch_min(position, Ordering::AcqRel);
                            let _ = result_tx.send((position, Err(e.into()), 0.0));
                            break;
                        }
                    }
                }
            });

            collect(result_rx, total, &failed_at, sink, logger)
        })
    }
}

fn collect(
    result_rx: Receiver<WorkerResult>,
    total: usize,
    failed_at: &AtomicUsize,
    sink: &mut FrameSink<'_>,
    logger: &mut dyn PipelineLogger,
) -> Result<Vec<FrameDetections>, BatchError> {
    let mut completed = BTreeMap::new();
    let mut earliest_error: Option<(usize, BatchError)> = None;

    for (position, result, ms) in result_rx {
        if result.is_ok() && position > failed_at.load(Ordering::Acquire) {
            continue;
        }
        let outcome = result.and_then(|(frame, detections)| {
            record(logger, &detections, ms);
            sink(&frame, &detections)?;
            Ok(detections)
        });
        match outcome {
            Ok(detections) => {
                completed.insert(position, detections);
                logger.progress(completed.len(), total);
            }
            Err(e) => {
                failed_at.fetch_min(position, Ordering::AcqRel);
                if earliest_error.as_ref().map_or(true, |(p, _)| position < *p) {
                    earliest_error = Some((position, e));
                }
            }
        }
    }

    match earliest_error {
        Some((_, e)) => Err(e),
        None => Ok(completed.into_values().collect()),
    }
}
