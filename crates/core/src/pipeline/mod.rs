pub mod detect_frames_use_case;
pub mod detection_executor;
pub mod infrastructure;
pub mod pipeline_logger;

#[cfg(test)]
mod test_support;
