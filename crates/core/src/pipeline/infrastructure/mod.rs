pub mod sequential_detection_executor;
pub mod threaded_detection_executor;
