pub mod bounding_box;
pub mod constants;
pub mod detection_set;
pub mod detector_config;
pub mod frame;
pub mod model_resolver;
