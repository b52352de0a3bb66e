pub mod blob_builder;
pub mod color_space_converter;
pub mod detection_decoder;
pub mod detection_error;
pub mod face_detector;
pub mod inference_engine;
pub mod result_ranker;
pub mod ssd_face_detector;
