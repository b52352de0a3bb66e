pub mod capture_error;
pub mod image_file_reader;
pub mod screenshot_store;
