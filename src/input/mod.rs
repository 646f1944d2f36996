//! Input processing module
//! Turns job description and resume files into plain text

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
