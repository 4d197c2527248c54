//! Input handling for resume and job description text
//! Covers file type detection, text extraction and inline text

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{InputManager, InputSource};
