//! Input loading module
//! Reads plain-text documents and JSON-encoded CVs, job offers and skill results

pub mod file_detector;
pub mod manager;

pub use manager::InputManager;
