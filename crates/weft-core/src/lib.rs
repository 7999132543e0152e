// Core modules
pub mod build;
pub mod error;
pub mod manifest;
pub mod template;

// Re-export commonly used types
pub use error::{Result, WeftError};
