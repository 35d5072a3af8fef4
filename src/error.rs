use std::path::PathBuf;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind to port {1}: {0}")]
    Bind(std::io::Error, u16),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Color(#[from] ColorError),
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

// Color Classification Error Type
#[derive(Error, Debug)]
pub enum ColorError {
    #[error("Unsupported file format")]
    UnsupportedFormat,
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Could not process image pixels")]
    NoProcessablePixels,
    #[error("Invalid RGB values ({r}, {g}, {b}). Values must be between 0 and 255.")]
    InvalidRange { r: i64, g: i64, b: i64 },
    #[error("Image file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read image at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Classification worker failed: {0}")]
    Worker(String),
}

impl ColorError {
    /// Maps a filesystem error for `path`, keeping "not found" distinct from other I/O failures.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ColorError::NotFound(path)
        } else {
            ColorError::Io { path, source }
        }
    }
}
