pub mod color;
pub mod config;
pub mod error;
pub mod network;

pub use color::{ColorClassifier, ColorName, ColorReport, HsiColor, RgbColor};
pub use config::Configuration;
pub use error::{AppError, ColorError};
pub use network::{AppState, Server};
