pub mod classifier;
pub mod hsi;
pub mod service;
pub mod types;

pub use classifier::{ColorClassifier, ColorReport};
pub use hsi::{color_name, rgb_to_hsi};
pub use service::{ClassifyRequest, ColorClassificationService, ImageSource};
pub use types::{ColorName, HsiColor, RgbColor};
