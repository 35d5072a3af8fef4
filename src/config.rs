use std::{path::Path, str::FromStr};

use image::imageops::FilterType;
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const DEFAULT_CONFIG_FILE: &str = "drishti";
const ENV_PREFIX: &str = "DRISHTI";

/// Top-level settings, layered from an optional TOML file and `DRISHTI__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub max_concurrent_classifications: usize,
}

/// Sampling parameters for the average color computation.
///
/// Changing any of these changes every downstream value, so tests pin them explicitly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub sample_width: u32,
    pub sample_height: u32,
    pub resize_filter: ResizeFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            classifier: ClassifierConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
            max_concurrent_classifications: 32,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_width: 100,
            sample_height: 100,
            resize_filter: ResizeFilter::CatmullRom,
        }
    }
}

impl Configuration {
    /// Loads settings from `path` (or `drishti.toml` in the working directory when present),
    /// then applies environment overrides such as `DRISHTI__SERVER__PORT=9000`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with_environment(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_environment(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, AppError> {
        let builder = match path {
            Some(path) => config::Config::builder().add_source(config::File::from(path)),
            None => config::Config::builder()
                .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder.add_source(environment).build()?;

        let configuration: Configuration = settings.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Rejects values the classifier or server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.classifier.sample_width == 0 || self.classifier.sample_height == 0 {
            return Err(AppError::Config(
                "Sample dimensions must be greater than 0".to_string(),
            ));
        }

        if self.server.max_concurrent_classifications == 0 {
            return Err(AppError::Config(
                "At least one concurrent classification must be allowed".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(AppError::Config(
                "Upload limit must be greater than 0".to_string(),
            ));
        }

        self.max_log_level()?;
        Ok(())
    }

    /// Parses `log_level` into a tracing level.
    pub fn max_log_level(&self) -> Result<Level, AppError> {
        Level::from_str(&self.log_level)
            .map_err(|_| AppError::Config(format!("Unknown log level '{}'", self.log_level)))
    }

    /// Overrides the loaded port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Overrides the sample grid used before averaging.
    pub fn with_sample_size(mut self, width: u32, height: u32) -> Self {
        self.classifier.sample_width = width;
        self.classifier.sample_height = height;
        self
    }
}
