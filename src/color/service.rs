use std::{
    future::Future,
    path::PathBuf,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use tower::{Service, limit::ConcurrencyLimit};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use super::classifier::{ColorClassifier, ColorReport};
use crate::error::ColorError;

/// Where the bytes of an image come from.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn into_bytes(self: Box<Self>) -> Result<Vec<u8>, ColorError>;

    fn describe(&self) -> String;
}

/// Bytes received over the wire.
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl ImageSource for UploadedImage {
    async fn into_bytes(self: Box<Self>) -> Result<Vec<u8>, ColorError> {
        Ok(self.bytes)
    }

    fn describe(&self) -> String {
        format!("upload '{}' ({} bytes)", self.filename, self.bytes.len())
    }
}

/// A file on the server's own filesystem.
pub struct LocalImage {
    pub path: PathBuf,
}

#[async_trait]
impl ImageSource for LocalImage {
    async fn into_bytes(self: Box<Self>) -> Result<Vec<u8>, ColorError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| ColorError::from_io(&self.path, e))
    }

    fn describe(&self) -> String {
        format!("path {}", self.path.display())
    }
}

pub struct ClassifyRequest {
    id: Uuid,
    source: Box<dyn ImageSource>,
}

impl ClassifyRequest {
    pub fn new(source: Box<dyn ImageSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
        }
    }

    pub fn upload(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(Box::new(UploadedImage {
            filename: filename.into(),
            bytes,
        }))
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(LocalImage { path: path.into() }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Runs [`ColorClassifier`] off the async executor.
#[derive(Clone)]
pub struct ColorClassificationService {
    classifier: Arc<ColorClassifier>,
}

impl ColorClassificationService {
    pub fn new(classifier: ColorClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// Caps how many classifications may decode at once. Clones share the same permits.
    pub fn limited(classifier: ColorClassifier, max_concurrent: usize) -> ConcurrencyLimit<Self> {
        ConcurrencyLimit::new(Self::new(classifier), max_concurrent)
    }
}

impl Service<ClassifyRequest> for ColorClassificationService {
    type Response = ColorReport;
    type Error = ColorError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), ColorError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ClassifyRequest) -> Self::Future {
        let classifier = self.classifier.clone();
        let span = info_span!("classify", request_id = %request.id);

        Box::pin(
            async move {
                debug!("Reading {}", request.source.describe());
                let bytes = request.source.into_bytes().await?;
                tokio::task::spawn_blocking(move || classifier.classify(&bytes))
                    .await
                    .map_err(|e| ColorError::Worker(e.to_string()))?
            }
            .instrument(span),
        )
    }
}
