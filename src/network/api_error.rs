use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::ColorError;

/// Failures at the HTTP boundary. Only this type knows about status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Empty file")]
    EmptyUpload,
    /// An extractor or the multipart stream refused the request; keeps axum's status.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error(transparent)]
    Color(#[from] ColorError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::MissingFile
            | ApiError::EmptyUpload
            | ApiError::Color(ColorError::UnsupportedFormat) => StatusCode::BAD_REQUEST,
            ApiError::Color(ColorError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Color(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Color(ColorError::NotFound(path)) => {
                format!("Image not found at {}", path.display())
            }
            _ if self.status().is_server_error() => format!("Error processing image: {self}"),
            _ => self.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: format!("Invalid multipart body: {}", rejection.body_text()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Rejected {
            status: err.status(),
            detail: format!("Invalid multipart body: {}", err.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("Request failed: {}", detail);
        } else {
            warn!("Rejected request ({}): {}", status, detail);
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyUpload.status(), StatusCode::BAD_REQUEST);
        let unsupported = ApiError::from(ColorError::UnsupportedFormat);
        assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unsupported.detail(), "Unsupported file format");
    }

    #[test]
    fn missing_path_maps_to_not_found() {
        let err = ApiError::from(ColorError::NotFound(PathBuf::from("/srv/x.png")));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "Image not found at /srv/x.png");
    }

    #[test]
    fn processing_errors_map_to_internal_error() {
        let err = ApiError::from(ColorError::NoProcessablePixels);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail(),
            "Error processing image: Could not process image pixels"
        );
        let err = ApiError::from(ColorError::InvalidRange { r: 300, g: 0, b: 0 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejections_keep_their_status_and_text() {
        let err = ApiError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: "Invalid multipart body: too large".to_string(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.detail(), "Invalid multipart body: too large");
    }
}
