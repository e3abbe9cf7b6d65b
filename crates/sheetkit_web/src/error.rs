//! Request failures and their HTTP mapping.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sheetkit_proc::EnumProcessError;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum EnumWebError {
    /// Form carries no `file` field.
    #[error("No file part")]
    NoFilePart,
    /// `file` field is present but no file was chosen.
    #[error("No selected file")]
    NoSelectedFile,
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Process(#[from] EnumProcessError),
    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
    #[error("processing task failed: {0}")]
    Join(#[from] JoinError),
}

impl EnumWebError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile => StatusCode::BAD_REQUEST,
            Self::Multipart(err) => err.status(),
            Self::Process(EnumProcessError::Parse(_)) => StatusCode::BAD_REQUEST,
            Self::Process(EnumProcessError::Schema { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Process(_) | Self::Render(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EnumWebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
            (status, "Internal server error").into_response()
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
            (status, self.to_string()).into_response()
        }
    }
}
