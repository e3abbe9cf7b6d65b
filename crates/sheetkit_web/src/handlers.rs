use std::time::Instant;

use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::Json;
use axum::response::{Html, IntoResponse, Response};
use sheetkit_proc::{EnumProcessMode, SpecProcessOutput};
use tracing::info;

use crate::error::EnumWebError;
use crate::state::AppState;
use crate::templates::{IndexTemplate, UploadTemplate};

/// Multipart field carrying the upload.
pub const C_FIELD_FILE: &str = "file";

/// File taken from an upload form.
#[derive(Debug)]
pub struct SpecUpload {
    pub filename: String,
    pub v_bytes: Vec<u8>,
}

pub async fn index() -> Result<Html<String>, EnumWebError> {
    Ok(Html(IndexTemplate::default().render()?))
}

pub async fn option1_page() -> Result<Html<String>, EnumWebError> {
    Ok(Html(UploadTemplate::for_option(1, "/upload1").render()?))
}

pub async fn option2_page() -> Result<Html<String>, EnumWebError> {
    Ok(Html(UploadTemplate::for_option(2, "/upload2").render()?))
}

pub async fn upload_masking(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, EnumWebError> {
    let upload = read_upload(multipart).await?;
    run_processing(&state, EnumProcessMode::Mask, upload).await
}

pub async fn upload_split(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, EnumWebError> {
    let upload = read_upload(multipart).await?;
    run_processing(&state, EnumProcessMode::Split, upload).await
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "sheetkit",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Take the first `file` field of the form.
///
/// Other fields are skipped. A `file` field with an empty file name means
/// the form was submitted without choosing a file.
pub async fn read_upload(mut multipart: Multipart) -> Result<SpecUpload, EnumWebError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(C_FIELD_FILE) {
            continue;
        }
        let c_filename = field.file_name().unwrap_or_default().to_string();
        if c_filename.is_empty() {
            return Err(EnumWebError::NoSelectedFile);
        }
        let v_bytes = field.bytes().await?.to_vec();
        return Ok(SpecUpload {
            filename: c_filename,
            v_bytes,
        });
    }
    Err(EnumWebError::NoFilePart)
}

/// Run the processor off the async workers and wrap the result as a download.
async fn run_processing(
    state: &AppState,
    mode: EnumProcessMode,
    upload: SpecUpload,
) -> Result<Response, EnumWebError> {
    let t_start = Instant::now();
    let SpecUpload { filename, v_bytes } = upload;
    let n_bytes_in = v_bytes.len();
    let processor = state.processor.clone();

    let output = tokio::task::spawn_blocking(move || processor.process(mode, &v_bytes)).await??;

    info!(
        mode = mode.as_str(),
        filename = %filename,
        bytes_in = n_bytes_in,
        bytes_out = output.v_bytes.len(),
        sheets = output.n_sheets,
        elapsed_ms = t_start.elapsed().as_millis() as u64,
        "upload processed"
    );

    Ok(derive_attachment_response(output))
}

fn derive_attachment_response(output: SpecProcessOutput) -> Response {
    let c_disposition = format!("attachment; filename=\"{}\"", output.download_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, output.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, c_disposition),
        ],
        output.v_bytes,
    )
        .into_response()
}
