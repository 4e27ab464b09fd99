use std::convert::Infallible;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::extraction::extract_blocking;
use crate::middleware::cors_layer;
use crate::models::{AckResponse, AnalyzeResponse, AppState, UploadedDocument};
use crate::types::{AppError, AppResult};

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_bytes;

    // OPTIONS is answered by the handler itself rather than the CORS layer
    let analyze = post(analyze_document)
        .layer::<_, Infallible>(cors_layer())
        .options(analyze_options);

    Router::new()
        .route("/analyze/", analyze.clone())
        .route("/analyze", analyze)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn analyze_options() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
        Json(AckResponse {
            message: "OK".to_string(),
        }),
    )
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidRequest(e.body_text())
    }
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> AppResult<UploadedDocument> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidRequest("file field has no filename".to_string()))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedDocument { filename, bytes });
    }

    Err(AppError::InvalidRequest(format!(
        "multipart body has no '{}' field",
        FILE_FIELD
    )))
}

async fn analyze_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let upload = read_upload(&mut multipart).await?;
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "Document received");

    state.uploads.save(&upload.filename, &upload.bytes).await?;

    let text = extract_blocking(
        upload.bytes,
        upload.filename.clone(),
        state.config.upload.unsupported_extension_policy,
    )
    .await?;

    let analysis = state.completion.analyze(&text).await;
    info!(
        filename = %upload.filename,
        key_clauses = analysis.key_clauses.len(),
        risks = analysis.risks.len(),
        next_steps = analysis.next_steps.len(),
        "Analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        filename: upload.filename,
        analysis,
    }))
}
