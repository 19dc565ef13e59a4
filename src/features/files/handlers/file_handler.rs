use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{FileResponseDto, UploadFileDto};
use crate::features::files::services::FileService;
use crate::shared::types::ApiResponse;

/// Upload an evidence image
///
/// Accepts multipart/form-data with a single `file` field. Returns the
/// opaque storage path to reference from report or completion `images`.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Image upload form with a single `file` field",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing, oversized or non-image file"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let ct = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        file_data = Some(data.to_vec());
        content_type = Some(ct);
    }

    let (data, content_type) = match (file_data, content_type) {
        (Some(d), Some(ct)) => (d, ct),
        _ => {
            return Err(AppError::BadRequest(
                "Missing 'file' field in multipart data".to_string(),
            ))
        }
    };

    let file = service.store_image(&content_type, &data, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(file), None)),
    ))
}
