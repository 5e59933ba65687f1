use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, AuthUser};
use crate::response::ApiResponse;
use crate::services::upload::{UploadConfig, UploadService};
use axum::{extract::Multipart, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL path of the stored image
    pub url: String,
}

/// Upload a post cover image (multipart form: field "file").
#[utoipa::path(
    post,
    path = "/api/v1/admin/uploads",
    security(("jwt_token" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing or invalid file", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 413, description = "File too large", body = AppError),
    ),
    tag = "admin"
)]
pub async fn upload_post_image(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

    let url = UploadService::save_post_image(&config, &data, &content_type).await?;

    Ok(ApiResponse::ok(UploadResponse { url }))
}
