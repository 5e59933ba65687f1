use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::email::EmailService;
use crate::services::subscription::SubscriptionService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    /// Subscriber email address
    #[validate(email, length(max = 150))]
    pub email: String,
    /// Subscriber name (1-25 characters)
    #[validate(length(min = 1, max = 25))]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed, or already subscribed"),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "subscriptions"
)]
pub async fn subscribe(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    Json(payload): Json<SubscribeRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = SubscriptionService::new(db);
    if let Some(message) = service.subscribe(&payload.email, &payload.name).await? {
        return Ok(ApiResponse::<()>::err(message));
    }

    // The subscription is stored either way; a failed email is only logged.
    if let Err(e) = email_service
        .send_subscription_confirmation(&payload.email, &payload.name)
        .await
    {
        tracing::warn!("Failed to send subscription confirmation email: {e}");
    }

    Ok(ApiResponse::with_message(
        (),
        "Subscribed successfully!".to_string(),
    ))
}
