use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, AuthUser};
use crate::models::CategoryModel;
use crate::response::ApiResponse;
use crate::services::category::{CategoryInput, CategoryService};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveCategoryRequest {
    /// Category ID (omit or 0 to create)
    pub id: Option<i16>,
    /// Category name (1-50 characters)
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// Show this category in the navigation bar
    #[serde(default)]
    pub visible_on_navbar: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// Category ID
    pub id: i16,
    /// Category name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Visible in the navigation bar
    pub visible_on_navbar: bool,
}

impl From<CategoryModel> for CategoryResponse {
    fn from(c: CategoryModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            visible_on_navbar: c.visible_on_navbar,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "List all categories", body = Vec<CategoryResponse>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = CategoryService::new(db);
    let categories = service.list().await?;
    let response: Vec<CategoryResponse> =
        categories.into_iter().map(CategoryResponse::from).collect();
    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn get_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = CategoryService::new(db);
    let category = service.get_by_slug(&slug).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(CategoryResponse::from(category)))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    security(("jwt_token" = [])),
    request_body = SaveCategoryRequest,
    responses(
        (status = 200, description = "Category saved", body = CategoryResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Name already taken", body = AppError),
    ),
    tag = "categories"
)]
pub async fn save_category(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<SaveCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    require_admin(&db, &auth_user).await?;

    let service = CategoryService::new(db);
    let category = service
        .save(CategoryInput {
            id: payload.id.unwrap_or(0),
            name: payload.name,
            visible_on_navbar: payload.visible_on_navbar,
        })
        .await?;

    Ok(ApiResponse::ok(CategoryResponse::from(category)))
}
