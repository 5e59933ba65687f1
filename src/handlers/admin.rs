use crate::error::{AppError, AppResult};
use crate::handlers::post::PostCategoryResponse;
use crate::middleware::auth::{require_admin, AuthUser};
use crate::models::{PostModel, SubscriptionModel};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::post_admin::{PostAdminService, PostInput, PostWithCategory};
use crate::services::subscription::SubscriptionService;
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SavePostRequest {
    /// Post ID (omit or 0 to create)
    pub id: Option<i32>,
    /// Post title (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// Cover image URL (max 100 characters)
    #[validate(length(max = 100))]
    pub image: Option<String>,
    /// Short introduction (1-500 characters)
    #[validate(length(min = 1, max = 500))]
    pub introduction: String,
    /// Post body HTML
    #[validate(length(min = 1))]
    pub content: String,
    /// Category ID
    #[validate(range(min = 1))]
    pub category_id: i16,
    /// Published state
    #[serde(default)]
    pub is_published: bool,
    /// Featured on the home page
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPostResponse {
    /// Post ID
    pub id: i32,
    /// Post title
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Short introduction
    pub introduction: String,
    /// Post body HTML as stored
    pub content: String,
    /// Category ID
    pub category_id: i16,
    /// Category of the post
    pub category: Option<PostCategoryResponse>,
    /// Author user ID
    pub user_id: i32,
    /// View count
    pub view_count: i32,
    /// Published state
    pub is_published: bool,
    /// Featured on the home page
    pub is_featured: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Publish timestamp
    pub published_at: Option<String>,
}

impl From<PostModel> for AdminPostResponse {
    fn from(p: PostModel) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            image: p.image,
            introduction: p.introduction,
            content: p.content,
            category_id: p.category_id,
            category: None,
            user_id: p.user_id,
            view_count: p.view_count,
            is_published: p.is_published,
            is_featured: p.is_featured,
            created_at: p.created_at.to_string(),
            published_at: p.published_at.map(|t| t.to_string()),
        }
    }
}

impl From<PostWithCategory> for AdminPostResponse {
    fn from(p: PostWithCategory) -> Self {
        let mut response = Self::from(p.post);
        response.category = p.category.map(|c| PostCategoryResponse {
            id: c.id,
            name: c.name,
            slug: c.slug,
        });
        response
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    /// Subscription ID
    pub id: i64,
    /// Subscriber email
    pub email: String,
    /// Subscriber name
    pub name: String,
    /// Subscription timestamp
    pub subscribed_on: String,
}

impl From<SubscriptionModel> for SubscriptionResponse {
    fn from(s: SubscriptionModel) -> Self {
        Self {
            id: s.id,
            email: s.email,
            name: s.name,
            subscribed_on: s.subscribed_on.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/posts",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "All posts, newest first", body = PaginatedResponse<AdminPostResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_admin_posts(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = PostAdminService::new(db);
    let paged = service.list(params.offset(), params.per_page()).await?;
    let response: PaginatedResponse<AdminPostResponse> =
        PaginatedResponse::from_paged(paged, params.page(), params.per_page());

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/posts/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = AdminPostResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_admin_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = PostAdminService::new(db);
    let post = service.get_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::ok(AdminPostResponse::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/posts",
    security(("jwt_token" = [])),
    request_body = SavePostRequest,
    responses(
        (status = 200, description = "Post saved", body = AdminPostResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Title already taken", body = AppError),
    ),
    tag = "admin"
)]
pub async fn save_admin_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<SavePostRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let author_id = require_admin(&db, &auth_user).await?;

    let service = PostAdminService::new(db);
    let post = service
        .save(
            PostInput {
                id: payload.id.unwrap_or(0),
                title: payload.title,
                image: payload.image,
                introduction: payload.introduction,
                content: payload.content,
                category_id: payload.category_id,
                is_published: payload.is_published,
                is_featured: payload.is_featured,
            },
            author_id,
        )
        .await?;

    Ok(ApiResponse::ok(AdminPostResponse::from(post)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/subscriptions",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Subscriptions, newest first", body = PaginatedResponse<SubscriptionResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_subscriptions(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = SubscriptionService::new(db);
    let paged = service.list(params.offset(), params.per_page()).await?;
    let response: PaginatedResponse<SubscriptionResponse> =
        PaginatedResponse::from_paged(paged, params.page(), params.per_page());

    Ok(ApiResponse::ok(response))
}
