use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::post::{PostService, PublicPost};
use crate::utils::sanitize_html;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DEFAULT_FEED_COUNT: u64 = 5;
const MAX_FEED_COUNT: u64 = 50;

/// Query for the featured/popular/latest feeds.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedQuery {
    pub count: Option<u64>,
    pub category: Option<i16>,
}

impl FeedQuery {
    fn count(&self) -> u64 {
        self.count
            .unwrap_or(DEFAULT_FEED_COUNT)
            .clamp(1, MAX_FEED_COUNT)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category: Option<i16>,
}

impl PostListQuery {
    fn pagination(&self) -> crate::response::PaginationQuery {
        crate::response::PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostCategoryResponse {
    /// Category ID
    pub id: i16,
    /// Category name
    pub name: String,
    /// Category slug
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicPostResponse {
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
    /// Sanitized post body HTML
    pub content_html: String,
    /// View count
    pub view_count: i32,
    /// Publish timestamp
    pub published_at: Option<String>,
    /// Category of the post
    pub category: Option<PostCategoryResponse>,
    /// Author display name
    pub author_name: Option<String>,
}

impl From<PublicPost> for PublicPostResponse {
    fn from(p: PublicPost) -> Self {
        Self {
            id: p.post.id,
            title: p.post.title,
            slug: p.post.slug,
            image: p.post.image,
            introduction: p.post.introduction,
            content_html: sanitize_html(&p.post.content),
            view_count: p.post.view_count,
            published_at: p.post.published_at.map(|t| t.to_string()),
            category: p.category.map(|c| PostCategoryResponse {
                id: c.id,
                name: c.name,
                slug: c.slug,
            }),
            author_name: p.author.map(|a| a.name),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetailResponse {
    /// The requested post
    pub post: PublicPostResponse,
    /// Up to four other posts from the same category
    pub related: Vec<PublicPostResponse>,
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/featured",
    params(
        ("count" = Option<u64>, Query, description = "Number of posts (default 5, max 50)"),
        ("category" = Option<i16>, Query, description = "Restrict to one category"),
    ),
    responses(
        (status = 200, description = "Featured posts in random order, topped up from non-featured ones", body = Vec<PublicPostResponse>),
    ),
    tag = "posts"
)]
pub async fn featured_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    let posts = service.featured(params.count(), params.category).await?;
    let response: Vec<PublicPostResponse> =
        posts.into_iter().map(PublicPostResponse::from).collect();
    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/popular",
    params(
        ("count" = Option<u64>, Query, description = "Number of posts (default 5, max 50)"),
        ("category" = Option<i16>, Query, description = "Restrict to one category"),
    ),
    responses(
        (status = 200, description = "Most viewed posts", body = Vec<PublicPostResponse>),
    ),
    tag = "posts"
)]
pub async fn popular_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    let posts = service.popular(params.count(), params.category).await?;
    let response: Vec<PublicPostResponse> =
        posts.into_iter().map(PublicPostResponse::from).collect();
    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/latest",
    params(
        ("count" = Option<u64>, Query, description = "Number of posts (default 5, max 50)"),
        ("category" = Option<i16>, Query, description = "Restrict to one category"),
    ),
    responses(
        (status = 200, description = "Most recently published posts", body = Vec<PublicPostResponse>),
    ),
    tag = "posts"
)]
pub async fn latest_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    let posts = service.latest(params.count(), params.category).await?;
    let response: Vec<PublicPostResponse> =
        posts.into_iter().map(PublicPostResponse::from).collect();
    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("category" = Option<i16>, Query, description = "Restrict to one category"),
    ),
    responses(
        (status = 200, description = "One page of published posts, newest first", body = Vec<PublicPostResponse>),
    ),
    tag = "posts"
)]
pub async fn list_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PostListQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.pagination();

    let service = PostService::new(db);
    let posts = service
        .list(
            pagination.page() - 1,
            pagination.per_page(),
            params.category,
        )
        .await?;
    let response: Vec<PublicPostResponse> =
        posts.into_iter().map(PublicPostResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post detail with related posts", body = PostDetailResponse),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn get_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = PostService::new(db);
    let detail = service.get_by_slug(&slug).await?;

    let post = detail.post.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::ok(PostDetailResponse {
        post: PublicPostResponse::from(post),
        related: detail
            .related
            .into_iter()
            .map(PublicPostResponse::from)
            .collect(),
    }))
}
