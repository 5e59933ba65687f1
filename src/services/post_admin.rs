use crate::{
    error::{AppError, AppResult},
    models::{post, Category, CategoryModel, PagedResult, Post, PostModel},
    utils::slugify,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Post plus its category, the shape the admin screens work with.
#[derive(Debug, Clone)]
pub struct PostWithCategory {
    pub post: PostModel,
    pub category: Option<CategoryModel>,
}

/// Save payload for a post. `id == 0` means create.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub introduction: String,
    pub content: String,
    pub category_id: i16,
    pub is_published: bool,
    pub is_featured: bool,
}

/// Upper bound on slug de-duplication probes before giving up.
const SLUG_ATTEMPT_LIMIT: u32 = 1000;

pub struct PostAdminService {
    db: DatabaseConnection,
}

impl PostAdminService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One admin page ordered by id descending (most recently created first),
    /// plus the total post count.
    pub async fn list(
        &self,
        start_index: u64,
        page_size: u64,
    ) -> AppResult<PagedResult<PostWithCategory>> {
        let total_count = Post::find().count(&self.db).await?;

        let rows = Post::find()
            .find_also_related(Category)
            .order_by_desc(post::Column::Id)
            .offset(start_index)
            .limit(page_size)
            .all(&self.db)
            .await?;

        let records = rows
            .into_iter()
            .map(|(post, category)| PostWithCategory { post, category })
            .collect();

        Ok(PagedResult {
            records,
            total_count,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<PostWithCategory>> {
        let row = Post::find_by_id(id)
            .find_also_related(Category)
            .one(&self.db)
            .await?;

        Ok(row.map(|(post, category)| PostWithCategory { post, category }))
    }

    /// Create or update a post on behalf of `author_id`.
    ///
    /// Titles are unique across all posts. On update the slug, author,
    /// created timestamp and view count are left untouched; the published
    /// timestamp only moves on a publish-state edge (set when going
    /// unpublished to published, cleared on the way back).
    pub async fn save(&self, input: PostInput, author_id: i32) -> AppResult<PostModel> {
        if input.id == 0 {
            self.create(input, author_id).await
        } else {
            self.update(input).await
        }
    }

    async fn create(&self, input: PostInput, author_id: i32) -> AppResult<PostModel> {
        if self.title_exists(&input.title, None).await? {
            return Err(AppError::Conflict(format!(
                "Post with the title \"{}\" already exists",
                input.title
            )));
        }

        let slug = self.generate_slug(&input.title).await?;
        let now = chrono::Utc::now().naive_utc();

        let new_post = post::ActiveModel {
            title: sea_orm::ActiveValue::Set(input.title),
            slug: sea_orm::ActiveValue::Set(slug),
            image: sea_orm::ActiveValue::Set(input.image),
            introduction: sea_orm::ActiveValue::Set(input.introduction),
            content: sea_orm::ActiveValue::Set(input.content),
            category_id: sea_orm::ActiveValue::Set(input.category_id),
            user_id: sea_orm::ActiveValue::Set(author_id),
            view_count: sea_orm::ActiveValue::Set(0),
            is_published: sea_orm::ActiveValue::Set(input.is_published),
            is_featured: sea_orm::ActiveValue::Set(input.is_featured),
            created_at: sea_orm::ActiveValue::Set(now),
            published_at: sea_orm::ActiveValue::Set(input.is_published.then_some(now)),
            ..Default::default()
        };

        Ok(new_post.insert(&self.db).await?)
    }

    async fn update(&self, input: PostInput) -> AppResult<PostModel> {
        if self.title_exists(&input.title, Some(input.id)).await? {
            return Err(AppError::Conflict(format!(
                "Post with the title \"{}\" already exists",
                input.title
            )));
        }

        let existing = Post::find_by_id(input.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let was_published = existing.is_published;

        let mut active: post::ActiveModel = existing.into();
        active.title = sea_orm::ActiveValue::Set(input.title);
        active.image = sea_orm::ActiveValue::Set(input.image);
        active.introduction = sea_orm::ActiveValue::Set(input.introduction);
        active.content = sea_orm::ActiveValue::Set(input.content);
        active.category_id = sea_orm::ActiveValue::Set(input.category_id);
        active.is_published = sea_orm::ActiveValue::Set(input.is_published);
        active.is_featured = sea_orm::ActiveValue::Set(input.is_featured);

        match (was_published, input.is_published) {
            (false, true) => {
                active.published_at =
                    sea_orm::ActiveValue::Set(Some(chrono::Utc::now().naive_utc()));
            }
            (true, false) => {
                active.published_at = sea_orm::ActiveValue::Set(None);
            }
            // No edge, no timestamp change.
            _ => {}
        }

        Ok(active.update(&self.db).await?)
    }

    async fn title_exists(&self, title: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let mut query = Post::find().filter(post::Column::Title.eq(title));
        if let Some(id) = exclude_id {
            query = query.filter(post::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Probe `base`, `base-1`, `base-2`, ... until an unused slug turns up.
    async fn generate_slug(&self, title: &str) -> AppResult<String> {
        let base = slugify(title);

        let mut candidate = base.clone();
        let mut attempt = 0u32;
        while self.slug_exists(&candidate).await? {
            attempt += 1;
            if attempt > SLUG_ATTEMPT_LIMIT {
                return Err(AppError::Conflict(format!(
                    "Could not derive a unique slug for \"{}\"",
                    title
                )));
            }
            candidate = format!("{}-{}", base, attempt);
        }

        Ok(candidate)
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        Ok(Post::find()
            .filter(post::Column::Slug.eq(slug))
            .count(&self.db)
            .await?
            > 0)
    }
}
