use crate::{
    error::AppResult,
    models::{post, Category, CategoryModel, Post, PostModel, User, UserModel},
};
use rand::seq::SliceRandom;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

/// Published post with its category and author attached.
#[derive(Debug, Clone)]
pub struct PublicPost {
    pub post: PostModel,
    pub category: Option<CategoryModel>,
    pub author: Option<UserModel>,
}

/// Detail page payload. `post` is `None` when the slug is unknown, and an
/// empty model and "not found" are the same condition.
#[derive(Debug, Clone, Default)]
pub struct PostDetail {
    pub post: Option<PublicPost>,
    pub related: Vec<PublicPost>,
}

const RELATED_POST_COUNT: usize = 4;

/// Read side of the blog: published posts only.
pub struct PostService {
    db: DatabaseConnection,
}

impl PostService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn published(category: Option<i16>) -> Select<Post> {
        let mut query = Post::find().filter(post::Column::IsPublished.eq(true));
        if let Some(category_id) = category {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }
        query
    }

    /// Batch-attach category and author rows to fetched posts.
    async fn attach(&self, posts: Vec<PostModel>) -> AppResult<Vec<PublicPost>> {
        let categories = posts.load_one(Category, &self.db).await?;
        let authors = posts.load_one(User, &self.db).await?;

        Ok(posts
            .into_iter()
            .zip(categories)
            .zip(authors)
            .map(|((post, category), author)| PublicPost {
                post,
                category,
                author,
            })
            .collect())
    }

    /// Up to `count` featured posts in random order. When fewer featured
    /// posts exist, the remainder is topped up from non-featured published
    /// posts, shuffled and appended after the featured ones.
    pub async fn featured(&self, count: u64, category: Option<i16>) -> AppResult<Vec<PublicPost>> {
        let mut picked = Self::published(category)
            .filter(post::Column::IsFeatured.eq(true))
            .all(&self.db)
            .await?;
        picked.shuffle(&mut rand::rng());
        picked.truncate(count as usize);

        if picked.len() < count as usize {
            let mut rest = Self::published(category)
                .filter(post::Column::IsFeatured.eq(false))
                .all(&self.db)
                .await?;
            rest.shuffle(&mut rand::rng());
            rest.truncate(count as usize - picked.len());
            picked.extend(rest);
        }

        self.attach(picked).await
    }

    /// Top `count` posts by view count, most viewed first.
    pub async fn popular(&self, count: u64, category: Option<i16>) -> AppResult<Vec<PublicPost>> {
        let posts = Self::published(category)
            .order_by_desc(post::Column::ViewCount)
            .limit(count)
            .all(&self.db)
            .await?;

        self.attach(posts).await
    }

    /// Top `count` posts by publish time, newest first.
    pub async fn latest(&self, count: u64, category: Option<i16>) -> AppResult<Vec<PublicPost>> {
        let posts = Self::published(category)
            .order_by_desc(post::Column::PublishedAt)
            .limit(count)
            .all(&self.db)
            .await?;

        self.attach(posts).await
    }

    /// Page `page_index` (0-based) of published posts, newest first.
    pub async fn list(
        &self,
        page_index: u64,
        page_size: u64,
        category: Option<i16>,
    ) -> AppResult<Vec<PublicPost>> {
        let posts = Self::published(category)
            .order_by_desc(post::Column::PublishedAt)
            .offset(page_index * page_size)
            .limit(page_size)
            .all(&self.db)
            .await?;

        self.attach(posts).await
    }

    /// Single published post by slug, bundled with up to four random other
    /// published posts from the same category.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<PostDetail> {
        let found = Self::published(None)
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;

        let post = match found {
            Some(post) => post,
            None => return Ok(PostDetail::default()),
        };

        let mut related = Self::published(Some(post.category_id))
            .filter(post::Column::Id.ne(post.id))
            .all(&self.db)
            .await?;
        related.shuffle(&mut rand::rng());
        related.truncate(RELATED_POST_COUNT);

        let post = self.attach(vec![post]).await?.pop();
        let related = self.attach(related).await?;

        Ok(PostDetail { post, related })
    }
}
