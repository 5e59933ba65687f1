use crate::{
    error::{AppError, AppResult},
    models::{category, Category, CategoryModel},
    utils::slugify,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Save payload for a category. `id == 0` means create.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub id: i16,
    pub name: String,
    pub visible_on_navbar: bool,
}

pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        Ok(Category::find().all(&self.db).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<CategoryModel>> {
        Ok(Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    /// Create or update a category.
    ///
    /// The slug is derived from the name once at creation and kept on every
    /// later save, so renaming a category does not move its public URL.
    pub async fn save(&self, input: CategoryInput) -> AppResult<CategoryModel> {
        if input.id == 0 {
            self.create(input).await
        } else {
            self.update(input).await
        }
    }

    async fn create(&self, input: CategoryInput) -> AppResult<CategoryModel> {
        let duplicate = Category::find()
            .filter(category::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(format!(
                "Category with the name \"{}\" already exists",
                input.name
            )));
        }

        let new_category = category::ActiveModel {
            name: sea_orm::ActiveValue::Set(input.name.clone()),
            slug: sea_orm::ActiveValue::Set(slugify(&input.name)),
            visible_on_navbar: sea_orm::ActiveValue::Set(input.visible_on_navbar),
            ..Default::default()
        };

        Ok(new_category.insert(&self.db).await?)
    }

    async fn update(&self, input: CategoryInput) -> AppResult<CategoryModel> {
        let duplicate = Category::find()
            .filter(category::Column::Name.eq(&input.name))
            .filter(category::Column::Id.ne(input.id))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(format!(
                "Category with the name \"{}\" already exists",
                input.name
            )));
        }

        let existing = Category::find_by_id(input.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: category::ActiveModel = existing.into();
        active.name = sea_orm::ActiveValue::Set(input.name);
        active.visible_on_navbar = sea_orm::ActiveValue::Set(input.visible_on_navbar);

        Ok(active.update(&self.db).await?)
    }
}
