use crate::error::AppResult;
use crate::models::{category, user, Category, User};
use crate::utils::{hash_password, slugify};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use std::env;

#[derive(Debug, Clone)]
pub struct SeedAdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SeedAdminConfig {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            name: env::var("SEED_ADMIN_NAME").ok()?,
            email: env::var("SEED_ADMIN_EMAIL").ok()?,
            password: env::var("SEED_ADMIN_PASSWORD").ok()?,
        })
    }
}

/// Categories inserted into an empty table, with their navbar visibility.
const SEED_CATEGORIES: &[(&str, bool)] = &[
    ("Technology", true),
    ("Travel", true),
    ("Food", true),
    ("Fitness", true),
    ("Fashion", true),
    ("Health", false),
    ("Finance", false),
    ("Entertainment", true),
    ("Lifestyle", false),
    ("Education", false),
];

/// Startup seeding: an admin account and a non-empty category set.
pub async fn run(db: &DatabaseConnection) -> AppResult<()> {
    ensure_admin(db).await?;
    seed_categories(db).await?;
    Ok(())
}

/// Ensure an admin account exists:
/// - any admin already present: nothing to do
/// - configured email already registered: promote that account to admin
/// - otherwise create the account from the SEED_ADMIN_* env vars
pub async fn ensure_admin(db: &DatabaseConnection) -> AppResult<()> {
    let admin_exists = User::find()
        .filter(user::Column::Role.eq(user::ADMIN_ROLE))
        .one(db)
        .await?
        .is_some();
    if admin_exists {
        return Ok(());
    }

    let Some(cfg) = SeedAdminConfig::from_env() else {
        tracing::warn!(
            "No admin account exists and SEED_ADMIN_* is unset; admin endpoints stay unusable"
        );
        return Ok(());
    };

    let existing = User::find()
        .filter(user::Column::Email.eq(cfg.email.clone()))
        .one(db)
        .await?;

    if let Some(account) = existing {
        let email = account.email.clone();
        let mut active: user::ActiveModel = account.into();
        active.role = sea_orm::ActiveValue::Set(user::ADMIN_ROLE.to_string());
        active.update(db).await?;
        tracing::info!(%email, "Promoted existing account to admin");
        return Ok(());
    }

    let password_hash = hash_password(&cfg.password)?;

    let new_user = user::ActiveModel {
        name: sea_orm::ActiveValue::Set(cfg.name),
        email: sea_orm::ActiveValue::Set(cfg.email),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        role: sea_orm::ActiveValue::Set(user::ADMIN_ROLE.to_string()),
        created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    new_user.insert(db).await?;
    tracing::info!("Seeded admin account");

    Ok(())
}

/// Insert the fixed category list when the table is empty.
pub async fn seed_categories(db: &DatabaseConnection) -> AppResult<()> {
    let count = Category::find().count(db).await?;
    if count > 0 {
        return Ok(());
    }

    for (name, visible_on_navbar) in SEED_CATEGORIES {
        let new_category = category::ActiveModel {
            name: sea_orm::ActiveValue::Set((*name).to_string()),
            slug: sea_orm::ActiveValue::Set(slugify(name)),
            visible_on_navbar: sea_orm::ActiveValue::Set(*visible_on_navbar),
            ..Default::default()
        };
        new_category.insert(db).await?;
    }

    tracing::info!(count = SEED_CATEGORIES.len(), "Seeded categories");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_absent_when_env_unset() {
        std::env::remove_var("SEED_ADMIN_NAME");
        std::env::remove_var("SEED_ADMIN_EMAIL");
        std::env::remove_var("SEED_ADMIN_PASSWORD");
        assert!(SeedAdminConfig::from_env().is_none());
    }

    #[test]
    fn seed_list_has_no_duplicate_names() {
        let mut names: Vec<&str> = SEED_CATEGORIES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SEED_CATEGORIES.len());
    }
}
