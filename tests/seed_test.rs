mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Mutex;

// SEED_ADMIN_* is process-wide state, so the seeding tests take turns.
static SEED_ENV: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn seed_creates_admin_and_ten_categories() {
    let app = common::spawn_app().await;

    let _guard = SEED_ENV.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("SEED_ADMIN_NAME", "Site Admin");
    std::env::set_var("SEED_ADMIN_EMAIL", "seed-admin@test.com");
    std::env::set_var("SEED_ADMIN_PASSWORD", "seed_password_123");

    inkpress::services::seed::run(&app.db).await.unwrap();

    let admin = inkpress::models::User::find()
        .filter(inkpress::models::user::Column::Email.eq("seed-admin@test.com"))
        .one(&app.db)
        .await
        .unwrap()
        .expect("Seeded admin missing");
    assert_eq!(admin.role, inkpress::models::user::ADMIN_ROLE);

    let categories = inkpress::models::Category::find().all(&app.db).await.unwrap();
    assert_eq!(categories.len(), 10);

    let technology = categories.iter().find(|c| c.name == "Technology").unwrap();
    assert_eq!(technology.slug, "technology");
    assert!(technology.visible_on_navbar);
    let health = categories.iter().find(|c| c.name == "Health").unwrap();
    assert!(!health.visible_on_navbar);

    // Running again changes nothing
    inkpress::services::seed::run(&app.db).await.unwrap();
    let users = inkpress::models::User::find().count(&app.db).await.unwrap();
    assert_eq!(users, 1);
    let categories = inkpress::models::Category::find().count(&app.db).await.unwrap();
    assert_eq!(categories, 10);

    // The seeded admin can actually log in
    let token = common::login(&app, "seed-admin@test.com", "seed_password_123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn seed_promotes_existing_account() {
    let app = common::spawn_app().await;
    let (user_id, _) = common::create_user(&app, "author@test.com").await;

    let _guard = SEED_ENV.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("SEED_ADMIN_NAME", "Site Admin");
    std::env::set_var("SEED_ADMIN_EMAIL", "author@test.com");
    std::env::set_var("SEED_ADMIN_PASSWORD", "irrelevant_password_1");

    inkpress::services::seed::run(&app.db).await.unwrap();

    let users = inkpress::models::User::find().count(&app.db).await.unwrap();
    assert_eq!(users, 1);
    let promoted = inkpress::models::User::find_by_id(user_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promoted.role, inkpress::models::user::ADMIN_ROLE);
}

#[tokio::test]
async fn seed_without_env_skips_admin_but_seeds_categories() {
    let app = common::spawn_app().await;

    let _guard = SEED_ENV.lock().unwrap_or_else(|e| e.into_inner());
    std::env::remove_var("SEED_ADMIN_NAME");
    std::env::remove_var("SEED_ADMIN_EMAIL");
    std::env::remove_var("SEED_ADMIN_PASSWORD");

    inkpress::services::seed::run(&app.db).await.unwrap();

    let users = inkpress::models::User::find().count(&app.db).await.unwrap();
    assert_eq!(users, 0);
    let categories = inkpress::models::Category::find().count(&app.db).await.unwrap();
    assert_eq!(categories, 10);
}

#[tokio::test]
async fn seed_leaves_existing_admin_alone() {
    let app = common::spawn_app().await;
    let (admin_id, _) = common::create_admin(&app).await;

    let _guard = SEED_ENV.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("SEED_ADMIN_NAME", "Site Admin");
    std::env::set_var("SEED_ADMIN_EMAIL", "seed-admin@test.com");
    std::env::set_var("SEED_ADMIN_PASSWORD", "seed_password_123");

    inkpress::services::seed::run(&app.db).await.unwrap();

    // An admin already existed, so no account is created for the env email
    let users = inkpress::models::User::find().all(&app.db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, admin_id);
}
