#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::Once;

static INIT: Once = Once::new();

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Deterministic responses regardless of request pacing
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        // Emails stay no-ops no matter what the host environment has
        std::env::remove_var("SMTP_HOST");
        let config = inkpress::config::jwt::JwtConfig::from_env().unwrap();
        let _ = inkpress::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

/// Spawn the API against a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    init_env();

    // A single pooled connection keeps the in-memory database alive and
    // shared across the whole test app.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);

    let db = sea_orm::Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    inkpress::migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let upload_config = inkpress::services::upload::UploadConfig {
        upload_dir: "./test_uploads".to_string(),
    };
    let email_service = inkpress::services::email::EmailService::from_env();

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(inkpress::routes::create_routes())
        .layer(axum::extract::DefaultBodyLimit::max(6 * 1024 * 1024))
        .layer(axum::middleware::from_fn(
            inkpress::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(upload_config))
        .layer(axum::extract::Extension(email_service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

/// Insert an admin account directly and log in. Returns (user_id, token).
pub async fn create_admin(app: &TestApp) -> (i32, String) {
    let admin = inkpress::models::user::ActiveModel {
        name: sea_orm::ActiveValue::Set("Admin".to_string()),
        email: sea_orm::ActiveValue::Set("admin@test.com".to_string()),
        password_hash: sea_orm::ActiveValue::Set(
            inkpress::utils::hash_password("admin_password_123").expect("Failed to hash password"),
        ),
        role: sea_orm::ActiveValue::Set(inkpress::models::user::ADMIN_ROLE.to_string()),
        created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let admin = admin.insert(&app.db).await.expect("Failed to insert admin");

    let token = login(app, "admin@test.com", "admin_password_123").await;
    (admin.id, token)
}

/// Insert a regular (non-admin) account and log in. Returns (user_id, token).
pub async fn create_user(app: &TestApp, email: &str) -> (i32, String) {
    let user = inkpress::models::user::ActiveModel {
        name: sea_orm::ActiveValue::Set("Reader".to_string()),
        email: sea_orm::ActiveValue::Set(email.to_string()),
        password_hash: sea_orm::ActiveValue::Set(
            inkpress::utils::hash_password("user_password_123").expect("Failed to hash password"),
        ),
        role: sea_orm::ActiveValue::Set("user".to_string()),
        created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let user = user.insert(&app.db).await.expect("Failed to insert user");

    let token = login(app, email, "user_password_123").await;
    (user.id, token)
}

/// Log in over HTTP and return the bearer token.
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Login failed: status={}, body={}", status, body);
    }

    body["data"]["token"]
        .as_str()
        .expect("Response missing token field")
        .to_string()
}

/// Create a category through the API and return its id.
pub async fn create_category(app: &TestApp, token: &str, name: &str) -> i16 {
    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "name": name,
            "visible_on_navbar": true
        }))
        .send()
        .await
        .expect("Failed to create category");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse category response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create category: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("Response missing id field") as i16
}

/// Set a post's view count directly. The API never mutates view counts.
pub async fn set_view_count(db: &DatabaseConnection, slug: &str, count: i32) {
    use sea_orm::{ConnectionTrait, Statement};

    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        "UPDATE posts SET view_count = ? WHERE slug = ?",
        vec![count.into(), slug.into()],
    ))
    .await
    .expect("Failed to set view count");
}

/// Create a post through the admin API and return the response data.
pub async fn create_post(
    app: &TestApp,
    token: &str,
    category_id: i16,
    title: &str,
    published: bool,
    featured: bool,
) -> serde_json::Value {
    let resp = app
        .client
        .post(app.url("/admin/posts"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "introduction": format!("Introduction for {}", title),
            "content": format!("<p>Content for {}</p>", title),
            "category_id": category_id,
            "is_published": published,
            "is_featured": featured,
        }))
        .send()
        .await
        .expect("Failed to create post");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse post response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create post: status={}, body={}", status, body);
    }

    body["data"].clone()
}
