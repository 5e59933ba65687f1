use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public = public_routes(&rate_limit_config);
    let admin = admin_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public).merge(admin)
}

/// Auth routes: login.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new().route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public routes: category and published-post reads, plus subscribe.
fn public_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        .route(
            "/categories/{slug}",
            routing::get(handlers::category::get_category),
        )
        // Posts
        .route("/posts", routing::get(handlers::post::list_posts))
        .route(
            "/posts/featured",
            routing::get(handlers::post::featured_posts),
        )
        .route(
            "/posts/popular",
            routing::get(handlers::post::popular_posts),
        )
        .route("/posts/latest", routing::get(handlers::post::latest_posts))
        .route("/posts/{slug}", routing::get(handlers::post::get_post))
        // Subscriptions
        .route(
            "/subscriptions",
            routing::post(handlers::subscription::subscribe),
        );

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Admin routes: everything behind the JWT middleware. The role check itself
/// happens in the handlers.
fn admin_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        // Categories (create / update)
        .route(
            "/categories",
            routing::post(handlers::category::save_category),
        )
        // Posts, drafts included
        .route(
            "/admin/posts",
            routing::get(handlers::admin::list_admin_posts)
                .post(handlers::admin::save_admin_post),
        )
        .route(
            "/admin/posts/{id}",
            routing::get(handlers::admin::get_admin_post),
        )
        // Subscriptions
        .route(
            "/admin/subscriptions",
            routing::get(handlers::admin::list_subscriptions),
        )
        // Upload
        .route(
            "/admin/uploads",
            routing::post(handlers::upload::upload_post_image),
        );

    with_optional_rate_limit(router, config.enabled, config.admin)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
