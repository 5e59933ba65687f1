mod common;

use serde_json::Value;

#[tokio::test]
async fn get_post_detail_with_related_posts() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;
    let travel = common::create_category(&app, &token, "Travel").await;

    let main = common::create_post(&app, &token, tech, "Main Story", true, false).await;
    for n in 1..=4 {
        common::create_post(&app, &token, tech, &format!("Tech Story {}", n), true, false).await;
    }
    // Neither drafts nor other categories belong in the related list
    common::create_post(&app, &token, tech, "Tech Draft", false, false).await;
    common::create_post(&app, &token, travel, "Travel Story", true, false).await;

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", main["slug"].as_str().unwrap())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    let post = &body["data"]["post"];
    assert_eq!(post["title"], "Main Story");
    assert_eq!(post["author_name"], "Admin");
    assert_eq!(post["category"]["name"], "Tech");
    assert!(post["published_at"].is_string());

    let related = body["data"]["related"].as_array().unwrap();
    assert_eq!(related.len(), 4);
    let mut titles: Vec<&str> = related
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    assert_eq!(
        titles,
        vec![
            "Tech Story 1",
            "Tech Story 2",
            "Tech Story 3",
            "Tech Story 4"
        ]
    );
}

#[tokio::test]
async fn get_post_sanitizes_stored_html() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;

    let resp = app
        .client
        .post(app.url("/admin/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "Scripted",
            "introduction": "An intro",
            "content": "<p>Safe</p><script>alert(1)</script>",
            "category_id": tech,
            "is_published": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    // Admins see what is stored
    assert!(body["data"]["content"]
        .as_str()
        .unwrap()
        .contains("<script>"));
    let slug = body["data"]["slug"].as_str().unwrap().to_string();

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", slug)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let html = body["data"]["post"]["content_html"].as_str().unwrap();
    assert!(html.contains("<p>Safe</p>"));
    assert!(!html.contains("<script"));
}

#[tokio::test]
async fn get_post_missing_slug_is_not_found() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/posts/missing-slug"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn get_post_draft_is_not_found() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;
    let draft = common::create_post(&app, &token, tech, "Hidden Draft", false, false).await;

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", draft["slug"].as_str().unwrap())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn latest_orders_by_publish_time() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;

    for n in 1..=3 {
        common::create_post(&app, &token, tech, &format!("Story {}", n), true, false).await;
    }

    let resp = app
        .client
        .get(app.url("/posts/latest?count=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Story 3");
    assert_eq!(items[1]["title"], "Story 2");
}

#[tokio::test]
async fn popular_orders_by_view_count() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;

    common::create_post(&app, &token, tech, "Quiet", true, false).await;
    common::create_post(&app, &token, tech, "Loud", true, false).await;
    common::create_post(&app, &token, tech, "Middling", true, false).await;
    common::set_view_count(&app.db, "quiet", 5).await;
    common::set_view_count(&app.db, "loud", 50).await;
    common::set_view_count(&app.db, "middling", 20).await;

    let resp = app
        .client
        .get(app.url("/posts/popular?count=3"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    let titles: Vec<&str> = items.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Loud", "Middling", "Quiet"]);
}

#[tokio::test]
async fn featured_tops_up_from_non_featured() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;

    common::create_post(&app, &token, tech, "Featured A", true, true).await;
    common::create_post(&app, &token, tech, "Featured B", true, true).await;
    for n in 1..=10 {
        common::create_post(&app, &token, tech, &format!("Filler {}", n), true, false).await;
    }

    let resp = app
        .client
        .get(app.url("/posts/featured?count=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 5);

    let mut slugs: Vec<&str> = items.iter().map(|p| p["slug"].as_str().unwrap()).collect();
    assert!(slugs.contains(&"featured-a"));
    assert!(slugs.contains(&"featured-b"));
    slugs.sort_unstable();
    slugs.dedup();
    assert_eq!(slugs.len(), 5);
}

#[tokio::test]
async fn feeds_filter_by_category() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;
    let travel = common::create_category(&app, &token, "Travel").await;

    common::create_post(&app, &token, tech, "Tech One", true, false).await;
    common::create_post(&app, &token, tech, "Tech Two", true, false).await;
    common::create_post(&app, &token, travel, "Travel One", true, false).await;

    let resp = app
        .client
        .get(app.url(&format!("/posts/latest?count=10&category={}", travel)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Travel One");

    let resp = app
        .client
        .get(app.url(&format!("/posts?category={}", tech)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // No filter: everything published
    let resp = app.client.get(app.url("/posts")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn public_list_pages_published_posts() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_admin(&app).await;
    let tech = common::create_category(&app, &token, "Tech").await;

    for n in 1..=3 {
        common::create_post(&app, &token, tech, &format!("Story {}", n), true, false).await;
    }
    common::create_post(&app, &token, tech, "Invisible Draft", false, false).await;

    let resp = app
        .client
        .get(app.url("/posts?page=2&per_page=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    // Three published posts: page two of size two holds the oldest one
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Story 1");
}
