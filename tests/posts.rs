//! Post CRUD and listing tests
//!
//! Covers post creation, reading, updating, deleting, and the ordered
//! listing endpoints.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

use atelier::app::posts::PostService;

// ===========================================================================
// Post creation
// ===========================================================================

#[tokio::test]
async fn create_post_valid() {
    let app = app().await;
    let user = app.create_user("post_create").await;

    let resp = app
        .post_json(
            &format!("/api/posts?user_id={}", user.id),
            json!({ "title": "Sourdough basics", "description": "Starter care and first loaf." }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert!(body["id"].is_i64());
    assert_eq!(body["user_id"].as_i64().unwrap(), user.id);
    assert_eq!(body["author_name"].as_str().unwrap(), user.name);
    assert_eq!(body["title"].as_str().unwrap(), "Sourdough basics");
    assert_eq!(body["like_count"].as_i64().unwrap(), 0);
    assert_eq!(body["comment_count"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn create_post_empty_title() {
    let app = app().await;
    let user = app.create_user("post_notitle").await;

    let resp = app
        .post_json(
            &format!("/api/posts?user_id={}", user.id),
            json!({ "title": "   ", "description": "body" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "title is required");
}

#[tokio::test]
async fn create_post_title_too_long() {
    let app = app().await;
    let user = app.create_user("post_longtitle").await;

    let resp = app
        .post_json(
            &format!("/api/posts?user_id={}", user.id),
            json!({ "title": "a".repeat(201), "description": "body" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "title must be at most 200 characters");
}

#[tokio::test]
async fn create_post_unknown_user() {
    let app = app().await;

    let resp = app
        .post_json(
            "/api/posts?user_id=999999999",
            json!({ "title": "ghost", "description": "no such author" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "unknown user_id");
}

// ===========================================================================
// Reading
// ===========================================================================

#[tokio::test]
async fn get_post() {
    let app = app().await;
    let user = app.create_user("post_get").await;
    let post_id = app.create_post_for_user(user.id).await;

    let resp = app.get(&format!("/api/posts/{}", post_id)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["id"].as_i64().unwrap(), post_id);
    assert_eq!(body["user_id"].as_i64().unwrap(), user.id);
}

#[tokio::test]
async fn get_nonexistent_post() {
    let app = app().await;

    let resp = app.get("/api/posts/999999999").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "post not found");
}

// ===========================================================================
// Updating & deleting
// ===========================================================================

#[tokio::test]
async fn update_post() {
    let app = app().await;
    let user = app.create_user("post_update").await;
    let post_id = app.create_post_for_user(user.id).await;

    let resp = app
        .put_json(
            &format!("/api/posts/{}?user_id={}", post_id, user.id),
            json!({ "title": "Updated title", "description": "Updated description" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["title"].as_str().unwrap(), "Updated title");
    assert_eq!(body["description"].as_str().unwrap(), "Updated description");
}

#[tokio::test]
async fn update_post_wrong_user() {
    let app = app().await;
    let user_a = app.create_user("post_update_a").await;
    let user_b = app.create_user("post_update_b").await;
    let post_id = app.create_post_for_user(user_a.id).await;

    let resp = app
        .put_json(
            &format!("/api/posts/{}?user_id={}", post_id, user_b.id),
            json!({ "title": "Hijacked", "description": "not yours" }),
        )
        .await;

    // Ownership enforced — returns 404 (not 403) to avoid leaking existence
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_post() {
    let app = app().await;
    let user = app.create_user("post_delete").await;
    let post_id = app.create_post_for_user(user.id).await;

    let resp = app
        .delete(&format!("/api/posts/{}?user_id={}", post_id, user.id))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_post_wrong_user() {
    let app = app().await;
    let user_a = app.create_user("post_delete_a").await;
    let user_b = app.create_user("post_delete_b").await;
    let post_id = app.create_post_for_user(user_a.id).await;

    let resp = app
        .delete(&format!("/api/posts/{}?user_id={}", post_id, user_b.id))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    // Post untouched
    let resp = app.get(&format!("/api/posts/{}", post_id)).await;
    assert_eq!(resp.status, StatusCode::OK);
}

// ===========================================================================
// Listings & ordering
// ===========================================================================

#[tokio::test]
async fn list_user_posts_contains_all_owned() {
    let app = app().await;
    let user = app.create_user("post_list_owned").await;
    let other = app.create_user("post_list_other").await;

    let first = app.create_post_for_user(user.id).await;
    let second = app.create_post_for_user(user.id).await;
    app.create_post_for_user(other.id).await;

    let resp = app.get(&format!("/api/posts/user/{}", user.id)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let ids: Vec<i64> = resp.json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
}

#[tokio::test]
async fn list_user_posts_newest_first() {
    let app = app().await;
    let user = app.create_user("post_list_order").await;

    let oldest = app.create_post_aged(user.id, 120).await;
    let newest = app.create_post_aged(user.id, 0).await;
    let middle = app.create_post_aged(user.id, 60).await;

    let resp = app.get(&format!("/api/posts/user/{}", user.id)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let ids: Vec<i64> = resp.json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![newest, middle, oldest]);
}

#[tokio::test]
async fn list_all_posts_newest_first_across_users() {
    let app = app().await;
    let user_a = app.create_user("post_global_a").await;
    let user_b = app.create_user("post_global_b").await;

    let older = app.create_post_aged(user_a.id, 300).await;
    let newer = app.create_post_aged(user_b.id, 240).await;

    let resp = app.get("/api/posts").await;

    assert_eq!(resp.status, StatusCode::OK);
    let ids: Vec<i64> = resp.json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();

    let newer_pos = ids.iter().position(|&id| id == newer).unwrap();
    let older_pos = ids.iter().position(|&id| id == older).unwrap();
    assert!(newer_pos < older_pos);
}

#[tokio::test]
async fn list_posts_unknown_user_is_empty() {
    let app = app().await;

    let resp = app.get("/api/posts/user/999999999").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unordered_list_by_user_includes_every_post() {
    let app = app().await;
    let user = app.create_user("post_svc_list").await;
    let first = app.create_post_aged(user.id, 30).await;
    let second = app.create_post_for_user(user.id).await;

    let service = PostService::new(app.state.db.clone());
    let posts = service.list_by_user(user.id).await.unwrap();

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
}

#[tokio::test]
async fn post_embeds_engagement_counts() {
    let app = app().await;
    let author = app.create_user("post_counts_author").await;
    let fan = app.create_user("post_counts_fan").await;
    let post_id = app.create_post_for_user(author.id).await;

    app.create_interaction(fan.id, post_id, "like").await;
    app.create_comment(fan.id, post_id, "nice loaf").await;

    let resp = app.get(&format!("/api/posts/{}", post_id)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["like_count"].as_i64().unwrap(), 1);
    assert_eq!(body["comment_count"].as_i64().unwrap(), 1);
}
