use axum::{routing::delete, routing::get, routing::post, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn users() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(handlers::create_user))
        .route("/api/users/:id", get(handlers::get_user))
        .route(
            "/api/users/:id/interactions",
            get(handlers::list_user_interactions),
        )
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/api/posts", post(handlers::create_post))
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/user/:user_id", get(handlers::list_user_posts))
        .route("/api/posts/:id", get(handlers::get_post))
        .route("/api/posts/:id", put(handlers::update_post))
        .route("/api/posts/:id", delete(handlers::delete_post))
        .route("/api/posts/:id/like", post(handlers::like_post))
        .route("/api/posts/:id/likes", get(handlers::list_post_likes))
        .route(
            "/api/posts/:id/interactions",
            get(handlers::list_post_interactions),
        )
        .route("/api/posts/:id/comments", post(handlers::comment_post))
        .route("/api/posts/:id/comments", get(handlers::list_post_comments))
}

pub fn comments() -> Router<AppState> {
    Router::new()
        .route("/api/comments/:id", put(handlers::update_comment))
        .route("/api/comments/:id", delete(handlers::delete_comment))
}
