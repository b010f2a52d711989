use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::interactions::{InteractionService, LikeOutcome};
use crate::app::posts::PostService;
use crate::app::users::UserService;
use crate::domain::interaction::{Comment, InteractionType, PostInteraction};
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::http::AppError;
use crate::AppState;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_COMMENT_LEN: usize = 1000;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Caller identity arrives as an explicit query parameter; there is no token
/// layer at this surface.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct KindQuery {
    pub kind: Option<String>,
}

fn parse_kind(kind: &str) -> Result<InteractionType, AppError> {
    InteractionType::from_db(kind)
        .ok_or_else(|| AppError::bad_request("kind must be 'like' or 'comment'"))
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request("name must be at most 100 characters"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("a valid email is required"));
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(AppError::bad_request("email must be at most 254 characters"));
    }

    let service = UserService::new(state.db.clone());
    let user = service.create_user(name, email).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to create user");
        AppError::internal("failed to create user")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::conflict("email already registered")),
    }
}

pub async fn get_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service.get_user(id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = id, "failed to fetch user");
        AppError::internal("failed to fetch user")
    })?;

    user.map(Json).ok_or_else(|| AppError::not_found("user not found"))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub description: String,
}

fn validate_post_payload(payload: &PostRequest) -> Result<(), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    if payload.title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::bad_request("title must be at most 200 characters"));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::bad_request("description is required"));
    }
    if payload.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::bad_request(
            "description must be at most 5000 characters",
        ));
    }
    Ok(())
}

pub async fn create_post(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<Post>, AppError> {
    validate_post_payload(&payload)?;

    let service = PostService::new(state.db.clone());
    let post = service
        .create(query.user_id, payload.title, payload.description)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = query.user_id, "failed to create post");
            AppError::internal("failed to create post")
        })?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::bad_request("unknown user_id")),
    }
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let service = PostService::new(state.db.clone());
    let posts = service.list_newest_first().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list posts");
        AppError::internal("failed to list posts")
    })?;

    Ok(Json(posts))
}

pub async fn list_user_posts(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    let service = PostService::new(state.db.clone());
    let posts = service
        .list_by_user_newest_first(user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id, "failed to list user posts");
            AppError::internal("failed to list user posts")
        })?;

    Ok(Json(posts))
}

pub async fn get_post(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    post.map(Json).ok_or_else(|| AppError::not_found("post not found"))
}

pub async fn update_post(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<Post>, AppError> {
    validate_post_payload(&payload)?;

    let service = PostService::new(state.db.clone());
    let post = service
        .update(id, query.user_id, payload.title, payload.description)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, user_id = query.user_id, "failed to update post");
            AppError::internal("failed to update post")
        })?;

    // Ownership enforced — a wrong owner sees 404, not 403
    post.map(Json).ok_or_else(|| AppError::not_found("post not found"))
}

pub async fn delete_post(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.db.clone());
    let deleted = service.delete(id, query.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, user_id = query.user_id, "failed to delete post");
        AppError::internal("failed to delete post")
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post not found"))
    }
}

// ---------------------------------------------------------------------------
// Likes & interactions
// ---------------------------------------------------------------------------

pub async fn like_post(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<LikeOutcome>, AppError> {
    let service = InteractionService::new(state.db.clone());
    let outcome = service
        .toggle_like(query.user_id, id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, user_id = query.user_id, "failed to toggle like");
            AppError::internal("failed to toggle like")
        })?;

    match outcome {
        Some(outcome) => Ok(Json(outcome)),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn list_post_likes(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PostInteraction>>, AppError> {
    let service = InteractionService::new(state.db.clone());
    let likes = service
        .list_by_post_and_type(id, InteractionType::Like)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, "failed to list likes");
            AppError::internal("failed to list likes")
        })?;

    Ok(Json(likes))
}

pub async fn list_post_interactions(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> Result<Json<Vec<PostInteraction>>, AppError> {
    let service = InteractionService::new(state.db.clone());
    let interactions = match query.kind.as_deref() {
        Some(kind) => {
            let kind = parse_kind(kind)?;
            service.list_by_post_and_type(id, kind).await
        }
        None => service.list_by_post(id).await,
    }
    .map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to list interactions");
        AppError::internal("failed to list interactions")
    })?;

    Ok(Json(interactions))
}

pub async fn list_user_interactions(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> Result<Json<Vec<PostInteraction>>, AppError> {
    let kind = query
        .kind
        .as_deref()
        .ok_or_else(|| AppError::bad_request("kind query parameter is required"))?;
    let kind = parse_kind(kind)?;

    let service = InteractionService::new(state.db.clone());
    let interactions = service
        .list_by_user_and_type(id, kind)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = id, "failed to list user interactions");
            AppError::internal("failed to list user interactions")
        })?;

    Ok(Json(interactions))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

fn validate_comment_payload(payload: &CommentRequest) -> Result<(), AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::bad_request("comment content cannot be empty"));
    }
    if payload.content.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request(
            "comment content must be at most 1000 characters",
        ));
    }
    Ok(())
}

pub async fn comment_post(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    validate_comment_payload(&payload)?;

    let service = InteractionService::new(state.db.clone());
    let comment = service
        .add_comment(query.user_id, id, payload.content)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, user_id = query.user_id, "failed to comment");
            AppError::internal("failed to comment")
        })?;

    match comment {
        Some(comment) => Ok(Json(comment)),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn list_post_comments(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let service = InteractionService::new(state.db.clone());
    let comments = service.list_comments(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to list comments");
        AppError::internal("failed to list comments")
    })?;

    Ok(Json(comments))
}

pub async fn update_comment(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    validate_comment_payload(&payload)?;

    let service = InteractionService::new(state.db.clone());
    let comment = service
        .update_comment(id, query.user_id, payload.content)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, comment_id = id, user_id = query.user_id, "failed to update comment");
            AppError::internal("failed to update comment")
        })?;

    comment
        .map(Json)
        .ok_or_else(|| AppError::not_found("comment not found"))
}

pub async fn delete_comment(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let service = InteractionService::new(state.db.clone());
    let deleted = service
        .delete_comment(id, query.user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, comment_id = id, user_id = query.user_id, "failed to delete comment");
            AppError::internal("failed to delete comment")
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("comment not found"))
    }
}
