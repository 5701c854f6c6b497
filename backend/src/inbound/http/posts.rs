//! Post API handlers.
//!
//! ```text
//! GET    /api/v1/users/{user_id}/posts
//! POST   /api/v1/users/{user_id}/posts            {"title":"Hello","content":"..."}
//! PUT    /api/v1/users/{user_id}/posts/{post_id}  {"title":"Hello","content":"..."}
//! DELETE /api/v1/users/{user_id}/posts/{post_id}
//! ```
//!
//! Writes require a bearer credential naming the owner in the path.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_post_draft, parse_post_id, parse_user_id};

/// Title and body of a post, used for both create and update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

/// List the owner's live posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/posts",
    params(("user_id" = String, Path, description = "Owner id")),
    responses(
        (status = 200, description = "Live posts", body = [Post]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/users/{user_id}/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Post>>> {
    let owner_id = parse_user_id(&path.into_inner())?;
    let posts = state.posts_query.list_posts(&owner_id).await?;
    Ok(web::Json(posts))
}

/// Publish a post on the caller's own profile.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/posts",
    params(("user_id" = String, Path, description = "Owner id")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost",
    security(("BearerAuth" = []))
)]
#[post("/users/{user_id}/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<Post>> {
    let owner_id = parse_user_id(&path.into_inner())?;
    let PostRequest { title, content } = payload.into_inner();
    let draft = parse_post_draft(&title, &content)?;
    let post = state
        .posts
        .create_post(auth.principal(), &owner_id, draft)
        .await?;
    Ok(web::Json(post))
}

/// Replace the title and body of a live post.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/posts/{post_id}",
    params(
        ("user_id" = String, Path, description = "Owner id"),
        ("post_id" = String, Path, description = "Post id")
    ),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated"),
        (status = 400, description = "Invalid request, or the post is missing or deleted", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost",
    security(("BearerAuth" = []))
)]
#[put("/users/{user_id}/posts/{post_id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let (owner_id, post_id) = path.into_inner();
    let owner_id = parse_user_id(&owner_id)?;
    let post_id = parse_post_id(&post_id)?;
    let PostRequest { title, content } = payload.into_inner();
    let draft = parse_post_draft(&title, &content)?;
    state
        .posts
        .update_post(auth.principal(), &owner_id, post_id, draft)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Soft-delete a live post.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/posts/{post_id}",
    params(
        ("user_id" = String, Path, description = "Owner id"),
        ("post_id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 400, description = "Invalid request, or the post is missing or deleted", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost",
    security(("BearerAuth" = []))
)]
#[delete("/users/{user_id}/posts/{post_id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (owner_id, post_id) = path.into_inner();
    let owner_id = parse_user_id(&owner_id)?;
    let post_id = parse_post_id(&post_id)?;
    state
        .posts
        .delete_post(auth.principal(), &owner_id, post_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
