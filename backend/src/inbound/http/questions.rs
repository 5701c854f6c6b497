//! Question API handlers.
//!
//! ```text
//! GET    /api/v1/users/{user_id}/questions
//! POST   /api/v1/users/{user_id}/questions                    {"message":"...","signature":"Grace"}
//! PUT    /api/v1/users/{user_id}/questions/{question_id}      {"reply":"..."}
//! PUT    /api/v1/users/{user_id}/questions/{question_id}/fav
//! DELETE /api/v1/users/{user_id}/questions/{question_id}
//! ```
//!
//! Asking and listing are anonymous. Reply, favourite, and delete require a
//! bearer credential naming the user the question was addressed to.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Question};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_question_id, parse_question_text, parse_signature, parse_user_id,
};

/// Body of `POST /api/v1/users/{user_id}/questions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub message: String,
    /// Omitted or empty for an anonymous question.
    #[serde(default)]
    pub signature: Option<String>,
}

/// Body of `PUT /api/v1/users/{user_id}/questions/{question_id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub reply: String,
}

/// List every question addressed to the user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/questions",
    params(("user_id" = String, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Questions", body = [Question]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "listQuestions",
    security([])
)]
#[get("/users/{user_id}/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Question>>> {
    let target_user_id = parse_user_id(&path.into_inner())?;
    let questions = state.questions_query.list_questions(&target_user_id).await?;
    Ok(web::Json(questions))
}

/// Ask a user a question, signed or anonymous.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/questions",
    params(("user_id" = String, Path, description = "Target user id")),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Question stored", body = Question),
        (status = 400, description = "Invalid request or unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "askQuestion",
    security([])
)]
#[post("/users/{user_id}/questions")]
pub async fn ask_question(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AskRequest>,
) -> ApiResult<web::Json<Question>> {
    let target_user_id = parse_user_id(&path.into_inner())?;
    let AskRequest { message, signature } = payload.into_inner();
    let message = parse_question_text(message, FieldName::new("message"))?;
    let signature = parse_signature(signature.as_deref())?;
    let question = state
        .questions
        .ask(&target_user_id, message, signature)
        .await?;
    Ok(web::Json(question))
}

/// Answer a question. A question is answered at most once.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/questions/{question_id}",
    params(
        ("user_id" = String, Path, description = "Target user id"),
        ("question_id" = String, Path, description = "Question id")
    ),
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Reply stored"),
        (status = 400, description = "Invalid request, or the question is missing or already answered", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the addressee", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "replyQuestion",
    security(("BearerAuth" = []))
)]
#[put("/users/{user_id}/questions/{question_id}")]
pub async fn reply_question(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<ReplyRequest>,
) -> ApiResult<HttpResponse> {
    let (target_user_id, question_id) = path.into_inner();
    let target_user_id = parse_user_id(&target_user_id)?;
    let question_id = parse_question_id(&question_id)?;
    let reply = parse_question_text(payload.into_inner().reply, FieldName::new("reply"))?;
    state
        .questions
        .reply(auth.principal(), &target_user_id, question_id, reply)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Mark a question as a favourite.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/questions/{question_id}/fav",
    params(
        ("user_id" = String, Path, description = "Target user id"),
        ("question_id" = String, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question marked as favourite"),
        (status = 400, description = "Invalid request, or the question is missing", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the addressee", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "favouriteQuestion",
    security(("BearerAuth" = []))
)]
#[put("/users/{user_id}/questions/{question_id}/fav")]
pub async fn favourite_question(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (target_user_id, question_id) = path.into_inner();
    let target_user_id = parse_user_id(&target_user_id)?;
    let question_id = parse_question_id(&question_id)?;
    state
        .questions
        .mark_favourite(auth.principal(), &target_user_id, question_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a question.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/questions/{question_id}",
    params(
        ("user_id" = String, Path, description = "Target user id"),
        ("question_id" = String, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question deleted"),
        (status = 400, description = "Invalid request, or the question is missing", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the addressee", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion",
    security(("BearerAuth" = []))
)]
#[delete("/users/{user_id}/questions/{question_id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (target_user_id, question_id) = path.into_inner();
    let target_user_id = parse_user_id(&target_user_id)?;
    let question_id = parse_question_id(&question_id)?;
    state
        .questions
        .delete_question(auth.principal(), &target_user_id, question_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
