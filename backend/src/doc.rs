//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the JSON bodies they exchange,
//! and the bearer security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::LoginResponse;
use crate::domain::{Error, ErrorCode, Post, Question, User};
use crate::inbound::http::posts::PostRequest;
use crate::inbound::http::questions::{AskRequest, ReplyRequest};
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Credential returned by POST /api/v1/users/login, sent as `Authorization: Bearer <credential>`.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Preguntame backend API",
        description = "Accounts, posts, and anonymous questions addressed to users.",
        license(name = "ISC")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::ask_question,
        crate::inbound::http::questions::reply_question,
        crate::inbound::http::questions::favourite_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Post,
        Question,
        Error,
        ErrorCode,
        LoginResponse,
        RegisterRequest,
        LoginRequest,
        PostRequest,
        AskRequest,
        ReplyRequest
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "posts", description = "Posts owned by a user"),
        (name = "questions", description = "Questions addressed to a user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
