//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod posts;
pub mod questions;
pub mod state;
pub mod token_config;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor settings reporting unreadable bodies as domain errors.
///
/// Without this a malformed body would produce Actix's plain-text `400`
/// instead of the usual error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("request body is not valid JSON: {err}")).into()
    })
}

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use preguntame::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(users::register)
        .service(users::login)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(questions::list_questions)
        .service(questions::ask_question)
        .service(questions::favourite_question)
        .service(questions::reply_question)
        .service(questions::delete_question);
}
