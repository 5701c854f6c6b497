//! Bearer authentication for HTTP handlers.
//!
//! [`Authenticated`] is an extractor: a handler that names it in its
//! signature never runs unless the `Authorization` header resolves to a
//! principal. Every failure maps to the same `401` body so callers cannot
//! tell a forged credential from an expired one.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{error, warn};

use crate::domain::{AuthError, Error, Principal};

use super::state::HttpState;

const UNAUTHORISED_MESSAGE: &str = "invalid or missing credential";

/// Principal resolved from the request's bearer credential.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl Authenticated {
    /// The resolved caller.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn map_auth_error(error: AuthError) -> Error {
    warn!(%error, "rejected request credential");
    Error::unauthorized(UNAUTHORISED_MESSAGE)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HTTP state missing from application data");
        return Err(Error::internal("HTTP state is not configured"));
    };
    // A header that is not visible ASCII cannot carry a valid credential.
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| map_auth_error(AuthError::MalformedScheme))?,
        ),
        None => None,
    };
    state
        .resolver
        .resolve(header)
        .map(Authenticated)
        .map_err(map_auth_error)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::web::Bytes;
    use actix_web::{App, HttpResponse, test};
    use chrono::{TimeDelta, Utc};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, TestAccount};
    use crate::test_support::clock::MutableClock;

    async fn whoami(
        account: &TestAccount,
        clock: Arc<MutableClock>,
        header: Option<String>,
    ) -> (StatusCode, Bytes) {
        let state = MockPorts::default().into_state(account.codec(clock));
        let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
            "/whoami",
            web::get().to(|auth: Authenticated| async move {
                HttpResponse::Ok().body(auth.principal().id().to_string())
            }),
        ))
        .await;
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(header) = header {
            req = req.insert_header((AUTHORIZATION, header));
        }
        let res = test::call_service(&app, req.to_request()).await;
        (res.status(), test::read_body(res).await)
    }

    fn error_message(body: &Bytes) -> Option<String> {
        let value: Value = serde_json::from_slice(body).ok()?;
        value.get("message").and_then(Value::as_str).map(str::to_owned)
    }

    #[actix_web::test]
    async fn valid_bearer_credential_reaches_handler() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let account = TestAccount::new();
        let credential = account.credential(clock.clone());

        let (status, body) = whoami(&account, clock, Some(format!("Bearer {credential}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, account.user().id().to_string());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("Basic abc".to_owned()))]
    #[case(Some("Bearer not.a.credential".to_owned()))]
    #[actix_web::test]
    async fn unusable_headers_are_unauthorised(#[case] header: Option<String>) {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let (status, body) = whoami(&TestAccount::new(), clock, header).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body).as_deref(), Some(UNAUTHORISED_MESSAGE));
    }

    #[actix_web::test]
    async fn expired_credential_gets_the_same_response() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let account = TestAccount::new();
        let credential = account.credential(clock.clone());
        clock.advance(TimeDelta::hours(24));

        let (status, body) = whoami(&account, clock, Some(format!("Bearer {credential}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body).as_deref(), Some(UNAUTHORISED_MESSAGE));
    }
}
