//! Tests for registration and login.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockUserRepository, StoredUser};
use crate::domain::{DisplayName, Email};

const SECRET: &[u8] = b"account-service-test-secret-0123";

#[fixture]
fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(SECRET.to_vec(), Arc::new(DefaultClock)).expect("codec"))
}

fn stored_user(password: &str) -> StoredUser {
    StoredUser {
        user: User::new(
            UserId::random(),
            DisplayName::new("Ada").expect("name"),
            Email::new("a@x.com").expect("email"),
        ),
        password_hash: PasswordHash::generate(password).expect("hash"),
    }
}

fn service(repo: MockUserRepository, codec: Arc<TokenCodec>) -> AccountService<MockUserRepository> {
    AccountService::new(Arc::new(repo), codec)
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_inserts(codec: Arc<TokenCodec>) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|user, hash| user.email().as_ref() == "a@x.com" && hash.verify("Abcd1234"))
        .times(1)
        .return_once(|_, _| Ok(()));

    let registration =
        Registration::try_from_parts("Ada", "a@x.com", "Abcd1234").expect("registration");
    let user = service(repo, codec)
        .register(registration)
        .await
        .expect("register");

    assert_eq!(user.name().as_ref(), "Ada");
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_client_error(codec: Arc<TokenCodec>) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_, _| Err(UserPersistenceError::duplicate_email()));

    let registration =
        Registration::try_from_parts("Ada", "a@x.com", "Abcd1234").expect("registration");
    let err = service(repo, codec)
        .register(registration)
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "email already registered");
}

#[rstest]
#[tokio::test]
async fn login_with_correct_password_issues_verifiable_credential(codec: Arc<TokenCodec>) {
    let stored = stored_user("Abcd1234");
    let expected_id = stored.user.id().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));

    let credentials = LoginCredentials::try_from_parts("a@x.com", "Abcd1234").expect("creds");
    let response = service(repo, codec.clone())
        .login(credentials)
        .await
        .expect("login");

    let principal = codec.verify(&response.token).expect("verify");
    assert_eq!(principal.id(), &expected_id);
}

#[rstest]
#[case::wrong_password(Some("Abcd1234"), "Wrong9999")]
#[case::unknown_email(None, "Abcd1234")]
#[tokio::test]
async fn mismatched_login_is_rejected_without_credential(
    codec: Arc<TokenCodec>,
    #[case] registered_password: Option<&'static str>,
    #[case] attempt: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(registered_password.map(stored_user)));

    let credentials = LoginCredentials::try_from_parts("a@x.com", attempt).expect("creds");
    let err = service(repo, codec)
        .login(credentials)
        .await
        .expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), LOGIN_MISMATCH);
}

#[rstest]
#[tokio::test]
async fn storage_failure_during_login_is_internal(codec: Arc<TokenCodec>) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let credentials = LoginCredentials::try_from_parts("a@x.com", "Abcd1234").expect("creds");
    let err = service(repo, codec)
        .login(credentials)
        .await
        .expect_err("storage failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn blocking_password_work_keeps_the_request_trace_id() {
    let trace_id: TraceId = "6f1d2c3b-4a59-4e7f-8a1b-2c3d4e5f6a7b"
        .parse()
        .expect("trace id");

    let observed = TraceId::scope(trace_id, run_blocking(TraceId::current))
        .await
        .expect("blocking task runs");

    assert_eq!(observed, Some(trace_id));
}
