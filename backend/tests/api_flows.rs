//! End-to-end request flows over the real services and in-memory storage.

mod support;

use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use chrono::TimeDelta;
use preguntame::Trace;
use preguntame::domain::TRACE_ID_HEADER;
use preguntame::inbound::http::configure_api;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{Stack, in_memory_stack};

const PASSWORD: &str = "Abcd1234";

struct Reply {
    status: StatusCode,
    trace_id: Option<String>,
    body: Value,
}

#[fixture]
fn stack() -> Stack {
    in_memory_stack()
}

async fn send(
    stack: &Stack,
    method: Method,
    path: &str,
    bearer: Option<&str>,
    payload: Option<Value>,
) -> Reply {
    let app = test::init_service(
        App::new()
            .app_data(stack.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;

    let mut request = test::TestRequest::default().method(method).uri(path);
    if let Some(token) = bearer {
        request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(payload) = payload {
        request = request.set_json(payload);
    }

    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        trace_id,
        body,
    }
}

/// Register an account and log in, returning its id and credential.
async fn signed_up(stack: &Stack, name: &str, email: &str) -> (String, String) {
    let registered = send(
        stack,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);
    let id = registered.body["id"].as_str().expect("user id").to_owned();

    let logged_in = send(
        stack,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(logged_in.status, StatusCode::OK, "{:?}", logged_in.body);
    let token = logged_in.body["token"]
        .as_str()
        .expect("credential")
        .to_owned();
    (id, token)
}

async fn ask(stack: &Stack, user_id: &str, message: &str) -> Reply {
    send(
        stack,
        Method::POST,
        &format!("/api/v1/users/{user_id}/questions"),
        None,
        Some(json!({ "message": message })),
    )
    .await
}

async fn questions_of(stack: &Stack, user_id: &str) -> Vec<Value> {
    let listed = send(
        stack,
        Method::GET,
        &format!("/api/v1/users/{user_id}/questions"),
        None,
        None,
    )
    .await;
    assert_eq!(listed.status, StatusCode::OK);
    listed.body.as_array().expect("question list").clone()
}

async fn posts_of(stack: &Stack, user_id: &str) -> Vec<Value> {
    let listed = send(
        stack,
        Method::GET,
        &format!("/api/v1/users/{user_id}/posts"),
        None,
        None,
    )
    .await;
    assert_eq!(listed.status, StatusCode::OK);
    listed.body.as_array().expect("post list").clone()
}

#[rstest]
#[actix_web::test]
async fn login_issues_three_segment_credential(stack: Stack) {
    let (id, token) = signed_up(&stack, "Ada", "ada@example.com").await;

    assert_eq!(token.split('.').count(), 3);
    let principal = stack.codec.verify(&token).expect("credential verifies");
    assert_eq!(principal.id().as_ref(), id);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_and_duplicate_email_are_rejected(stack: Stack) {
    signed_up(&stack, "Ada", "ada@example.com").await;

    let wrong = send(
        &stack,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "Wrong1234" })),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.body["code"], "invalid_request");
    assert!(wrong.body.get("token").is_none());

    let duplicate = send(
        &stack,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({ "name": "Other", "email": "ada@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], "email already registered");
}

#[rstest]
#[actix_web::test]
async fn only_the_owner_may_edit_a_post(stack: Stack) {
    let (ada, ada_token) = signed_up(&stack, "Ada", "ada@example.com").await;
    let (_bob, bob_token) = signed_up(&stack, "Bob", "bob@example.com").await;

    let created = send(
        &stack,
        Method::POST,
        &format!("/api/v1/users/{ada}/posts"),
        Some(&ada_token),
        Some(json!({ "title": "Hello", "content": "First post" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["ownerId"], ada.as_str());
    let post_id = created.body["id"].as_str().expect("post id").to_owned();
    let post_path = format!("/api/v1/users/{ada}/posts/{post_id}");

    let hijack = send(
        &stack,
        Method::PUT,
        &post_path,
        Some(&bob_token),
        Some(json!({ "title": "Mine now", "content": "Overwritten" })),
    )
    .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);
    assert_eq!(hijack.body["code"], "forbidden");
    assert_eq!(posts_of(&stack, &ada).await[0]["title"], "Hello");

    let edited = send(
        &stack,
        Method::PUT,
        &post_path,
        Some(&ada_token),
        Some(json!({ "title": "Hello again", "content": "Edited" })),
    )
    .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body, Value::Null);
    assert_eq!(posts_of(&stack, &ada).await[0]["title"], "Hello again");
}

#[rstest]
#[actix_web::test]
async fn case_variant_owner_id_is_a_different_principal(stack: Stack) {
    let (ada, ada_token) = signed_up(&stack, "Ada", "ada@example.com").await;

    let created = send(
        &stack,
        Method::POST,
        &format!("/api/v1/users/{}/posts", ada.to_uppercase()),
        Some(&ada_token),
        Some(json!({ "title": "Hello", "content": "First post" })),
    )
    .await;

    assert_eq!(created.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn deleted_post_is_hidden_and_frozen(stack: Stack) {
    let (ada, token) = signed_up(&stack, "Ada", "ada@example.com").await;
    let created = send(
        &stack,
        Method::POST,
        &format!("/api/v1/users/{ada}/posts"),
        Some(&token),
        Some(json!({ "title": "Hello", "content": "First post" })),
    )
    .await;
    let post_id = created.body["id"].as_str().expect("post id").to_owned();
    let post_path = format!("/api/v1/users/{ada}/posts/{post_id}");

    let deleted = send(&stack, Method::DELETE, &post_path, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(posts_of(&stack, &ada).await.is_empty());

    let update = send(
        &stack,
        Method::PUT,
        &post_path,
        Some(&token),
        Some(json!({ "title": "Back", "content": "From the dead" })),
    )
    .await;
    assert_eq!(update.status, StatusCode::BAD_REQUEST);

    let again = send(&stack, Method::DELETE, &post_path, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(5, StatusCode::BAD_REQUEST)]
#[case(50, StatusCode::OK)]
#[actix_web::test]
async fn question_length_is_enforced(
    stack: Stack,
    #[case] length: usize,
    #[case] expected: StatusCode,
) {
    let (ada, _) = signed_up(&stack, "Ada", "ada@example.com").await;

    let asked = ask(&stack, &ada, &"q".repeat(length)).await;

    assert_eq!(asked.status, expected);
    if expected == StatusCode::OK {
        assert_eq!(asked.body["reply"], Value::Null);
        assert_eq!(asked.body["favourite"], false);
    } else {
        assert_eq!(asked.body["code"], "invalid_request");
    }
}

#[rstest]
#[actix_web::test]
async fn question_to_unknown_user_is_rejected(stack: Stack) {
    let asked = ask(
        &stack,
        "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "Is anybody out there?",
    )
    .await;

    assert_eq!(asked.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn a_question_is_answered_at_most_once(stack: Stack) {
    let (ada, token) = signed_up(&stack, "Ada", "ada@example.com").await;
    let asked = ask(&stack, &ada, "What is your favourite engine?").await;
    let question_id = asked.body["id"].as_str().expect("question id").to_owned();
    let question_path = format!("/api/v1/users/{ada}/questions/{question_id}");

    let first = send(
        &stack,
        Method::PUT,
        &question_path,
        Some(&token),
        Some(json!({ "reply": "The analytical one" })),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = send(
        &stack,
        Method::PUT,
        &question_path,
        Some(&token),
        Some(json!({ "reply": "Changed my mind!!" })),
    )
    .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        second.body["message"],
        "question does not exist or is already answered"
    );

    let listed = questions_of(&stack, &ada).await;
    assert_eq!(listed[0]["reply"], "The analytical one");
}

#[rstest]
#[actix_web::test]
async fn owner_can_favourite_and_delete_questions(stack: Stack) {
    let (ada, token) = signed_up(&stack, "Ada", "ada@example.com").await;
    let asked = ask(&stack, &ada, "Do you like poetry at all?").await;
    let question_id = asked.body["id"].as_str().expect("question id").to_owned();
    let question_path = format!("/api/v1/users/{ada}/questions/{question_id}");

    let favourite = send(
        &stack,
        Method::PUT,
        &format!("{question_path}/fav"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(favourite.status, StatusCode::OK);
    assert_eq!(questions_of(&stack, &ada).await[0]["favourite"], true);

    let deleted = send(&stack, Method::DELETE, &question_path, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(questions_of(&stack, &ada).await.is_empty());

    let again = send(&stack, Method::DELETE, &question_path, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn expired_and_missing_credentials_look_alike(stack: Stack) {
    let (ada, token) = signed_up(&stack, "Ada", "ada@example.com").await;
    let path = format!("/api/v1/users/{ada}/posts");
    let payload = json!({ "title": "Hello", "content": "First post" });

    let missing = send(&stack, Method::POST, &path, None, Some(payload.clone())).await;

    stack.clock.advance(TimeDelta::hours(24));
    let expired = send(&stack, Method::POST, &path, Some(&token), Some(payload)).await;

    for reply in [&missing, &expired] {
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        let trace_id = reply.trace_id.as_deref().expect("trace id header");
        assert_eq!(reply.body["traceId"], trace_id);
    }
    assert_eq!(missing.body["message"], expired.body["message"]);
    assert!(posts_of(&stack, &ada).await.is_empty());
}
