//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.

use preguntame::domain::ports::{UserPersistenceError, UserRepository};
use preguntame::domain::{DisplayName, Email, PasswordHash, User, UserId};
use preguntame::outbound::persistence::DieselUserRepository;
use rstest::{fixture, rstest};

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{PgContext, pg_context};

#[fixture]
fn sample_user() -> User {
    User::new(
        UserId::random(),
        DisplayName::new("Ada Lovelace").expect("display name"),
        Email::new("ada@example.com").expect("email"),
    )
}

#[fixture]
fn sample_hash() -> PasswordHash {
    PasswordHash::generate("Abcd1234").expect("hash")
}

fn repository(ctx: &PgContext) -> DieselUserRepository {
    DieselUserRepository::new(ctx.pool())
}

#[rstest]
fn stored_user_is_found_by_email(sample_user: User, sample_hash: PasswordHash) {
    let Some(ctx) = pg_context() else {
        eprintln!("SKIP-TEST-CLUSTER: stored_user_is_found_by_email skipped");
        return;
    };
    let repo = repository(&ctx);

    ctx.block_on(repo.insert(&sample_user, &sample_hash))
        .expect("insert succeeds");
    let stored = ctx
        .block_on(repo.find_by_email(sample_user.email()))
        .expect("lookup succeeds")
        .expect("user exists");

    assert_eq!(stored.user, sample_user);
    assert!(stored.password_hash.verify("Abcd1234"));
}

#[rstest]
fn second_account_with_the_same_email_is_a_duplicate(
    sample_user: User,
    sample_hash: PasswordHash,
) {
    let Some(ctx) = pg_context() else {
        eprintln!("SKIP-TEST-CLUSTER: second_account_with_the_same_email_is_a_duplicate skipped");
        return;
    };
    let repo = repository(&ctx);
    ctx.block_on(repo.insert(&sample_user, &sample_hash))
        .expect("first insert succeeds");

    let twin = User::new(
        UserId::random(),
        DisplayName::new("Someone Else").expect("display name"),
        sample_user.email().clone(),
    );
    let err = ctx
        .block_on(repo.insert(&twin, &sample_hash))
        .expect_err("duplicate email must fail");

    assert_eq!(err, UserPersistenceError::DuplicateEmail);
    let stored = ctx
        .block_on(repo.find_by_email(sample_user.email()))
        .expect("lookup succeeds")
        .expect("original remains");
    assert_eq!(stored.user.id(), sample_user.id());
}

#[rstest]
fn unknown_email_yields_none() {
    let Some(ctx) = pg_context() else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_email_yields_none skipped");
        return;
    };
    let repo = repository(&ctx);
    let email = Email::new("nobody@example.com").expect("email");

    let found = ctx
        .block_on(repo.find_by_email(&email))
        .expect("lookup succeeds");

    assert!(found.is_none());
}
