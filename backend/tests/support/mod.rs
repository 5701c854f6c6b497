//! Shared wiring for integration suites.
//!
//! Builds the real domain services over one [`InMemoryStore`] and a frozen
//! clock so credential expiry can be driven from tests.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use preguntame::domain::{
    AccountService, PostCommandService, PostQueryService, PrincipalResolver,
    QuestionCommandService, QuestionQueryService, TokenCodec,
};
use preguntame::inbound::http::state::{HttpState, HttpStatePorts};
use preguntame::outbound::memory::InMemoryStore;
use preguntame::test_support::clock::MutableClock;

pub const TEST_SECRET: &[u8] = b"integration-signing-secret-0123456789";

/// Application state plus handles tests use to steer it.
pub struct Stack {
    pub state: web::Data<HttpState>,
    pub clock: Arc<MutableClock>,
    pub codec: Arc<TokenCodec>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid start time")
}

pub fn in_memory_stack() -> Stack {
    let clock = Arc::new(MutableClock::new(start_time()));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let codec = Arc::new(TokenCodec::new(TEST_SECRET.to_vec(), dyn_clock.clone()).expect("codec"));
    let store = Arc::new(InMemoryStore::new());

    let ports = HttpStatePorts {
        accounts: Arc::new(AccountService::new(store.clone(), codec.clone())),
        posts: Arc::new(PostCommandService::new(store.clone(), dyn_clock)),
        posts_query: Arc::new(PostQueryService::new(store.clone())),
        questions: Arc::new(QuestionCommandService::new(store.clone())),
        questions_query: Arc::new(QuestionQueryService::new(store)),
    };
    let state = web::Data::new(HttpState::new(
        ports,
        PrincipalResolver::new(codec.clone()),
    ));

    Stack {
        state,
        clock,
        codec,
    }
}
