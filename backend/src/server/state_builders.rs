//! Builders for HTTP state from repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use preguntame::domain::ports::{PostRepository, QuestionRepository, UserRepository};
use preguntame::domain::{
    AccountService, PostCommandService, PostQueryService, PrincipalResolver,
    QuestionCommandService, QuestionQueryService, TokenCodec,
};
use preguntame::inbound::http::state::{HttpState, HttpStatePorts};
use preguntame::outbound::memory::InMemoryStore;
use preguntame::outbound::persistence::{
    DieselPostRepository, DieselQuestionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wire the domain services over one repository per entity.
fn build_ports<U, P, Q>(
    users: Arc<U>,
    posts: Arc<P>,
    questions: Arc<Q>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
    Q: QuestionRepository + 'static,
{
    HttpStatePorts {
        accounts: Arc::new(AccountService::new(users, codec)),
        posts: Arc::new(PostCommandService::new(posts.clone(), clock)),
        posts_query: Arc::new(PostQueryService::new(posts)),
        questions: Arc::new(QuestionCommandService::new(questions.clone())),
        questions_query: Arc::new(QuestionQueryService::new(questions)),
    }
}

/// Build shared HTTP state, using Diesel adapters when a pool is configured
/// and one in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let codec = config.codec.clone();
    let clock = config.clock.clone();
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselPostRepository::new(pool.clone())),
            Arc::new(DieselQuestionRepository::new(pool.clone())),
            codec.clone(),
            clock,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            build_ports(store.clone(), store.clone(), store, codec.clone(), clock)
        }
    };
    web::Data::new(HttpState::new(ports, PrincipalResolver::new(codec)))
}
