//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::PrincipalResolver;
use crate::domain::ports::{AccountCommand, PostCommand, PostQuery, QuestionCommand, QuestionQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub questions: Arc<dyn QuestionCommand>,
    pub questions_query: Arc<dyn QuestionQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub questions: Arc<dyn QuestionCommand>,
    pub questions_query: Arc<dyn QuestionQuery>,
    pub resolver: PrincipalResolver,
}

impl HttpState {
    /// Construct state from the port bundle and the credential resolver.
    pub fn new(ports: HttpStatePorts, resolver: PrincipalResolver) -> Self {
        let HttpStatePorts {
            accounts,
            posts,
            posts_query,
            questions,
            questions_query,
        } = ports;
        Self {
            accounts,
            posts,
            posts_query,
            questions,
            questions_query,
            resolver,
        }
    }
}
