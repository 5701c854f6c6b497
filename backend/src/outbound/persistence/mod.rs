//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`,
//! both private) and domain types. Conditional writes are single
//! statements whose filters carry the full precondition.
//!
//! # Example
//!
//! ```no_run
//! use preguntame::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/preguntame")).await?;
//! let posts = DieselPostRepository::new(pool);
//! # let _ = posts;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_post_repository;
mod diesel_question_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
