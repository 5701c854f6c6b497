//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe storage; driving ports (`*Command`,
//! `*Query`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod post_command;
mod post_repository;
mod question_command;
mod question_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginResponse};
#[cfg(test)]
pub use post_command::{MockPostCommand, MockPostQuery};
pub use post_command::{PostCommand, PostQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use question_command::{MockQuestionCommand, MockQuestionQuery};
pub use question_command::{QuestionCommand, QuestionQuery};
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::{QuestionPersistenceError, QuestionRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserPersistenceError, UserRepository};
