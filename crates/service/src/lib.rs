//! Service layer composing questions and their options into one aggregate.
//! - Depends on storage only through the repository traits in `question::repository`.
//! - Owns the request/response DTOs and the pagination rules.
//! - Provides clear error types; HTTP status mapping lives in the server crate.

pub mod errors;
pub mod pagination;
pub mod validation;
pub mod question;
#[cfg(test)]
pub mod test_support;

pub use question::QuestionService;
