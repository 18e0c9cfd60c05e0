//! Question aggregate: DTOs, storage contracts and the service composing them.

pub mod dto;
pub mod repository;
pub mod service;

pub use service::QuestionService;
