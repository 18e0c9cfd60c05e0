//! Persistence-facing entities for the question bank.
//!
//! Each module holds the SeaORM entity plus small helpers that validate and
//! write rows. Nothing here knows about the API shapes.

pub mod errors;
pub mod db;
pub mod question;
pub mod question_option;

#[cfg(test)]
mod tests;
