//! Shared runtime helpers: logging setup, environment bootstrap and small
//! wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;
