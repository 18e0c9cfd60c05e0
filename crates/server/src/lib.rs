pub mod errors;
pub mod openapi;
pub mod questions;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{run, serve};
pub use state::ServerState;
