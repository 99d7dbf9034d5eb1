//! Bearer token authentication for shops.

pub mod errors;
mod repository;
pub mod service;
pub mod token;

pub use errors::AuthServiceError;
pub use service::*;
pub use token::{generate_token, hash_token};
