//! Plan usage limits

pub mod errors;
pub mod service;

pub use errors::UsageLimiterError;
pub use service::*;
