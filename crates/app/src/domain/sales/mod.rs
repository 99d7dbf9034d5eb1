//! Sales

pub mod conflicts;
pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use conflicts::ConflictDetector;
pub use errors::SalesServiceError;
pub use service::*;
