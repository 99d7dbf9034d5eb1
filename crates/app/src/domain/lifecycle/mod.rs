//! Sale lifecycle
//!
//! Drives a sale from `pending` through `active` to `completed`, writing discounted
//! prices to the catalog on activation and restoring them on revert.

pub mod errors;
pub mod reports;
pub mod service;

pub use errors::LifecycleError;
pub use reports::{ActivationReport, Admission, RevertReport};
pub use service::*;
