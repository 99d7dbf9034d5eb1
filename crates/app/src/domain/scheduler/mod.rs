//! Scheduler driver
//!
//! One tick starts the pending sales that are due and reverts the active sales that
//! have ended. Anything that cannot proceed is logged and left for the next tick.

pub mod errors;
pub mod service;

pub use errors::SchedulerError;
pub use service::*;
