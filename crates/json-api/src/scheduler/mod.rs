//! Scheduler

pub(crate) mod tick;
