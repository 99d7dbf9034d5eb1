//! Pricedrop Domain Concerns

pub mod lifecycle;
pub mod sales;
pub mod scheduler;
pub mod shops;
pub mod usage;
