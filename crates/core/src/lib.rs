//! Pricedrop
//!
//! Pure pricing rules behind scheduled catalog sales: discount strategies, sale windows,
//! conflict detection, reversion safety checks and per-product batching. Nothing in this
//! crate performs I/O.

pub mod catalog;
pub mod conflicts;
pub mod discounts;
pub mod prices;
pub mod reversion;
pub mod status;
pub mod windows;
