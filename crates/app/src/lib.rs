//! Persistence, catalog access and the sale lifecycle services.

pub mod auth;
pub mod catalog;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;
