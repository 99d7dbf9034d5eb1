//! Catalog errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog query failed: {0}")]
    Query(String),

    #[error("catalog rejected the update: {}", .0.join("; "))]
    UserErrors(Vec<String>),

    #[error("catalog returned an unreadable price {value:?} for {variant}")]
    InvalidPrice { variant: String, value: String },
}
