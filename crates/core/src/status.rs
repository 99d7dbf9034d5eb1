//! Sale status and lifecycle transitions.
//!
//! ```text
//! PENDING --[activate]--> ACTIVE --[revert]--> COMPLETED
//! ```
//!
//! A completed sale may be re-activated by an explicit user action, which re-enters
//! `ACTIVE` through the same activation path. There are no backward transitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status transition errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The requested transition is not valid from the current status.
    #[error("cannot {transition} a sale that is {from}")]
    InvalidTransition {
        /// Status the sale is in.
        from: SaleStatus,

        /// Transition that was requested.
        transition: Transition,
    },

    /// Unknown persisted status name.
    #[error("unknown sale status: {0}")]
    Unknown(String),
}

/// Sale lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Scheduled, prices untouched.
    Pending,

    /// Discounted prices applied.
    Active,

    /// Prices reverted.
    Completed,
}

/// Lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Scheduled activation of a pending sale.
    Activate,

    /// User-initiated activation of a pending or completed sale.
    Reactivate,

    /// Restore prices of an active sale.
    Revert,
}

impl SaleStatus {
    /// Persisted name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether sales in this status take part in conflict detection.
    pub const fn is_scheduled(self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Status reached by applying `transition`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidTransition`] when `transition` is not valid from
    /// this status. Lifecycle operations treat this as a no-op rather than a failure.
    pub fn next(self, transition: Transition) -> Result<Self, StatusError> {
        match (self, transition) {
            (Self::Pending, Transition::Activate)
            | (Self::Pending | Self::Completed, Transition::Reactivate) => Ok(Self::Active),
            (Self::Active, Transition::Revert) => Ok(Self::Completed),
            (from, transition) => Err(StatusError::InvalidTransition { from, transition }),
        }
    }
}

impl FromStr for SaleStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Reactivate => "reactivate",
            Self::Revert => "revert",
        })
    }
}
