//! Sale windows

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sale window errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    /// The window ends at or before it starts.
    #[error("sale must end after it starts ({start} >= {end})")]
    Empty {
        /// Requested start.
        start: Timestamp,

        /// Requested end.
        end: Timestamp,
    },
}

/// Half-open time window `[start, end)` a sale runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWindow {
    start: Timestamp,
    end: Timestamp,
}

impl SaleWindow {
    /// Create a window.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Empty`] unless `start < end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::Empty { start, end });
        }

        Ok(Self { start, end })
    }

    /// Window start.
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// Window end.
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether two windows share any instant. Touching boundaries do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether a pending sale with this window should have started by `now`.
    pub fn has_started(&self, now: Timestamp) -> bool {
        self.start <= now
    }

    /// Whether an active sale with this window should have ended by `now`.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        self.end <= now
    }
}
