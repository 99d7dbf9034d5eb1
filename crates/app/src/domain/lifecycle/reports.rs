//! Lifecycle outcomes.

use pricedrop::catalog::PartialOutcome;

use crate::domain::sales::records::SaleUuid;

/// Result of gating a sale before activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Conflict(String),
    LimitExceeded(String),
}

/// What an activation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub sale: SaleUuid,

    /// Variants whose discounted price was written.
    pub updated: usize,

    /// Items left untouched: missing upstream or not priceable.
    pub skipped: usize,

    pub outcome: PartialOutcome,

    /// Whether this call moved the sale to active.
    pub transitioned: bool,
}

impl ActivationReport {
    pub(crate) fn noop(sale: SaleUuid) -> Self {
        Self {
            sale,
            updated: 0,
            skipped: 0,
            outcome: PartialOutcome::default(),
            transitioned: false,
        }
    }
}

/// What a revert did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertReport {
    pub sale: SaleUuid,

    /// Variants whose price was restored.
    pub restored: usize,

    /// Items left as they were: missing upstream, never activated, or edited by hand.
    pub skipped: usize,

    pub outcome: PartialOutcome,

    /// Whether this call moved the sale to completed.
    pub transitioned: bool,
}

impl RevertReport {
    pub(crate) fn noop(sale: SaleUuid) -> Self {
        Self {
            sale,
            restored: 0,
            skipped: 0,
            outcome: PartialOutcome::default(),
            transitioned: false,
        }
    }
}
