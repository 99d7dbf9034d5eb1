//! Reversion
//!
//! Decides, per variant, whether an active sale may restore its price and what the
//! restored price state is. A variant whose live price no longer matches the price the
//! sale would have set was edited by hand and is left alone.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::VariantSnapshot,
    discounts::{Discount, DiscountError, DiscountStrategy, PriceChange},
    prices::{effective_compare_at, is_near_zero, round_price, within_tolerance},
};

/// How prices are restored when a sale ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationStrategy {
    /// Restore the price captured at activation.
    Restore,

    /// Promote the compare-at price to the selling price when one is set.
    ReplaceWithCompare,
}

impl DeactivationStrategy {
    /// Persisted name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::ReplaceWithCompare => "replace_with_compare",
        }
    }
}

impl FromStr for DeactivationStrategy {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restore" => Ok(Self::Restore),
            "replace_with_compare" => Ok(Self::ReplaceWithCompare),
            other => Err(DiscountError::UnknownOption(other.to_string())),
        }
    }
}

impl fmt::Display for DeactivationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a variant is left untouched on revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The sale never captured an original price for this variant.
    NeverActivated,

    /// The live price drifted from the discounted price the sale set.
    PriceDrift {
        /// Price the sale is expected to have set.
        expected: Decimal,

        /// Price currently live on the platform.
        live: Decimal,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverActivated => f.write_str("no original price was captured"),
            Self::PriceDrift { expected, live } => {
                write!(f, "live price {live} differs from expected {expected}")
            }
        }
    }
}

/// Per-variant revert decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertDecision {
    /// Write this price state back.
    Restore(PriceChange),

    /// Leave the variant as it is.
    Skip(SkipReason),
}

/// Sale parameters needed to plan a revert.
#[derive(Debug, Clone, Copy)]
pub struct RevertPlan {
    /// Discount that was applied.
    pub discount: Discount,

    /// Strategy the discount was applied with.
    pub strategy: DiscountStrategy,

    /// How to restore prices.
    pub deactivation: DeactivationStrategy,
}

impl RevertPlan {
    /// Decide what to do with one variant.
    ///
    /// The expected discounted price is recomputed from `original_price` using the same
    /// forward calculation as activation, fed with the live compare-at price (which the
    /// compare-at strategy set to its base price).
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the forward calculation fails.
    pub fn decide(
        &self,
        original_price: Decimal,
        live: &VariantSnapshot,
    ) -> Result<RevertDecision, DiscountError> {
        if is_near_zero(original_price) {
            return Ok(RevertDecision::Skip(SkipReason::NeverActivated));
        }

        let expected = self
            .strategy
            .apply(original_price, live.compare_at, &self.discount)?
            .price;

        if !within_tolerance(live.price, expected) && !is_near_zero(live.price) {
            return Ok(RevertDecision::Skip(SkipReason::PriceDrift {
                expected,
                live: live.price,
            }));
        }

        Ok(RevertDecision::Restore(self.restore_target(
            original_price,
            live.compare_at,
        )))
    }

    fn restore_target(&self, original_price: Decimal, compare_at: Option<Decimal>) -> PriceChange {
        let compare_at = effective_compare_at(compare_at);

        if self.deactivation == DeactivationStrategy::ReplaceWithCompare
            && let Some(compare_at) = compare_at
        {
            return PriceChange {
                price: round_price(compare_at),
                compare_at: None,
            };
        }

        PriceChange {
            price: round_price(original_price),
            compare_at: match self.strategy {
                DiscountStrategy::KeepCompareAt => compare_at,
                // A compare-at that differs from the original was there before the sale.
                DiscountStrategy::CompareAt => {
                    compare_at.filter(|compare_at| !within_tolerance(*compare_at, original_price))
                }
                DiscountStrategy::UseCurrentAsCompare | DiscountStrategy::IncreaseCompare => None,
            },
        }
    }
}
