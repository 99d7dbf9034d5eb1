//! Discounts
//!
//! Maps a variant's current price state to the price state it should have while a sale
//! is running. Each [`DiscountStrategy`] owns its own transform; the calculator is a pure
//! function of its inputs so re-running it against the same snapshot is always safe.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::{clamp_price, effective_compare_at, round_price};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Discount values cannot be negative.
    #[error("discount value cannot be negative")]
    NegativeValue,

    /// Percentage discounts cannot exceed 100%.
    #[error("percentage discount cannot exceed 100")]
    PercentageOutOfRange,

    /// A 100% discount has no finite compare-at price to raise to.
    #[error("a 100% discount cannot be expressed by raising the compare-at price")]
    UnboundedCompareAt,

    /// Decimal arithmetic overflowed.
    #[error("price calculation overflowed")]
    Overflow,

    /// Unknown discount type or strategy name.
    #[error("unknown discount option: {0}")]
    UnknownOption(String),
}

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage of the base price.
    Percentage,

    /// Value is an absolute amount in currency units.
    FixedAmount,
}

impl DiscountType {
    /// Persisted name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::FixedAmount => "fixed_amount",
        }
    }
}

impl FromStr for DiscountType {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed_amount" => Ok(Self::FixedAmount),
            other => Err(DiscountError::UnknownOption(other.to_string())),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated discount: a type and a non-negative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    kind: DiscountType,
    value: Decimal,
}

impl Discount {
    /// Create a discount.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::NegativeValue`] when `value` is below zero.
    /// - [`DiscountError::PercentageOutOfRange`] for percentages above 100.
    pub fn new(kind: DiscountType, value: Decimal) -> Result<Self, DiscountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DiscountError::NegativeValue);
        }

        if kind == DiscountType::Percentage && value > Decimal::ONE_HUNDRED {
            return Err(DiscountError::PercentageOutOfRange);
        }

        Ok(Self { kind, value })
    }

    /// Shorthand for a percentage discount.
    ///
    /// # Errors
    ///
    /// See [`Discount::new`].
    pub fn percentage(value: Decimal) -> Result<Self, DiscountError> {
        Self::new(DiscountType::Percentage, value)
    }

    /// Shorthand for a fixed amount discount.
    ///
    /// # Errors
    ///
    /// See [`Discount::new`].
    pub fn fixed_amount(value: Decimal) -> Result<Self, DiscountError> {
        Self::new(DiscountType::FixedAmount, value)
    }

    /// Discount type.
    pub const fn kind(&self) -> DiscountType {
        self.kind
    }

    /// Discount value.
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Amount taken off `base`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if the multiplication overflows.
    pub fn amount_off(&self, base: Decimal) -> Result<Decimal, DiscountError> {
        match self.kind {
            DiscountType::Percentage => base
                .checked_mul(self.value)
                .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(DiscountError::Overflow),
            DiscountType::FixedAmount => Ok(self.value),
        }
    }

    /// Apply the discount to `base`, clamped at zero and rounded.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if the arithmetic overflows.
    pub fn apply_to(&self, base: Decimal) -> Result<Decimal, DiscountError> {
        let amount = self.amount_off(base)?;

        base.checked_sub(amount)
            .map(clamp_price)
            .ok_or(DiscountError::Overflow)
    }

    /// Raise `price` to the reference price it would have been discounted from.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::UnboundedCompareAt`] for a 100% discount.
    /// - [`DiscountError::Overflow`] if the arithmetic overflows.
    pub fn inflate(&self, price: Decimal) -> Result<Decimal, DiscountError> {
        match self.kind {
            DiscountType::Percentage => {
                let remaining = Decimal::ONE_HUNDRED - self.value;

                if remaining.is_zero() {
                    return Err(DiscountError::UnboundedCompareAt);
                }

                price
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .and_then(|scaled| scaled.checked_div(remaining))
                    .map(round_price)
                    .ok_or(DiscountError::Overflow)
            }
            DiscountType::FixedAmount => price
                .checked_add(self.value)
                .map(round_price)
                .ok_or(DiscountError::Overflow),
        }
    }
}

/// Price state of a variant: its selling price and optional compare-at price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    /// Selling price.
    pub price: Decimal,

    /// Crossed-out reference price, `None` when cleared.
    pub compare_at: Option<Decimal>,
}

/// Rule for deriving the sale price and compare-at price from current catalog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStrategy {
    /// Discount from the compare-at price when set, otherwise from the current price.
    CompareAt,

    /// Discount the current price and leave the compare-at price untouched.
    KeepCompareAt,

    /// Discount the current price and show the pre-discount price as compare-at.
    UseCurrentAsCompare,

    /// Keep the current price and raise the compare-at price instead.
    IncreaseCompare,
}

impl DiscountStrategy {
    /// Persisted name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompareAt => "compare_at",
            Self::KeepCompareAt => "keep_compare_at",
            Self::UseCurrentAsCompare => "use_current_as_compare",
            Self::IncreaseCompare => "increase_compare",
        }
    }

    /// Compute the discounted price state for a variant.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] when the discount cannot be expressed for this
    /// strategy or the arithmetic overflows.
    pub fn apply(
        self,
        current_price: Decimal,
        current_compare_at: Option<Decimal>,
        discount: &Discount,
    ) -> Result<PriceChange, DiscountError> {
        match self {
            Self::CompareAt => compare_at(current_price, current_compare_at, discount),
            Self::KeepCompareAt => keep_compare_at(current_price, current_compare_at, discount),
            Self::UseCurrentAsCompare => use_current_as_compare(current_price, discount),
            Self::IncreaseCompare => increase_compare(current_price, discount),
        }
    }
}

impl FromStr for DiscountStrategy {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compare_at" => Ok(Self::CompareAt),
            "keep_compare_at" => Ok(Self::KeepCompareAt),
            "use_current_as_compare" => Ok(Self::UseCurrentAsCompare),
            "increase_compare" => Ok(Self::IncreaseCompare),
            other => Err(DiscountError::UnknownOption(other.to_string())),
        }
    }
}

impl fmt::Display for DiscountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute a variant's new price state.
///
/// # Errors
///
/// See [`DiscountStrategy::apply`].
pub fn compute_new_price(
    current_price: Decimal,
    current_compare_at: Option<Decimal>,
    discount: &Discount,
    strategy: DiscountStrategy,
) -> Result<PriceChange, DiscountError> {
    strategy.apply(current_price, current_compare_at, discount)
}

fn compare_at(
    current_price: Decimal,
    current_compare_at: Option<Decimal>,
    discount: &Discount,
) -> Result<PriceChange, DiscountError> {
    let base = effective_compare_at(current_compare_at).unwrap_or(current_price);

    Ok(PriceChange {
        price: discount.apply_to(base)?,
        compare_at: Some(round_price(base)),
    })
}

fn keep_compare_at(
    current_price: Decimal,
    current_compare_at: Option<Decimal>,
    discount: &Discount,
) -> Result<PriceChange, DiscountError> {
    Ok(PriceChange {
        price: discount.apply_to(current_price)?,
        compare_at: current_compare_at,
    })
}

fn use_current_as_compare(
    current_price: Decimal,
    discount: &Discount,
) -> Result<PriceChange, DiscountError> {
    Ok(PriceChange {
        price: discount.apply_to(current_price)?,
        compare_at: Some(round_price(current_price)),
    })
}

fn increase_compare(
    current_price: Decimal,
    discount: &Discount,
) -> Result<PriceChange, DiscountError> {
    Ok(PriceChange {
        price: round_price(current_price),
        compare_at: Some(discount.inflate(current_price)?),
    })
}
