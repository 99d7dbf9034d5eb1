//! Conflict detection
//!
//! Two scheduled sales conflict when their windows overlap and they share at least one
//! variant. A differing countdown timer on such a pair is reported alongside the variant
//! conflict.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::VariantId, windows::SaleWindow};

/// A scheduled sale the candidate is compared against.
#[derive(Debug, Clone)]
pub struct ScheduledSale<'a> {
    /// Sale title.
    pub title: &'a str,

    /// Sale window.
    pub window: SaleWindow,

    /// Countdown timer shown for the sale.
    pub timer: Option<Uuid>,

    /// Variants covered by the sale.
    pub variants: &'a [VariantId],
}

/// Outcome of an overlap check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapCheck {
    /// `true` when no overlapping sale shares a variant.
    pub ok: bool,

    /// Titles of conflicting sales, deduplicated, in discovery order.
    pub conflicting_titles: Vec<String>,

    /// Titles of conflicting sales that also use a different timer.
    pub timer_conflicts: Vec<String>,
}

impl OverlapCheck {
    /// A passing check.
    pub fn clear() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    /// Human-readable rejection message, `None` when the check passed.
    pub fn message(&self) -> Option<String> {
        if self.ok {
            return None;
        }

        let mut message = format!(
            "Some variants are already in an overlapping sale: {}.",
            self.conflicting_titles.join(", ")
        );

        if !self.timer_conflicts.is_empty() {
            message.push_str(&format!(
                " These sales also use a different countdown timer: {}.",
                self.timer_conflicts.join(", ")
            ));
        }

        Some(message)
    }
}

/// Compare a candidate sale against other scheduled sales.
///
/// `others` is expected to already exclude the candidate itself and sales that are not
/// pending or active; windows are re-checked here so callers may pass a superset.
pub fn check_overlap(
    variants: &FxHashSet<VariantId>,
    window: &SaleWindow,
    timer: Option<Uuid>,
    others: &[ScheduledSale<'_>],
) -> OverlapCheck {
    let mut check = OverlapCheck::clear();

    for other in others {
        if !window.overlaps(&other.window) {
            continue;
        }

        if !other.variants.iter().any(|variant| variants.contains(variant)) {
            continue;
        }

        check.ok = false;
        push_unique(&mut check.conflicting_titles, other.title);

        if let (Some(ours), Some(theirs)) = (timer, other.timer)
            && ours != theirs
        {
            push_unique(&mut check.timer_conflicts, other.title);
        }
    }

    check
}

fn push_unique(titles: &mut Vec<String>, title: &str) {
    if !titles.iter().any(|existing| existing == title) {
        titles.push(title.to_string());
    }
}
