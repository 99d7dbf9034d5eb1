//! Conflict detection against persisted sales.

use std::sync::Arc;

use pricedrop::{
    catalog::VariantId,
    conflicts::{OverlapCheck, ScheduledSale, check_overlap},
    windows::SaleWindow,
};
use rustc_hash::FxHashSet;

use crate::domain::{
    sales::{
        SalesService,
        errors::SalesServiceError,
        records::{SaleRecord, SaleUuid, TimerUuid},
    },
    shops::records::ShopUuid,
};

/// Finds pending or active sales of a shop that would collide with a candidate.
#[derive(Clone)]
pub struct ConflictDetector {
    sales: Arc<dyn SalesService>,
}

impl ConflictDetector {
    #[must_use]
    pub fn new(sales: Arc<dyn SalesService>) -> Self {
        Self { sales }
    }

    /// Check a candidate sale against the shop's scheduled sales.
    ///
    /// # Errors
    ///
    /// Returns an error when the overlapping sales cannot be loaded.
    #[tracing::instrument(
        name = "sales.conflicts.check_overlap",
        skip(self, variants),
        fields(shop_uuid = %shop, variant_count = variants.len()),
        err
    )]
    pub async fn check_overlap(
        &self,
        shop: ShopUuid,
        variants: &[VariantId],
        exclude: Option<SaleUuid>,
        window: SaleWindow,
        timer: Option<TimerUuid>,
    ) -> Result<OverlapCheck, SalesServiceError> {
        let others = self
            .sales
            .list_overlapping_sales(shop, window, exclude)
            .await?;

        let candidate: FxHashSet<VariantId> = variants.iter().cloned().collect();
        let variant_sets: Vec<Vec<VariantId>> = others.iter().map(SaleRecord::variant_ids).collect();

        let scheduled: Vec<ScheduledSale<'_>> = others
            .iter()
            .zip(&variant_sets)
            .filter(|(other, _)| Some(other.uuid) != exclude)
            .map(|(other, ids)| ScheduledSale {
                title: &other.title,
                window: other.window,
                timer: other.timer.map(TimerUuid::into_uuid),
                variants: ids,
            })
            .collect();

        Ok(check_overlap(
            &candidate,
            &window,
            timer.map(TimerUuid::into_uuid),
            &scheduled,
        ))
    }
}
