//! Depot helper extensions.

use std::any::Any;

use pricedrop_app::domain::shops::records::ShopUuid;
use salvo::prelude::{Depot, StatusError};

const SHOP_UUID_DEPOT_KEY: &str = "shop_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_shop_uuid(&mut self, shop: ShopUuid);

    /// Shop resolved by the auth middleware.
    fn shop_uuid_or_401(&self) -> Result<ShopUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_shop_uuid(&mut self, shop: ShopUuid) {
        self.insert(SHOP_UUID_DEPOT_KEY, shop);
    }

    fn shop_uuid_or_401(&self) -> Result<ShopUuid, StatusError> {
        self.get::<ShopUuid>(SHOP_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
