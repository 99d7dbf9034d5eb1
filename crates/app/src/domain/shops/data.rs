//! Shop Data

use crate::domain::shops::records::ShopUuid;

/// New Shop Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewShop {
    /// UUID to assign to the shop row.
    pub uuid: ShopUuid,

    /// Platform domain, e.g. `example.myshopify.com`.
    pub domain: String,

    /// Platform admin access token used for catalog calls.
    pub access_token: String,

    /// SHA-256 hex digest of the bearer token issued to the shop.
    pub token_hash: String,

    /// Plan variant limit; `None` means unlimited.
    pub variant_limit: Option<u64>,
}
