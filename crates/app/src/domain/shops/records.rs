//! Shop Records

use std::fmt;

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Shop UUID
pub type ShopUuid = TypedUuid<ShopRecord>;

/// Shop Record
#[derive(Clone)]
pub struct ShopRecord {
    /// Unique shop identifier.
    pub uuid: ShopUuid,

    /// Platform domain.
    pub domain: String,

    /// Platform admin access token.
    pub access_token: String,

    /// Plan variant limit; `None` means unlimited.
    pub variant_limit: Option<u64>,

    /// Shop creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl fmt::Debug for ShopRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopRecord")
            .field("uuid", &self.uuid)
            .field("domain", &self.domain)
            .field("access_token", &"**redacted**")
            .field("variant_limit", &self.variant_limit)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
