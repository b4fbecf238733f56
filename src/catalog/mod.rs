//! The catalog store contract.
//!
//! The resolver reads through this trait and the sentry writes through it;
//! the two never call each other. `storage::SqliteCatalog` is the production
//! implementation.

mod types;

use async_trait::async_trait;

pub use types::{
    HealthLogEntry, Location, LocationFilter, MappingHealth, Mirror, MirrorCandidate,
    MirrorFilter, ProductMatch, SchemeGroup,
};

use crate::error_handling::StoreError;

/// Queries and single-row writes against the catalog.
///
/// Lookups return `Ok(None)` on a miss; `Err` is reserved for store failures.
/// Implementations must tolerate concurrent calls from many sweep tasks.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Canonical product name for `name`, or `name` itself when no alias exists.
    async fn alias_for(&self, name: &str) -> Result<String, StoreError>;

    /// Id of the operating system called `name`.
    async fn os_id(&self, name: &str) -> Result<Option<i64>, StoreError>;

    /// Product `product` offered in `lang`, or offered without language
    /// restrictions.
    async fn product_for_language(
        &self,
        product: &str,
        lang: &str,
    ) -> Result<Option<ProductMatch>, StoreError>;

    /// Download path of a product on an operating system.
    async fn location_for(
        &self,
        product_id: i64,
        os_id: i64,
    ) -> Result<Option<Location>, StoreError>;

    /// Selection candidates serving `location_id` in `lang` from `group`,
    /// in a fixed scan order.
    ///
    /// With `healthy_only` the result is restricted to healthy mappings on
    /// healthy mirrors; without it, unhealthy ones are included too.
    async fn active_mirrors_for(
        &self,
        group: SchemeGroup,
        lang: &str,
        location_id: i64,
        healthy_only: bool,
    ) -> Result<Vec<MirrorCandidate>, StoreError>;

    /// Locations whose product is active.
    async fn all_active_locations(
        &self,
        filter: LocationFilter,
    ) -> Result<Vec<Location>, StoreError>;

    /// Active mirrors.
    async fn all_active_mirrors(&self, filter: &MirrorFilter) -> Result<Vec<Mirror>, StoreError>;

    async fn upsert_location_mirror_health(
        &self,
        location_id: i64,
        mirror_id: i64,
        health: MappingHealth,
    ) -> Result<(), StoreError>;

    async fn set_mirror_health(&self, mirror_id: i64, healthy: bool) -> Result<(), StoreError>;

    async fn set_mirror_rating(&self, mirror_id: i64, rating: u32) -> Result<(), StoreError>;

    async fn append_health_log(&self, entry: &HealthLogEntry) -> Result<(), StoreError>;

    /// Cheap liveness check used by the heartbeat endpoints.
    async fn ping(&self) -> Result<(), StoreError>;
}
