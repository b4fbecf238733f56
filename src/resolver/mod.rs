//! Request-path resolution of (product, os, lang) to a download URL.
//!
//! Resolution only reads the catalog. Each lookup step short-circuits to
//! `Ok(None)` on a miss; `Err` means the store itself failed.

mod selector;
mod url;

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use selector::{select_mirror, select_with_draw, total_weight};
pub use url::{join_download_url, substitute_lang};

use crate::catalog::{CatalogStore, SchemeGroup};
use crate::config::ResolverConfig;
use crate::error_handling::StoreError;

/// Resolves download requests against a catalog.
///
/// The random source is owned by the resolver so selection can be made
/// reproducible with [`Resolver::with_rng`].
pub struct Resolver {
    store: Arc<dyn CatalogStore>,
    config: ResolverConfig,
    rng: Mutex<StdRng>,
}

impl Resolver {
    /// Creates a resolver with an OS-seeded random source.
    pub fn new(store: Arc<dyn CatalogStore>, config: ResolverConfig) -> Self {
        Self::with_rng(store, config, StdRng::from_os_rng())
    }

    /// Creates a resolver drawing from `rng`.
    pub fn with_rng(store: Arc<dyn CatalogStore>, config: ResolverConfig, rng: StdRng) -> Self {
        Self {
            store,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Resolves a download URL.
    ///
    /// Steps, each ending in `Ok(None)` on a miss:
    /// 1. alias lookup (unknown names pass through)
    /// 2. operating system id
    /// 3. product offered in `lang` (or without language restrictions)
    /// 4. location of the product on that OS
    /// 5. scheme group: HTTPS when preferred or when the product is SSL-only
    /// 6. a pinned base URL for the group skips mirror selection
    /// 7. healthy candidates, widened to unhealthy ones when none exist
    /// 8. weighted selection, `:lang` substitution and URL join
    pub async fn resolve(
        &self,
        product: &str,
        os: &str,
        lang: &str,
        prefer_https: bool,
    ) -> Result<Option<String>, StoreError> {
        let product_name = self.store.alias_for(product).await?;

        let Some(os_id) = self.store.os_id(os).await? else {
            log::debug!("No operating system named {}", os);
            return Ok(None);
        };

        let Some(product_match) = self
            .store
            .product_for_language(&product_name, lang)
            .await?
        else {
            log::debug!("No product {} offered in {}", product_name, lang);
            return Ok(None);
        };

        let Some(location) = self.store.location_for(product_match.id, os_id).await? else {
            log::debug!(
                "No location for product {} on os {}",
                product_match.id,
                os_id
            );
            return Ok(None);
        };

        let group = SchemeGroup::effective(prefer_https, product_match.ssl_only);
        let path = substitute_lang(&location.path, lang);

        if let Some(pinned) = self.config.pinned_base_url(group) {
            return Ok(Some(join_download_url(&pinned, &path)));
        }

        let mut candidates = self
            .store
            .active_mirrors_for(group, lang, location.id, true)
            .await?;
        if candidates.is_empty() {
            candidates = self
                .store
                .active_mirrors_for(group, lang, location.id, false)
                .await?;
            if !candidates.is_empty() {
                log::warn!(
                    "No healthy {} mirror for location {} ({}), falling back to {} unhealthy candidate(s)",
                    group,
                    location.id,
                    lang,
                    candidates.len()
                );
            }
        }

        let selected = {
            // A poisoned lock only means another request panicked mid-draw;
            // the generator state is still usable.
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            select_mirror(&candidates, &mut *rng).cloned()
        };

        match selected {
            Some(mirror) => Ok(Some(join_download_url(&mirror.base_url, &path))),
            None => {
                log::debug!(
                    "No {} mirror serves location {} in {}",
                    group,
                    location.id,
                    lang
                );
                Ok(None)
            }
        }
    }
}
