//! SQLite implementation of the catalog store.
//!
//! Flags are INTEGER 0/1 columns and are converted to `bool` here; nothing
//! above this module sees the column encoding.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::catalog::{
    CatalogStore, HealthLogEntry, Location, LocationFilter, MappingHealth, Mirror,
    MirrorCandidate, MirrorFilter, ProductMatch, SchemeGroup,
};
use crate::error_handling::StoreError;

/// Catalog backed by a SQLite pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn rating_from_column(rating: i64) -> u32 {
    // CHECK (rating >= 0) holds in the schema; saturate anything out of range
    u32::try_from(rating).unwrap_or(if rating < 0 { 0 } else { u32::MAX })
}

/// Escapes LIKE wildcards so `text` matches literally under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn alias_for(&self, name: &str) -> Result<String, StoreError> {
        let related: Option<String> =
            sqlx::query_scalar("SELECT related_product FROM aliases WHERE alias = ? COLLATE NOCASE")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(related.unwrap_or_else(|| name.to_string()))
    }

    async fn os_id(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar("SELECT id FROM operating_systems WHERE name = ? COLLATE NOCASE")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn product_for_language(
        &self,
        product: &str,
        lang: &str,
    ) -> Result<Option<ProductMatch>, StoreError> {
        // Exact language rows win over the unrestricted (NULL) row
        let row: Option<(i64, bool)> = sqlx::query_as(
            "SELECT prod.id, prod.ssl_only
             FROM products AS prod
             LEFT JOIN product_languages AS langs ON prod.id = langs.product_id
             WHERE prod.name = ? COLLATE NOCASE
               AND (langs.language = ? COLLATE NOCASE OR langs.language IS NULL)
             ORDER BY langs.language IS NULL, prod.id
             LIMIT 1",
        )
        .bind(product)
        .bind(lang)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, ssl_only)| ProductMatch { id, ssl_only }))
    }

    async fn location_for(
        &self,
        product_id: i64,
        os_id: i64,
    ) -> Result<Option<Location>, StoreError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, path FROM locations WHERE product_id = ? AND os_id = ?")
                .bind(product_id)
                .bind(os_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, path)| Location { id, path }))
    }

    async fn active_mirrors_for(
        &self,
        group: SchemeGroup,
        lang: &str,
        location_id: i64,
        healthy_only: bool,
    ) -> Result<Vec<MirrorCandidate>, StoreError> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT m.id, m.base_url, m.rating
             FROM mirrors AS m
             JOIN location_mirror_map AS lmm ON m.id = lmm.mirror_id
             WHERE lmm.location_id = ?
               AND m.active = 1
               AND lmm.active = 1
               AND (? = 0 OR (lmm.healthy = 1 AND m.healthy = 1))
               AND m.base_url LIKE ?
               AND NOT EXISTS (
                   SELECT 1 FROM location_mirror_language_exceptions AS exc
                   WHERE exc.location_id = lmm.location_id
                     AND exc.mirror_id = lmm.mirror_id
                     AND exc.language = ? COLLATE NOCASE
               )
             ORDER BY m.rating, m.id",
        )
        .bind(location_id)
        .bind(healthy_only)
        .bind(format!("{}%", group.prefix()))
        .bind(lang)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, base_url, rating)| MirrorCandidate {
                id,
                base_url,
                rating: rating_from_column(rating),
            })
            .collect())
    }

    async fn all_active_locations(
        &self,
        filter: LocationFilter,
    ) -> Result<Vec<Location>, StoreError> {
        let mut sql = String::from(
            "SELECT loc.id, loc.path
             FROM locations AS loc
             INNER JOIN products AS prod ON loc.product_id = prod.id
             WHERE prod.active = 1",
        );
        if filter == LocationFilter::CheckNowOnly {
            sql.push_str(" AND prod.check_now = 1");
        }
        sql.push_str(" ORDER BY loc.id");

        let rows: Vec<(i64, String)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(id, path)| Location { id, path })
            .collect())
    }

    async fn all_active_mirrors(&self, filter: &MirrorFilter) -> Result<Vec<Mirror>, StoreError> {
        let mut sql = String::from(
            "SELECT id, name, base_url, rating, active, healthy FROM mirrors WHERE active = 1",
        );
        match filter {
            MirrorFilter::All => {}
            MirrorFilter::Id(_) => sql.push_str(" AND id = ?"),
            MirrorFilter::Matching(_) => sql.push_str(
                " AND (base_url LIKE ? ESCAPE '\\' OR name LIKE ? ESCAPE '\\')",
            ),
        }
        sql.push_str(" ORDER BY name, id");

        let mut query = sqlx::query_as::<_, (i64, String, String, i64, bool, bool)>(&sql);
        match filter {
            MirrorFilter::All => {}
            MirrorFilter::Id(id) => query = query.bind(*id),
            MirrorFilter::Matching(text) => {
                let pattern = format!("%{}%", escape_like(text));
                query = query.bind(pattern.clone()).bind(pattern);
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, base_url, rating, active, healthy)| Mirror {
                id,
                name,
                base_url,
                rating: rating_from_column(rating),
                active,
                healthy,
            })
            .collect())
    }

    async fn upsert_location_mirror_health(
        &self,
        location_id: i64,
        mirror_id: i64,
        health: MappingHealth,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO location_mirror_map (location_id, mirror_id, active, healthy)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(location_id, mirror_id) DO UPDATE SET
                 active = excluded.active,
                 healthy = excluded.healthy",
        )
        .bind(location_id)
        .bind(mirror_id)
        .bind(health.active)
        .bind(health.healthy)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_mirror_health(&self, mirror_id: i64, healthy: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE mirrors SET healthy = ? WHERE id = ?")
            .bind(healthy)
            .bind(mirror_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownMirror(mirror_id));
        }
        Ok(())
    }

    async fn set_mirror_rating(&self, mirror_id: i64, rating: u32) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE mirrors SET rating = ? WHERE id = ?")
            .bind(i64::from(rating))
            .bind(mirror_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownMirror(mirror_id));
        }
        Ok(())
    }

    async fn append_health_log(&self, entry: &HealthLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sentry_log (log_date_ms, mirror_id, mirror_active, mirror_rating, reason)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.logged_at_ms)
        .bind(entry.mirror_id)
        .bind(entry.active)
        .bind(i64::from(entry.rating))
        .bind(&entry.reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
