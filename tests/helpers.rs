// Shared test helpers for catalog setup and seeding.
//
// Integration tests run against a real SQLite file in a temporary directory,
// opened the same way the binary opens its database.

use sqlx::SqlitePool;
use tempfile::TempDir;

use mirror_bouncer::run_migrations;
use mirror_bouncer::storage::init_db_pool_with_path;

/// A migrated catalog database that lives as long as this value.
pub struct TestCatalog {
    pub pool: SqlitePool,
    _dir: TempDir,
}

/// Creates a file-backed catalog with migrations applied.
pub async fn create_test_catalog() -> TestCatalog {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let pool = init_db_pool_with_path(&dir.path().join("catalog.db"))
        .await
        .expect("Failed to open test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    TestCatalog { pool, _dir: dir }
}

/// Seeds `firefox-latest -> Firefox` on `win64` with the given path template
/// and returns the location id.
#[allow(dead_code)] // Used by other test files
pub async fn seed_firefox(pool: &SqlitePool, path: &str) -> i64 {
    sqlx::query("INSERT INTO aliases (alias, related_product) VALUES ('firefox-latest', 'Firefox')")
        .execute(pool)
        .await
        .expect("Failed to insert alias");
    let os_id: i64 = sqlx::query_scalar("INSERT INTO operating_systems (name) VALUES ('win64') RETURNING id")
        .fetch_one(pool)
        .await
        .expect("Failed to insert OS");
    let product_id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, ssl_only, active, check_now) VALUES ('Firefox', 0, 1, 0)
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("Failed to insert product");
    sqlx::query("INSERT INTO product_languages (product_id, language) VALUES (?, 'en-US')")
        .bind(product_id)
        .execute(pool)
        .await
        .expect("Failed to insert product language");
    sqlx::query_scalar("INSERT INTO locations (product_id, os_id, path) VALUES (?, ?, ?) RETURNING id")
        .bind(product_id)
        .bind(os_id)
        .bind(path)
        .fetch_one(pool)
        .await
        .expect("Failed to insert location")
}

#[allow(dead_code)] // Used by other test files
pub async fn add_mirror(pool: &SqlitePool, name: &str, base_url: &str, rating: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO mirrors (name, base_url, rating, active, healthy) VALUES (?, ?, ?, 1, 1)
         RETURNING id",
    )
    .bind(name)
    .bind(base_url)
    .bind(rating)
    .fetch_one(pool)
    .await
    .expect("Failed to insert mirror")
}

#[allow(dead_code)] // Used by other test files
pub async fn add_mapping(pool: &SqlitePool, location_id: i64, mirror_id: i64, healthy: bool) {
    sqlx::query(
        "INSERT INTO location_mirror_map (location_id, mirror_id, active, healthy) VALUES (?, ?, 1, ?)",
    )
    .bind(location_id)
    .bind(mirror_id)
    .bind(healthy)
    .execute(pool)
    .await
    .expect("Failed to insert mapping");
}

/// Reads back a mapping as `(active, healthy)`.
#[allow(dead_code)] // Used by other test files
pub async fn mapping(pool: &SqlitePool, location_id: i64, mirror_id: i64) -> Option<(bool, bool)> {
    sqlx::query_as(
        "SELECT active, healthy FROM location_mirror_map WHERE location_id = ? AND mirror_id = ?",
    )
    .bind(location_id)
    .bind(mirror_id)
    .fetch_optional(pool)
    .await
    .expect("Failed to fetch mapping")
}
