//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and catalog
//! seeding used across unit tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database held by a single connection.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn insert_alias(pool: &SqlitePool, alias: &str, product: &str) {
    sqlx::query("INSERT INTO aliases (alias, related_product) VALUES (?, ?)")
        .bind(alias)
        .bind(product)
        .execute(pool)
        .await
        .expect("Failed to insert alias");
}

pub async fn insert_os(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO operating_systems (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to insert OS")
}

pub async fn insert_product(
    pool: &SqlitePool,
    name: &str,
    ssl_only: bool,
    active: bool,
    check_now: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO products (name, ssl_only, active, check_now) VALUES (?, ?, ?, ?)
         RETURNING id",
    )
    .bind(name)
    .bind(ssl_only)
    .bind(active)
    .bind(check_now)
    .fetch_one(pool)
    .await
    .expect("Failed to insert product")
}

pub async fn insert_product_language(pool: &SqlitePool, product_id: i64, language: &str) {
    sqlx::query("INSERT INTO product_languages (product_id, language) VALUES (?, ?)")
        .bind(product_id)
        .bind(language)
        .execute(pool)
        .await
        .expect("Failed to insert product language");
}

pub async fn insert_location(pool: &SqlitePool, product_id: i64, os_id: i64, path: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO locations (product_id, os_id, path) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(product_id)
    .bind(os_id)
    .bind(path)
    .fetch_one(pool)
    .await
    .expect("Failed to insert location")
}

pub async fn insert_mirror(pool: &SqlitePool, name: &str, base_url: &str, rating: u32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO mirrors (name, base_url, rating, active, healthy) VALUES (?, ?, ?, 1, 1)
         RETURNING id",
    )
    .bind(name)
    .bind(base_url)
    .bind(i64::from(rating))
    .fetch_one(pool)
    .await
    .expect("Failed to insert mirror")
}

pub async fn insert_mapping(
    pool: &SqlitePool,
    location_id: i64,
    mirror_id: i64,
    active: bool,
    healthy: bool,
) {
    sqlx::query(
        "INSERT INTO location_mirror_map (location_id, mirror_id, active, healthy)
         VALUES (?, ?, ?, ?)",
    )
    .bind(location_id)
    .bind(mirror_id)
    .bind(active)
    .bind(healthy)
    .execute(pool)
    .await
    .expect("Failed to insert mapping");
}

pub async fn insert_language_exception(
    pool: &SqlitePool,
    location_id: i64,
    mirror_id: i64,
    language: &str,
) {
    sqlx::query(
        "INSERT INTO location_mirror_language_exceptions (location_id, mirror_id, language)
         VALUES (?, ?, ?)",
    )
    .bind(location_id)
    .bind(mirror_id)
    .bind(language)
    .execute(pool)
    .await
    .expect("Failed to insert language exception");
}

/// Reads back a mapping as `(active, healthy)`.
pub async fn fetch_mapping(
    pool: &SqlitePool,
    location_id: i64,
    mirror_id: i64,
) -> Option<(bool, bool)> {
    sqlx::query_as(
        "SELECT active, healthy FROM location_mirror_map WHERE location_id = ? AND mirror_id = ?",
    )
    .bind(location_id)
    .bind(mirror_id)
    .fetch_optional(pool)
    .await
    .expect("Failed to fetch mapping")
}
