// storage/mod.rs
// SQLite catalog store

pub mod catalog;
pub mod migrations;
pub mod pool;
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use catalog::SqliteCatalog;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
