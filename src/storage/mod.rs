//! Database connection pool, migrations, and the poll store

pub mod db;
pub mod migrations;
pub mod polls;

// Re-exports for convenience
pub use db::{create_memory_pool, create_pool, get_connection, DbConnection, DbPool};
pub use polls::PollStore;
