use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use super::migrations::run_migrations;
use crate::core::config;
use crate::core::error::AppResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Per-connection setup applied by the pool to every new connection.
fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(config::storage::busy_timeout())?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Create a new database connection pool
///
/// Initializes a pool of up to [`config::storage::POOL_MAX_SIZE`] connections
/// and brings the schema up to date.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use ioibot::storage::create_pool;
///
/// let pool = create_pool("polls.sqlite")?;
/// # Ok::<(), ioibot::core::error::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(init_connection);
    let pool = Pool::builder().max_size(config::storage::POOL_MAX_SIZE).build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Create a single-connection in-memory pool with the schema applied
///
/// Every `:memory:` connection is its own database, so the pool is capped at
/// one connection. Used by tests and by tooling that needs a throwaway store.
pub fn create_memory_pool() -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(init_connection);
    let pool = Pool::builder().max_size(1).build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> AppResult<DbConnection> {
    Ok(pool.get()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        names
    }

    #[test]
    fn test_memory_pool_has_schema() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        let tables = table_names(&conn);
        assert!(tables.contains(&"polls".to_string()));
        assert!(tables.contains(&"votes".to_string()));
    }

    #[test]
    fn test_file_pool_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polls.sqlite");
        let path = path.to_str().unwrap();

        let first = create_pool(path).unwrap();
        drop(first);
        // Reopening must not try to re-apply V1/V2.
        let second = create_pool(path).unwrap();
        let conn = get_connection(&second).unwrap();
        assert!(table_names(&conn).contains(&"polls".to_string()));
    }

    #[test]
    fn test_foreign_keys_enabled_on_pooled_connections() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        let enabled: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(enabled, 1);
    }
}
