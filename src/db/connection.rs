/// Database connection management with connection pooling
///
/// Provides a thread-safe connection pool to SQLite database.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Maximum number of database connections in the pool
const MAX_CONNECTIONS: u32 = 5;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl Database {
    /// Create a new database instance
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(Database)` - Successfully created database instance
    /// * `Err(ErrandError)` - If connection fails
    ///
    /// # Examples
    /// ```no_run
    /// use errand_lib::db::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new("/tmp/errand.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
            db_path,
        };

        db.initialize_schema().await?;
        tracing::debug!(path = %db.db_path.display(), "database ready");

        Ok(db)
    }

    /// Create a test database in memory
    ///
    /// Every pooled connection to `:memory:` is its own database, so the
    /// test pool is held to a single connection.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
            db_path: PathBuf::from(":memory:"),
        };

        db.initialize_schema().await?;

        Ok(db)
    }

    /// Initialize database schema
    ///
    /// Creates all required tables and indexes if they don't exist.
    async fn initialize_schema(&self) -> Result<()> {
        let schema = include_str!("../../database/schema.sql");

        // SQLite won't run several statements in one execute
        for statement in schema.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(self.pool.as_ref()).await?;
            }
        }

        Ok(())
    }

    /// Get reference to the connection pool
    ///
    /// Used internally by query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close all connections in the pool
    ///
    /// Should be called on application shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get database statistics
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let task_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(self.pool.as_ref())
            .await?;

        let note_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(self.pool.as_ref())
            .await?;

        let reminder_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reminders")
            .fetch_one(self.pool.as_ref())
            .await?;

        let event_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool.as_ref())
            .await?;

        let utterance_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversation_log")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(DatabaseStats {
            total_tasks: task_count.0,
            total_notes: note_count.0,
            total_reminders: reminder_count.0,
            total_events: event_count.0,
            total_utterances: utterance_count.0,
            pool_size: self.pool.size(),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub total_tasks: i64,
    pub total_notes: i64,
    pub total_reminders: i64,
    pub total_events: i64,
    pub total_utterances: i64,
    pub pool_size: u32,
}
