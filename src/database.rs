use deadpool_sqlite::{Config, CreatePoolError, Pool, PoolError, Runtime};
use log::debug;
use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Could not query database: {source}")]
    RusqliteError {
        #[from]
        source: rusqlite::Error,
    },
    #[error("Could not setup database connection pool: {source}")]
    CreatePoolError {
        #[from]
        source: CreatePoolError,
    },
    #[error("Could not get connection from pool: {source}")]
    PoolError {
        #[from]
        source: PoolError,
    },
    #[error("Database interaction failed: {0}")]
    InteractError(String),
    #[error("No database found at {}", .0.display())]
    MissingDatabase(PathBuf),
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Columns the service reads, per table. Anything else in the store is
/// ignored.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("measurement", &["date", "tobs"]),
    ("station", &["name"]),
];

/// Handle to the weather store.
///
/// Cloning is cheap, every clone shares the same connection pool.
#[derive(Clone)]
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Open the existing database at `file_path`.
    ///
    /// Fails if there is no file at the path; the store is never created
    /// here. The schema is checked before the handle is returned.
    pub async fn open(file_path: impl Into<PathBuf>) -> Result<Store, SqliteDatabaseError> {
        let file_path = file_path.into();
        if !file_path.is_file() {
            return Err(SqliteDatabaseError::MissingDatabase(file_path));
        }
        let pool = Config::new(&file_path).create_pool(Runtime::Tokio1)?;
        let store = Store { pool };
        store.read(verify_schema).await?;
        debug!("Opened database {}", file_path.display());
        Ok(store)
    }

    /// Run `f` on a pooled connection in query-only mode.
    ///
    /// The connection goes back to the pool once `f` returns.
    pub async fn read<F, T>(&self, f: F) -> Result<T, SqliteDatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, SqliteDatabaseError> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.pool.get().await?;
        connection
            .interact(move |conn| {
                conn.pragma_update(None, "query_only", true)?;
                f(&*conn)
            })
            .await
            .map_err(|err| SqliteDatabaseError::InteractError(err.to_string()))?
    }
}

pub fn verify_schema(connection: &Connection) -> Result<(), SqliteDatabaseError> {
    for &(table, columns) in REQUIRED_COLUMNS {
        let present = table_columns(connection, table)?;
        for &column in columns {
            if !present.iter().any(|c| c == column) {
                return Err(SqliteDatabaseError::MissingColumn { table, column });
            }
        }
        debug!("Table '{}' has columns {:?}", table, present);
    }
    Ok(())
}

fn table_columns(connection: &Connection, table: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut statement = connection.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = statement
        .query_map((table,), |row| row.get::<usize, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
