pub mod file;
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod sqlite;

use anyhow::Context;
use rusqlite::Connection;

use crate::config::{AppConfig, StorageBackend};
use crate::errors::BookingError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::BookingRepository;
pub use sqlite::SqliteStore;

/// Key-value blob storage. Values are opaque strings; the booking list is
/// kept as one JSON document under a fixed key.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, BookingError>;
    fn put(&self, key: &str, value: &str) -> Result<(), BookingError>;
}

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

pub fn open_store(config: &AppConfig) -> anyhow::Result<Box<dyn BlobStore>> {
    let store: Box<dyn BlobStore> = match config.storage_backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::File => Box::new(
            FileStore::open(&config.storage_path)
                .with_context(|| format!("failed to open storage dir {}", config.storage_path))?,
        ),
        StorageBackend::Sqlite => Box::new(SqliteStore::new(init_db(&config.storage_path)?)),
    };
    tracing::info!(
        backend = ?config.storage_backend,
        path = %config.storage_path,
        "booking storage ready"
    );
    Ok(store)
}
