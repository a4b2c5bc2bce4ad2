use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::BlobStore;
use crate::errors::BookingError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Expects a connection that has been through `init_db`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl BlobStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, BookingError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), BookingError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_get_missing_key() {
        let store = SqliteStore::new(db::init_db(":memory:").unwrap());
        assert_eq!(store.get("bookings").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = SqliteStore::new(db::init_db(":memory:").unwrap());
        store.put("bookings", "[]").unwrap();
        store.put("bookings", "[1]").unwrap();
        assert_eq!(store.get("bookings").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
