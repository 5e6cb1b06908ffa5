//! SQLite database connection management for PageKeeper.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`,
//! runs schema migrations on open, and exposes the JSON key-value contract
//! the rest of the agent treats as local storage.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::migrations;
use crate::types::errors::StorageError;

/// Durable key-value storage holding one JSON document per key.
///
/// Reads and writes are individually atomic but a read followed by a write
/// is not; callers doing read-modify-write accept lost updates.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;
}

/// Core database wrapper providing SQLite connection management.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing; the database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks and returns the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("connection lock poisoned: {}", e)))
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let conn = self.connection()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        let now = chrono::Utc::now().timestamp();
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, now],
        )?;
        Ok(())
    }
}
