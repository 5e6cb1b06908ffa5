//! PageKeeper database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value contract used as local storage.
//!
//! # Usage
//!
//! ```no_run
//! use pagekeeper::database::{Database, KeyValueStore};
//!
//! let db = Database::open("pagekeeper.db").expect("failed to open database");
//! let bookmarks = db.get("bookmarks").expect("read failed");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::{Database, KeyValueStore};
