//! Local contact persistence.
//!
//! [`WatchedContactStore`] implements the domain's `LocalContactStore` port.
//! Rows live in a `tokio::sync::watch` channel so every query is a live
//! stream; an optional JSON snapshot keeps them across restarts.
//!
//! # Example
//!
//! ```ignore
//! use contacts::outbound::persistence::WatchedContactStore;
//!
//! let store = WatchedContactStore::open("contacts.json").await?;
//! ```

mod models;
mod snapshot_file;
mod watched_contact_store;

pub use snapshot_file::SnapshotFile;
pub use watched_contact_store::WatchedContactStore;
