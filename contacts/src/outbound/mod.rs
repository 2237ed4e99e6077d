//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **contacts_api**: reqwest-backed client for the remote contacts service
//! - **persistence**: observable local contact store with an optional JSON
//!   snapshot
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod contacts_api;
pub mod persistence;
