//! Driving port exposing the offline-first contact repository.
//!
//! Use cases depend on this trait rather than on the synchronising
//! implementation, so their validation rules can be tested in isolation.

use async_trait::async_trait;

use crate::domain::{Contact, Error};

use super::ContactStream;

/// Offline-first contact repository.
///
/// Reads are served from the local store; writes attempt the remote service
/// first. See the synchronising implementation for the per-operation
/// fallback rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Every contact, re-emitted whenever the local store changes.
    fn get_contacts(&self) -> ContactStream;

    /// Contacts matching `query` in the local store.
    fn search_contacts(&self, query: &str) -> ContactStream;

    /// Create a contact, remote first with a local-only fallback.
    async fn insert_contact(&self, contact: Contact) -> Result<(), Error>;

    /// Delete one contact locally regardless of the remote outcome.
    async fn delete_contact(&self, contact: &Contact) -> Result<(), Error>;

    /// Delete several contacts locally regardless of the remote outcome.
    async fn delete_multiple_contacts(&self, contacts: &[Contact]) -> Result<(), Error>;

    /// Replace a contact remotely; remote failures are surfaced.
    async fn update_contact(&self, contact: Contact) -> Result<(), Error>;

    /// Run one background sync pass on demand.
    async fn force_sync(&self) -> Result<(), Error>;
}
