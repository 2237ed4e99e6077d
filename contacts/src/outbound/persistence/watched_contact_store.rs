//! Observable contact store backed by a `tokio::sync::watch` snapshot.
//!
//! Every subscriber sees the current rows on first poll and each published
//! change afterwards. Mutations are serialised through a write lock, written
//! to the optional snapshot file, and only then published.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::snapshot_file::SnapshotFile;
use crate::domain::Contact;
use crate::domain::ports::{ContactStoreError, ContactStream, LocalContactStore, SearchPattern};

type Rows = Arc<Vec<Contact>>;

/// Local contact store with live queries.
///
/// # Examples
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), contacts::domain::ports::ContactStoreError> {
/// use futures_util::StreamExt;
/// use contacts::domain::Contact;
/// use contacts::domain::ports::LocalContactStore;
/// use contacts::outbound::persistence::WatchedContactStore;
///
/// let store = WatchedContactStore::in_memory();
/// let saved = store.upsert(&Contact::new("Ada", "Lovelace", "8095550100", "")).await?;
/// assert_eq!(saved.id, 1);
///
/// let mut all = store.observe_all();
/// assert_eq!(all.next().await, Some(vec![saved]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WatchedContactStore {
    rows: watch::Sender<Rows>,
    snapshot: Option<SnapshotFile>,
    write_lock: Mutex<()>,
}

impl WatchedContactStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_rows(Vec::new(), None)
    }

    /// Store persisted to the JSON snapshot at `path`.
    ///
    /// A missing file starts an empty store; the file is created on the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ContactStoreError`] when the snapshot exists but cannot be
    /// read or decoded.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ContactStoreError> {
        let snapshot = SnapshotFile::new(path)?;
        let loader = snapshot.clone();
        let rows = run_blocking(move || loader.load()).await?;
        debug!(
            path = %snapshot.path().display(),
            rows = rows.len(),
            "opened contact snapshot"
        );
        Ok(Self::with_rows(rows, Some(snapshot)))
    }

    fn with_rows(mut rows: Vec<Contact>, snapshot: Option<SnapshotFile>) -> Self {
        sort_rows(&mut rows);
        let (sender, _) = watch::channel(Arc::new(rows));
        Self {
            rows: sender,
            snapshot,
            write_lock: Mutex::new(()),
        }
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    fn observe_filtered<F>(&self, keep: F) -> ContactStream
    where
        F: Fn(&Contact) -> bool + Send + Sync + 'static,
    {
        WatchStream::new(self.rows.subscribe())
            .map(move |rows| rows.iter().filter(|row| keep(row)).cloned().collect())
            .boxed()
    }

    async fn mutate<T, F>(&self, apply: F) -> Result<T, ContactStoreError>
    where
        F: FnOnce(&mut Vec<Contact>) -> T,
    {
        let _guard = self.write_lock.lock().await;
        let mut next = self.rows.borrow().as_ref().clone();
        let output = apply(&mut next);
        sort_rows(&mut next);

        if let Some(snapshot) = &self.snapshot {
            let file = snapshot.clone();
            let rows = next.clone();
            run_blocking(move || file.save(&rows)).await?;
        }

        self.rows.send_replace(Arc::new(next));
        Ok(output)
    }
}

fn sort_rows(rows: &mut [Contact]) {
    rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

fn next_id(rows: &[Contact]) -> i64 {
    rows.iter().map(|row| row.id).max().unwrap_or(0).saturating_add(1)
}

async fn run_blocking<T, F>(work: F) -> Result<T, ContactStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ContactStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| ContactStoreError::io(format!("snapshot task failed: {error}")))?
}

#[async_trait]
impl LocalContactStore for WatchedContactStore {
    fn observe_all(&self) -> ContactStream {
        self.observe_filtered(|_| true)
    }

    fn observe_search(&self, pattern: &SearchPattern) -> ContactStream {
        let pattern = pattern.clone();
        self.observe_filtered(move |contact| pattern.matches(contact))
    }

    async fn upsert(&self, contact: &Contact) -> Result<Contact, ContactStoreError> {
        let contact = contact.clone();
        self.mutate(move |rows| {
            let stored = if contact.is_unsaved() {
                contact.with_id(next_id(rows))
            } else {
                contact
            };
            match rows.iter_mut().find(|row| row.id == stored.id) {
                Some(existing) => existing.clone_from(&stored),
                None => rows.push(stored.clone()),
            }
            stored
        })
        .await
    }

    async fn delete(&self, contact: &Contact) -> Result<(), ContactStoreError> {
        let id = contact.id;
        self.mutate(move |rows| rows.retain(|row| row.id != id))
            .await
    }

    async fn delete_many(&self, contacts: &[Contact]) -> Result<(), ContactStoreError> {
        let ids = contacts.iter().map(|contact| contact.id).collect::<Vec<_>>();
        self.mutate(move |rows| rows.retain(|row| !ids.contains(&row.id)))
            .await
    }
}

#[cfg(test)]
#[path = "watched_contact_store_tests.rs"]
mod tests;
