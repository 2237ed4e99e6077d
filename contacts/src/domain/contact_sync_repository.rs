//! Synchronising contact repository.
//!
//! Composes the local store and the remote gateway:
//!
//! | Operation            | Remote fails                | Effect                              |
//! |----------------------|-----------------------------|-------------------------------------|
//! | list / search        | ignored                     | local data is served unchanged      |
//! | insert               | absorbed                    | caller's contact is stored locally  |
//! | delete / delete-many | absorbed                    | rows are still removed locally      |
//! | update               | surfaced                    | local store untouched               |
//! | force sync           | absorbed                    | `Ok` unless the store rejects a row |
//!
//! There is no outbox: a write that fails remotely is not retried.

use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    ContactRepository, ContactStoreError, ContactStream, LocalContactStore, RemoteContactGateway,
    SearchPattern,
};
use crate::domain::{Contact, Error, ErrorCode, RemoteResult, handle_error};

/// Result of one best-effort sync pass.
///
/// Nothing here is an error in the `Result` sense: the read path discards
/// the outcome and keeps serving local data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote records were upserted into the local store.
    Refreshed {
        /// Number of rows written.
        upserted: usize,
    },
    /// The remote call failed; local data was left as-is.
    RemoteUnavailable {
        /// Category of the remote failure.
        code: ErrorCode,
    },
    /// The store rejected a row part-way through the pass.
    StoreFailed {
        /// Store error description.
        message: String,
    },
}

/// Fetch every remote contact and upsert each one locally.
///
/// Remote failures leave the store untouched. Upserts stop at the first
/// store failure; rows written before it stay written.
///
/// # Examples
///
/// ```rust,ignore
/// let outcome = refresh_from_remote(store.as_ref(), gateway.as_ref()).await;
/// assert!(matches!(outcome, SyncOutcome::RemoteUnavailable { .. }));
/// ```
pub async fn refresh_from_remote<S, G>(store: &S, gateway: &G) -> SyncOutcome
where
    S: LocalContactStore + ?Sized,
    G: RemoteContactGateway + ?Sized,
{
    let records = match gateway.get_all().await {
        RemoteResult::Success(records) => records,
        failure => {
            let code = failure.failure_code().unwrap_or(ErrorCode::Unknown);
            debug!(%code, "sync pass skipped, keeping local contacts");
            return SyncOutcome::RemoteUnavailable { code };
        }
    };

    let mut upserted = 0_usize;
    for record in records {
        if let Err(error) = store.upsert(&record.into_contact()).await {
            warn!(%error, upserted, "sync pass aborted by store failure");
            return SyncOutcome::StoreFailed {
                message: error.to_string(),
            };
        }
        upserted += 1;
    }
    debug!(upserted, "sync pass refreshed local contacts");
    SyncOutcome::Refreshed { upserted }
}

/// Offline-first repository over a local store and a remote gateway.
pub struct SyncingContactRepository<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
}

impl<S, G> Clone for SyncingContactRepository<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<S, G> SyncingContactRepository<S, G> {
    /// Create a repository over explicitly constructed collaborators.
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self { store, gateway }
    }
}

impl<S, G> SyncingContactRepository<S, G>
where
    S: LocalContactStore,
    G: RemoteContactGateway,
{
    /// Run one sync pass and report what happened.
    pub async fn refresh(&self) -> SyncOutcome {
        refresh_from_remote(self.store.as_ref(), self.gateway.as_ref()).await
    }

    fn store_failure(operation: &'static str, error: &ContactStoreError) -> Error {
        warn!(operation, %error, "local store rejected write");
        Error::new(error.error_code(), error.to_string())
            .with_details(json!({ "operation": operation }))
    }
}

#[async_trait]
impl<S, G> ContactRepository for SyncingContactRepository<S, G>
where
    S: LocalContactStore + 'static,
    G: RemoteContactGateway + 'static,
{
    fn get_contacts(&self) -> ContactStream {
        let store = Arc::clone(&self.store);
        let gateway = Arc::clone(&self.gateway);

        Box::pin(stream! {
            let mut local = store.observe_all();
            let Some(cached) = local.next().await else {
                return;
            };

            // The pass outlives this subscriber: it refreshes the shared store
            // even when the caller stops after the cached snapshot.
            tokio::spawn(async move {
                let outcome = refresh_from_remote(store.as_ref(), gateway.as_ref()).await;
                debug!(?outcome, "background sync settled");
            });

            yield cached;
            while let Some(contacts) = local.next().await {
                yield contacts;
            }
        })
    }

    fn search_contacts(&self, query: &str) -> ContactStream {
        self.store.observe_search(&SearchPattern::contains(query))
    }

    async fn insert_contact(&self, contact: Contact) -> Result<(), Error> {
        let row = match self.gateway.create(&contact).await {
            RemoteResult::Success(remote) => {
                debug!(id = remote.id, "remote create accepted");
                remote.into_contact()
            }
            failure => {
                let code = failure.failure_code().unwrap_or(ErrorCode::Unknown);
                warn!(%code, "remote create failed, storing contact locally only");
                contact
            }
        };

        self.store
            .upsert(&row)
            .await
            .map(|_| ())
            .map_err(|error| Self::store_failure("insert", &error))
    }

    async fn delete_contact(&self, contact: &Contact) -> Result<(), Error> {
        let remote = self.gateway.delete(contact.id).await;
        if let Some(code) = remote.failure_code() {
            warn!(id = contact.id, %code, "remote delete failed, deleting locally anyway");
        }

        self.store
            .delete(contact)
            .await
            .map_err(|error| Self::store_failure("delete", &error))
    }

    async fn delete_multiple_contacts(&self, contacts: &[Contact]) -> Result<(), Error> {
        if contacts.is_empty() {
            return Ok(());
        }

        let remote = self.gateway.delete_many(contacts).await;
        if let Some(code) = remote.failure_code() {
            warn!(
                count = contacts.len(),
                %code,
                "remote batch delete failed, deleting locally anyway"
            );
        }

        self.store
            .delete_many(contacts)
            .await
            .map_err(|error| Self::store_failure("delete_many", &error))
    }

    async fn update_contact(&self, contact: Contact) -> Result<(), Error> {
        let result = self.gateway.update(&contact).await;
        match result {
            RemoteResult::Success(remote) => self
                .store
                .upsert(&remote.into_contact())
                .await
                .map(|_| ())
                .map_err(|error| Self::store_failure("update", &error)),
            RemoteResult::Error { code, .. } => {
                let message = handle_error(&result);
                let category = result.failure_code().unwrap_or(ErrorCode::Unknown);
                debug!(id = contact.id, status = ?code, %category, "remote update rejected");
                Err(Error::new(category, message))
            }
            RemoteResult::Exception(cause) => {
                debug!(id = contact.id, %cause, "remote update failed in transport");
                Err(Error::new(cause.error_code(), cause.to_string()))
            }
        }
    }

    async fn force_sync(&self) -> Result<(), Error> {
        match self.refresh().await {
            SyncOutcome::StoreFailed { message } => Err(Error::unknown(message)),
            SyncOutcome::Refreshed { .. } | SyncOutcome::RemoteUnavailable { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "contact_sync_repository_tests.rs"]
mod tests;
