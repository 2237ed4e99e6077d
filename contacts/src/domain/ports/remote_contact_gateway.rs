//! Driven port for the remote contacts service.
//!
//! The domain owns the remote record shape and the classified result type,
//! so the synchronising repository stays adapter-agnostic. Every operation
//! is a single attempt; adapters never retry or cache.

use async_trait::async_trait;

use crate::domain::{Contact, RemoteResult};

use super::define_port_error;

/// One contact as the remote service reports it.
///
/// `created_at` and `updated_at` are opaque server values; nothing in the
/// domain interprets or compares them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteContact {
    /// Server-assigned identity.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Avatar URL.
    pub image_url: String,
    /// Server creation stamp, if reported.
    pub created_at: Option<String>,
    /// Server update stamp, if reported.
    pub updated_at: Option<String>,
}

impl RemoteContact {
    /// Drop the server stamps and return the domain contact.
    pub fn into_contact(self) -> Contact {
        Contact {
            id: self.id,
            name: self.name,
            last_name: self.last_name,
            phone: self.phone,
            image_url: self.image_url,
        }
    }
}

impl From<Contact> for RemoteContact {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            last_name: contact.last_name,
            phone: contact.phone,
            image_url: contact.image_url,
            created_at: None,
            updated_at: None,
        }
    }
}

define_port_error! {
    /// Failures raised before a response was obtained.
    ///
    /// # Examples
    /// ```
    /// use contacts::domain::ErrorCode;
    /// use contacts::domain::ports::TransportError;
    ///
    /// assert_eq!(TransportError::timeout("30s").error_code(), ErrorCode::Timeout);
    /// assert_eq!(TransportError::decode("eof").error_code(), ErrorCode::Unknown);
    /// ```
    pub enum TransportError {
        /// The host could not be resolved or reached.
        UnresolvableHost("remote host unreachable") => NoInternet,
        /// The transport gave up waiting.
        Timeout("remote call timed out") => Timeout,
        /// The response arrived but its payload could not be decoded.
        Decode("remote payload decode failed") => Unknown,
        /// Any other transport failure.
        Other("remote call failed") => Unknown,
    }
}

/// Port for the remote contacts API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteContactGateway: Send + Sync {
    /// `GET /contacts`.
    async fn get_all(&self) -> RemoteResult<Vec<RemoteContact>>;

    /// `GET /contacts?q={query}`.
    async fn search(&self, query: &str) -> RemoteResult<Vec<RemoteContact>>;

    /// `POST /contacts`.
    ///
    /// On success the returned record is canonical and may carry a
    /// server-assigned id.
    async fn create(&self, contact: &Contact) -> RemoteResult<RemoteContact>;

    /// `PUT /contacts/{id}` with the full replacement body.
    async fn update(&self, contact: &Contact) -> RemoteResult<RemoteContact>;

    /// `DELETE /contacts/{id}`.
    async fn delete(&self, id: i64) -> RemoteResult<()>;

    /// `POST /contacts/batch-delete` with the ids of `contacts`.
    async fn delete_many(&self, contacts: &[Contact]) -> RemoteResult<()>;
}

/// Gateway that behaves like a device with no connectivity.
///
/// Every call resolves to an [`RemoteResult::Exception`] carrying
/// [`TransportError::UnresolvableHost`], so repositories built on it run in
/// pure local mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRemoteContactGateway;

impl FixtureRemoteContactGateway {
    fn offline<T>() -> RemoteResult<T> {
        RemoteResult::Exception(TransportError::unresolvable_host("offline fixture"))
    }
}

#[async_trait]
impl RemoteContactGateway for FixtureRemoteContactGateway {
    async fn get_all(&self) -> RemoteResult<Vec<RemoteContact>> {
        Self::offline()
    }

    async fn search(&self, _query: &str) -> RemoteResult<Vec<RemoteContact>> {
        Self::offline()
    }

    async fn create(&self, _contact: &Contact) -> RemoteResult<RemoteContact> {
        Self::offline()
    }

    async fn update(&self, _contact: &Contact) -> RemoteResult<RemoteContact> {
        Self::offline()
    }

    async fn delete(&self, _id: i64) -> RemoteResult<()> {
        Self::offline()
    }

    async fn delete_many(&self, _contacts: &[Contact]) -> RemoteResult<()> {
        Self::offline()
    }
}
