//! Domain primitives, ports, and services.
//!
//! Purpose: Define the contact entity, the error taxonomy shared by every
//! layer, the classified remote result, and the offline-first repository
//! with its use cases. Adapters live in `outbound` and only see these types
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Contact (alias to `contact::Contact`): address-book entry.
//! - Error / ErrorCode: tagged failures reported to callers.
//! - RemoteResult / classify / handle_error: remote call classification.
//! - SyncingContactRepository: local-first repository over the ports.
//! - Use cases: validated entry points over `ContactRepository`.

pub mod contact;
pub mod contact_sync_repository;
pub mod contact_use_cases;
pub mod error;
pub mod ports;
pub mod remote_result;

pub use self::contact::{Contact, UNASSIGNED_CONTACT_ID};
pub use self::contact_sync_repository::{
    SyncOutcome, SyncingContactRepository, refresh_from_remote,
};
pub use self::contact_use_cases::{
    CreateContactUseCase, DeleteContactsUseCase, GetContactsUseCase, SearchContactsUseCase,
    SyncContactsUseCase, UpdateContactUseCase, validate_contact,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::remote_result::{RemoteResult, TransportResponse, classify, handle_error};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use contacts::domain::{Contact, DomainResult, Error};
///
/// fn require_phone(contact: &Contact) -> DomainResult<()> {
///     if contact.phone.is_empty() {
///         return Err(Error::phone_required());
///     }
///     Ok(())
/// }
///
/// assert!(require_phone(&Contact::new("Ada", "Lovelace", "", "")).is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
