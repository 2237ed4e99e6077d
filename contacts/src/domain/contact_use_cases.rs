//! Contact use cases.
//!
//! Each use case wraps one repository operation. The write use cases run
//! field validation first so blank input never reaches the network or the
//! local store.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::debug;

use crate::domain::ports::{ContactRepository, ContactStream};
use crate::domain::{Contact, Error};

/// Check that name, last name, and phone are non-blank, in that order.
///
/// The first blank field wins; later fields are not inspected.
///
/// # Examples
/// ```
/// use contacts::domain::{Contact, ErrorCode, validate_contact};
///
/// let blank = Contact::new("  ", "", "", "");
/// let error = validate_contact(&blank).expect_err("name is blank");
/// assert_eq!(error.code(), ErrorCode::NameRequired);
/// ```
///
/// # Errors
///
/// Returns [`ErrorCode::NameRequired`](crate::domain::ErrorCode::NameRequired),
/// [`ErrorCode::LastNameRequired`](crate::domain::ErrorCode::LastNameRequired), or
/// [`ErrorCode::PhoneRequired`](crate::domain::ErrorCode::PhoneRequired).
pub fn validate_contact(contact: &Contact) -> Result<(), Error> {
    if is_blank(&contact.name) {
        return Err(Error::name_required());
    }
    if is_blank(&contact.last_name) {
        return Err(Error::last_name_required());
    }
    if is_blank(&contact.phone) {
        return Err(Error::phone_required());
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate and create a contact.
pub struct CreateContactUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> CreateContactUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate `contact` and insert it.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, or whatever the repository
    /// reports for the insert.
    pub async fn execute(&self, contact: Contact) -> Result<(), Error> {
        validate_contact(&contact)?;
        self.repository.insert_contact(contact).await
    }
}

/// Validate and replace a contact.
pub struct UpdateContactUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> UpdateContactUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate `contact` and send the replacement.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure or the classified remote
    /// failure; the local store is only touched on remote success.
    pub async fn execute(&self, contact: Contact) -> Result<(), Error> {
        validate_contact(&contact)?;
        self.repository.update_contact(contact).await
    }
}

/// Delete one or more contacts.
pub struct DeleteContactsUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> DeleteContactsUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Delete every contact in `contacts`. An empty slice does nothing.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the local delete fails.
    pub async fn execute(&self, contacts: &[Contact]) -> Result<(), Error> {
        if contacts.is_empty() {
            debug!("nothing selected for deletion");
            return Ok(());
        }
        self.repository.delete_multiple_contacts(contacts).await
    }
}

/// Live search over local contacts.
pub struct SearchContactsUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> SearchContactsUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stream contacts matching the trimmed `query`.
    ///
    /// A blank query yields a single empty list without consulting the
    /// repository.
    pub fn execute(&self, query: &str) -> ContactStream {
        let query = query.trim();
        if query.is_empty() {
            return stream::iter([Vec::new()]).boxed();
        }
        self.repository.search_contacts(query)
    }
}

/// Live list of every contact.
pub struct GetContactsUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> GetContactsUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stream every contact, starting from the cached rows.
    pub fn execute(&self) -> ContactStream {
        self.repository.get_contacts()
    }
}

/// On-demand refresh from the remote service.
pub struct SyncContactsUseCase<R> {
    repository: Arc<R>,
}

impl<R: ContactRepository> SyncContactsUseCase<R> {
    /// Create the use case over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Run one sync pass.
    ///
    /// # Errors
    ///
    /// Returns an error only when the local store rejects a synced row.
    pub async fn execute(&self) -> Result<(), Error> {
        self.repository.force_sync().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockContactRepository;
    use rstest::rstest;

    fn ada() -> Contact {
        Contact::new("Ada", "Lovelace", "8095550100", "")
    }

    #[rstest]
    #[case(Contact::new("", "", "", ""), ErrorCode::NameRequired)]
    #[case(Contact::new(" \t", "Lovelace", "1", ""), ErrorCode::NameRequired)]
    #[case(Contact::new("Ada", "  ", "", ""), ErrorCode::LastNameRequired)]
    #[case(Contact::new("Ada", "Lovelace", " ", ""), ErrorCode::PhoneRequired)]
    fn validation_reports_the_first_blank_field(
        #[case] contact: Contact,
        #[case] expected: ErrorCode,
    ) {
        let error = validate_contact(&contact).expect_err("contact is invalid");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn validation_ignores_the_image_url() {
        assert!(validate_contact(&ada()).is_ok());
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_touching_the_repository() {
        let mut repository = MockContactRepository::new();
        repository.expect_insert_contact().never();
        let use_case = CreateContactUseCase::new(Arc::new(repository));

        let error = use_case
            .execute(Contact::new("Ada", "", "8095550100", ""))
            .await
            .expect_err("last name is blank");
        assert_eq!(error.code(), ErrorCode::LastNameRequired);
    }

    #[tokio::test]
    async fn create_forwards_valid_contacts_unchanged() {
        let mut repository = MockContactRepository::new();
        repository
            .expect_insert_contact()
            .withf(|contact| *contact == ada())
            .times(1)
            .returning(|_| Ok(()));
        let use_case = CreateContactUseCase::new(Arc::new(repository));

        use_case.execute(ada()).await.expect("insert succeeds");
    }

    #[tokio::test]
    async fn create_returns_repository_failures_unchanged() {
        let failure = Error::unknown("contact store serialization failed: bad row");
        let returned = failure.clone();
        let mut repository = MockContactRepository::new();
        repository
            .expect_insert_contact()
            .times(1)
            .returning(move |_| Err(returned.clone()));
        let use_case = CreateContactUseCase::new(Arc::new(repository));

        let error = use_case.execute(ada()).await.expect_err("repository fails");
        assert_eq!(error, failure);
    }

    #[tokio::test]
    async fn update_validates_before_delegating() {
        let mut repository = MockContactRepository::new();
        repository.expect_update_contact().never();
        let use_case = UpdateContactUseCase::new(Arc::new(repository));

        let error = use_case
            .execute(Contact::new("Ada", "Lovelace", "", "").with_id(3))
            .await
            .expect_err("phone is blank");
        assert_eq!(error.code(), ErrorCode::PhoneRequired);
    }

    #[tokio::test]
    async fn update_surfaces_repository_failures() {
        let mut repository = MockContactRepository::new();
        repository
            .expect_update_contact()
            .times(1)
            .returning(|_| Err(Error::from_code(ErrorCode::NotFound)));
        let use_case = UpdateContactUseCase::new(Arc::new(repository));

        let error = use_case
            .execute(ada().with_id(3))
            .await
            .expect_err("remote rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn deleting_nothing_is_a_no_op() {
        let mut repository = MockContactRepository::new();
        repository.expect_delete_multiple_contacts().never();
        let use_case = DeleteContactsUseCase::new(Arc::new(repository));

        use_case.execute(&[]).await.expect("no-op succeeds");
    }

    #[tokio::test]
    async fn delete_forwards_the_selection() {
        let selection = vec![ada().with_id(1), ada().with_id(2)];
        let expected = selection.clone();
        let mut repository = MockContactRepository::new();
        repository
            .expect_delete_multiple_contacts()
            .withf(move |contacts| contacts == expected.as_slice())
            .times(1)
            .returning(|_| Ok(()));
        let use_case = DeleteContactsUseCase::new(Arc::new(repository));

        use_case.execute(&selection).await.expect("delete succeeds");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_search_yields_one_empty_list(#[case] query: &str) {
        let mut repository = MockContactRepository::new();
        repository.expect_search_contacts().never();
        let use_case = SearchContactsUseCase::new(Arc::new(repository));

        let emissions = use_case.execute(query).collect::<Vec<_>>().await;
        assert_eq!(emissions, vec![Vec::<Contact>::new()]);
    }

    #[tokio::test]
    async fn search_trims_the_query() {
        let mut repository = MockContactRepository::new();
        repository
            .expect_search_contacts()
            .withf(|query| query == "ada")
            .times(1)
            .returning(|_| stream::iter([vec![ada()]]).boxed());
        let use_case = SearchContactsUseCase::new(Arc::new(repository));

        let emissions = use_case.execute("  ada ").collect::<Vec<_>>().await;
        assert_eq!(emissions, vec![vec![ada()]]);
    }

    #[tokio::test]
    async fn get_and_sync_delegate_to_the_repository() {
        let mut repository = MockContactRepository::new();
        repository
            .expect_get_contacts()
            .times(1)
            .returning(|| stream::iter([vec![ada()]]).boxed());
        repository.expect_force_sync().times(1).returning(|| Ok(()));
        let repository = Arc::new(repository);

        let listed = GetContactsUseCase::new(Arc::clone(&repository))
            .execute()
            .next()
            .await;
        assert_eq!(listed, Some(vec![ada()]));
        SyncContactsUseCase::new(repository)
            .execute()
            .await
            .expect("sync succeeds");
    }
}
