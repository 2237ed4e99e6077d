//! Contact entity.

use serde::{Deserialize, Serialize};

/// Identifier carried by contacts that have not been persisted yet.
pub const UNASSIGNED_CONTACT_ID: i64 = 0;

/// A single address-book entry.
///
/// Contacts are plain values: equality is structural over every field, and
/// updates replace the whole record. Field-level checks (non-blank name,
/// last name, phone) are applied by the use cases before a contact reaches
/// the repository, not by this type.
///
/// # Examples
/// ```
/// use contacts::domain::Contact;
///
/// let contact = Contact::new("Ada", "Lovelace", "8095550100", "");
/// assert!(contact.is_unsaved());
/// assert_eq!(contact.with_id(7).id, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store or server assigned identity; `0` until persisted.
    #[serde(default)]
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number as a digit string.
    pub phone: String,
    /// Avatar URL; empty means the UI renders initials instead.
    #[serde(default)]
    pub image_url: String,
}

impl Contact {
    /// Build an unsaved contact.
    pub fn new(
        name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_CONTACT_ID,
            name: name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            image_url: image_url.into(),
        }
    }

    /// Return a copy carrying `id`.
    #[must_use]
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Whether the contact still lacks a persisted identity.
    pub fn is_unsaved(&self) -> bool {
        self.id == UNASSIGNED_CONTACT_ID
    }

    /// Name and last name joined by a single space.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}
