//! On-disk row shape for the contact snapshot file.
//!
//! Rows are an implementation detail of the persistence layer; the domain
//! only ever sees [`Contact`].

use serde::{Deserialize, Serialize};

use crate::domain::Contact;

/// One persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContactRow {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            last_name: contact.last_name.clone(),
            phone: contact.phone.clone(),
            image_url: contact.image_url.clone(),
        }
    }
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            phone: row.phone,
            image_url: row.image_url,
        }
    }
}
