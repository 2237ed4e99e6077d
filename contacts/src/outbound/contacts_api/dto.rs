//! Wire shapes for the contacts REST API.
//!
//! Field names are snake_case on the wire; mapping to and from domain types
//! is a pure rename with no validation.

use serde::{Deserialize, Serialize};

use crate::domain::Contact;
use crate::domain::ports::RemoteContact;

/// Contact record returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct ContactRemoteDto {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<ContactRemoteDto> for RemoteContact {
    fn from(dto: ContactRemoteDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            last_name: dto.last_name,
            phone: dto.phone,
            image_url: dto.image_url,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

/// Body for `POST /contacts` and `PUT /contacts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct ContactWriteRequest {
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub image_url: String,
}

impl From<&Contact> for ContactWriteRequest {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            last_name: contact.last_name.clone(),
            phone: contact.phone.clone(),
            image_url: contact.image_url.clone(),
        }
    }
}

/// Body for `POST /contacts/batch-delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct BatchDeleteRequest {
    pub ids: Vec<i64>,
}

impl From<&[Contact]> for BatchDeleteRequest {
    fn from(contacts: &[Contact]) -> Self {
        Self {
            ids: contacts.iter().map(|contact| contact.id).collect(),
        }
    }
}
