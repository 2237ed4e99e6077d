//! Reqwest-backed contacts API gateway.
//!
//! This adapter owns transport details only: URL resolution, request
//! serialisation, timeout and connectivity mapping, and JSON decoding. Each
//! call is classified once into a `RemoteResult`; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{BatchDeleteRequest, ContactRemoteDto, ContactWriteRequest};
use crate::domain::ports::{RemoteContact, RemoteContactGateway, TransportError};
use crate::domain::{Contact, RemoteResult, TransportResponse, classify};

const CONTACTS_ENDPOINT: &str = "contacts";
const BATCH_DELETE_ENDPOINT: &str = "contacts/batch-delete";
const QUERY_PARAM: &str = "q";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Remote gateway that talks to the contacts REST API over HTTP.
#[derive(Debug, Clone)]
pub struct ContactsHttpGateway {
    client: Client,
    base: Url,
}

impl ContactsHttpGateway {
    /// Build a gateway rooted at `base` with a per-request timeout.
    ///
    /// Endpoints resolve relative to `base`, which is treated as a directory
    /// whether or not it ends in `/`.
    /// ```rust,ignore
    /// let gateway = ContactsHttpGateway::new(base, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: normalise_base(base),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base.join(path).map_err(|error| {
            TransportError::other(format!("invalid endpoint '{path}': {error}"))
        })
    }

    fn contact_endpoint(&self, id: i64) -> Result<Url, TransportError> {
        self.endpoint(&format!("{CONTACTS_ENDPOINT}/{id}"))
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<(StatusLine, Vec<u8>), TransportError> {
        let response = request
            .header(header::ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = StatusLine::received(
            response.status(),
            response.extensions().get::<ReasonPhrase>(),
        );
        let url = response.url().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%url, status = status.code.as_u16(), bytes = body.len(), "contacts api responded");
        Ok((status, body.to_vec()))
    }

    async fn send_payload<T: DeserializeOwned>(
        &self,
        request: Result<RequestBuilder, TransportError>,
    ) -> RemoteResult<T> {
        let outcome = match request {
            Ok(request) => self
                .fetch(request)
                .await
                .and_then(|(status, body)| payload_response(status, &body)),
            Err(error) => Err(error),
        };
        classify(outcome)
    }

    async fn send_unit(&self, request: Result<RequestBuilder, TransportError>) -> RemoteResult<()> {
        let outcome = match request {
            Ok(request) => self
                .fetch(request)
                .await
                .map(|(status, _)| unit_response(status)),
            Err(error) => Err(error),
        };
        classify(outcome)
    }
}

#[async_trait]
impl RemoteContactGateway for ContactsHttpGateway {
    async fn get_all(&self) -> RemoteResult<Vec<RemoteContact>> {
        let request = self
            .endpoint(CONTACTS_ENDPOINT)
            .map(|url| self.client.get(url));
        self.send_payload::<Vec<ContactRemoteDto>>(request)
            .await
            .map(into_remote_list)
    }

    async fn search(&self, query: &str) -> RemoteResult<Vec<RemoteContact>> {
        let request = self.endpoint(CONTACTS_ENDPOINT).map(|mut url| {
            url.query_pairs_mut().append_pair(QUERY_PARAM, query);
            self.client.get(url)
        });
        self.send_payload::<Vec<ContactRemoteDto>>(request)
            .await
            .map(into_remote_list)
    }

    async fn create(&self, contact: &Contact) -> RemoteResult<RemoteContact> {
        let body = ContactWriteRequest::from(contact);
        let request = self
            .endpoint(CONTACTS_ENDPOINT)
            .map(|url| self.client.post(url).json(&body));
        self.send_payload::<ContactRemoteDto>(request)
            .await
            .map(RemoteContact::from)
    }

    async fn update(&self, contact: &Contact) -> RemoteResult<RemoteContact> {
        let body = ContactWriteRequest::from(contact);
        let request = self
            .contact_endpoint(contact.id)
            .map(|url| self.client.put(url).json(&body));
        self.send_payload::<ContactRemoteDto>(request)
            .await
            .map(RemoteContact::from)
    }

    async fn delete(&self, id: i64) -> RemoteResult<()> {
        let request = self
            .contact_endpoint(id)
            .map(|url| self.client.delete(url));
        self.send_unit(request).await
    }

    async fn delete_many(&self, contacts: &[Contact]) -> RemoteResult<()> {
        let body = BatchDeleteRequest::from(contacts);
        let request = self
            .endpoint(BATCH_DELETE_ENDPOINT)
            .map(|url| self.client.post(url).json(&body));
        self.send_unit(request).await
    }
}

fn normalise_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn into_remote_list(records: Vec<ContactRemoteDto>) -> Vec<RemoteContact> {
    records.into_iter().map(RemoteContact::from).collect()
}

/// Status code plus the reason phrase the server actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    code: StatusCode,
    reason: Option<String>,
}

impl StatusLine {
    fn canonical(code: StatusCode) -> Self {
        Self {
            code,
            reason: code.canonical_reason().map(str::to_owned),
        }
    }

    /// Hyper only records a phrase when it differs from the canonical one.
    fn received(code: StatusCode, phrase: Option<&ReasonPhrase>) -> Self {
        let custom = phrase
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty());
        match custom {
            Some(reason) => Self {
                code,
                reason: Some(reason.to_owned()),
            },
            None => Self::canonical(code),
        }
    }
}

fn payload_response<T: DeserializeOwned>(
    status: StatusLine,
    body: &[u8],
) -> Result<TransportResponse<T>, TransportError> {
    let body = if status.code.is_success() {
        decode_body(body)?
    } else {
        None
    };
    Ok(TransportResponse {
        status: status.code.as_u16(),
        reason: status.reason,
        body,
    })
}

fn unit_response(status: StatusLine) -> TransportResponse<()> {
    TransportResponse {
        status: status.code.as_u16(),
        reason: status.reason,
        body: Some(()),
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(body).map_err(|error| {
        TransportError::decode(format!("invalid contacts JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::unresolvable_host(error.to_string())
    } else if error.is_decode() {
        TransportError::decode(error.to_string())
    } else {
        TransportError::other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network URL and response helpers.

    use super::*;
    use rstest::rstest;

    fn gateway(base: &str) -> ContactsHttpGateway {
        let base = Url::parse(base).expect("valid base");
        ContactsHttpGateway::new(base, Duration::from_secs(5)).expect("client builds")
    }

    #[rstest]
    #[case("https://api.example.com/v1", "https://api.example.com/v1/")]
    #[case("https://api.example.com/v1/", "https://api.example.com/v1/")]
    #[case("https://api.example.com", "https://api.example.com/")]
    fn base_urls_are_treated_as_directories(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(gateway(raw).base_url().as_str(), expected);
    }

    #[rstest]
    fn endpoints_resolve_under_the_base_path() {
        let gateway = gateway("https://api.example.com/v1");
        assert_eq!(
            gateway.endpoint(CONTACTS_ENDPOINT).expect("url").as_str(),
            "https://api.example.com/v1/contacts"
        );
        assert_eq!(
            gateway.contact_endpoint(42).expect("url").as_str(),
            "https://api.example.com/v1/contacts/42"
        );
        assert_eq!(
            gateway.endpoint(BATCH_DELETE_ENDPOINT).expect("url").as_str(),
            "https://api.example.com/v1/contacts/batch-delete"
        );
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    #[case(b"null".as_slice())]
    fn empty_success_bodies_classify_as_empty_response(#[case] body: &[u8]) {
        let response =
            payload_response::<Vec<ContactRemoteDto>>(StatusLine::canonical(StatusCode::OK), body).expect("no decode error");
        assert_eq!(response.body, None);
        assert_eq!(
            classify(Ok(response)),
            RemoteResult::Error {
                message: "empty-response".to_owned(),
                code: None
            }
        );
    }

    #[rstest]
    fn error_statuses_skip_body_decoding() {
        let response = payload_response::<ContactRemoteDto>(StatusLine::canonical(StatusCode::NOT_FOUND), b"<html>")
            .expect("error bodies are ignored");
        assert_eq!(response.status, 404);
        assert_eq!(response.reason.as_deref(), Some("Not Found"));
        assert_eq!(response.body, None);
    }

    #[rstest]
    fn malformed_success_bodies_are_decode_failures() {
        let error = payload_response::<ContactRemoteDto>(StatusLine::canonical(StatusCode::OK), b"{\"name\":")
            .expect_err("decode must fail");
        assert!(matches!(error, TransportError::Decode { .. }));
    }

    #[rstest]
    fn list_bodies_decode_into_records() {
        let body = br#"[{"id":3,"name":"Ada","last_name":"Lovelace","phone":"1","image_url":""}]"#;
        let response =
            payload_response::<Vec<ContactRemoteDto>>(StatusLine::canonical(StatusCode::OK), body).expect("decode");
        let records = response.body.map(into_remote_list).expect("body present");
        assert_eq!(records.len(), 1);
        assert_eq!(records.first().map(|record| record.id), Some(3));
    }

    #[rstest]
    #[case(StatusCode::NO_CONTENT)]
    #[case(StatusCode::OK)]
    fn unit_success_statuses_always_carry_a_body(#[case] status: StatusCode) {
        assert_eq!(
            classify(Ok(unit_response(StatusLine::canonical(status)))),
            RemoteResult::Success(())
        );
    }

    #[rstest]
    fn custom_reason_phrases_are_kept() {
        let phrase = ReasonPhrase::from_static(b"Duplicate phone");
        let status = StatusLine::received(StatusCode::CONFLICT, Some(&phrase));
        assert_eq!(status.reason.as_deref(), Some("Duplicate phone"));
    }

    #[rstest]
    fn missing_reason_phrases_fall_back_to_the_canonical_text() {
        let status = StatusLine::received(StatusCode::CONFLICT, None);
        assert_eq!(status, StatusLine::canonical(StatusCode::CONFLICT));
        assert_eq!(status.reason.as_deref(), Some("Conflict"));
    }
}
