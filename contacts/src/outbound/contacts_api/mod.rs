//! Contacts REST API outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `RemoteContactGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::ContactsHttpGateway;
