//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod contact_repository;
mod local_contact_store;
mod remote_contact_gateway;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::ContactRepository;
#[cfg(test)]
pub use local_contact_store::MockLocalContactStore;
pub use local_contact_store::{
    ContactStoreError, ContactStream, LocalContactStore, SINGLE_WILDCARD, SearchPattern, WILDCARD,
};
#[cfg(test)]
pub use remote_contact_gateway::MockRemoteContactGateway;
pub use remote_contact_gateway::{
    FixtureRemoteContactGateway, RemoteContact, RemoteContactGateway, TransportError,
};
