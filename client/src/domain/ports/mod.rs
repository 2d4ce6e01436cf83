//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_transport;
mod session_persistence;

#[cfg(test)]
pub use auth_transport::MockAuthTransport;
pub use auth_transport::{AuthReply, AuthTransport, AuthTransportError, FixtureAuthTransport};
#[cfg(test)]
pub use session_persistence::MockSessionPersistence;
pub use session_persistence::{
    NoSessionPersistence, SessionPersistence, SessionPersistenceError,
};
