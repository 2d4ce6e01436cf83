//! Authentication client core.
//!
//! The crate follows a hexagonal layout:
//! - [`domain`] owns the user model, forms, the per-screen auth state machine,
//!   the process-wide session store and the driven ports.
//! - [`outbound`] implements the ports over HTTP and the local filesystem.
//! - [`inbound`] drives the domain from the command line.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::TraceId;
