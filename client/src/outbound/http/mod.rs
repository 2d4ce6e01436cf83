//! HTTP outbound adapter.
//!
//! Implements the `AuthTransport` port against the JSON auth API.

mod dto;
mod transport;

pub use transport::HttpAuthTransport;
