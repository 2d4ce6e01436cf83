//! Outbound adapters implementing the domain ports.

pub mod http;
pub mod session_file;
