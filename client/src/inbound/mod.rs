//! Inbound adapters that turn user interaction into domain calls.
//!
//! The command-line screen lives under [`cli`]; it owns presentation
//! details such as message text and exit codes so the domain stays free of
//! them.

pub mod cli;
