//! Driven port storing the signed-in user between runs.

use super::define_port_error;
use crate::domain::User;

define_port_error! {
    /// Errors raised while loading or storing the session.
    pub enum SessionPersistenceError {
        /// The backing store could not be read or written.
        Io { message: String } =>
            "session storage failed: {message}",
        /// The stored session could not be decoded.
        Corrupt { message: String } =>
            "stored session is unreadable: {message}",
    }
}

/// Port for keeping the current user across process restarts.
///
/// Implementations never store the password. Calls may block on I/O;
/// async callers run them on the blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait SessionPersistence: Send + Sync {
    /// Previously stored user, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionPersistenceError`] when the store is unreadable.
    fn load(&self) -> Result<Option<User>, SessionPersistenceError>;

    /// Replace the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionPersistenceError`] when the store cannot be written.
    fn save(&self, user: &User) -> Result<(), SessionPersistenceError>;

    /// Forget the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionPersistenceError`] when the store cannot be written.
    fn clear(&self) -> Result<(), SessionPersistenceError>;
}

/// Persistence that keeps nothing; sessions end with the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSessionPersistence;

impl SessionPersistence for NoSessionPersistence {
    fn load(&self) -> Result<Option<User>, SessionPersistenceError> {
        Ok(None)
    }

    fn save(&self, _user: &User) -> Result<(), SessionPersistenceError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionPersistenceError> {
        Ok(())
    }
}
