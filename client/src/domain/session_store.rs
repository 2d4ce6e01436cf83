//! Process-wide cache of the authenticated user.
//!
//! [`SessionStore`] is a cheap `Clone` handle. Every clone shares one Tokio
//! `watch` channel, so a write is observed atomically by all readers and
//! subscribers are woken on each change. An optional [`SessionPersistence`]
//! mirrors writes to durable storage; its failures are logged and never undo
//! the in-memory update.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::User;
use super::ports::{NoSessionPersistence, SessionPersistence};

/// Shared handle to the current user.
///
/// # Examples
/// ```
/// use client::domain::{SessionStore, User, UserId, UserProfile};
///
/// let store = SessionStore::in_memory();
/// let reader = store.clone();
/// let user = User::new(UserId::new("9032").unwrap(), UserProfile::default());
///
/// store.set(user.clone());
/// assert_eq!(reader.get(), Some(user));
/// store.clear();
/// assert!(!reader.is_signed_in());
/// ```
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<watch::Sender<Option<User>>>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    /// Empty store that keeps nothing across restarts.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_persistence(Arc::new(NoSessionPersistence))
    }

    /// Empty store mirroring writes to `persistence`.
    #[must_use]
    pub fn with_persistence(persistence: Arc<dyn SessionPersistence>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            current: Arc::new(sender),
            persistence,
        }
    }

    /// Store seeded from whatever `persistence` holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    #[must_use]
    pub fn restore(persistence: Arc<dyn SessionPersistence>) -> Self {
        let restored = match persistence.load() {
            Ok(user) => user,
            Err(error) => {
                warn!(error = %error, "discarding unreadable stored session");
                None
            }
        };
        debug!(signed_in = restored.is_some(), "session restored");
        let store = Self::with_persistence(persistence);
        store.current.send_replace(restored);
        store
    }

    /// Current user, if signed in.
    #[must_use]
    pub fn get(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    /// Returns `true` when a user is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Replace the current user wholesale.
    ///
    /// Blocks while persistence writes; async callers use
    /// `tokio::task::spawn_blocking`.
    pub fn set(&self, user: User) {
        if let Err(error) = self.persistence.save(&user) {
            warn!(error = %error, user_id = %user.id(), "failed to persist session");
        }
        self.current.send_replace(Some(user));
    }

    /// Forget the current user. Blocks like [`SessionStore::set`].
    pub fn clear(&self) {
        if let Err(error) = self.persistence.clear() {
            warn!(error = %error, "failed to clear persisted session");
        }
        self.current.send_replace(None);
    }

    /// Receiver woken on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Sharing, notification and persistence-failure coverage.
    use super::*;
    use crate::domain::ports::{MockSessionPersistence, SessionPersistenceError};
    use crate::domain::{UserId, UserProfile};
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(
            UserId::new("9032").expect("valid id"),
            UserProfile {
                email: "user123@mail.com".to_owned(),
                username: "richard".to_owned(),
                ..UserProfile::default()
            },
        )
    }

    #[rstest]
    fn starts_signed_out() {
        let store = SessionStore::default();
        assert_eq!(store.get(), None);
        assert!(!store.is_signed_in());
    }

    #[rstest]
    fn clones_share_state(user: User) {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set(user.clone());
        assert_eq!(other.get(), Some(user));
        other.clear();
        assert_eq!(store.get(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn subscribers_see_changes(user: User) {
        let store = SessionStore::in_memory();
        let mut changes = store.subscribe();

        store.set(user.clone());
        changes.changed().await.expect("sender alive");
        assert_eq!(*changes.borrow_and_update(), Some(user));

        store.clear();
        changes.changed().await.expect("sender alive");
        assert_eq!(*changes.borrow_and_update(), None);
    }

    #[rstest]
    fn persistence_failures_keep_the_memory_update(user: User) {
        let mut persistence = MockSessionPersistence::new();
        persistence
            .expect_save()
            .times(1)
            .returning(|_| Err(SessionPersistenceError::io("disk full")));
        persistence
            .expect_clear()
            .times(1)
            .returning(|| Err(SessionPersistenceError::io("read-only")));
        let store = SessionStore::with_persistence(Arc::new(persistence));

        store.set(user.clone());
        assert_eq!(store.get(), Some(user));
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[rstest]
    fn restore_seeds_from_persistence(user: User) {
        let stored = user.clone();
        let mut persistence = MockSessionPersistence::new();
        persistence
            .expect_load()
            .times(1)
            .returning(move || Ok(Some(stored.clone())));
        let store = SessionStore::restore(Arc::new(persistence));
        assert_eq!(store.get(), Some(user));
    }

    #[rstest]
    fn restore_treats_corrupt_sessions_as_signed_out() {
        let mut persistence = MockSessionPersistence::new();
        persistence
            .expect_load()
            .returning(|| Err(SessionPersistenceError::corrupt("expected value")));
        let store = SessionStore::restore(Arc::new(persistence));
        assert!(!store.is_signed_in());
    }
}
