//! Test utilities for the client crate.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration tests under `tests/`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::ports::{AuthReply, AuthTransport, AuthTransportError};
use crate::domain::{AuthRequest, User, UserId, UserProfile};

/// The user the sample server returns for `user123@mail.com`.
///
/// # Panics
///
/// Never in practice; the identifier is a valid literal.
#[must_use]
pub fn sample_user() -> User {
    let id = UserId::new("9032").unwrap_or_else(|err| panic!("sample user id: {err}"));
    User::new(
        id,
        UserProfile {
            email: "user123@mail.com".to_owned(),
            first_name: "Richard".to_owned(),
            last_name: "Richard".to_owned(),
            gender: "Female".to_owned(),
            username: "Richard".to_owned(),
        },
    )
    .with_password("asdasdasdasda")
}

/// Transport replaying scripted replies and recording every request.
///
/// A gated transport holds each call until [`RecordingTransport::release`]
/// is called, which lets tests observe the in-flight state.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Result<AuthReply, AuthTransportError>>>,
    requests: Mutex<Vec<AuthRequest>>,
    calls: AtomicUsize,
    gate: Option<Notify>,
}

impl RecordingTransport {
    /// Transport answering with `replies` in order.
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = Result<AuthReply, AuthTransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Transport whose single scripted reply authenticates `user`.
    #[must_use]
    pub fn authenticating(user: User) -> Self {
        Self::new([Ok(AuthReply::Authenticated(user))])
    }

    /// Hold every call until released.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    /// Let one held call proceed. A release before the call arrives is kept.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<AuthRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Shared handle for injection into a screen.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl AuthTransport for RecordingTransport {
    async fn send(&self, request: &AuthRequest) -> Result<AuthReply, AuthTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(AuthTransportError::network("no scripted reply")))
    }
}
