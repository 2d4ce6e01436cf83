//! Screen-side driver for the authentication state machine.
//!
//! [`AuthScreen`] is created per screen and owned by it. Submitting spawns one
//! Tokio task per request; the task talks to the [`AuthTransport`] inside a
//! fresh [`TraceId`] scope, applies the outcome to the shared [`SessionStore`],
//! then completes the machine and publishes the terminal snapshot. A screen
//! rendering from [`AuthScreen::subscribe`] therefore sees the outcome without
//! polling, and a screen dropped while submitting still leaves the session
//! correct. [`AuthScreen::next_signal`] hands over the matching signal once.

mod machine;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

pub use self::machine::{
    AuthEffect, AuthEvent, AuthMachine, AuthOutcome, AuthSnapshot, NetworkActivity,
    ScreenAuthState,
};
use super::forms::FormError;
use super::ports::AuthTransport;
use super::{
    AuthRequest, AuthValidationError, ErrorCode, ErrorDescription, SessionStore, SignInForm,
    SignUpForm, SocialToken, TraceId, User,
};

/// Whether a submission started a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// A request was handed to the transport.
    Dispatched,
    /// A request was already in flight; nothing happened.
    Ignored,
}

/// Terminal notification for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// A user is now signed in; navigate onwards.
    Authenticated(User),
    /// The session ended.
    SignedOut,
    /// Show this message and stay on the screen.
    Error(ErrorDescription),
}

impl AuthSignal {
    fn from_effect(effect: AuthEffect) -> Option<Self> {
        match effect {
            AuthEffect::Authenticated(user) => Some(Self::Authenticated(user)),
            AuthEffect::SignedOut => Some(Self::SignedOut),
            AuthEffect::ShowError(error) => Some(Self::Error(error)),
            AuthEffect::Dispatch(_) => None,
        }
    }
}

/// Machine shared between a screen and its request task.
///
/// Every transition publishes its snapshot under the same lock, so
/// subscribers observe transitions in order.
struct SharedMachine {
    machine: Mutex<AuthMachine>,
    snapshots: watch::Sender<AuthSnapshot>,
}

impl SharedMachine {
    fn new() -> Self {
        let machine = AuthMachine::new();
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            machine: Mutex::new(machine),
            snapshots,
        }
    }

    fn apply(&self, event: AuthEvent) -> Option<AuthEffect> {
        let mut machine = self.machine.lock().unwrap_or_else(PoisonError::into_inner);
        let effect = machine.handle(event);
        let next = machine.snapshot();
        self.snapshots.send_if_modified(|current| {
            let changed = *current != next;
            if changed {
                *current = next;
            }
            changed
        });
        effect
    }

    fn snapshot(&self) -> AuthSnapshot {
        self.machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }
}

/// Per-screen authentication driver.
pub struct AuthScreen {
    shared: Arc<SharedMachine>,
    transport: Arc<dyn AuthTransport>,
    session: SessionStore,
    in_flight: Option<JoinHandle<Option<AuthSignal>>>,
}

impl AuthScreen {
    /// Idle screen sending through `transport` and updating `session`.
    #[must_use]
    pub fn new(transport: Arc<dyn AuthTransport>, session: SessionStore) -> Self {
        Self {
            shared: Arc::new(SharedMachine::new()),
            transport,
            session,
            in_flight: None,
        }
    }

    /// Current state and loading indicator.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.shared.snapshot()
    }

    /// Receiver woken after every transition, including the terminal one
    /// applied by the request task.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Session store this screen updates.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Submit an already validated request.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since the request runs on
    /// a spawned task.
    pub fn submit(&mut self, request: AuthRequest) -> SubmitDisposition {
        let kind = request.kind();
        match self.shared.apply(AuthEvent::Submit(request)) {
            Some(AuthEffect::Dispatch(request)) => {
                self.dispatch(request);
                SubmitDisposition::Dispatched
            }
            _ => {
                debug!(kind = %kind, "submit ignored while a request is in flight");
                SubmitDisposition::Ignored
            }
        }
    }

    /// Validate the sign-in form and submit it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] without touching the network when the form is
    /// not submittable.
    pub fn submit_sign_in(&mut self, form: &SignInForm) -> Result<SubmitDisposition, FormError> {
        let request = form.submit()?;
        Ok(self.submit(request))
    }

    /// Validate the sign-up form and submit it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] without touching the network when the form is
    /// not submittable.
    pub fn submit_sign_up(&mut self, form: &SignUpForm) -> Result<SubmitDisposition, FormError> {
        let request = form.submit()?;
        Ok(self.submit(request))
    }

    /// Submit the access token returned by the social provider.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError::EmptyToken`] when the provider handed
    /// back no token.
    pub fn submit_social(&mut self, token: &str) -> Result<SubmitDisposition, AuthValidationError> {
        let token = SocialToken::new(token).inspect_err(|err| {
            warn!(error = %err, "social sign-in callback without token");
        })?;
        Ok(self.submit(AuthRequest::SocialSignIn(token)))
    }

    /// End the current session.
    pub fn sign_out(&mut self) -> SubmitDisposition {
        self.submit(AuthRequest::SignOut)
    }

    /// Wait for the in-flight request and return its signal.
    ///
    /// Returns `None` when nothing is in flight or the signal was already
    /// taken. Skipping this call loses only the signal; state, snapshots and
    /// the session are updated by the request task. Dropping the returned
    /// future early keeps the request in flight.
    pub async fn next_signal(&mut self) -> Option<AuthSignal> {
        let handle = self.in_flight.as_mut()?;
        let joined = handle.await;
        self.in_flight = None;

        joined.unwrap_or_else(|join_error| {
            error!(error = %join_error, "auth completion task failed");
            self.shared
                .apply(AuthEvent::Completed(internal_failure()))
                .and_then(AuthSignal::from_effect)
        })
    }

    fn dispatch(&mut self, request: AuthRequest) {
        let transport = Arc::clone(&self.transport);
        let session = self.session.clone();
        let shared = Arc::clone(&self.shared);
        let trace_id = TraceId::generate();
        let span = info_span!("auth_request", kind = %request.kind(), trace_id = %trace_id);

        let exchange = tokio::spawn(TraceId::scope(
            trace_id,
            async move {
                info!("auth request dispatched");
                transport.send(&request).await
            }
            .instrument(span.clone()),
        ));
        let completion = async move {
            let outcome = match exchange.await {
                Ok(reply) => AuthOutcome::from(reply),
                Err(join_error) => {
                    error!(error = %join_error, "auth request task failed");
                    internal_failure()
                }
            };
            apply_to_session(session, &outcome).await;
            shared
                .apply(AuthEvent::Completed(outcome))
                .and_then(AuthSignal::from_effect)
        };
        self.in_flight = Some(tokio::spawn(TraceId::scope(
            trace_id,
            completion.instrument(span),
        )));
    }
}

fn internal_failure() -> AuthOutcome {
    AuthOutcome::Failure(ErrorDescription::fallback(ErrorCode::InternalError))
}

/// Mirror `outcome` into the session on the blocking pool.
async fn apply_to_session(session: SessionStore, outcome: &AuthOutcome) {
    let span = Span::current();
    let update = match outcome {
        AuthOutcome::Success(user) => {
            info!(user_id = %user.id(), "authenticated");
            let user = user.clone();
            task::spawn_blocking(move || span.in_scope(|| session.set(user)))
        }
        AuthOutcome::SignedOut => {
            info!("signed out");
            task::spawn_blocking(move || span.in_scope(|| session.clear()))
        }
        AuthOutcome::Failure(error) => {
            warn!(code = ?error.code(), message = %error.message(), "auth request failed");
            return;
        }
    };
    if let Err(join_error) = update.await {
        error!(error = %join_error, "session update task failed");
    }
}

impl fmt::Debug for AuthScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthScreen")
            .field("machine", &self.snapshot())
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}
