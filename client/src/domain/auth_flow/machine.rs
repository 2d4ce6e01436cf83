//! Pure per-screen authentication state machine.
//!
//! The machine owns no I/O. Feeding it an [`AuthEvent`] yields the next state
//! and at most one [`AuthEffect`] for the driver to carry out.
//!
//! | State                  | Event                 | Next        | Effect            |
//! |------------------------|-----------------------|-------------|-------------------|
//! | Idle/Succeeded/Failed  | Submit                | Submitting  | Dispatch          |
//! | Submitting             | Submit                | Submitting  | none              |
//! | Submitting             | Completed(Success)    | Succeeded   | Authenticated     |
//! | Submitting             | Completed(SignedOut)  | Succeeded   | SignedOut         |
//! | Submitting             | Completed(Failure)    | Failed      | ShowError         |
//! | not Submitting         | Completed(_)          | unchanged   | none              |

use crate::domain::ports::{AuthReply, AuthTransportError};
use crate::domain::{AuthRequest, ErrorDescription, User};

/// Lifecycle of one authentication attempt on a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenAuthState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting,
    /// The last request succeeded.
    Succeeded,
    /// The last request failed with this description.
    Failed(ErrorDescription),
}

impl ScreenAuthState {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Loading indicator driven alongside [`ScreenAuthState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkActivity {
    /// No request in flight.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
}

/// Coalesced view published to the screen after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// Attempt lifecycle.
    pub state: ScreenAuthState,
    /// Loading indicator.
    pub activity: NetworkActivity,
}

/// Result of one network exchange, as seen by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The server authenticated this user.
    Success(User),
    /// The server ended the session.
    SignedOut,
    /// The exchange failed.
    Failure(ErrorDescription),
}

impl From<Result<AuthReply, AuthTransportError>> for AuthOutcome {
    fn from(value: Result<AuthReply, AuthTransportError>) -> Self {
        match value {
            Ok(AuthReply::Authenticated(user)) => Self::Success(user),
            Ok(AuthReply::SignedOut) => Self::SignedOut,
            Err(error) => Self::Failure(error.to_description()),
        }
    }
}

/// Input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The user submitted a validated request.
    Submit(AuthRequest),
    /// The in-flight request finished.
    Completed(AuthOutcome),
}

/// Side effect the driver must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEffect {
    /// Issue exactly one network call for this request.
    Dispatch(AuthRequest),
    /// Tell the screen a user is now signed in.
    Authenticated(User),
    /// Tell the screen the session ended.
    SignedOut,
    /// Show this error; the screen stays usable for retry.
    ShowError(ErrorDescription),
}

/// Transition function over [`ScreenAuthState`] and [`NetworkActivity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthMachine {
    state: ScreenAuthState,
    activity: NetworkActivity,
}

impl AuthMachine {
    /// Machine in [`ScreenAuthState::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ScreenAuthState::Idle,
            activity: NetworkActivity::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ScreenAuthState {
        &self.state
    }

    /// Current loading indicator.
    #[must_use]
    pub const fn activity(&self) -> NetworkActivity {
        self.activity
    }

    /// Owned copy of the state and indicator.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            state: self.state.clone(),
            activity: self.activity,
        }
    }

    /// Apply `event` and return the effect to carry out, if any.
    pub fn handle(&mut self, event: AuthEvent) -> Option<AuthEffect> {
        match (self.state.is_submitting(), event) {
            (true, AuthEvent::Submit(_)) | (false, AuthEvent::Completed(_)) => None,
            (false, AuthEvent::Submit(request)) => {
                self.state = ScreenAuthState::Submitting;
                self.activity = NetworkActivity::Loading;
                Some(AuthEffect::Dispatch(request))
            }
            (true, AuthEvent::Completed(outcome)) => {
                self.activity = NetworkActivity::Idle;
                Some(self.complete(outcome))
            }
        }
    }

    fn complete(&mut self, outcome: AuthOutcome) -> AuthEffect {
        match outcome {
            AuthOutcome::Success(user) => {
                self.state = ScreenAuthState::Succeeded;
                AuthEffect::Authenticated(user)
            }
            AuthOutcome::SignedOut => {
                self.state = ScreenAuthState::Succeeded;
                AuthEffect::SignedOut
            }
            AuthOutcome::Failure(error) => {
                self.state = ScreenAuthState::Failed(error.clone());
                AuthEffect::ShowError(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Transition table coverage.
    use super::*;
    use crate::domain::{ErrorCode, SignInCredentials, UserId, UserProfile};
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> AuthRequest {
        AuthRequest::SignIn(
            SignInCredentials::try_from_parts("user123@mail.com", "asdasdasdasda")
                .expect("credentials"),
        )
    }

    #[fixture]
    fn user() -> User {
        User::new(UserId::new("9032").expect("id"), UserProfile::default())
    }

    fn failure() -> ErrorDescription {
        ErrorDescription::new(ErrorCode::Unauthorized, "Invalid email or password.")
    }

    fn submitting(request: AuthRequest) -> AuthMachine {
        let mut machine = AuthMachine::new();
        machine.handle(AuthEvent::Submit(request));
        machine
    }

    #[rstest]
    fn submit_from_idle_dispatches(request: AuthRequest) {
        let mut machine = AuthMachine::new();
        let effect = machine.handle(AuthEvent::Submit(request.clone()));
        assert_eq!(effect, Some(AuthEffect::Dispatch(request)));
        assert_eq!(
            machine.snapshot(),
            AuthSnapshot {
                state: ScreenAuthState::Submitting,
                activity: NetworkActivity::Loading,
            }
        );
    }

    #[rstest]
    fn submit_while_submitting_is_ignored(request: AuthRequest) {
        let mut machine = submitting(request.clone());
        assert_eq!(machine.handle(AuthEvent::Submit(request)), None);
        assert!(machine.state().is_submitting());
        assert_eq!(machine.activity(), NetworkActivity::Loading);
    }

    #[rstest]
    fn success_signals_authenticated(request: AuthRequest, user: User) {
        let mut machine = submitting(request);
        let effect = machine.handle(AuthEvent::Completed(AuthOutcome::Success(user.clone())));
        assert_eq!(effect, Some(AuthEffect::Authenticated(user)));
        assert_eq!(machine.state(), &ScreenAuthState::Succeeded);
        assert_eq!(machine.activity(), NetworkActivity::Idle);
    }

    #[rstest]
    fn sign_out_signals_signed_out() {
        let mut machine = submitting(AuthRequest::SignOut);
        let effect = machine.handle(AuthEvent::Completed(AuthOutcome::SignedOut));
        assert_eq!(effect, Some(AuthEffect::SignedOut));
        assert_eq!(machine.state(), &ScreenAuthState::Succeeded);
    }

    #[rstest]
    fn failure_is_exposed_and_retry_is_allowed(request: AuthRequest) {
        let mut machine = submitting(request.clone());
        let effect = machine.handle(AuthEvent::Completed(AuthOutcome::Failure(failure())));
        assert_eq!(effect, Some(AuthEffect::ShowError(failure())));
        assert_eq!(machine.state(), &ScreenAuthState::Failed(failure()));
        assert_eq!(machine.activity(), NetworkActivity::Idle);

        let retry = machine.handle(AuthEvent::Submit(request.clone()));
        assert_eq!(retry, Some(AuthEffect::Dispatch(request)));
    }

    #[rstest]
    #[case(AuthOutcome::SignedOut)]
    #[case(AuthOutcome::Failure(failure()))]
    fn stale_completions_are_ignored(#[case] outcome: AuthOutcome) {
        let mut machine = AuthMachine::new();
        assert_eq!(machine.handle(AuthEvent::Completed(outcome)), None);
        assert_eq!(machine.snapshot(), AuthSnapshot::default());
    }

    #[rstest]
    fn transport_results_convert_to_outcomes(user: User) {
        assert_eq!(
            AuthOutcome::from(Ok(AuthReply::Authenticated(user.clone()))),
            AuthOutcome::Success(user)
        );
        assert_eq!(AuthOutcome::from(Ok(AuthReply::SignedOut)), AuthOutcome::SignedOut);
        let AuthOutcome::Failure(error) =
            AuthOutcome::from(Err(AuthTransportError::rejected(401_u16, "Nope")))
        else {
            panic!("expected failure");
        };
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
