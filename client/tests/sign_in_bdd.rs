//! Behaviour tests for the sign-in screen.
//!
//! These scenarios drive an `AuthScreen` against a scripted transport and
//! check local validation, the single network call and the session outcome.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use client::domain::forms::FormError;
use client::domain::ports::AuthTransportError;
use client::domain::{AuthScreen, AuthSignal, SessionStore, SignInForm};
use client::test_support::{RecordingTransport, sample_user};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

/// Wrapper for the runtime to enable storage in `Slot`.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

type Submission = Result<Option<AuthSignal>, FormError>;

#[derive(Default, ScenarioState)]
struct SignInWorld {
    runtime: Slot<RuntimeHandle>,
    transport: Slot<Arc<RecordingTransport>>,
    session: Slot<SessionStore>,
    submission: Slot<Submission>,
}

impl SignInWorld {
    fn serve(&self, transport: RecordingTransport) {
        let runtime = Runtime::new().expect("create runtime");
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.transport.set(transport.into_shared());
        self.session.set(SessionStore::in_memory());
    }

    fn submit(&self, form: SignInForm) {
        let runtime = self.runtime.get().expect("runtime");
        let transport = self.transport.get().expect("transport");
        let session = self.session.get().expect("session");

        let submission = runtime.0.block_on(async move {
            let mut screen = AuthScreen::new(transport, session);
            screen.submit_sign_in(&form)?;
            Ok(screen.next_signal().await)
        });
        self.submission.set(submission);
    }

    fn submission(&self) -> Submission {
        self.submission.get().expect("a submission was made")
    }
}

#[fixture]
fn world() -> SignInWorld {
    SignInWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an auth server that accepts the sample user")]
fn an_auth_server_that_accepts(world: &SignInWorld) {
    world.serve(RecordingTransport::authenticating(sample_user()));
}

#[given("an auth server that rejects with status {status} and message {message}")]
fn an_auth_server_that_rejects(world: &SignInWorld, status: String, message: String) {
    let status: u16 = status.parse().expect("numeric status");
    world.serve(RecordingTransport::new([Err(AuthTransportError::rejected(
        status, message,
    ))]));
}

#[given("an auth server that cannot be reached")]
fn an_auth_server_that_cannot_be_reached(world: &SignInWorld) {
    world.serve(RecordingTransport::new([Err(AuthTransportError::network(
        "connection refused",
    ))]));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the user signs in with email {email} and password {password}")]
fn the_user_signs_in(world: &SignInWorld, email: String, password: String) {
    world.submit(SignInForm { email, password });
}

#[when("the user signs in with email {email} and a blank password")]
fn the_user_signs_in_without_password(world: &SignInWorld, email: String) {
    world.submit(SignInForm {
        email,
        password: String::new(),
    });
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the session holds user {id}")]
fn the_session_holds_user(world: &SignInWorld, id: String) {
    let session = world.session.get().expect("session");
    let user = session.get().expect("a signed-in user");
    assert_eq!(user.id().as_ref(), id.as_str());
    assert!(matches!(
        world.submission(),
        Ok(Some(AuthSignal::Authenticated(_)))
    ));
}

#[then("the session is empty")]
fn the_session_is_empty(world: &SignInWorld) {
    let session = world.session.get().expect("session");
    assert_eq!(session.get(), None);
}

#[then("the server call count is {count}")]
fn the_server_call_count_is(world: &SignInWorld, count: String) {
    let expected: usize = count.parse().expect("numeric count");
    let transport = world.transport.get().expect("transport");
    assert_eq!(transport.calls(), expected);
}

#[then("the {field} field reports {key}")]
fn the_field_reports(world: &SignInWorld, field: String, key: String) {
    let Err(error) = world.submission() else {
        panic!("expected the form to be rejected");
    };
    let result = error.validation().expect("validation failure");
    let reported = result
        .errors()
        .find(|(id, _)| id.as_str() == field)
        .map(|(_, message)| message.as_str());
    assert_eq!(reported, Some(key.as_str()));
}

#[then("the screen shows the error {message}")]
fn the_screen_shows_the_error(world: &SignInWorld, message: String) {
    let Ok(Some(AuthSignal::Error(error))) = world.submission() else {
        panic!("expected an error signal");
    };
    assert_eq!(error.message(), message);
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/sign_in.feature",
    name = "Valid credentials sign the user in"
)]
fn valid_credentials_sign_the_user_in(world: SignInWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sign_in.feature",
    name = "A malformed email never reaches the server"
)]
fn a_malformed_email_never_reaches_the_server(world: SignInWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sign_in.feature",
    name = "A blank password is reported as missing"
)]
fn a_blank_password_is_reported_as_missing(world: SignInWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sign_in.feature",
    name = "Rejected credentials keep the session empty"
)]
fn rejected_credentials_keep_the_session_empty(world: SignInWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sign_in.feature",
    name = "An unreachable server shows the default message"
)]
fn an_unreachable_server_shows_the_default_message(world: SignInWorld) {
    let _ = world;
}
