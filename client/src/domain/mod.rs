//! Domain primitives, forms and the authentication flow.
//!
//! Purpose: keep every rule about who is signed in and how a screen reaches
//! that state free of transport and storage details.
//!
//! Public surface:
//! - [`User`] and [`UserId`]: the authenticated identity.
//! - [`ErrorDescription`]: the one human-readable failure a screen shows.
//! - [`AuthRequest`]: the request variants a screen may issue.
//! - [`SignInForm`] / [`SignUpForm`]: field sets that gate submission.
//! - [`SessionStore`]: process-wide cache of the current user.
//! - [`AuthScreen`]: per-screen state machine driver.

pub mod auth;
pub mod auth_flow;
pub mod error;
pub mod forms;
pub mod ports;
pub mod session_store;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AuthRequest, AuthRequestKind, AuthValidationError, SignInCredentials, SignUpRequest,
    SocialToken,
};
pub use self::auth_flow::{
    AuthEffect, AuthEvent, AuthMachine, AuthOutcome, AuthScreen, AuthSignal, AuthSnapshot,
    NetworkActivity, ScreenAuthState, SubmitDisposition,
};
pub use self::error::{
    DEFAULT_ERROR_MESSAGE, ErrorCode, ErrorDescription, ErrorDescriptionValidationError,
};
pub use self::forms::{FormError, SignInForm, SignUpForm};
pub use self::session_store::SessionStore;
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserProfile, UserValidationError};
