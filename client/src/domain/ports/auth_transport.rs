//! Driven port performing the network exchange for one auth request.
//!
//! The domain hands over a fully built [`AuthRequest`] and gets back either a
//! reply or a transport error. Timeouts, retries at the socket level and wire
//! formats belong to the adapter.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AuthRequest, ErrorCode, ErrorDescription, User, UserId, UserProfile};

/// Successful reply to an [`AuthRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthReply {
    /// The server authenticated this user.
    Authenticated(User),
    /// The server ended the session.
    SignedOut,
}

define_port_error! {
    /// Errors surfaced while talking to the auth server.
    pub enum AuthTransportError {
        /// The request never produced a response.
        Network { message: String } =>
            "auth transport failed: {message}",
        /// The server answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "auth server rejected request with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "auth response decode failed: {message}",
    }
}

impl AuthTransportError {
    /// Reduce the error to the single description a screen shows.
    ///
    /// Server-supplied messages are shown as-is; network and decode failures
    /// show the default text so adapter internals never reach the user.
    #[must_use]
    pub fn to_description(&self) -> ErrorDescription {
        match self {
            Self::Network { .. } => ErrorDescription::fallback(ErrorCode::Network),
            Self::Decode { .. } => ErrorDescription::fallback(ErrorCode::InvalidResponse),
            Self::Rejected { status, message } => {
                let code = match *status {
                    401 | 403 => ErrorCode::Unauthorized,
                    400..=499 => ErrorCode::InvalidRequest,
                    _ => ErrorCode::ServerError,
                };
                ErrorDescription::new(code, message.as_str())
            }
        }
    }
}

/// Port for exchanging auth requests with the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Send one request and wait for its reply.
    ///
    /// # Examples
    ///
    /// ```
    /// use client::domain::AuthRequest;
    /// use client::domain::ports::{AuthReply, AuthTransport, FixtureAuthTransport};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let reply = FixtureAuthTransport.send(&AuthRequest::SignOut).await?;
    /// assert_eq!(reply, AuthReply::SignedOut);
    /// # Ok::<(), client::domain::ports::AuthTransportError>(())
    /// # }).unwrap();
    /// ```
    async fn send(&self, request: &AuthRequest) -> Result<AuthReply, AuthTransportError>;
}

/// Offline transport that accepts every request.
///
/// Used by the binary when `AUTH_CLIENT_OFFLINE` is set. Sign-in style
/// requests authenticate a fixed demo user; sign-out always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAuthTransport;

impl FixtureAuthTransport {
    /// Identifier of the user every sign-in resolves to.
    pub const USER_ID: &'static str = "9032";

    fn user(email: &str, username: &str) -> Result<User, AuthTransportError> {
        let id = UserId::new(Self::USER_ID)
            .map_err(|err| AuthTransportError::decode(format!("invalid fixture user id: {err}")))?;
        Ok(User::new(
            id,
            UserProfile {
                email: email.to_owned(),
                first_name: "Richard".to_owned(),
                last_name: "Richard".to_owned(),
                gender: "female".to_owned(),
                username: username.to_owned(),
            },
        ))
    }
}

#[async_trait]
impl AuthTransport for FixtureAuthTransport {
    async fn send(&self, request: &AuthRequest) -> Result<AuthReply, AuthTransportError> {
        let user = match request {
            AuthRequest::SignIn(credentials) => Self::user(credentials.email(), "richard")?,
            AuthRequest::SignUp(sign_up) => Self::user(sign_up.email(), sign_up.username())?,
            AuthRequest::SocialSignIn(_) => Self::user("user123@mail.com", "richard")?,
            AuthRequest::SignOut => return Ok(AuthReply::SignedOut),
        };
        Ok(AuthReply::Authenticated(user))
    }
}

#[cfg(test)]
mod tests {
    //! Error reduction and fixture behaviour.
    use super::*;
    use crate::domain::{DEFAULT_ERROR_MESSAGE, SignInCredentials, SocialToken};
    use rstest::rstest;

    #[rstest]
    #[case(AuthTransportError::network("connection refused"), ErrorCode::Network, DEFAULT_ERROR_MESSAGE)]
    #[case(AuthTransportError::decode("expected value"), ErrorCode::InvalidResponse, DEFAULT_ERROR_MESSAGE)]
    #[case(
        AuthTransportError::rejected(401_u16, "Invalid email or password."),
        ErrorCode::Unauthorized,
        "Invalid email or password."
    )]
    #[case(
        AuthTransportError::rejected(422_u16, "Email has already been taken"),
        ErrorCode::InvalidRequest,
        "Email has already been taken"
    )]
    #[case(AuthTransportError::rejected(500_u16, ""), ErrorCode::ServerError, DEFAULT_ERROR_MESSAGE)]
    fn errors_reduce_to_one_description(
        #[case] error: AuthTransportError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let description = error.to_description();
        assert_eq!(description.code(), code);
        assert_eq!(description.message(), message);
    }

    #[rstest]
    #[case(AuthRequest::SignIn(
        SignInCredentials::try_from_parts("user123@mail.com", "asdasdasdasda").expect("creds")
    ))]
    #[case(AuthRequest::SocialSignIn(SocialToken::new("token").expect("token")))]
    #[tokio::test]
    async fn fixture_authenticates_sign_in_requests(#[case] request: AuthRequest) {
        let reply = FixtureAuthTransport.send(&request).await.expect("fixture reply");
        let AuthReply::Authenticated(user) = reply else {
            panic!("expected an authenticated reply");
        };
        assert_eq!(user.id().as_ref(), FixtureAuthTransport::USER_ID);
        assert_eq!(user.email(), "user123@mail.com");
    }

    #[tokio::test]
    async fn fixture_signs_out() {
        let reply = FixtureAuthTransport
            .send(&AuthRequest::SignOut)
            .await
            .expect("fixture reply");
        assert_eq!(reply, AuthReply::SignedOut);
    }
}
