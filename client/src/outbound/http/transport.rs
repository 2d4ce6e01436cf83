//! Reqwest-backed auth transport.
//!
//! This adapter owns transport details only: endpoint paths, JSON bodies,
//! the request timeout, trace header propagation and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use tracing::debug;

use super::dto::{SignInBody, SignUpBody, SocialSignInBody, UserEnvelopeDto, error_message};
use crate::domain::ports::{AuthReply, AuthTransport, AuthTransportError};
use crate::domain::trace_id::TRACE_ID_HEADER;
use crate::domain::{AuthRequest, TraceId, User};

const SIGN_UP_PATH: &str = "users/";
const SIGN_IN_PATH: &str = "users/sign_in";
const SOCIAL_SIGN_IN_PATH: &str = "users/facebook";
const SIGN_OUT_PATH: &str = "users/sign_out";

/// Auth transport speaking JSON to the API under one base URL.
#[derive(Debug, Clone)]
pub struct HttpAuthTransport {
    client: Client,
    base_url: Url,
}

impl HttpAuthTransport {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `base_url` should end with `/` so relative endpoint paths join below
    /// it; a missing trailing slash is added.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthTransportError> {
        self.base_url
            .join(path)
            .map_err(|err| AuthTransportError::network(format!("invalid endpoint {path}: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AuthTransportError> {
        let mut builder = self
            .client
            .request(method, self.endpoint(path)?)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(trace_id) = TraceId::current() {
            builder = builder.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        Ok(builder)
    }

    fn build(&self, request: &AuthRequest) -> Result<RequestBuilder, AuthTransportError> {
        Ok(match request {
            AuthRequest::SignUp(sign_up) => self
                .request(Method::POST, SIGN_UP_PATH)?
                .json(&SignUpBody::from(sign_up)),
            AuthRequest::SignIn(credentials) => self
                .request(Method::POST, SIGN_IN_PATH)?
                .json(&SignInBody::from(credentials)),
            AuthRequest::SocialSignIn(token) => self
                .request(Method::POST, SOCIAL_SIGN_IN_PATH)?
                .json(&SocialSignInBody::from(token)),
            AuthRequest::SignOut => self.request(Method::DELETE, SIGN_OUT_PATH)?,
        })
    }
}

#[async_trait]
impl AuthTransport for HttpAuthTransport {
    async fn send(&self, request: &AuthRequest) -> Result<AuthReply, AuthTransportError> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "auth response received");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        match request {
            AuthRequest::SignOut => Ok(AuthReply::SignedOut),
            AuthRequest::SignUp(_) | AuthRequest::SignIn(_) | AuthRequest::SocialSignIn(_) => {
                parse_user(body.as_ref()).map(AuthReply::Authenticated)
            }
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_user(body: &[u8]) -> Result<User, AuthTransportError> {
    let decoded: UserEnvelopeDto = serde_json::from_slice(body).map_err(|error| {
        AuthTransportError::decode(format!("invalid user payload: {error}"))
    })?;
    decoded
        .into_domain_user()
        .map_err(AuthTransportError::decode)
}

fn map_transport_error(error: reqwest::Error) -> AuthTransportError {
    if error.is_timeout() {
        AuthTransportError::network(format!("request timed out: {error}"))
    } else if error.is_decode() {
        AuthTransportError::decode(error.to_string())
    } else {
        AuthTransportError::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthTransportError {
    AuthTransportError::rejected(status.as_u16(), error_message(body).unwrap_or_default())
}
