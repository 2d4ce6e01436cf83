//! Authentication request payloads.
//!
//! Requests are immutable once built. Constructors trim nothing that the
//! server compares verbatim (emails and passwords pass through untouched) and
//! apply the sign-up normalisation rules for usernames and gender.

use std::fmt;

use zeroize::Zeroizing;

/// Errors returned when request values are structurally unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email was blank.
    EmptyEmail,
    /// Password was empty.
    EmptyPassword,
    /// Username was empty after normalisation.
    EmptyUsername,
    /// Social sign-in callback produced no token.
    EmptyToken,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyToken => write!(f, "social sign-in returned no access token"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Email and password for a sign-in attempt.
///
/// # Examples
/// ```
/// use client::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts("user123@mail.com", "asdasdasdasda").unwrap();
/// assert_eq!(creds.email(), "user123@mail.com");
/// assert!(!format!("{creds:?}").contains("asdasdasdasda"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Build credentials from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError`] when either value is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        if email.trim().is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email as typed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account creation payload.
///
/// ## Invariants
/// - `username` is the typed name with all whitespace removed, lower-cased.
/// - `gender` is lower-cased.
/// - `email`, `password` and `password_confirmation` are kept verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    username: String,
    email: String,
    gender: String,
    password: Zeroizing<String>,
    password_confirmation: Zeroizing<String>,
}

impl SignUpRequest {
    /// Build a sign-up request from raw form values.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError`] when the normalised username, the email
    /// or the password is empty.
    ///
    /// # Examples
    /// ```
    /// use client::domain::SignUpRequest;
    ///
    /// let request = SignUpRequest::try_from_parts(
    ///     " Richard  Roe ",
    ///     "user123@mail.com",
    ///     "Female",
    ///     "asdasdasdasda",
    ///     "asdasdasdasda",
    /// )
    /// .unwrap();
    /// assert_eq!(request.username(), "richardroe");
    /// assert_eq!(request.gender(), "female");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        gender: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = normalise_username(name);
        if username.is_empty() {
            return Err(AuthValidationError::EmptyUsername);
        }
        if email.trim().is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            email: email.to_owned(),
            gender: gender.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
            password_confirmation: Zeroizing::new(password_confirmation.to_owned()),
        })
    }

    /// Normalised username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Email as typed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Lower-cased gender.
    #[must_use]
    pub fn gender(&self) -> &str {
        self.gender.as_str()
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Confirmation as typed.
    #[must_use]
    pub fn password_confirmation(&self) -> &str {
        self.password_confirmation.as_str()
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("gender", &self.gender)
            .field("password", &"<redacted>")
            .field("password_confirmation", &"<redacted>")
            .finish()
    }
}

fn normalise_username(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Access token handed over by a social sign-in provider.
#[derive(Clone, PartialEq, Eq)]
pub struct SocialToken(Zeroizing<String>);

impl SocialToken {
    /// Wrap a provider token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError::EmptyToken`] when the token is blank.
    pub fn new(token: &str) -> Result<Self, AuthValidationError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(AuthValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SocialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SocialToken(<redacted>)")
    }
}

/// One request a screen may issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    /// Create an account and sign in.
    SignUp(SignUpRequest),
    /// Sign in with email and password.
    SignIn(SignInCredentials),
    /// Sign in with a social provider token.
    SocialSignIn(SocialToken),
    /// End the current session.
    SignOut,
}

impl AuthRequest {
    /// Secret-free label for logs.
    #[must_use]
    pub const fn kind(&self) -> AuthRequestKind {
        match self {
            Self::SignUp(_) => AuthRequestKind::SignUp,
            Self::SignIn(_) => AuthRequestKind::SignIn,
            Self::SocialSignIn(_) => AuthRequestKind::SocialSignIn,
            Self::SignOut => AuthRequestKind::SignOut,
        }
    }
}

/// Variant tag of an [`AuthRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRequestKind {
    /// Account creation.
    SignUp,
    /// Email and password sign-in.
    SignIn,
    /// Social provider sign-in.
    SocialSignIn,
    /// Session end.
    SignOut,
}

impl AuthRequestKind {
    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "sign_up",
            Self::SignIn => "sign_in",
            Self::SocialSignIn => "social_sign_in",
            Self::SignOut => "sign_out",
        }
    }
}

impl fmt::Display for AuthRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
