//! Authenticated user model.

use std::fmt;

use zeroize::Zeroizing;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Server-assigned user identifier.
///
/// The server issues opaque identifiers (numeric in practice), so the value is
/// kept as text and only checked for shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError`] when the identifier is empty or padded.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive user attributes as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Account email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender as stored by the server.
    pub gender: String,
    /// Normalised username.
    pub username: String,
}

/// The currently authenticated user.
///
/// ## Invariants
/// - `id` is a non-empty identifier.
/// - The password is only present when the server echoed it back; it is
///   redacted from `Debug` output and never persisted.
///
/// # Examples
/// ```
/// use client::domain::{User, UserId, UserProfile};
///
/// let id = UserId::new("9032").expect("valid id");
/// let user = User::new(
///     id,
///     UserProfile {
///         email: "user123@mail.com".to_owned(),
///         username: "richard".to_owned(),
///         ..UserProfile::default()
///     },
/// );
/// assert_eq!(user.id().as_ref(), "9032");
/// assert!(user.password().is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    password: Option<Zeroizing<String>>,
}

impl User {
    /// Build a user without a password.
    #[must_use]
    pub const fn new(id: UserId, profile: UserProfile) -> Self {
        Self {
            id,
            profile,
            password: None,
        }
    }

    /// Attach the password the server echoed back.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    /// Copy of this user with the password dropped.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self::new(self.id.clone(), self.profile.clone())
    }

    /// Server-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Descriptive attributes.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Account email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.profile.email.as_str()
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.profile.first_name.as_str()
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.profile.last_name.as_str()
    }

    /// Gender as stored by the server.
    #[must_use]
    pub fn gender(&self) -> &str {
        self.profile.gender.as_str()
    }

    /// Normalised username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.profile.username.as_str()
    }

    /// Password, when the server echoed it.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|password| password.as_str())
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("profile", &self.profile)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
