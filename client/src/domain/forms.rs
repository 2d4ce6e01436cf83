//! Field sets for the sign-in and sign-up screens.
//!
//! Each form declares its fields and rules once, validates them through
//! [`form_validation::validate_all`], and only produces an [`AuthRequest`]
//! when every field passes.

use form_validation::{Field, FieldId, MessageKey, Rule, ValidationResult, validate_all};
use thiserror::Error;

use super::auth::{AuthRequest, AuthValidationError, SignInCredentials, SignUpRequest};

/// Field identifiers shared by the screens.
pub mod fields {
    use form_validation::FieldId;

    /// Display name typed on sign-up.
    pub const NAME: FieldId = FieldId::new("name");
    /// Email address.
    pub const EMAIL: FieldId = FieldId::new("email");
    /// Password.
    pub const PASSWORD: FieldId = FieldId::new("password");
    /// Password confirmation typed on sign-up.
    pub const PASSWORD_CONFIRMATION: FieldId = FieldId::new("password_confirmation");
    /// Gender picked on sign-up.
    pub const GENDER: FieldId = FieldId::new("gender");
}

/// Message keys reported by the form rules.
pub mod messages {
    use form_validation::MessageKey;

    /// Name left blank.
    pub const MISSING_NAME: MessageKey = MessageKey::new("missing_name");
    /// Email left blank.
    pub const MISSING_EMAIL: MessageKey = MessageKey::new("missing_email");
    /// Email not shaped like an address.
    pub const EMAIL_NOT_VALID: MessageKey = MessageKey::new("email_not_valid");
    /// Password left blank.
    pub const MISSING_PASSWORD: MessageKey = MessageKey::new("missing_password");
    /// Password shorter than the minimum.
    pub const SHORT_PASSWORD: MessageKey = MessageKey::new("short_password");
    /// Confirmation left blank.
    pub const MISSING_CONFIRM_PASSWORD: MessageKey = MessageKey::new("missing_confirm_password");
    /// Confirmation differs from the password.
    pub const CONFIRM_PASSWORD_MATCH: MessageKey = MessageKey::new("confirm_password_match");
    /// No gender picked.
    pub const MISSING_GENDER: MessageKey = MessageKey::new("missing_gender");
}

/// Minimum password length accepted on sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a form refused to produce a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// One or more fields failed their rules.
    #[error("form has {} invalid field(s)", .0.error_count())]
    Invalid(ValidationResult),
    /// Fields passed but the values could not form a request.
    #[error(transparent)]
    Malformed(#[from] AuthValidationError),
}

impl FormError {
    /// Per-field outcome, when the failure came from validation.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Invalid(result) => Some(result),
            Self::Malformed(_) => None,
        }
    }
}

fn email_field(value: &str) -> Field {
    Field::new(fields::EMAIL, value)
        .with_rule(Rule::NotEmpty(messages::MISSING_EMAIL))
        .with_rule(Rule::IsEmail(messages::EMAIL_NOT_VALID))
}

fn required(id: FieldId, value: &str, key: MessageKey) -> Field {
    Field::new(id, value).with_rule(Rule::NotEmpty(key))
}

/// Raw values typed on the sign-in screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl SignInForm {
    /// Fields with their rules, in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        vec![
            email_field(&self.email),
            required(fields::PASSWORD, &self.password, messages::MISSING_PASSWORD),
        ]
    }

    /// Validate every field.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        validate_all(&self.fields())
    }

    /// Produce the sign-in request when every field passes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] with the per-field result when any rule
    /// fails.
    ///
    /// # Examples
    /// ```
    /// use client::domain::SignInForm;
    /// use client::domain::forms::{fields, messages};
    ///
    /// let form = SignInForm {
    ///     email: "hello@world".to_owned(),
    ///     password: "asdasdasdasda".to_owned(),
    /// };
    /// let err = form.submit().unwrap_err();
    /// let result = err.validation().unwrap();
    /// assert_eq!(result.error_for(fields::EMAIL), Some(messages::EMAIL_NOT_VALID));
    /// ```
    pub fn submit(&self) -> Result<AuthRequest, FormError> {
        let result = self.validate();
        if !result.is_submittable() {
            return Err(FormError::Invalid(result));
        }
        let credentials = SignInCredentials::try_from_parts(&self.email, &self.password)?;
        Ok(AuthRequest::SignIn(credentials))
    }
}

/// Raw values typed on the sign-up screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Display name, normalised into the username.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Gender picked from the list.
    pub gender: String,
    /// Password as typed.
    pub password: String,
    /// Confirmation as typed.
    pub password_confirmation: String,
}

impl SignUpForm {
    /// Fields with their rules, in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        vec![
            required(fields::NAME, &self.name, messages::MISSING_NAME),
            email_field(&self.email),
            required(fields::PASSWORD, &self.password, messages::MISSING_PASSWORD).with_rule(
                Rule::MinLength {
                    min: MIN_PASSWORD_LENGTH,
                    key: messages::SHORT_PASSWORD,
                },
            ),
            required(
                fields::PASSWORD_CONFIRMATION,
                &self.password_confirmation,
                messages::MISSING_CONFIRM_PASSWORD,
            )
            .with_rule(Rule::SameAs {
                other: fields::PASSWORD,
                key: messages::CONFIRM_PASSWORD_MATCH,
            }),
            required(fields::GENDER, &self.gender, messages::MISSING_GENDER),
        ]
    }

    /// Validate every field.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        validate_all(&self.fields())
    }

    /// Produce the sign-up request when every field passes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] with the per-field result when any rule
    /// fails.
    pub fn submit(&self) -> Result<AuthRequest, FormError> {
        let result = self.validate();
        if !result.is_submittable() {
            return Err(FormError::Invalid(result));
        }
        let request = SignUpRequest::try_from_parts(
            &self.name,
            &self.email,
            &self.gender,
            &self.password,
            &self.password_confirmation,
        )?;
        Ok(AuthRequest::SignUp(request))
    }
}
