//! Composable field validation for sign-up and sign-in screens.
//!
//! The crate is deliberately UI agnostic: screens hand over raw field values
//! and receive a [`ValidationResult`] naming, per field, the first message key
//! that failed. Rendering those keys as localised text is the caller's job.
//!
//! # Overview
//!
//! - [`Rule`] evaluates one field value (plus, for [`Rule::SameAs`], the value
//!   of another field in the same pass).
//! - [`Field`] carries an identifier, a raw value and an ordered rule list.
//! - [`validate_all`] runs every field and never stops early across fields,
//!   so a screen can highlight every problem in one pass.
//! - [`FormInput`] is the editable field component screens bind to.
//!
//! # Example
//!
//! ```
//! use form_validation::{Field, FieldId, MessageKey, Rule, validate_all};
//!
//! const EMAIL: FieldId = FieldId::new("email");
//! const MISSING_EMAIL: MessageKey = MessageKey::new("missing_email");
//! const EMAIL_NOT_VALID: MessageKey = MessageKey::new("email_not_valid");
//!
//! let fields = [Field::new(EMAIL, "hello@world")
//!     .with_rule(Rule::NotEmpty(MISSING_EMAIL))
//!     .with_rule(Rule::IsEmail(EMAIL_NOT_VALID))];
//!
//! let result = validate_all(&fields);
//! assert!(!result.is_submittable());
//! assert_eq!(result.error_for(EMAIL), Some(EMAIL_NOT_VALID));
//! ```

mod engine;
mod input;
mod rule;

pub use engine::{Field, FieldOutcome, ValidationResult, is_submittable, validate_all};
pub use input::{FormInput, InputKind, apply_result};
pub use rule::{FieldId, FieldValues, MessageKey, Rule, is_blank, is_email};
