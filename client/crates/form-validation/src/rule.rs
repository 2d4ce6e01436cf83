//! Field identifiers, message keys and the individual validation rules.
//!
//! # Blank-skip policy
//!
//! Only [`Rule::NotEmpty`] reports blank input. Every other rule passes on a
//! blank value so an empty email field reports "missing" rather than
//! "invalid format".

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Stable identifier naming one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(&'static str);

impl FieldId {
    /// Wrap a static field name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Field name as declared.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Logical identifier of a user-facing error message.
///
/// Keys such as `missing_email` are resolved to localised text by the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey(&'static str);

impl MessageKey {
    /// Wrap a static message key.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// Key as declared.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Read-only view over the field values taking part in one validation pass.
pub trait FieldValues {
    /// Current raw value of `field`, or `None` when it is not in the pass.
    fn value_of(&self, field: FieldId) -> Option<&str>;
}

/// A single check applied to a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Fails when the value is empty or whitespace-only.
    NotEmpty(MessageKey),
    /// Fails when a non-blank value is not shaped like `local@domain.tld`.
    IsEmail(MessageKey),
    /// Fails when a non-blank value has fewer than `min` characters.
    MinLength {
        /// Minimum number of characters, counted on the untrimmed value.
        min: usize,
        /// Key reported on failure.
        key: MessageKey,
    },
    /// Fails when a non-blank value differs from the value of `other`.
    SameAs {
        /// Field whose value must match.
        other: FieldId,
        /// Key reported on failure.
        key: MessageKey,
    },
}

impl Rule {
    /// Message key reported when this rule fails.
    #[must_use]
    pub const fn key(&self) -> MessageKey {
        match self {
            Self::NotEmpty(key) | Self::IsEmail(key) => *key,
            Self::MinLength { key, .. } | Self::SameAs { key, .. } => *key,
        }
    }

    /// Evaluate the rule against `value`.
    ///
    /// `values` resolves the reference of [`Rule::SameAs`]; a reference that
    /// is not part of the pass fails the rule.
    ///
    /// # Errors
    ///
    /// Returns the rule's [`MessageKey`] when the value does not satisfy it.
    ///
    /// # Examples
    ///
    /// ```
    /// use form_validation::{Field, MessageKey, Rule};
    ///
    /// let short = MessageKey::new("short_password");
    /// let rule = Rule::MinLength { min: 8, key: short };
    /// let none: &[Field] = &[];
    ///
    /// assert_eq!(rule.check("12345", none), Err(short));
    /// assert_eq!(rule.check("", none), Ok(()));
    /// ```
    pub fn check<V>(&self, value: &str, values: &V) -> Result<(), MessageKey>
    where
        V: FieldValues + ?Sized,
    {
        let passes = match self {
            Self::NotEmpty(_) => !is_blank(value),
            _ if is_blank(value) => true,
            Self::IsEmail(_) => is_email(value),
            Self::MinLength { min, .. } => value.chars().count() >= *min,
            Self::SameAs { other, .. } => values.value_of(*other) == Some(value),
        };

        if passes { Ok(()) } else { Err(self.key()) }
    }
}

/// Returns `true` when `value` is empty or contains only whitespace.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Domain segments are non-empty and the final one is alphabetic.
        let pattern = r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)*\.[A-Za-z]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Returns `true` when `value` looks like `local-part@domain.tld`.
///
/// # Examples
///
/// ```
/// use form_validation::is_email;
///
/// assert!(is_email("user123@mail.com"));
/// assert!(!is_email("hello@world"));
/// ```
#[must_use]
pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    //! Rule-level coverage, including the blank-skip policy.

    use rstest::rstest;

    use super::*;
    use crate::Field;

    const KEY: MessageKey = MessageKey::new("error");
    const PASSWORD: FieldId = FieldId::new("password");

    fn no_fields() -> &'static [Field] {
        &[]
    }

    #[rstest]
    #[case("email@mkdi.com", true)]
    #[case("user123@mail.com", true)]
    #[case("first.last@sub.domain.io", true)]
    #[case("email@mkdi", false)]
    #[case("email", false)]
    #[case("email.com", false)]
    #[case("hello@world", false)]
    #[case("test@test", false)]
    #[case("a@.com", false)]
    #[case("a@b..com", false)]
    #[case("a@b.c0m", false)]
    #[case("two@@mail.com", false)]
    #[case("spaced name@mail.com", false)]
    fn email_shape(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_email(value), expected, "value: {value}");
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("\t\n", true)]
    #[case(" a ", false)]
    #[case("hello world", false)]
    fn blank_detection(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_blank(value), expected);
    }

    #[rstest]
    #[case(Rule::IsEmail(KEY))]
    #[case(Rule::MinLength { min: 8, key: KEY })]
    #[case(Rule::SameAs { other: PASSWORD, key: KEY })]
    fn non_empty_rules_skip_blank_values(#[case] rule: Rule, #[values("", "  ")] value: &str) {
        assert_eq!(rule.check(value, no_fields()), Ok(()));
    }

    #[rstest]
    fn not_empty_reports_blank_values(#[values("", "  ", "\t")] value: &str) {
        assert_eq!(Rule::NotEmpty(KEY).check(value, no_fields()), Err(KEY));
    }

    #[rstest]
    #[case("1234567", Err(KEY))]
    #[case("12345678", Ok(()))]
    #[case("ñandúña", Err(KEY))]
    fn min_length_counts_characters(#[case] value: &str, #[case] expected: Result<(), MessageKey>) {
        let rule = Rule::MinLength { min: 8, key: KEY };
        assert_eq!(rule.check(value, no_fields()), expected);
    }

    #[rstest]
    #[case("12345678", Ok(()))]
    #[case("12345679", Err(KEY))]
    fn same_as_compares_referenced_value(
        #[case] value: &str,
        #[case] expected: Result<(), MessageKey>,
    ) {
        let fields = [Field::new(PASSWORD, "12345678")];
        let rule = Rule::SameAs {
            other: PASSWORD,
            key: KEY,
        };
        assert_eq!(rule.check(value, &fields[..]), expected);
    }

    #[test]
    fn same_as_fails_when_reference_is_missing() {
        let rule = Rule::SameAs {
            other: PASSWORD,
            key: KEY,
        };
        assert_eq!(rule.check("12345678", no_fields()), Err(KEY));
    }

    #[test]
    fn keys_and_ids_display_their_names() {
        assert_eq!(KEY.to_string(), "error");
        assert_eq!(PASSWORD.as_str(), "password");
        assert_eq!(Rule::IsEmail(KEY).key(), KEY);
    }
}
