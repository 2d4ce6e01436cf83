//! Aggregation of field rules into a single submission gate.

use crate::rule::{FieldId, FieldValues, MessageKey, Rule};

/// A named input value together with its ordered rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: FieldId,
    value: String,
    rules: Vec<Rule>,
}

impl Field {
    /// Create a field holding `value` and no rules.
    #[must_use]
    pub fn new(id: FieldId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule; rules run in the order they are added.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Field identifier.
    #[must_use]
    pub const fn id(&self) -> FieldId {
        self.id
    }

    /// Raw value as typed.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First failing rule's key, or `None` when every rule passes.
    #[must_use]
    pub fn first_error<V>(&self, values: &V) -> Option<MessageKey>
    where
        V: FieldValues + ?Sized,
    {
        self.rules
            .iter()
            .find_map(|rule| rule.check(&self.value, values).err())
    }
}

impl FieldValues for [Field] {
    fn value_of(&self, field: FieldId) -> Option<&str> {
        self.iter()
            .find(|candidate| candidate.id == field)
            .map(Field::value)
    }
}

/// Outcome recorded for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    /// Field the outcome belongs to.
    pub field: FieldId,
    /// First failing rule's key, if any.
    pub error: Option<MessageKey>,
}

/// Per-field outcome of one validation pass, in field declaration order.
///
/// ## Invariants
/// - A field missing from the result, or mapped to `None`, is valid.
/// - The form is submittable iff no entry carries an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    entries: Vec<FieldOutcome>,
}

impl ValidationResult {
    /// Error recorded for `field`, if any.
    #[must_use]
    pub fn error_for(&self, field: FieldId) -> Option<MessageKey> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .and_then(|entry| entry.error)
    }

    /// Returns `true` when no field carries an error.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.entries.iter().all(|entry| entry.error.is_none())
    }

    /// Fields that failed, with their keys, in declaration order.
    pub fn errors(&self) -> impl Iterator<Item = (FieldId, MessageKey)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.error.map(|key| (entry.field, key)))
    }

    /// Number of fields carrying an error.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Every recorded outcome, including passing fields.
    #[must_use]
    pub fn entries(&self) -> &[FieldOutcome] {
        &self.entries
    }
}

/// Evaluate every field and collect the first error of each.
///
/// Rules short-circuit within a field but never across fields. The result is
/// a pure function of the inputs, so validating unchanged fields twice yields
/// equal results.
#[must_use]
pub fn validate_all(fields: &[Field]) -> ValidationResult {
    let entries = fields
        .iter()
        .map(|field| FieldOutcome {
            field: field.id(),
            error: field.first_error(fields),
        })
        .collect();
    ValidationResult { entries }
}

/// Returns `true` when `result` carries no field errors.
#[must_use]
pub fn is_submittable(result: &ValidationResult) -> bool {
    result.is_submittable()
}

#[cfg(test)]
mod tests {
    //! Engine behaviour: ordering, isolation between fields, idempotence.

    use rstest::{fixture, rstest};

    use super::*;

    const EMAIL: FieldId = FieldId::new("email");
    const PASSWORD: FieldId = FieldId::new("password");
    const CONFIRMATION: FieldId = FieldId::new("password_confirmation");

    const MISSING_EMAIL: MessageKey = MessageKey::new("missing_email");
    const EMAIL_NOT_VALID: MessageKey = MessageKey::new("email_not_valid");
    const MISSING_PASSWORD: MessageKey = MessageKey::new("missing_password");
    const SHORT_PASSWORD: MessageKey = MessageKey::new("short_password");
    const CONFIRM_MATCH: MessageKey = MessageKey::new("confirm_password_match");

    #[derive(Clone, Copy)]
    struct Values {
        email: &'static str,
        password: &'static str,
        confirmation: &'static str,
    }

    #[fixture]
    fn valid() -> Values {
        Values {
            email: "user123@mail.com",
            password: "asdasdasdasda",
            confirmation: "asdasdasdasda",
        }
    }

    fn fields(values: &Values) -> Vec<Field> {
        vec![
            Field::new(EMAIL, values.email)
                .with_rule(Rule::NotEmpty(MISSING_EMAIL))
                .with_rule(Rule::IsEmail(EMAIL_NOT_VALID)),
            Field::new(PASSWORD, values.password)
                .with_rule(Rule::NotEmpty(MISSING_PASSWORD))
                .with_rule(Rule::MinLength {
                    min: 8,
                    key: SHORT_PASSWORD,
                }),
            Field::new(CONFIRMATION, values.confirmation).with_rule(Rule::SameAs {
                other: PASSWORD,
                key: CONFIRM_MATCH,
            }),
        ]
    }

    #[rstest]
    fn valid_fields_are_submittable(valid: Values) {
        let result = validate_all(&fields(&valid));
        assert!(result.is_submittable());
        assert!(is_submittable(&result));
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.entries().len(), 3);
    }

    #[rstest]
    fn every_failing_field_reports_its_own_error() {
        let values = Values {
            email: "",
            password: "123",
            confirmation: "456",
        };
        let result = validate_all(&fields(&values));

        let errors: Vec<_> = result.errors().collect();
        assert_eq!(
            errors,
            vec![
                (EMAIL, MISSING_EMAIL),
                (PASSWORD, SHORT_PASSWORD),
                (CONFIRMATION, CONFIRM_MATCH),
            ]
        );
    }

    #[rstest]
    fn only_the_first_failing_rule_is_kept() {
        let field = Field::new(PASSWORD, "")
            .with_rule(Rule::NotEmpty(MISSING_PASSWORD))
            .with_rule(Rule::MinLength {
                min: 8,
                key: SHORT_PASSWORD,
            });
        let result = validate_all(&[field]);
        assert_eq!(result.error_for(PASSWORD), Some(MISSING_PASSWORD));
    }

    #[rstest]
    fn validation_is_idempotent(#[values("", "hello@world", "user123@mail.com")] email: &'static str) {
        let values = Values {
            email,
            password: "short",
            confirmation: "",
        };
        let fields = fields(&values);
        assert_eq!(validate_all(&fields), validate_all(&fields));
    }

    #[rstest]
    fn correcting_one_field_clears_only_that_error(valid: Values) {
        let broken = Values {
            email: "test@test",
            ..valid
        };
        let before = validate_all(&fields(&broken));
        assert_eq!(before.error_for(EMAIL), Some(EMAIL_NOT_VALID));
        assert_eq!(before.error_for(PASSWORD), None);

        let after = validate_all(&fields(&valid));
        assert_eq!(after.error_for(EMAIL), None);
        assert_eq!(after.error_for(PASSWORD), None);
        assert!(after.is_submittable());
    }

    #[test]
    fn unknown_fields_have_no_error() {
        let result = validate_all(&[]);
        assert_eq!(result.error_for(EMAIL), None);
        assert!(result.is_submittable());
    }

    #[rstest]
    #[case("", Some(MISSING_PASSWORD), Some(CONFIRM_MATCH))]
    #[case("123", Some(SHORT_PASSWORD), Some(CONFIRM_MATCH))]
    #[case("asdasdasdasda", None, None)]
    fn first_error_reads_sibling_values(
        valid: Values,
        #[case] password: &'static str,
        #[case] password_error: Option<MessageKey>,
        #[case] confirmation_error: Option<MessageKey>,
    ) {
        let form = fields(&Values { password, ..valid });
        let [_, password_field, confirmation_field] = form.as_slice() else {
            panic!("three fields declared");
        };
        assert_eq!(password_field.first_error(form.as_slice()), password_error);
        assert_eq!(
            confirmation_field.first_error(form.as_slice()),
            confirmation_error
        );
    }
}
