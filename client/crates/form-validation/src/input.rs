//! Editable field component shared by every screen.
//!
//! One type covers text, email, password and picker inputs; the
//! [`InputKind`] only changes how the value is displayed and collected.

use std::borrow::Cow;
use std::fmt;

use crate::engine::ValidationResult;
use crate::rule::{FieldId, MessageKey};

/// How an input collects and displays its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Free text.
    #[default]
    Text,
    /// Email address.
    Email,
    /// Secret value, masked when displayed.
    Password,
    /// Value chosen from a fixed list instead of typed.
    Picker,
}

type ChangeListener = Box<dyn FnMut(FieldId, &str) + Send>;

/// A user-editable input that owns its value and its visible error.
///
/// Writing a new value clears the visible error and notifies every change
/// listener, matching the "edit clears the complaint" behaviour of the
/// screens.
pub struct FormInput {
    id: FieldId,
    kind: InputKind,
    value: String,
    error: Option<MessageKey>,
    enabled: bool,
    listeners: Vec<ChangeListener>,
}

impl FormInput {
    /// Create an empty, enabled input.
    #[must_use]
    pub fn new(id: FieldId, kind: InputKind) -> Self {
        Self {
            id,
            kind,
            value: String::new(),
            error: None,
            enabled: true,
            listeners: Vec::new(),
        }
    }

    /// Field this input edits.
    #[must_use]
    pub const fn id(&self) -> FieldId {
        self.id
    }

    /// Display style of the input.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        self.kind
    }

    /// Current raw value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Value as it should be shown; passwords are masked.
    #[must_use]
    pub fn display_value(&self) -> Cow<'_, str> {
        match self.kind {
            InputKind::Password => Cow::Owned("•".repeat(self.value.chars().count())),
            InputKind::Text | InputKind::Email | InputKind::Picker => {
                Cow::Borrowed(self.value.as_str())
            }
        }
    }

    /// Replace the value, clear the visible error and notify listeners.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.error = None;
        for listener in &mut self.listeners {
            listener(self.id, &self.value);
        }
    }

    /// Error currently shown on the input.
    #[must_use]
    pub const fn error(&self) -> Option<MessageKey> {
        self.error
    }

    /// Show `key` on the input.
    pub fn set_error(&mut self, key: MessageKey) {
        self.error = Some(key);
    }

    /// Hide any shown error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether the input accepts edits.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable edits, e.g. while a picker dialog is open.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Register a listener invoked after every value change.
    pub fn on_change(&mut self, listener: impl FnMut(FieldId, &str) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Show or clear this input's error according to `result`.
    pub fn apply(&mut self, result: &ValidationResult) {
        self.error = result.error_for(self.id);
    }
}

impl fmt::Debug for FormInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormInput")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("value", &self.display_value())
            .field("error", &self.error)
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Push the errors of `result` onto every input, clearing the ones that pass.
pub fn apply_result(inputs: &mut [FormInput], result: &ValidationResult) {
    for input in inputs {
        input.apply(result);
    }
}
