//! Client-side form validation.
//!
//! A field is validated when it loses focus and on submit. Once a field has
//! been validated it is re-validated on every edit, so an error message
//! clears as soon as the input becomes valid.

use thiserror::Error;
use toolsshare_core::{Email, EmailError};

/// Minimum length for the `password` field.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Name of the field that `confirmPassword` must match.
const PASSWORD_FIELD: &str = "password";
const CONFIRM_PASSWORD_FIELD: &str = "confirmPassword";

/// Why a field failed validation. The display text is shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail(EmailError),
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Input type, from the element's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Password,
    Other,
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        match s {
            "text" | "textarea" | "search" => Self::Text,
            "email" => Self::Email,
            "password" => Self::Password,
            _ => Self::Other,
        }
    }
}

/// Validation state of a field, mirrored to `aria-invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Never validated; no `aria-invalid` attribute.
    #[default]
    Pristine,
    Valid,
    Invalid(ValidationError),
}

impl FieldState {
    /// Value for the `aria-invalid` attribute, if set.
    #[must_use]
    pub const fn aria_invalid(&self) -> Option<&'static str> {
        match self {
            Self::Pristine => None,
            Self::Valid => Some("false"),
            Self::Invalid(_) => Some("true"),
        }
    }

    /// Message rendered next to the field.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Invalid(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// One input, textarea or select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub field_type: FieldType,
    pub value: String,
    pub required: bool,
    pub state: FieldState,
}

impl FormField {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            value: String::new(),
            required: false,
            state: FieldState::Pristine,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Check one field against the rules for its type and name.
///
/// Every rule is evaluated; when more than one fails, the last one's message
/// is reported. `password` is the value of the form's `password` field, used
/// by `confirmPassword`.
///
/// # Errors
///
/// Returns the `ValidationError` to display for the field.
pub fn validate_field(field: &FormField, password: Option<&str>) -> Result<(), ValidationError> {
    let value = field.value.trim();
    let mut failure = None;

    if field.required && value.is_empty() {
        failure = Some(ValidationError::Required);
    }

    if field.field_type == FieldType::Email && !value.is_empty() {
        if let Err(e) = Email::parse(value) {
            failure = Some(ValidationError::InvalidEmail(e));
        }
    }

    if field.field_type == FieldType::Password
        && field.name == PASSWORD_FIELD
        && !value.is_empty()
        && value.chars().count() < MIN_PASSWORD_LENGTH
    {
        failure = Some(ValidationError::PasswordTooShort);
    }

    if field.name == CONFIRM_PASSWORD_FIELD {
        if let Some(password) = password {
            // Both sides trimmed, the same as every other rule sees the value.
            if value != password.trim() {
                failure = Some(ValidationError::PasswordMismatch);
            }
        }
    }

    failure.map_or(Ok(()), Err)
}

/// Check every field of a form.
///
/// # Errors
///
/// Returns the name and error of each failing field, in form order.
pub fn validate_form(fields: &[FormField]) -> Result<(), Vec<(&str, ValidationError)>> {
    let password = fields
        .iter()
        .find(|f| f.name == PASSWORD_FIELD)
        .map(|f| f.value.as_str());
    let failures: Vec<_> = fields
        .iter()
        .filter_map(|f| {
            validate_field(f, password)
                .err()
                .map(|e| (f.name.as_str(), e))
        })
        .collect();
    if failures.is_empty() { Ok(()) } else { Err(failures) }
}

/// A form and the validation state of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    #[must_use]
    pub const fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Field lost focus: validate it.
    ///
    /// Returns `None` if the form has no such field.
    pub fn blur(&mut self, name: &str) -> Option<&FieldState> {
        self.revalidate(name)
    }

    /// Field value changed: store it, and re-validate if the field has been
    /// validated before.
    pub fn input(&mut self, name: &str, value: impl Into<String>) -> Option<&FieldState> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        let field = self.fields.get_mut(index)?;
        field.value = value.into();
        if field.state == FieldState::Pristine {
            return self.fields.get(index).map(|f| &f.state);
        }
        self.revalidate(name)
    }

    /// Validate every field. Returns `true` if the form may be submitted.
    pub fn submit(&mut self) -> bool {
        let password = self.password_value();
        let mut valid = true;
        for field in &mut self.fields {
            field.state = match validate_field(field, password.as_deref()) {
                Ok(()) => FieldState::Valid,
                Err(e) => {
                    valid = false;
                    FieldState::Invalid(e)
                }
            };
        }
        tracing::debug!(valid, "form submitted");
        valid
    }

    fn revalidate(&mut self, name: &str) -> Option<&FieldState> {
        let password = self.password_value();
        let field = self.fields.iter_mut().find(|f| f.name == name)?;
        field.state = match validate_field(field, password.as_deref()) {
            Ok(()) => FieldState::Valid,
            Err(e) => FieldState::Invalid(e),
        };
        Some(&field.state)
    }

    fn password_value(&self) -> Option<String> {
        self.field(PASSWORD_FIELD).map(|f| f.value.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str, confirm: &str) -> Form {
        Form::new(vec![
            FormField::new("email", FieldType::Email).required().with_value(email),
            FormField::new("password", FieldType::Password)
                .required()
                .with_value(password),
            FormField::new("confirmPassword", FieldType::Password)
                .required()
                .with_value(confirm),
        ])
    }

    #[test]
    fn test_required_blank() {
        let field = FormField::new("name", FieldType::Text).required().with_value("   ");
        assert_eq!(validate_field(&field, None), Err(ValidationError::Required));
    }

    #[test]
    fn test_optional_blank_is_valid() {
        let field = FormField::new("email", FieldType::Email);
        assert_eq!(validate_field(&field, None), Ok(()));
    }

    #[test]
    fn test_invalid_email_message() {
        let field = FormField::new("email", FieldType::Email).with_value("user@localhost");
        let err = validate_field(&field, None).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
    }

    #[test]
    fn test_short_password() {
        let field = FormField::new("password", FieldType::Password).with_value("abc123");
        assert_eq!(validate_field(&field, None), Err(ValidationError::PasswordTooShort));

        // Only the field named `password` has a length rule.
        let other = FormField::new("currentPassword", FieldType::Password).with_value("abc");
        assert_eq!(validate_field(&other, None), Ok(()));
    }

    #[test]
    fn test_confirm_password_mismatch_wins_over_required() {
        let field = FormField::new("confirmPassword", FieldType::Password).required();
        assert_eq!(
            validate_field(&field, Some("hunter2hunter2")),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_confirm_password_ignores_surrounding_spaces() {
        let field = FormField::new("confirmPassword", FieldType::Password).with_value("longenough");
        assert_eq!(validate_field(&field, Some(" longenough ")), Ok(()));
    }

    #[test]
    fn test_submit_valid_form() {
        let mut form = signup("user@example.com", "longenough", "longenough");
        assert!(form.submit());
        assert!(form.fields().iter().all(|f| f.state == FieldState::Valid));
    }

    #[test]
    fn test_submit_reports_every_failure() {
        let mut form = signup("nope", "short", "different");
        assert!(!form.submit());
        let messages: Vec<String> = form
            .fields()
            .iter()
            .filter_map(|f| f.state.error_message())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Please enter a valid email address",
                "Password must be at least 8 characters long",
                "Passwords do not match",
            ]
        );
    }

    #[test]
    fn test_validate_form_lists_failing_fields() {
        let form = signup("user@example.com", "short", "short");
        let failures = validate_form(form.fields()).unwrap_err();
        assert_eq!(failures, vec![("password", ValidationError::PasswordTooShort)]);
        assert!(validate_form(signup("a@b.co", "longenough", "longenough").fields()).is_ok());
    }

    #[test]
    fn test_input_before_blur_does_not_validate() {
        let mut form = signup("", "", "");
        let state = form.input("email", "bad").unwrap();
        assert_eq!(state, &FieldState::Pristine);
        assert_eq!(state.aria_invalid(), None);
    }

    #[test]
    fn test_error_clears_while_typing_after_blur() {
        let mut form = signup("bad", "", "");
        assert!(matches!(form.blur("email"), Some(FieldState::Invalid(_))));
        assert_eq!(form.input("email", "user@example.com"), Some(&FieldState::Valid));
        assert_eq!(form.field("email").unwrap().state.aria_invalid(), Some("false"));
    }

    #[test]
    fn test_unknown_field() {
        let mut form = signup("", "", "");
        assert!(form.blur("nickname").is_none());
        assert!(form.input("nickname", "x").is_none());
    }

    #[test]
    fn test_field_type_from_attribute() {
        assert_eq!(FieldType::from("email"), FieldType::Email);
        assert_eq!(FieldType::from("password"), FieldType::Password);
        assert_eq!(FieldType::from("checkbox"), FieldType::Other);
    }
}
