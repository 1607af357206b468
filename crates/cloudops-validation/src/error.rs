//! Validation error taxonomy

use std::fmt;

/// Stable identifier of the rule that rejected a value.
///
/// The string form returned by [`RuleCode::as_str`] is part of the public
/// contract; callers match on it when rendering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCode {
    IsArn,
    ValidTargetType,
    AlphaNum,
    AlphaNumUnderscore,
    ValidExecuteContainerImage,
    ValidPreContainerImage,
    ValidArgument,
    Required,
    LengthRange,
    GitUri,
    ValidCredentialType,
    MaxItems,
    OneOf,
}

impl RuleCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleCode::IsArn => "is_arn",
            RuleCode::ValidTargetType => "valid_target_type",
            RuleCode::AlphaNum => "alphanum",
            RuleCode::AlphaNumUnderscore => "alphanumunderscore",
            RuleCode::ValidExecuteContainerImage => "valid_execute_container_image",
            RuleCode::ValidPreContainerImage => "valid_precontainer_image",
            RuleCode::ValidArgument => "valid_argument",
            RuleCode::Required => "required",
            RuleCode::LengthRange => "length_range",
            RuleCode::GitUri => "git_uri",
            RuleCode::ValidCredentialType => "valid_credential_type",
            RuleCode::MaxItems => "max_items",
            RuleCode::OneOf => "one_of",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request value.
///
/// Always recoverable: the caller shows the message and does not make the
/// network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    rule: RuleCode,
    field: Option<String>,
    value: Option<String>,
    param: Option<String>,
    message: String,
}

impl ValidationError {
    /// Create an error that is not attached to a single field
    pub fn new(rule: RuleCode, message: impl Into<String>) -> Self {
        Self {
            rule,
            field: None,
            value: None,
            param: None,
            message: message.into(),
        }
    }

    /// Attach the offending field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach the expected bound, such as `4|32` for a length range
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn rule(&self) -> RuleCode {
        self.rule
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for validation
pub type ValidationResult = Result<(), ValidationError>;
