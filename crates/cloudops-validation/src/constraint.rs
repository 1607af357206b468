//! Struct validator: declared per-field constraints
//!
//! A request model lists its fields, in declaration order, together with the
//! rules each one must satisfy. [`validate_struct`] walks that list and
//! reports the first failing rule. Cross-field checks are layered on top by
//! the request model itself (see [`crate::pipeline`]).

use crate::error::{ValidationError, ValidationResult};
use crate::rules::{
    FieldValue, Rule, ARGUMENT_KEYS, AWS_ACCOUNT_TARGET_TYPE, EXECUTE_CONTAINER_IMAGE_URI,
    PRE_CONTAINER_IMAGE_URI,
};

/// One declared field of a request model
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: FieldValue<'a>, rules: &'static [Rule]) -> Self {
        Self { name, value, rules }
    }

    pub fn string(name: &'static str, value: &'a str, rules: &'static [Rule]) -> Self {
        Self::new(name, FieldValue::Str(value), rules)
    }
}

/// Implemented by every value that carries declared field constraints
pub trait Constrained {
    /// Fields in declaration order. Fields without rules may be omitted.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// Evaluate every declared constraint and return the first violation
pub fn validate_struct<T: Constrained + ?Sized>(value: &T) -> ValidationResult {
    for field in value.fields() {
        for rule in field.rules {
            if !rule.check(field.value) {
                tracing::trace!(field = field.name, rule = %rule.code(), "constraint violated");
                return Err(violation(&field, rule));
            }
        }
    }
    Ok(())
}

fn violation(field: &Field<'_>, rule: &Rule) -> ValidationError {
    let name = field.name;
    let value = field.value.to_string();

    let err = match rule {
        Rule::Required => {
            return ValidationError::new(rule.code(), format!("{name} is required"))
                .with_field(name)
        }
        Rule::LengthRange { min, max } => {
            return ValidationError::new(
                rule.code(),
                format!("{name} must be between {min} and {max} characters"),
            )
            .with_field(name)
            .with_param(format!("{min}|{max}"))
        }
        Rule::AlphaNum => {
            ValidationError::new(rule.code(), format!("{name} must be alphanumeric"))
        }
        Rule::AlphaNumUnderscore => ValidationError::new(
            rule.code(),
            format!("{name} value '{value}' is invalid, must only contain alpha numeric underscore characters"),
        ),
        Rule::IsArn => ValidationError::new(
            rule.code(),
            format!("{name} value '{value}' is not a valid arn"),
        ),
        Rule::GitUri => ValidationError::new(rule.code(), format!("{name} must be a git uri")),
        Rule::ValidTargetType => ValidationError::new(
            rule.code(),
            format!("{name} must be one of '{AWS_ACCOUNT_TARGET_TYPE}'"),
        ),
        Rule::ValidArgument => ValidationError::new(
            rule.code(),
            format!("{name} must be one of '{}'", ARGUMENT_KEYS.join(" ")),
        ),
        Rule::ValidExecuteContainerImage => {
            return image_parameter_violation(field, rule, EXECUTE_CONTAINER_IMAGE_URI)
        }
        Rule::ValidPreContainerImage => {
            return image_parameter_violation(field, rule, PRE_CONTAINER_IMAGE_URI)
        }
    };

    err.with_field(name).with_value(value)
}

/// Image rules report the offending parameter key, not the whole map
fn image_parameter_violation(field: &Field<'_>, rule: &Rule, key: &'static str) -> ValidationError {
    let uri = match field.value {
        FieldValue::StrMap(map) => map.get(key),
        _ => None,
    };

    match uri {
        Some(uri) => ValidationError::new(
            rule.code(),
            format!("parameter {key} must be a valid container uri"),
        )
        .with_field(key)
        .with_value(uri.clone()),
        None => ValidationError::new(rule.code(), format!("parameter {key} is required"))
            .with_field(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleCode;
    use std::collections::BTreeMap;

    struct Named {
        name: String,
        role_arn: String,
    }

    impl Constrained for Named {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::string(
                    "name",
                    &self.name,
                    &[
                        Rule::Required,
                        Rule::AlphaNumUnderscore,
                        Rule::LengthRange { min: 4, max: 32 },
                    ],
                ),
                Field::string("role_arn", &self.role_arn, &[Rule::IsArn]),
            ]
        }
    }

    fn named(name: &str, role_arn: &str) -> Named {
        Named {
            name: name.to_string(),
            role_arn: role_arn.to_string(),
        }
    }

    #[test]
    fn test_all_constraints_pass() {
        let value = named("target_one", "arn:aws:iam::123456789012:role/x");
        assert!(validate_struct(&value).is_ok());
    }

    #[test]
    fn test_required_is_reported_first() {
        let err = validate_struct(&named("", "bogus")).unwrap_err();
        assert_eq!(err.rule(), RuleCode::Required);
        assert_eq!(err.field(), Some("name"));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_format_before_length() {
        let err = validate_struct(&named("a-b", "bogus")).unwrap_err();
        assert_eq!(err.rule(), RuleCode::AlphaNumUnderscore);
        assert_eq!(err.value(), Some("a-b"));
    }

    #[test]
    fn test_length_reports_bounds() {
        let err = validate_struct(&named("abc", "bogus")).unwrap_err();
        assert_eq!(err.rule(), RuleCode::LengthRange);
        assert_eq!(err.param(), Some("4|32"));
        assert_eq!(err.to_string(), "name must be between 4 and 32 characters");
    }

    #[test]
    fn test_fields_evaluated_in_declaration_order() {
        let err = validate_struct(&named("target_one", "bogus")).unwrap_err();
        assert_eq!(err.rule(), RuleCode::IsArn);
        assert_eq!(err.field(), Some("role_arn"));
        assert_eq!(err.to_string(), "role_arn value 'bogus' is not a valid arn");
    }

    struct Launch {
        arguments: BTreeMap<String, Vec<String>>,
        parameters: BTreeMap<String, String>,
    }

    impl Constrained for Launch {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new(
                    "arguments",
                    FieldValue::ListMap(&self.arguments),
                    &[Rule::ValidArgument],
                ),
                Field::new(
                    "parameters",
                    FieldValue::StrMap(&self.parameters),
                    &[Rule::ValidExecuteContainerImage, Rule::ValidPreContainerImage],
                ),
            ]
        }
    }

    fn launch(arguments: &[&str], parameters: &[(&str, &str)]) -> Launch {
        Launch {
            arguments: arguments
                .iter()
                .map(|k| (k.to_string(), Vec::new()))
                .collect(),
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_argument_violation_message() {
        let err = validate_struct(&launch(&["execute"], &[])).unwrap_err();
        assert_eq!(err.rule(), RuleCode::ValidArgument);
        assert_eq!(err.field(), Some("arguments"));
        assert_eq!(err.to_string(), "arguments must be one of 'execute init'");
        assert_eq!(err.value(), Some("map[execute:[]]"));
    }

    #[test]
    fn test_image_violations_name_the_parameter() {
        let err = validate_struct(&launch(&[], &[])).unwrap_err();
        assert_eq!(err.rule(), RuleCode::ValidExecuteContainerImage);
        assert_eq!(err.field(), Some(EXECUTE_CONTAINER_IMAGE_URI));
        assert_eq!(err.value(), None);

        let err = validate_struct(&launch(
            &[],
            &[(EXECUTE_CONTAINER_IMAGE_URI, "app:1.0"), (PRE_CONTAINER_IMAGE_URI, "bad uri")],
        ))
        .unwrap_err();
        assert_eq!(err.rule(), RuleCode::ValidPreContainerImage);
        assert_eq!(err.field(), Some(PRE_CONTAINER_IMAGE_URI));
        assert_eq!(err.value(), Some("bad uri"));

        assert!(validate_struct(&launch(&[], &[(EXECUTE_CONTAINER_IMAGE_URI, "app:1.0")])).is_ok());
    }
}
