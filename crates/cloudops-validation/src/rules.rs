//! Rule registry
//!
//! Every predicate here is pure: it never mutates its input and answers
//! `false` for malformed values instead of failing. [`Rule`] is the closed
//! set of rules a request field can declare.

use crate::error::RuleCode;
use crate::reference;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// The only target type the control plane accepts
pub const AWS_ACCOUNT_TARGET_TYPE: &str = "aws_account";

/// Argument phases accepted in a workflow `arguments` map
pub const ARGUMENT_KEYS: [&str; 2] = ["execute", "init"];

pub const EXECUTE_CONTAINER_IMAGE_URI: &str = "execute_container_image_uri";
pub const PRE_CONTAINER_IMAGE_URI: &str = "pre_container_image_uri";

static ALPHA_NUMERIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("alphanumeric underscore pattern is valid")
});

static GIT_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:git|ssh|https)://[A-Za-z0-9_.@:/~-]+|git@[A-Za-z0-9_.-]+:[A-Za-z0-9_./~-]+)\.git/?$",
    )
    .expect("git uri pattern is valid")
});

/// Vault does not allow dashes in names, so names start with a letter and
/// continue with letters, digits or underscores.
pub fn is_alpha_numeric_underscore(s: &str) -> bool {
    ALPHA_NUMERIC_UNDERSCORE.is_match(s)
}

/// Non-empty and ASCII letters or digits only
pub fn is_alpha_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `arn:partition:service:region:account-id:resource`
///
/// Region and account may be empty (IAM and S3 ARNs omit them). The
/// resource may itself contain `:` or `/`.
pub fn is_valid_arn(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("arn:") else {
        return false;
    };

    let sections: Vec<&str> = rest.splitn(5, ':').collect();
    match sections.as_slice() {
        [partition, service, _region, _account, resource] => {
            !partition.is_empty() && !service.is_empty() && !resource.is_empty()
        }
        _ => false,
    }
}

/// Returns true if the value is a valid container image uri
pub fn is_valid_image_uri(s: &str) -> bool {
    reference::is_image_reference(s)
}

pub fn is_valid_git_uri(s: &str) -> bool {
    GIT_URI.is_match(s)
}

pub fn is_valid_target_type(s: &str) -> bool {
    s == AWS_ACCOUNT_TARGET_TYPE
}

/// Presence guard: at least one known argument phase is present
pub fn has_required_argument_keys(arguments: &BTreeMap<String, Vec<String>>) -> bool {
    arguments
        .keys()
        .any(|key| ARGUMENT_KEYS.contains(&key.as_str()))
}

/// No arguments at all, or exactly the `execute` and `init` phases
pub fn is_valid_argument_map(arguments: &BTreeMap<String, Vec<String>>) -> bool {
    if arguments.is_empty() {
        return true;
    }
    has_required_argument_keys(arguments)
        && arguments.len() == ARGUMENT_KEYS.len()
        && arguments
            .keys()
            .all(|key| ARGUMENT_KEYS.contains(&key.as_str()))
}

/// A borrowed view of a request field, as seen by [`Rule::check`]
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Str(&'a str),
    StrList(&'a [String]),
    StrMap(&'a BTreeMap<String, String>),
    ListMap(&'a BTreeMap<String, Vec<String>>),
}

impl FieldValue<'_> {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::StrList(_) => "list",
            FieldValue::StrMap(_) => "string map",
            FieldValue::ListMap(_) => "list map",
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::StrList(items) => write!(f, "[{}]", items.join(" ")),
            FieldValue::StrMap(map) => {
                let entries: Vec<String> = map.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                write!(f, "map[{}]", entries.join(" "))
            }
            FieldValue::ListMap(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{k}:[{}]", v.join(" ")))
                    .collect();
                write!(f, "map[{}]", entries.join(" "))
            }
        }
    }
}

/// A field-level constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    AlphaNum,
    AlphaNumUnderscore,
    /// Inclusive bounds, counted in characters
    LengthRange {
        min: usize,
        max: usize,
    },
    IsArn,
    GitUri,
    ValidTargetType,
    ValidArgument,
    ValidExecuteContainerImage,
    ValidPreContainerImage,
}

impl Rule {
    pub fn code(&self) -> RuleCode {
        match self {
            Rule::Required => RuleCode::Required,
            Rule::AlphaNum => RuleCode::AlphaNum,
            Rule::AlphaNumUnderscore => RuleCode::AlphaNumUnderscore,
            Rule::LengthRange { .. } => RuleCode::LengthRange,
            Rule::IsArn => RuleCode::IsArn,
            Rule::GitUri => RuleCode::GitUri,
            Rule::ValidTargetType => RuleCode::ValidTargetType,
            Rule::ValidArgument => RuleCode::ValidArgument,
            Rule::ValidExecuteContainerImage => RuleCode::ValidExecuteContainerImage,
            Rule::ValidPreContainerImage => RuleCode::ValidPreContainerImage,
        }
    }

    /// Evaluate the rule against a field.
    ///
    /// # Panics
    ///
    /// Panics when the rule cannot inspect the field's kind, for example a
    /// container image rule declared on a plain string. That is a bug in the
    /// request model's declaration, not bad user input.
    pub fn check(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Str(s)) => !s.is_empty(),
            (Rule::Required, FieldValue::StrList(items)) => !items.is_empty(),
            (Rule::Required, FieldValue::StrMap(map)) => !map.is_empty(),
            (Rule::Required, FieldValue::ListMap(map)) => !map.is_empty(),
            (Rule::AlphaNum, FieldValue::Str(s)) => is_alpha_numeric(s),
            (Rule::AlphaNumUnderscore, FieldValue::Str(s)) => is_alpha_numeric_underscore(s),
            (Rule::LengthRange { min, max }, FieldValue::Str(s)) => {
                let len = s.chars().count();
                *min <= len && len <= *max
            }
            (Rule::IsArn, FieldValue::Str(s)) => is_valid_arn(s),
            (Rule::GitUri, FieldValue::Str(s)) => is_valid_git_uri(s),
            (Rule::ValidTargetType, FieldValue::Str(s)) => is_valid_target_type(s),
            (Rule::ValidArgument, FieldValue::ListMap(map)) => is_valid_argument_map(map),
            (Rule::ValidExecuteContainerImage, FieldValue::StrMap(map)) => map
                .get(EXECUTE_CONTAINER_IMAGE_URI)
                .is_some_and(|uri| is_valid_image_uri(uri)),
            (Rule::ValidPreContainerImage, FieldValue::StrMap(map)) => map
                .get(PRE_CONTAINER_IMAGE_URI)
                .map_or(true, |uri| is_valid_image_uri(uri)),
            (rule, value) => panic!(
                "rule `{}` cannot be applied to a {} field",
                rule.code(),
                value.kind()
            ),
        }
    }
}
