//! Request payloads
//!
//! Each request owns its validation composition. Field constraints, map
//! fields included, are declared through [`Constrained`]; nested and
//! collection checks are chained in `validate`. Every field is optional on
//! the wire so a missing value surfaces as a validation error rather than a
//! decode failure.

use cloudops_validation::{
    is_valid_arn, validate, validate_struct, Constrained, Field, FieldValue, Pipeline, Rule,
    RuleCode, ValidationError, ValidationResult,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names shared by projects and targets
const NAME_LENGTH: Rule = Rule::LengthRange { min: 4, max: 32 };

/// Only credential type supported for targets
pub const VAULT_CREDENTIAL_TYPE: &str = "vault";

/// Maximum number of policy ARNs attached to a target
pub const MAX_POLICY_ARNS: usize = 5;

pub const DIFF: &str = "diff";
pub const SYNC: &str = "sync";

/// Decode a request from a YAML manifest
pub fn from_yaml<T: DeserializeOwned>(manifest: &str) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_str(manifest)
}

/// Create workflow request. Also the body of an execute workflow call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkflow {
    #[serde(default)]
    pub arguments: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub target_name: String,
    #[serde(rename = "type", default)]
    pub workflow_type: String,
    #[serde(default)]
    pub workflow_template_name: String,
}

/// Body of `POST /workflows`
pub type ExecuteWorkflow = CreateWorkflow;

impl Constrained for CreateWorkflow {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::string("project_name", &self.project_name, &[Rule::AlphaNum, NAME_LENGTH]),
            Field::string(
                "target_name",
                &self.target_name,
                &[Rule::AlphaNumUnderscore, NAME_LENGTH],
            ),
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

impl CreateWorkflow {
    pub fn validate(&self) -> ValidationResult {
        self.validate_with(&[])
    }

    /// Validate, then run caller-supplied checks such as
    /// [`CreateWorkflow::validate_type`]
    pub fn validate_with(&self, optional: &[&dyn Fn() -> ValidationResult]) -> ValidationResult {
        Pipeline::new()
            .check(|| validate_struct(self))
            .extend(optional)
            .run()
    }

    /// Optional check: the workflow type must be one of `types`
    pub fn validate_type<'a>(
        &'a self,
        types: &'a [&'a str],
    ) -> impl Fn() -> ValidationResult + 'a {
        move || {
            if types.contains(&self.workflow_type.as_str()) {
                return Ok(());
            }
            Err(ValidationError::new(
                RuleCode::OneOf,
                format!("type must be one of '{}'", types.join(" ")),
            )
            .with_field("type")
            .with_value(self.workflow_type.clone()))
        }
    }
}

/// Create workflow from a git manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGitWorkflow {
    #[serde(rename = "sha", default)]
    pub commit_hash: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub workflow_type: String,
}

impl Constrained for CreateGitWorkflow {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::string("sha", &self.commit_hash, &[Rule::Required, Rule::AlphaNum]),
            Field::string("path", &self.path, &[Rule::Required]),
            Field::string("type", &self.workflow_type, &[Rule::Required]),
        ]
    }
}

impl CreateGitWorkflow {
    pub fn validate(&self) -> ValidationResult {
        validate_struct(self)
    }
}

/// Target properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProperties {
    #[serde(default)]
    pub credential_type: String,
    #[serde(default)]
    pub policy_arns: Vec<String>,
    #[serde(default)]
    pub policy_document: String,
    #[serde(default)]
    pub role_arn: String,
}

impl TargetProperties {
    pub fn validate(&self) -> ValidationResult {
        if self.credential_type != VAULT_CREDENTIAL_TYPE {
            return Err(ValidationError::new(
                RuleCode::ValidCredentialType,
                format!("credential_type must be one of '{VAULT_CREDENTIAL_TYPE}'"),
            )
            .with_field("credential_type")
            .with_value(self.credential_type.clone()));
        }

        if !is_valid_arn(&self.role_arn) {
            return Err(ValidationError::new(RuleCode::IsArn, "role_arn must be a valid arn")
                .with_field("role_arn")
                .with_value(self.role_arn.clone()));
        }

        if self.policy_arns.len() > MAX_POLICY_ARNS {
            return Err(ValidationError::new(
                RuleCode::MaxItems,
                format!("policy_arns cannot be more than {MAX_POLICY_ARNS}"),
            )
            .with_field("policy_arns")
            .with_param(MAX_POLICY_ARNS.to_string()));
        }

        if let Some(arn) = self.policy_arns.iter().find(|arn| !is_valid_arn(arn)) {
            return Err(
                ValidationError::new(RuleCode::IsArn, "policy_arns contains an invalid arn")
                    .with_field("policy_arns")
                    .with_value(arn.clone()),
            );
        }

        Ok(())
    }
}

/// Create target request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTarget {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: TargetProperties,
    #[serde(rename = "type", default)]
    pub target_type: String,
}

impl Constrained for CreateTarget {
    /// The target type is checked before anything else
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::string("type", &self.target_type, &[Rule::ValidTargetType]),
            Field::string(
                "name",
                &self.name,
                &[Rule::Required, Rule::AlphaNumUnderscore, NAME_LENGTH],
            ),
        ]
    }
}

impl CreateTarget {
    pub fn validate(&self) -> ValidationResult {
        validate(&[&|| validate_struct(self), &|| self.properties.validate()])
    }
}

/// Create project request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repository: String,
}

impl Constrained for CreateProject {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::string("name", &self.name, &[Rule::AlphaNum, NAME_LENGTH]),
            Field::string("repository", &self.repository, &[Rule::Required, Rule::GitUri]),
        ]
    }
}

impl CreateProject {
    pub fn validate(&self) -> ValidationResult {
        validate_struct(self)
    }
}

/// Target operation (diff or sync) request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOperation {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sha: String,
    #[serde(rename = "type", default)]
    pub operation_type: String,
}

impl Constrained for TargetOperation {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::string("path", &self.path, &[Rule::Required]),
            Field::string("sha", &self.sha, &[Rule::Required, Rule::AlphaNum]),
            Field::string("type", &self.operation_type, &[Rule::Required]),
        ]
    }
}

impl TargetOperation {
    pub fn new(
        path: impl Into<String>,
        sha: impl Into<String>,
        operation_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            sha: sha.into(),
            operation_type: operation_type.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validate_struct(self)
    }
}
