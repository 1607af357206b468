//! CloudOps validation engine
//!
//! Requests bound for the control plane are checked here before they
//! touch the network.
//!
//! - [`rules`]: the closed registry of field predicates (ARN syntax,
//!   container image references, git URIs, name formats)
//! - [`constraint`]: binds rules to declared request fields and reports
//!   the first violation
//! - [`pipeline`]: ordered, short-circuiting composition of checks
//!
//! Every failure is a [`ValidationError`] tagged with a stable
//! [`RuleCode`].
//!
//! ```rust
//! use cloudops_validation::{validate_struct, Constrained, Field, Rule};
//!
//! struct Project {
//!     name: String,
//! }
//!
//! impl Constrained for Project {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::string(
//!             "name",
//!             &self.name,
//!             &[Rule::AlphaNum, Rule::LengthRange { min: 4, max: 32 }],
//!         )]
//!     }
//! }
//!
//! assert!(validate_struct(&Project { name: "demo".into() }).is_ok());
//! let err = validate_struct(&Project { name: "ab".into() }).unwrap_err();
//! assert_eq!(err.rule().as_str(), "length_range");
//! ```

#![deny(unsafe_code)]

pub mod constraint;
pub mod error;
pub mod pipeline;
mod reference;
pub mod rules;

pub use constraint::{validate_struct, Constrained, Field};
pub use error::{RuleCode, ValidationError, ValidationResult};
pub use pipeline::{validate, Pipeline};
pub use rules::{
    has_required_argument_keys, is_alpha_numeric, is_alpha_numeric_underscore,
    is_valid_argument_map, is_valid_arn, is_valid_git_uri, is_valid_image_uri, is_valid_target_type,
    FieldValue, Rule,
};
