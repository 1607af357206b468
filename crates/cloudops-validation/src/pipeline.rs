//! Validation pipeline: ordered, short-circuiting checks
//!
//! Each request model composes its own pipeline out of independent checks,
//! usually struct constraints first and cross-field rules after.

use crate::error::ValidationResult;

/// Run checks in order and return the first error
pub fn validate(checks: &[&dyn Fn() -> ValidationResult]) -> ValidationResult {
    for check in checks {
        check()?;
    }
    Ok(())
}

/// An owned, growable list of checks
#[derive(Default)]
pub struct Pipeline<'a> {
    checks: Vec<Box<dyn Fn() -> ValidationResult + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check
    pub fn check(mut self, check: impl Fn() -> ValidationResult + 'a) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Append caller-supplied checks after the built-in ones
    pub fn extend(mut self, checks: &'a [&'a dyn Fn() -> ValidationResult]) -> Self {
        for check in checks {
            self.checks.push(Box::new(move || check()));
        }
        self
    }

    pub fn run(&self) -> ValidationResult {
        for check in &self.checks {
            check()?;
        }
        Ok(())
    }
}
