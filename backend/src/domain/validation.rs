//! Field-level validation shared by cities and points of interest.
//!
//! Validators collect every violation rather than stopping at the first one
//! so clients can fix a payload in a single round trip.

use std::fmt;

use serde_json::{Value, json};

use crate::domain::Error;

/// Maximum length, in characters, of a city or point of interest name.
pub const NAME_MAX: usize = 50;
/// Maximum length, in characters, of a description.
pub const DESCRIPTION_MAX: usize = 200;

/// A single rule broken by a candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldViolation {
    /// `name` was absent.
    NameMissing,
    /// `name` was present but empty once trimmed.
    NameBlank,
    /// `name` exceeded [`NAME_MAX`] characters.
    NameTooLong { max: usize },
    /// `description` exceeded [`DESCRIPTION_MAX`] characters.
    DescriptionTooLong { max: usize },
}

impl FieldViolation {
    /// JSON field the violation applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameMissing | Self::NameBlank | Self::NameTooLong { .. } => "name",
            Self::DescriptionTooLong { .. } => "description",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameMissing => "missing_field",
            Self::NameBlank => "blank_field",
            Self::NameTooLong { .. } | Self::DescriptionTooLong { .. } => "too_long",
        }
    }

    fn to_json(self) -> Value {
        json!({
            "field": self.field(),
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMissing => write!(f, "name is required"),
            Self::NameBlank => write!(f, "name must not be blank"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

/// Non-empty set of violations for one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// Violations in the order they were detected.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Whether a violation for `field` is present.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|violation| violation.field() == field)
    }

    pub(crate) fn violations_json(&self) -> Value {
        Value::Array(self.0.iter().map(|v| v.to_json()).collect())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::invalid_request(format!("validation failed: {value}")).with_details(json!({
            "code": "validation_failed",
            "violations": value.violations_json(),
        }))
    }
}

/// Accumulates violations while checking a candidate.
#[derive(Debug, Default)]
pub(crate) struct Validator(Vec<FieldViolation>);

impl Validator {
    pub(crate) fn name(&mut self, name: Option<&str>) -> &mut Self {
        match name {
            None => self.0.push(FieldViolation::NameMissing),
            Some(value) if value.trim().is_empty() => self.0.push(FieldViolation::NameBlank),
            Some(value) if value.chars().count() > NAME_MAX => {
                self.0.push(FieldViolation::NameTooLong { max: NAME_MAX });
            }
            Some(_) => {}
        }
        self
    }

    pub(crate) fn description(&mut self, description: Option<&str>) -> &mut Self {
        if description.is_some_and(|value| value.chars().count() > DESCRIPTION_MAX) {
            self.0.push(FieldViolation::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.0)))
        }
    }
}
