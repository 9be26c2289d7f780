//! Validation reports returned with `422 Unprocessable Entity`

use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use crate::patch::PatchError;

/// Key used for failures that do not belong to a single field
pub const BODY_KEY: &str = "$";

/// Field name to messages map, serialized as the `errors` member of a problem document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single message
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.add(field, message);
        report
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut report = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid ({})", field, error.code),
                };
                report.add(field.to_string(), message);
            }
        }
        report
    }
}

impl From<PatchError> for ValidationReport {
    fn from(error: PatchError) -> Self {
        let field = match error.path().trim_start_matches('/') {
            "" => BODY_KEY.to_string(),
            field => field.to_string(),
        };
        Self::single(field, error.to_string())
    }
}

/// Run the `validator` rules of `value`, converting failures into a report
pub fn validate<T: Validate>(value: &T) -> Result<(), ValidationReport> {
    value.validate().map_err(ValidationReport::from)
}
