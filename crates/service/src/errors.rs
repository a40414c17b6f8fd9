use std::collections::BTreeMap;
use std::fmt;

use models::errors::ModelError;
use serde::Serialize;
use thiserror::Error;

/// Key used for validation failures not attributable to a single field.
pub const NON_FIELD: &str = "non_field_errors";

/// Field-to-message report for validation failures. Callers get the whole
/// map at once; no partial mutation happens when this is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Empty report is Ok; anything else becomes a validation error.
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => {
                ServiceError::Validation(FieldErrors::single(NON_FIELD, msg))
            }
            ModelError::NotFound(msg) => ServiceError::NotFound(msg),
            ModelError::Configuration(msg) => ServiceError::Configuration(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_keep_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("phone", "bad format");
        errors.push("phone", "second message ignored");
        assert_eq!(errors.iter().count(), 1);
        assert!(errors.contains("phone"));
        assert_eq!(errors.to_string(), "phone: bad format");
    }

    #[test]
    fn empty_report_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("school", "missing").into_result().is_err());
    }

    #[test]
    fn model_configuration_error_stays_configuration() {
        let err: ServiceError = ModelError::Configuration("sentinel missing".into()).into();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }
}
