//! JSON Schema validation for configuration files

use crate::error::{AnswersError, Result};
use jsonschema::Validator;
use serde_json::Value;

/// Compile the embedded JSON schema for configuration files
///
/// # Errors
///
/// Returns an error if the embedded schema is not valid JSON or not a valid Draft 7 schema
#[inline]
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/schema.json");
    let schema: Value = serde_json::from_str(schema_str).map_err(|e| {
        AnswersError::configuration(format!("Failed to parse embedded JSON schema: {e}"))
    })?;

    jsonschema::draft7::new(&schema).map_err(|e| {
        AnswersError::configuration(format!("Failed to compile JSON schema: {e}"))
    })
}

/// Validate a configuration value against the schema
///
/// All violations are collected into a single error.
///
/// # Errors
///
/// Returns an error if the value does not conform to the schema
#[inline]
pub fn validate_against_schema(config: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(config)
        .map(|e| format!("  - {e}"))
        .collect();

    if error_messages.is_empty() {
        return Ok(());
    }

    Err(AnswersError::configuration(format!(
        "Configuration does not match schema:\n{}",
        error_messages.join("\n")
    )))
}
