use std::io::Read;
use std::path::Path;

use anyhow::Result;
use log::debug;
use serde_json::Value;
use datastore::{Operation, Validator};

use crate::context::Context;
use crate::utils::error::CliError;

/// Rendered result of checking one request
#[derive(Debug)]
pub struct Outcome {
    /// Whether the request passed its rule
    pub valid: bool,
    /// Formatted report
    pub output: String,
}

/// Validate one request, printing the outcome; returns whether it passed
pub fn execute(context: &Context, operation: &str, file: Option<&Path>) -> Result<bool> {
    let raw = read_input(file)?;
    let outcome = check(context, operation, &raw)?;
    println!("{}", outcome.output);
    Ok(outcome.valid)
}

/// Check the JSON request in `raw` against the rule of `operation`
pub fn check(context: &Context, operation: &str, raw: &str) -> Result<Outcome> {
    let operation: Operation = operation.parse().map_err(CliError::from)?;
    let request: Value = serde_json::from_str(raw).map_err(CliError::InvalidRequest)?;

    match context.validator().validate(request, operation) {
        Ok(validated) => Ok(Outcome {
            valid: true,
            output: context.formatter().format_valid(operation, &validated)?,
        }),
        Err(err) => {
            debug!("{}: {} violation(s)", operation, err.details.len());
            Ok(Outcome {
                valid: false,
                output: context.formatter().format_violations(&err)?,
            })
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::OutputFormat;

    fn json_context() -> Context {
        Context::new(OutputFormat::Json, None, false).unwrap()
    }

    #[test]
    fn test_valid_request_passes() {
        let outcome = check(
            &json_context(),
            "get",
            r#"{"table": "tableName", "params": {"id": "a5d3"}}"#,
        )
        .unwrap();

        assert!(outcome.valid);
        let doc: Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(doc["valid"], Value::Bool(true));
        assert_eq!(doc["operation"], "get");
        assert_eq!(doc["request"]["params"]["id"], "a5d3");
    }

    #[test]
    fn test_empty_request_fails() {
        let outcome = check(&json_context(), "get", "{}").unwrap();

        assert!(!outcome.valid);
        let doc: Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(doc["valid"], Value::Bool(false));
        let paths: Vec<&str> = doc["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["path"].as_str())
            .collect();
        assert_eq!(paths, vec!["table", "params"]);
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let err = check(&json_context(), "get", "{not json").unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::InvalidRequest(_))));

        let err = check(&json_context(), "truncate", "{}").unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Datastore(_))));
    }
}
