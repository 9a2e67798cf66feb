use anyhow::Result;
use serde_json::{json, Value};
use datastore::{Operation, RuleSet, ValidationError};

use crate::formatters::Formatter;

/// JSON output, one document per command
pub struct JsonFormatter;

impl JsonFormatter {
    /// Pretty-printed JSON output
    pub fn new() -> Self {
        JsonFormatter
    }

    fn render(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

impl Formatter for JsonFormatter {
    fn format_valid(&self, operation: Operation, request: &Value) -> Result<String> {
        self.render(&json!({
            "operation": operation,
            "valid": true,
            "request": request,
        }))
    }

    fn format_violations(&self, error: &ValidationError) -> Result<String> {
        self.render(&json!({
            "operation": error.operation,
            "valid": false,
            "message": error.to_string(),
            "details": error.details,
        }))
    }

    fn format_rules(&self, rules: &RuleSet) -> Result<String> {
        self.render(&serde_json::to_value(rules)?)
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::ValidationDetail;

    #[test]
    fn test_violation_document() {
        let error = ValidationError::new(
            Some(Operation::Get),
            vec![
                ValidationDetail::new("table", "\"table\" is required"),
                ValidationDetail::new("params", "\"params\" is required"),
            ],
        );
        let doc: Value = serde_json::from_str(&JsonFormatter::new().format_violations(&error).unwrap()).unwrap();

        assert_eq!(doc, json!({
            "operation": "get",
            "valid": false,
            "message": "\"table\" is required. \"params\" is required",
            "details": [
                {"path": "table", "message": "\"table\" is required"},
                {"path": "params", "message": "\"params\" is required"}
            ]
        }));
    }

    #[test]
    fn test_rules_document_is_the_rule_set() {
        let rules = RuleSet::datastore();
        let output = JsonFormatter::new().format_rules(&rules).unwrap();
        assert_eq!(RuleSet::from_json(&output).unwrap(), rules);
    }

    #[test]
    fn test_error_document() {
        let doc: Value = serde_json::from_str(&JsonFormatter::new().format_error("no rule for scan")).unwrap();
        assert_eq!(doc, json!({"error": "no rule for scan"}));
    }
}
