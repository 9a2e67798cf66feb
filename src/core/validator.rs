//! Request validation
//!
//! The dispatcher only knows the [`Validator`] trait; [`SchemaValidator`] is
//! the stock implementation backed by a [`RuleSet`].

use serde_json::Value;

use crate::core::errors::ValidationError;
use crate::core::operation::Operation;
use crate::core::schema::RuleSet;

/// Checks a request against the rule of an operation
pub trait Validator: Send + Sync {
    /// Return the validated request, or every violation found
    fn validate(&self, value: Value, operation: Operation) -> Result<Value, ValidationError>;
}

/// Validator driven by a [`RuleSet`]
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    rules: RuleSet,
}

impl SchemaValidator {
    /// Validator checking requests against `rules`
    pub fn new(rules: RuleSet) -> Self {
        SchemaValidator { rules }
    }

    /// Rules this validator applies
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        SchemaValidator::new(RuleSet::datastore())
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, value: Value, operation: Operation) -> Result<Value, ValidationError> {
        let Some(rule) = self.rules.get(operation) else {
            return Err(ValidationError::single(
                Some(operation),
                "value",
                format!("no rule registered for operation \"{}\"", operation),
            ));
        };

        let details = rule.check(&value);
        if details.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::new(Some(operation), details))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_request_is_returned_unchanged() {
        let validator = SchemaValidator::default();
        let request = json!({"table": "tableName", "params": {"id": "a5d3"}});

        let validated = validator.validate(request.clone(), Operation::Get).unwrap();
        assert_eq!(validated, request);
    }

    #[test]
    fn test_error_carries_operation() {
        let validator = SchemaValidator::default();
        let err = validator.validate(json!({}), Operation::Scan).unwrap_err();

        assert_eq!(err.operation, Some(Operation::Scan));
        assert!(err.mentions("table"));
        assert!(err.mentions("paginate"));
    }

    #[test]
    fn test_missing_rule_rejects() {
        let validator = SchemaValidator::new(RuleSet::new());
        let err = validator.validate(json!({"table": "t"}), Operation::Query).unwrap_err();

        assert_eq!(err.to_string(), "no rule registered for operation \"query\"");
    }
}
