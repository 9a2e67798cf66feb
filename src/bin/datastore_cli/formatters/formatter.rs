use anyhow::Result;
use serde_json::Value;
use datastore::{Operation, RuleSet, ValidationError};

/// Renders command output
pub trait Formatter {
    /// A request that passed its rule
    fn format_valid(&self, operation: Operation, request: &Value) -> Result<String>;

    /// Every violation of a rejected request
    fn format_violations(&self, error: &ValidationError) -> Result<String>;

    fn format_rules(&self, rules: &RuleSet) -> Result<String>;

    fn format_error(&self, error: &str) -> String;
}
