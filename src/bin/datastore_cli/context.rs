use std::path::Path;

use anyhow::Result;
use log::debug;
use datastore::{RuleSet, SchemaValidator};

use crate::formatters::{Formatter, OutputFormat};
use crate::formatters::json::JsonFormatter;
use crate::formatters::table::TableFormatter;
use crate::formatters::text::TextFormatter;
use crate::utils::error::CliError;

/// Execution context shared by the commands
pub struct Context {
    validator: SchemaValidator,
    formatter: Box<dyn Formatter>,
}

impl Context {
    /// Build a context from the output options and an optional rule file
    pub fn new(format: OutputFormat, rules_path: Option<&Path>, colored: bool) -> Result<Self> {
        let rules = match rules_path {
            Some(path) => load_rules(path)?,
            None => RuleSet::datastore(),
        };

        let formatter: Box<dyn Formatter> = match format {
            OutputFormat::Text if colored => Box::new(TextFormatter::new()),
            OutputFormat::Text => Box::new(TextFormatter::without_colors()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Table if colored => Box::new(TableFormatter::new()),
            OutputFormat::Table => Box::new(TableFormatter::without_colors()),
        };

        Ok(Context {
            validator: SchemaValidator::new(rules),
            formatter,
        })
    }

    /// Validator built from the active rule set
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// The active rule set
    pub fn rules(&self) -> &RuleSet {
        self.validator.rules()
    }

    /// Formatter for the selected output format
    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }
}

fn load_rules(path: &Path) -> Result<RuleSet, CliError> {
    debug!("Reading rule set from {}", path.display());
    let json = std::fs::read_to_string(path)?;
    RuleSet::from_json(&json).map_err(|source| CliError::InvalidRules {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use datastore::Operation;

    #[test]
    fn test_rule_file_replaces_builtin_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"remove": {{"fields": [{{"name": "table", "kind": {{"type": "string"}}, "required": true}}]}}}}"#).unwrap();

        let context = match Context::new(OutputFormat::Text, Some(file.path()), false) {
            Ok(context) => context,
            Err(err) => panic!("rule file should load: {}", err),
        };
        assert_eq!(context.rules().len(), 1);
        assert!(context.rules().get(Operation::Remove).is_some());
    }

    #[test]
    fn test_malformed_rule_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"get": {{"fields": "table"}}}}"#).unwrap();

        let err = match Context::new(OutputFormat::Text, Some(file.path()), false) {
            Ok(_) => panic!("malformed rule file was accepted"),
            Err(err) => err,
        };
        match err.downcast_ref::<CliError>() {
            Some(CliError::InvalidRules { path, .. }) => {
                assert_eq!(path, &file.path().display().to_string());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rules.json");

        let err = match Context::new(OutputFormat::Json, Some(&missing), false) {
            Ok(_) => panic!("missing rule file was accepted"),
            Err(err) => err,
        };
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Io(_))));
    }
}
