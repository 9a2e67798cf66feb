use anyhow::Result;
use datastore::{Operation, RuleSet};

use crate::context::Context;
use crate::utils::error::CliError;

/// Print the whole rule set, or only the rule of `operation`; returns false
/// when the loaded rule set has no rule for it
pub fn execute(context: &Context, operation: Option<&str>) -> Result<bool> {
    match render(context, operation) {
        Ok(output) => {
            println!("{}", output);
            Ok(true)
        }
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(CliError::NoRule(_)) => {
                eprintln!("{}", context.formatter().format_error(&err.to_string()));
                Ok(false)
            }
            _ => Err(err),
        },
    }
}

/// Format the rules to print; fails when `operation` has no rule
pub fn render(context: &Context, operation: Option<&str>) -> Result<String> {
    let rules = match operation {
        Some(name) => {
            let operation: Operation = name.parse().map_err(CliError::from)?;
            let rule = context
                .rules()
                .get(operation)
                .ok_or(CliError::NoRule(operation))?;
            RuleSet::new().with(operation, rule.clone())
        }
        None => context.rules().clone(),
    };

    context.formatter().format_rules(&rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::formatters::OutputFormat;

    #[test]
    fn test_single_operation() {
        let context = Context::new(OutputFormat::Json, None, false).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&render(&context, Some("scan")).unwrap()).unwrap();

        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["scan"]);
    }

    #[test]
    fn test_operation_without_rule_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"get": {{"fields": []}}}}"#).unwrap();

        let context = Context::new(OutputFormat::Text, Some(file.path()), false).unwrap();
        let err = render(&context, Some("scan")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NoRule(Operation::Scan))
        ));
        assert!(render(&context, Some("get")).is_ok());
    }
}
