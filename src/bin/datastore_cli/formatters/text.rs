use anyhow::Result;
use colored::*;
use serde_json::Value;
use datastore::{Operation, RuleSet, ValidationError};

use crate::formatters::{field_rows, Formatter};

/// Plain text output
pub struct TextFormatter {
    colored: bool,
}

impl TextFormatter {
    /// Text output with colors
    pub fn new() -> Self {
        TextFormatter {
            colored: true,
        }
    }

    /// Text output without ANSI colors, with `OK:`/`Error:` prefixes
    pub fn without_colors() -> Self {
        TextFormatter {
            colored: false,
        }
    }

    fn success(&self, message: &str) -> String {
        if self.colored {
            format!("{}", message.green().bold())
        } else {
            format!("OK: {}", message)
        }
    }

    fn heading(&self, heading: &str) -> String {
        if self.colored {
            format!("{}", heading.blue().bold())
        } else {
            heading.to_string()
        }
    }
}

impl Formatter for TextFormatter {
    fn format_valid(&self, operation: Operation, request: &Value) -> Result<String> {
        Ok(format!(
            "{}\n{}",
            self.success(&format!("{} request is valid", operation)),
            serde_json::to_string_pretty(request)?
        ))
    }

    fn format_violations(&self, error: &ValidationError) -> Result<String> {
        let operation = error
            .operation
            .map(|op| op.to_string())
            .unwrap_or_else(|| "request".to_string());
        let mut lines = vec![self.format_error(&format!("{} request is invalid", operation))];
        for detail in &error.details {
            lines.push(format!("  - {}", detail.message));
        }
        Ok(lines.join("\n"))
    }

    fn format_rules(&self, rules: &RuleSet) -> Result<String> {
        let mut out = Vec::new();
        for (operation, rule) in rules.iter() {
            out.push(self.heading(&format!("{}:", operation)));
            for row in field_rows(rule) {
                let presence = if row.required { "required" } else { "optional" };
                out.push(format!("  {:<24} {:<28} {}", row.path, row.kind, presence));
            }
            if rule.allow_unknown {
                out.push("  (other keys allowed)".to_string());
            }
        }
        Ok(out.join("\n"))
    }

    fn format_error(&self, error: &str) -> String {
        if self.colored {
            format!("{}", error.red().bold())
        } else {
            format!("Error: {}", error)
        }
    }
}
