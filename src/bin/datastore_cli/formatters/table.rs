use anyhow::Result;
use colored::*;
use prettytable::{Cell, Row, Table};
use serde_json::Value;
use datastore::{Operation, RuleSet, ValidationError};

use crate::formatters::{field_rows, Formatter};

/// Tabular output
pub struct TableFormatter {
    colored: bool,
}

impl TableFormatter {
    /// Table output with colored headings and violations
    pub fn new() -> Self {
        TableFormatter {
            colored: true,
        }
    }

    /// Table output without ANSI colors
    pub fn without_colors() -> Self {
        TableFormatter {
            colored: false,
        }
    }
}

fn header(titles: &[&str]) -> Row {
    Row::new(titles.iter().map(|t| Cell::new(t).style_spec("b")).collect())
}

impl Formatter for TableFormatter {
    fn format_valid(&self, operation: Operation, request: &Value) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["Field", "Value"]));

        match request.as_object() {
            Some(map) => {
                for (key, value) in map {
                    table.add_row(Row::new(vec![
                        Cell::new(key),
                        Cell::new(&serde_json::to_string_pretty(value)?),
                    ]));
                }
            }
            None => {
                table.add_row(Row::new(vec![
                    Cell::new("value"),
                    Cell::new(&request.to_string()),
                ]));
            }
        }

        let heading = format!("{} request is valid", operation);
        if self.colored {
            Ok(format!("{}\n{}", heading.as_str().green().bold(), table))
        } else {
            Ok(format!("{}\n{}", heading, table))
        }
    }

    fn format_violations(&self, error: &ValidationError) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["Path", "Violation"]));
        for detail in &error.details {
            table.add_row(Row::new(vec![
                Cell::new(&detail.path),
                if self.colored {
                    Cell::new(&detail.message).style_spec("Fr")
                } else {
                    Cell::new(&detail.message)
                },
            ]));
        }
        Ok(table.to_string())
    }

    fn format_rules(&self, rules: &RuleSet) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["Operation", "Field", "Type", "Required"]));
        for (operation, rule) in rules.iter() {
            for row in field_rows(rule) {
                table.add_row(Row::new(vec![
                    Cell::new(operation.name()),
                    Cell::new(&row.path),
                    Cell::new(&row.kind),
                    Cell::new(if row.required { "yes" } else { "no" }),
                ]));
            }
        }
        Ok(table.to_string())
    }

    fn format_error(&self, error: &str) -> String {
        if self.colored {
            format!("{}", error.red().bold())
        } else {
            format!("Error: {}", error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::ValidationDetail;
    use serde_json::json;

    #[test]
    fn test_rule_rows() {
        let output = TableFormatter::without_colors()
            .format_rules(&RuleSet::datastore())
            .unwrap();

        assert!(output.contains("paginate.count"));
        assert!(output.contains("queries[].dbType"));
        assert!(output.contains("Required"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let formatter = TableFormatter::without_colors();

        let valid = formatter
            .format_valid(Operation::Get, &json!({"table": "builds", "params": {"id": 3}}))
            .unwrap();
        assert!(valid.starts_with("get request is valid\n"));
        assert!(valid.contains("builds"));

        let error = ValidationError::new(
            Some(Operation::Scan),
            vec![ValidationDetail::new("paginate", "\"paginate\" is required")],
        );
        let violations = formatter.format_violations(&error).unwrap();
        assert!(violations.contains("\"paginate\" is required"));
        assert!(!violations.contains('\u{1b}'));

        assert_eq!(formatter.format_error("boom"), "Error: boom");
    }
}
