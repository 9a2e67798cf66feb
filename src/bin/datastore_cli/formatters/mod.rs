pub mod formatter;
pub mod text;
pub mod json;
pub mod table;

pub use formatter::Formatter;
use clap::ValueEnum;
use datastore::{Kind, Rule};

/// Available output formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

/// One line of a flattened rule listing
pub struct FieldRow {
    pub path: String,
    pub kind: String,
    pub required: bool,
}

/// Flatten a rule into dotted field paths, descending into nested objects
pub fn field_rows(rule: &Rule) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    collect(rule, "", &mut rows);
    rows
}

fn collect(rule: &Rule, prefix: &str, rows: &mut Vec<FieldRow>) {
    for field in &rule.fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        rows.push(FieldRow {
            path: path.clone(),
            kind: field.kind.label(),
            required: field.required,
        });
        match &field.kind {
            Kind::Object { rule } => collect(rule, &path, rows),
            Kind::Array { items, .. } => {
                if let Kind::Object { rule } = items.as_ref() {
                    collect(rule, &format!("{}[]", path), rows);
                }
            }
            _ => {}
        }
    }
}
