//! Request rules
//!
//! A rule describes the shape a request must have before it is handed to a
//! backend. Rule sets are plain data: the built-in one mirrors the datastore
//! contract, and callers can load their own from JSON.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use serde_json::Value;

use crate::core::errors::ValidationDetail;
use crate::core::operation::Operation;

/// Expected type of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kind {
    /// Anything, including null
    Any,
    /// Non-empty string
    String,
    Boolean,
    Number,
    /// Whole number, optionally bounded below
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
    },
    /// Nested object checked against its own rule
    Object { rule: Rule },
    /// Array whose items all match `items`
    Array {
        items: Box<Kind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_items: Option<usize>,
    },
    /// Matches if any of the listed kinds matches
    Alternatives { kinds: Vec<Kind> },
}

impl Kind {
    /// Nested object kind checked against `rule`
    pub fn object(rule: Rule) -> Self {
        Kind::Object { rule }
    }

    /// Array kind whose items match `items`
    pub fn array_of(items: Kind, min_items: Option<usize>) -> Self {
        Kind::Array { items: Box::new(items), min_items }
    }

    /// Short type name used in messages and listings
    pub fn label(&self) -> String {
        match self {
            Kind::Any => "any".to_string(),
            Kind::String => "string".to_string(),
            Kind::Boolean => "boolean".to_string(),
            Kind::Number => "number".to_string(),
            Kind::Integer { .. } => "integer".to_string(),
            Kind::Object { .. } => "object".to_string(),
            Kind::Array { items, .. } => format!("array<{}>", items.label()),
            Kind::Alternatives { kinds } => {
                let labels: Vec<String> = kinds.iter().map(Kind::label).collect();
                labels.join(" | ")
            }
        }
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<ValidationDetail>) {
        match self {
            Kind::Any => {}
            Kind::String => match value.as_str() {
                Some("") => out.push(violation(path, "is not allowed to be empty")),
                Some(_) => {}
                None => out.push(violation(path, "must be a string")),
            },
            Kind::Boolean => {
                if !value.is_boolean() {
                    out.push(violation(path, "must be a boolean"));
                }
            }
            Kind::Number => {
                if !value.is_number() {
                    out.push(violation(path, "must be a number"));
                }
            }
            Kind::Integer { min } => match whole_number(value) {
                Some(n) => {
                    if let Some(min) = min {
                        if n < *min as f64 {
                            out.push(violation(path, &format!("must be greater than or equal to {}", min)));
                        }
                    }
                }
                None => out.push(violation(path, "must be an integer")),
            },
            Kind::Object { rule } => rule.check_at(value, path, out),
            Kind::Array { items, min_items } => {
                let Some(array) = value.as_array() else {
                    out.push(violation(path, "must be an array"));
                    return;
                };
                if let Some(min) = min_items {
                    if array.len() < *min {
                        out.push(violation(path, &format!("must contain at least {} items", min)));
                    }
                }
                for (i, item) in array.iter().enumerate() {
                    items.check(item, &format!("{}[{}]", path, i), out);
                }
            }
            Kind::Alternatives { kinds } => {
                let matched = kinds.iter().any(|kind| {
                    let mut scratch = Vec::new();
                    kind.check(value, path, &mut scratch);
                    scratch.is_empty()
                });
                if !matched {
                    out.push(violation(path, &format!("must be one of {}", self.label())));
                }
            }
        }
    }
}

/// Numeric value of `value` if it has no fractional part (`3` and `3.0` alike)
fn whole_number(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_i64() {
        return Some(n as f64);
    }
    if let Some(n) = value.as_u64() {
        return Some(n as f64);
    }
    value.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)
}

/// A named field inside an object rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub name: String,
    pub kind: Kind,
    #[serde(default)]
    pub required: bool,
}

impl FieldRule {
    /// A field that must be present
    pub fn required<S: Into<String>>(name: S, kind: Kind) -> Self {
        FieldRule { name: name.into(), kind, required: true }
    }

    /// A field that may be absent
    pub fn optional<S: Into<String>>(name: S, kind: Kind) -> Self {
        FieldRule { name: name.into(), kind, required: false }
    }
}

/// Shape of an object: its known fields, and whether other keys are tolerated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub fields: Vec<FieldRule>,
    #[serde(default)]
    pub allow_unknown: bool,
}

impl Rule {
    /// Object rule that rejects keys not listed in `fields`
    pub fn strict(fields: Vec<FieldRule>) -> Self {
        Rule { fields, allow_unknown: false }
    }

    /// Object rule that accepts extra keys
    pub fn open(fields: Vec<FieldRule>) -> Self {
        Rule { fields, allow_unknown: true }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check `value` against this rule, collecting every violation
    pub fn check(&self, value: &Value) -> Vec<ValidationDetail> {
        let mut details = Vec::new();
        self.check_at(value, "", &mut details);
        details
    }

    fn check_at(&self, value: &Value, path: &str, out: &mut Vec<ValidationDetail>) {
        let Some(map) = value.as_object() else {
            out.push(violation(path, "must be an object"));
            return;
        };

        for field in &self.fields {
            let child = join(path, &field.name);
            match map.get(&field.name) {
                Some(v) => field.kind.check(v, &child, out),
                None if field.required => out.push(violation(&child, "is required")),
                None => {}
            }
        }

        if !self.allow_unknown {
            for key in map.keys() {
                if self.field(key).is_none() {
                    out.push(violation(&join(path, key), "is not allowed"));
                }
            }
        }
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn violation(path: &str, message: &str) -> ValidationDetail {
    let label = if path.is_empty() { "value" } else { path };
    ValidationDetail::new(label, format!("\"{}\" {}", label, message))
}

/// Rules keyed by operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<Operation, Rule>,
}

impl RuleSet {
    /// An empty rule set; every operation is rejected until a rule is added
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Parse a rule set from its JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Pretty-printed JSON form, readable by [`RuleSet::from_json`]
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Rule of `operation`, if one is registered
    pub fn get(&self, operation: Operation) -> Option<&Rule> {
        self.rules.get(&operation)
    }

    /// Register the rule of `operation`, returning the one it replaces
    pub fn insert(&mut self, operation: Operation, rule: Rule) -> Option<Rule> {
        self.rules.insert(operation, rule)
    }

    /// Builder form of [`RuleSet::insert`]
    pub fn with(mut self, operation: Operation, rule: Rule) -> Self {
        self.insert(operation, rule);
        self
    }

    /// Rules in operation order
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &Rule)> {
        self.rules.iter().map(|(op, rule)| (*op, rule))
    }

    /// Number of operations with a rule
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The standard datastore rules
    ///
    /// | Operation | Shape |
    /// |---|---|
    /// | get, remove | `table`, `params.id` |
    /// | save, update | `table`, `params.id`, `params.data` |
    /// | scan | `table`, `paginate.count`, `paginate.page`, optional `params` |
    /// | query | `queries[{dbType, query}]`, optional `table`, `replacements`, `rawResponse` |
    pub fn datastore() -> Self {
        let id = || Kind::Alternatives { kinds: vec![Kind::String, Kind::Number] };
        let table = || FieldRule::required("table", Kind::String);
        let lookup = || {
            Rule::strict(vec![
                table(),
                FieldRule::required("params", Kind::object(Rule::open(vec![
                    FieldRule::required("id", id()),
                ]))),
            ])
        };
        let write = || {
            Rule::strict(vec![
                table(),
                FieldRule::required("params", Kind::object(Rule::open(vec![
                    FieldRule::required("id", id()),
                    FieldRule::required("data", Kind::object(Rule::open(Vec::new()))),
                ]))),
            ])
        };
        let page = || Kind::Integer { min: Some(1) };

        RuleSet::new()
            .with(Operation::Get, lookup())
            .with(Operation::Save, write())
            .with(Operation::Update, write())
            .with(Operation::Scan, Rule::strict(vec![
                table(),
                FieldRule::required("paginate", Kind::object(Rule::strict(vec![
                    FieldRule::required("count", page()),
                    FieldRule::required("page", page()),
                ]))),
                FieldRule::optional("params", Kind::object(Rule::open(Vec::new()))),
            ]))
            .with(Operation::Query, Rule::strict(vec![
                FieldRule::required("queries", Kind::array_of(
                    Kind::object(Rule::strict(vec![
                        FieldRule::required("dbType", Kind::String),
                        FieldRule::required("query", Kind::String),
                    ])),
                    Some(1),
                )),
                FieldRule::optional("table", Kind::String),
                FieldRule::optional("replacements", Kind::object(Rule::open(Vec::new()))),
                FieldRule::optional("rawResponse", Kind::Boolean),
            ]))
            .with(Operation::Remove, lookup())
    }
}
