//! Requests as seen by backends

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::operation::Operation;

/// A stored record
pub type Record = Value;

/// Pagination bounds of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginate {
    /// Items per page
    #[serde(deserialize_with = "whole_number")]
    pub count: u64,
    /// 1-based page number
    #[serde(deserialize_with = "whole_number")]
    pub page: u64,
}

/// Accept `3` as well as `3.0`, as JSON producers often send either
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    n.as_u64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .ok_or_else(|| D::Error::custom(format!("expected a non-negative whole number, got {}", n)))
}

impl Paginate {
    /// Number of items to skip before this page starts
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.count)
    }
}

/// A raw query written for one database dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuery {
    #[serde(rename = "dbType")]
    pub db_type: String,
    pub query: String,
}

/// Result of a query: decoded rows, or whatever the backend returned verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Rows(Vec<Record>),
    Raw(Value),
}

/// A request that passed validation for its operation
///
/// Only the dispatcher can build one, so a backend hook never sees a request
/// that skipped its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    operation: Operation,
    value: Value,
}

impl ValidRequest {
    pub(crate) fn new(operation: Operation, value: Value) -> Self {
        ValidRequest { operation, value }
    }

    /// Operation whose rule this request passed
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The request as validated
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Take the underlying JSON value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Target table
    pub fn table(&self) -> Option<&str> {
        self.value.get("table").and_then(Value::as_str)
    }

    /// Query parameters or record fields
    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.value.get("params").and_then(Value::as_object)
    }

    /// `params.id`
    pub fn id(&self) -> Option<&Value> {
        self.params().and_then(|p| p.get("id"))
    }

    /// `params.data`, the record payload of a save or update
    pub fn data(&self) -> Option<&Value> {
        self.params().and_then(|p| p.get("data"))
    }

    /// Pagination bounds of a scan
    pub fn paginate(&self) -> Option<Paginate> {
        self.value
            .get("paginate")
            .and_then(|v| Paginate::deserialize(v).ok())
    }

    /// Raw queries, one per database dialect; empty when absent
    pub fn queries(&self) -> Vec<RawQuery> {
        self.value
            .get("queries")
            .and_then(|v| Vec::<RawQuery>::deserialize(v).ok())
            .unwrap_or_default()
    }

    /// The query text written for `db_type`, if the request carries one
    pub fn query_for(&self, db_type: &str) -> Option<String> {
        self.queries()
            .into_iter()
            .find(|q| q.db_type.eq_ignore_ascii_case(db_type))
            .map(|q| q.query)
    }

    /// Values to substitute into the raw query
    pub fn replacements(&self) -> Option<&Map<String, Value>> {
        self.value.get("replacements").and_then(Value::as_object)
    }

    /// Whether the caller wants the backend's raw query response
    pub fn raw_response(&self) -> bool {
        self.value
            .get("rawResponse")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_accessors() {
        let request = ValidRequest::new(
            Operation::Update,
            json!({"table": "builds", "params": {"id": "a5d3", "data": {"status": "SUCCESS"}}}),
        );

        assert_eq!(request.operation(), Operation::Update);
        assert_eq!(request.table(), Some("builds"));
        assert_eq!(request.id(), Some(&json!("a5d3")));
        assert_eq!(request.data(), Some(&json!({"status": "SUCCESS"})));
        assert!(request.paginate().is_none());
        assert!(request.queries().is_empty());
        assert!(!request.raw_response());
    }

    #[test]
    fn test_paginate() {
        let request = ValidRequest::new(
            Operation::Scan,
            json!({"table": "builds", "paginate": {"count": 10, "page": 3}}),
        );

        let paginate = request.paginate().unwrap();
        assert_eq!(paginate, Paginate { count: 10, page: 3 });
        assert_eq!(paginate.offset(), 20);
    }

    #[test]
    fn test_paginate_accepts_whole_floats() {
        let request = ValidRequest::new(
            Operation::Scan,
            json!({"table": "builds", "paginate": {"count": 10.0, "page": 2}}),
        );
        assert_eq!(request.paginate(), Some(Paginate { count: 10, page: 2 }));

        let request = ValidRequest::new(
            Operation::Scan,
            json!({"table": "builds", "paginate": {"count": 2.5, "page": 2}}),
        );
        assert_eq!(request.paginate(), None);
    }

    #[test]
    fn test_query_selection() {
        let request = ValidRequest::new(
            Operation::Query,
            json!({
                "queries": [
                    {"dbType": "postgres", "query": "SELECT 1"},
                    {"dbType": "mysql", "query": "SELECT 2"}
                ],
                "replacements": {"id": 4},
                "rawResponse": true
            }),
        );

        assert_eq!(request.queries().len(), 2);
        assert_eq!(request.query_for("MySQL").as_deref(), Some("SELECT 2"));
        assert_eq!(request.query_for("sqlite"), None);
        assert_eq!(request.replacements().and_then(|r| r.get("id")), Some(&json!(4)));
        assert!(request.raw_response());
    }

    #[test]
    fn test_query_response_is_untagged() {
        let rows = QueryResponse::Rows(vec![json!({"id": 1})]);
        assert_eq!(serde_json::to_value(&rows).unwrap(), json!([{"id": 1}]));

        let raw = QueryResponse::Raw(json!({"rowCount": 0}));
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!({"rowCount": 0}));
    }
}
