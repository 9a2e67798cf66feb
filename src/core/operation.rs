//! The six operations every datastore exposes

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::errors::DatastoreError;

/// A datastore operation, also the key of its validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Fetch a single record by id
    Get,
    /// Create a record
    Save,
    /// Update an existing record
    Update,
    /// Fetch a page of records
    Scan,
    /// Run raw queries
    Query,
    /// Delete a single record by id
    Remove,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Get,
        Operation::Save,
        Operation::Update,
        Operation::Scan,
        Operation::Query,
        Operation::Remove,
    ];

    /// Rule key of this operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Save => "save",
            Operation::Update => "update",
            Operation::Scan => "scan",
            Operation::Query => "query",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DatastoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DatastoreError::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Operation::from_str("get").unwrap(), Operation::Get);
        assert_eq!(Operation::from_str(" SCAN ").unwrap(), Operation::Scan);
        assert!(matches!(
            Operation::from_str("truncate"),
            Err(DatastoreError::UnknownOperation(name)) if name == "truncate"
        ));
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_serde_uses_rule_keys() {
        assert_eq!(serde_json::to_string(&Operation::Remove).unwrap(), "\"remove\"");
        let op: Operation = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(op, Operation::Update);
    }
}
