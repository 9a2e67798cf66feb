use thiserror::Error;
use datastore::{DatastoreError, Operation};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request is not valid JSON: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Rule set {path} could not be parsed: {source}")]
    InvalidRules {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No rule for operation {0}")]
    NoRule(Operation),
}
