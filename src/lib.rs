//! Datastore: a validating contract for pluggable storage backends
//!
//! A [`Datastore`] checks each request against the rule of its operation
//! (get, save, update, scan, query, remove) and forwards the validated
//! request to a [`Backend`]. Backends implement only the hooks they
//! support; the others fail with [`DatastoreError::NotImplemented`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use datastore::{async_trait, Backend, Datastore, Record, Result, ValidRequest};
//! use serde_json::{json, Value};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Backend for Echo {
//!     type Config = Value;
//!
//!     async fn get(&self, _config: Arc<Value>, request: ValidRequest) -> Result<Record> {
//!         Ok(json!({ "id": request.id() }))
//!     }
//! }
//!
//! # async fn run() -> Result<()> {
//! let store = Datastore::new(Echo, json!({}));
//! let record = store.get(json!({"table": "builds", "params": {"id": 7}})).await?;
//! assert_eq!(record, json!({"id": 7}));
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use async_trait::async_trait;

pub use crate::core::datastore::{Backend, Datastore, Unimplemented};
pub use crate::core::errors::{DatastoreError, Result, ValidationDetail, ValidationError};
pub use crate::core::operation::Operation;
pub use crate::core::request::{Paginate, QueryResponse, RawQuery, Record, ValidRequest};
pub use crate::core::schema::{FieldRule, Kind, Rule, RuleSet};
pub use crate::core::validator::{SchemaValidator, Validator};
