pub mod errors;
pub mod operation;
pub mod request;
pub mod schema;
pub mod validator;
pub mod datastore;


pub use errors::{DatastoreError, Result, ValidationDetail, ValidationError};
pub use operation::Operation;
pub use request::{Paginate, QueryResponse, RawQuery, Record, ValidRequest};
pub use schema::{FieldRule, Kind, Rule, RuleSet};
pub use validator::{SchemaValidator, Validator};
pub use datastore::{Backend, Datastore, Unimplemented};
