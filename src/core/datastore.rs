//! The datastore contract
//!
//! [`Datastore`] validates every request against the rule of its operation
//! and only then hands it to the [`Backend`]. Backends override the hooks
//! they support; the rest keep failing with `NotImplemented`.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use crate::core::errors::{DatastoreError, Result};
use crate::core::operation::Operation;
use crate::core::request::{QueryResponse, Record, ValidRequest};
use crate::core::validator::{SchemaValidator, Validator};

/// Extension points a storage backend implements
///
/// Each hook receives the configuration current at call time and a request
/// that already passed validation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend-defined configuration held by the [`Datastore`]
    type Config: Send + Sync + 'static;

    /// Open connections, create tables, etc.
    async fn setup(&self, _config: Arc<Self::Config>) -> Result<()> {
        Ok(())
    }

    async fn get(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<Record> {
        Err(DatastoreError::NotImplemented { operation: Operation::Get })
    }

    async fn save(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<Record> {
        Err(DatastoreError::NotImplemented { operation: Operation::Save })
    }

    /// Update a record that must already exist
    async fn update(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<Record> {
        Err(DatastoreError::NotImplemented { operation: Operation::Update })
    }

    async fn scan(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<Vec<Record>> {
        Err(DatastoreError::NotImplemented { operation: Operation::Scan })
    }

    async fn query(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<QueryResponse> {
        Err(DatastoreError::NotImplemented { operation: Operation::Query })
    }

    async fn remove(&self, _config: Arc<Self::Config>, _request: ValidRequest) -> Result<()> {
        Err(DatastoreError::NotImplemented { operation: Operation::Remove })
    }
}

/// Backend with no overrides: every operation validates, then fails with
/// `NotImplemented`
#[derive(Debug, Default, Clone, Copy)]
pub struct Unimplemented;

#[async_trait]
impl Backend for Unimplemented {
    type Config = Value;
}

/// Validating front of a [`Backend`]
pub struct Datastore<B: Backend> {
    backend: B,
    validator: Arc<dyn Validator>,
    config: RwLock<Arc<B::Config>>,
}

impl Datastore<Unimplemented> {
    /// The bare contract, with no backend behind it
    pub fn base(config: Value) -> Self {
        Datastore::new(Unimplemented, config)
    }
}

impl<B: Backend> Datastore<B> {
    /// Create a datastore checking requests against the built-in rules
    pub fn new(backend: B, config: B::Config) -> Self {
        Datastore::with_validator(backend, config, Arc::new(SchemaValidator::default()))
    }

    /// Create a datastore with a caller-supplied validator
    pub fn with_validator(backend: B, config: B::Config, validator: Arc<dyn Validator>) -> Self {
        Datastore {
            backend,
            validator,
            config: RwLock::new(Arc::new(config)),
        }
    }

    /// Replace the configuration
    ///
    /// Calls already in flight keep the configuration they started with.
    pub fn configure(&self, config: B::Config) {
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(config);
        info!("Datastore reconfigured");
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Arc<B::Config> {
        let current = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// The backend behind this datastore
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the backend's setup hook
    pub async fn setup(&self) -> Result<()> {
        info!("Setting up datastore");
        self.backend.setup(self.config()).await
    }

    /// Get a single record given `table` and `params.id`
    pub async fn get(&self, request: Value) -> Result<Record> {
        let request = self.validate(Operation::Get, request)?;
        self.backend.get(self.config(), request).await
    }

    /// Create a record from `table` and `params` (`id`, `data`)
    pub async fn save(&self, request: Value) -> Result<Record> {
        let request = self.validate(Operation::Save, request)?;
        self.backend.save(self.config(), request).await
    }

    /// Update an existing record from `table` and `params` (`id`, `data`)
    pub async fn update(&self, request: Value) -> Result<Record> {
        let request = self.validate(Operation::Update, request)?;
        self.backend.update(self.config(), request).await
    }

    /// Fetch a page of records given `table`, `paginate` and optional `params`
    pub async fn scan(&self, request: Value) -> Result<Vec<Record>> {
        let request = self.validate(Operation::Scan, request)?;
        self.backend.scan(self.config(), request).await
    }

    /// Run raw `queries`, with optional `table`, `replacements` and `rawResponse`
    pub async fn query(&self, request: Value) -> Result<QueryResponse> {
        let request = self.validate(Operation::Query, request)?;
        self.backend.query(self.config(), request).await
    }

    /// Remove a single record given `table` and `params.id`
    pub async fn remove(&self, request: Value) -> Result<()> {
        let request = self.validate(Operation::Remove, request)?;
        self.backend.remove(self.config(), request).await
    }

    fn validate(&self, operation: Operation, request: Value) -> Result<ValidRequest> {
        match self.validator.validate(request, operation) {
            Ok(value) => {
                let request = ValidRequest::new(operation, value);
                debug!("{}: dispatching request for table {:?}", operation, request.table());
                Ok(request)
            }
            Err(err) => {
                debug!("{}: request rejected: {}", operation, err);
                Err(err.into())
            }
        }
    }
}
