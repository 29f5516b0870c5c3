//! admet-core — serving core for ADMET property prediction.
//!
//! Re-exports the property catalog, alias resolver, worker pool, and
//! prediction service used by the `admetd` daemon and the `admet` CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fakes;
pub mod model;
pub mod pool;
pub mod resolver;
pub mod service;
pub mod telemetry;
pub mod worker;

pub use catalog::{catalog_ids, verify_catalog, PropertyDescriptor, TaskKind, CATALOG};
pub use config::ServiceConfig;
pub use error::{AdmetError, ModelError, Result};
pub use model::{PropertyModel, StubModel};
pub use pool::{PoolSlot, WorkerPool};
pub use resolver::PropertyResolver;
pub use service::{PredictionService, PropertyResult, SmilesReport, Status};
pub use telemetry::init_tracing;
pub use worker::PredictionWorker;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
