//! Inference backend boundary.
//!
//! The real ADMET engine is an external collaborator; everything behind
//! [`PropertyModel`] is opaque to the serving layer. A deterministic
//! [`StubModel`] ships as the default backend so the daemon and CLI run
//! without a trained model present.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::catalog::{PropertyDescriptor, TaskKind, CATALOG};
use crate::error::ModelError;

/// A stateful inference engine instance.
///
/// `predict` takes `&mut self`: an instance is NOT safe for concurrent
/// use. The worker pool guarantees single custody at any moment.
/// Construction of a real backend may fail, which is startup-fatal.
#[async_trait]
pub trait PropertyModel: Send {
    /// Run inference for one SMILES string, returning predictions keyed
    /// by canonical property id. A backend may produce only a subset of
    /// the catalog for a given input.
    async fn predict(&mut self, smiles: &str) -> std::result::Result<HashMap<String, f64>, ModelError>;
}

/// Deterministic pseudo-prediction backend.
///
/// Derives a stable value per (smiles, property) pair: probabilities in
/// [0, 1] for classification tasks and values in a plausible descriptor
/// range for regression tasks. Placeholder for a real inference engine.
#[derive(Debug, Default, Clone)]
pub struct StubModel;

impl StubModel {
    pub fn new() -> Self {
        Self
    }

    fn value_for(smiles: &str, prop: &PropertyDescriptor) -> f64 {
        let mut hasher = DefaultHasher::new();
        smiles.hash(&mut hasher);
        prop.id.hash(&mut hasher);
        let unit = (hasher.finish() % 10_000) as f64 / 10_000.0;
        match prop.task {
            TaskKind::Classification => unit,
            TaskKind::Regression => unit * 500.0,
        }
    }
}

#[async_trait]
impl PropertyModel for StubModel {
    async fn predict(&mut self, smiles: &str) -> std::result::Result<HashMap<String, f64>, ModelError> {
        if smiles.trim().is_empty() {
            return Err(ModelError::Inference {
                smiles: smiles.to_string(),
                reason: "empty input".to_string(),
            });
        }
        Ok(CATALOG
            .iter()
            .map(|p| (p.id.to_string(), Self::value_for(smiles, p)))
            .collect())
    }
}
