//! In-memory fakes for the inference backend (testing only)
//!
//! Provides `StaticModel`, `FailingModel`, and `RejectingModel` so pool,
//! worker, and service behavior can be exercised without a real engine.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ModelError;
use crate::model::PropertyModel;

/// Returns the same fixed prediction map for every input.
///
/// Non-finite values are accepted, which lets tests inject a poisoned
/// prediction for a single property.
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    values: HashMap<String, f64>,
}

impl StaticModel {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(id, v)| (id.to_string(), v))
                .collect(),
        }
    }
}

#[async_trait]
impl PropertyModel for StaticModel {
    async fn predict(
        &mut self,
        _smiles: &str,
    ) -> std::result::Result<HashMap<String, f64>, ModelError> {
        Ok(self.values.clone())
    }
}

/// Fails every inference call.
#[derive(Debug, Clone)]
pub struct FailingModel {
    pub reason: String,
}

impl FailingModel {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl PropertyModel for FailingModel {
    async fn predict(
        &mut self,
        smiles: &str,
    ) -> std::result::Result<HashMap<String, f64>, ModelError> {
        Err(ModelError::Inference {
            smiles: smiles.to_string(),
            reason: self.reason.clone(),
        })
    }
}

/// Fails inference for one specific input and succeeds for all others.
#[derive(Debug, Clone)]
pub struct RejectingModel {
    reject: String,
    values: HashMap<String, f64>,
}

impl RejectingModel {
    pub fn new<I>(reject: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        Self {
            reject: reject.to_string(),
            values: values
                .into_iter()
                .map(|(id, v)| (id.to_string(), v))
                .collect(),
        }
    }
}

#[async_trait]
impl PropertyModel for RejectingModel {
    async fn predict(
        &mut self,
        smiles: &str,
    ) -> std::result::Result<HashMap<String, f64>, ModelError> {
        if smiles == self.reject {
            return Err(ModelError::Inference {
                smiles: smiles.to_string(),
                reason: "rejected input".to_string(),
            });
        }
        Ok(self.values.clone())
    }
}
