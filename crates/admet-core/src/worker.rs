//! Single-custody prediction worker.

use std::collections::HashMap;

use crate::error::{AdmetError, Result};
use crate::model::PropertyModel;

/// Wraps one inference engine instance together with its most recent
/// prediction set.
///
/// A worker holds exactly one prediction set at a time; [`run`] replaces
/// it wholesale. Workers are handed out by the pool to one caller at a
/// time — there is no internal locking here.
///
/// [`run`]: PredictionWorker::run
pub struct PredictionWorker {
    model: Box<dyn PropertyModel>,
    predictions: HashMap<String, f64>,
}

impl PredictionWorker {
    pub fn new(model: Box<dyn PropertyModel>) -> Self {
        Self {
            model,
            predictions: HashMap::new(),
        }
    }

    /// Run inference for `smiles`, replacing the stored prediction set.
    ///
    /// On failure the previous set is left in place; the next successful
    /// run overwrites it, so stale state never needs explicit cleanup.
    pub async fn run(&mut self, smiles: &str) -> Result<()> {
        self.predictions = self.model.predict(smiles).await?;
        Ok(())
    }

    /// Read back one property from the most recent run.
    ///
    /// `Ok(None)` means the last run did not produce this property — or no
    /// run has happened yet. A stored non-finite value is a per-property
    /// fault and surfaces as an error without touching sibling properties.
    pub fn get(&self, id: &str) -> Result<Option<f64>> {
        match self.predictions.get(id) {
            None => Ok(None),
            Some(v) if v.is_finite() => Ok(Some(*v)),
            Some(v) => Err(AdmetError::CorruptPrediction {
                property: id.to_string(),
                value: *v,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FailingModel, StaticModel};

    #[tokio::test]
    async fn test_get_before_any_run_is_absent() {
        let worker = PredictionWorker::new(Box::new(StaticModel::new([("logP", 1.5)])));
        assert_eq!(worker.get("logP").unwrap(), None);
    }

    #[tokio::test]
    async fn test_run_replaces_the_prediction_set() {
        let mut worker = PredictionWorker::new(Box::new(StaticModel::new([("logP", 1.5)])));
        worker.run("CCO").await.unwrap();
        assert_eq!(worker.get("logP").unwrap(), Some(1.5));
        assert_eq!(worker.get("QED").unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_set() {
        let mut worker = PredictionWorker::new(Box::new(FailingModel::new("backend down")));
        assert!(worker.run("CCO").await.is_err());
        assert_eq!(worker.get("logP").unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_finite_value_is_a_property_fault() {
        let mut worker = PredictionWorker::new(Box::new(StaticModel::new([
            ("logP", 1.5),
            ("QED", f64::NAN),
        ])));
        worker.run("CCO").await.unwrap();
        assert_eq!(worker.get("logP").unwrap(), Some(1.5));
        assert!(worker.get("QED").is_err());
    }
}
