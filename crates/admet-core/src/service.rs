//! Request-level prediction orchestration.
//!
//! One [`PredictionService`] is shared by every request. Per request it:
//! resolves property aliases (all-or-nothing), checks a worker out of the
//! pool, runs inference, and folds each requested property into an
//! isolated success-or-error result. The slot returns to the pool on
//! every exit path via its drop guard.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::CATALOG;
use crate::config::ServiceConfig;
use crate::error::{AdmetError, Result};
use crate::model::PropertyModel;
use crate::pool::{PoolSlot, WorkerPool};
use crate::resolver::PropertyResolver;
use crate::worker::PredictionWorker;

/// Outcome status for one property result or one whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Outcome of reading one requested property after a prediction run.
///
/// An absent value is still a success — the backend may legitimately not
/// produce every property for every input.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResult {
    pub status: Status,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PropertyResult {
    fn success(value: Option<f64>) -> Self {
        Self {
            status: Status::Success,
            value,
            error: None,
        }
    }

    fn failed(err: &AdmetError) -> Self {
        Self {
            status: Status::Error,
            value: None,
            error: Some(err.to_string()),
        }
    }
}

/// Per-input prediction report.
///
/// `results` maps canonical property id to its result, in request order
/// (catalog order when the property list was omitted).
#[derive(Debug, Clone, Serialize)]
pub struct SmilesReport {
    pub smiles: String,
    pub status: Status,
    pub results: IndexMap<&'static str, PropertyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SmilesReport {
    /// Error-status report with no per-property results.
    pub fn failed(smiles: &str, err: &AdmetError) -> Self {
        Self {
            smiles: smiles.to_string(),
            status: Status::Error,
            results: IndexMap::new(),
            error: Some(err.to_string()),
        }
    }

    fn success(smiles: &str, results: IndexMap<&'static str, PropertyResult>) -> Self {
        Self {
            smiles: smiles.to_string(),
            status: Status::Success,
            results,
            error: None,
        }
    }
}

/// Shared prediction front end: alias resolver plus worker pool.
pub struct PredictionService {
    pool: WorkerPool,
    resolver: PropertyResolver,
    acquire_timeout: Option<Duration>,
}

impl PredictionService {
    pub fn new(
        pool: WorkerPool,
        resolver: PropertyResolver,
        acquire_timeout: Option<Duration>,
    ) -> Self {
        Self {
            pool,
            resolver,
            acquire_timeout,
        }
    }

    /// Build a service from configuration, constructing one model
    /// instance per pool slot via `make_model`.
    pub fn with_models<F>(config: &ServiceConfig, mut make_model: F) -> Result<Self>
    where
        F: FnMut() -> Box<dyn PropertyModel>,
    {
        config.validate()?;
        let resolver = PropertyResolver::from_catalog(CATALOG)?;
        let workers = (0..config.pool_size)
            .map(|_| PredictionWorker::new(make_model()))
            .collect();
        let pool = WorkerPool::new(workers)?;
        Ok(Self::new(pool, resolver, config.acquire_timeout))
    }

    pub fn resolver(&self) -> &PropertyResolver {
        &self.resolver
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Predict the requested properties for one SMILES string.
    ///
    /// Alias resolution is all-or-nothing and happens before any worker
    /// is acquired. A run failure fails the whole request; individual
    /// property reads are isolated from each other.
    pub async fn predict_one(
        &self,
        smiles: &str,
        aliases: Option<&[String]>,
    ) -> Result<SmilesReport> {
        let ids = self.resolver.resolve_many(aliases)?;
        self.predict_one_resolved(smiles, &ids).await
    }

    /// [`predict_one`](Self::predict_one) with pre-resolved canonical ids.
    pub async fn predict_one_resolved(
        &self,
        smiles: &str,
        ids: &[&'static str],
    ) -> Result<SmilesReport> {
        let mut slot = self.checkout().await?;
        info!(event = "predict.started", smiles = %smiles, properties = ids.len());
        slot.run(smiles).await?;
        let results = read_properties(&slot, ids);
        info!(event = "predict.finished", smiles = %smiles);
        Ok(SmilesReport::success(smiles, results))
    }

    /// Predict for a batch of SMILES strings, in submission order.
    ///
    /// Aliases are resolved once for the whole batch and one worker is
    /// held for its duration. Every input gets its own run and its own
    /// result map, zipped 1:1 with the inputs. A failed run marks only
    /// that input's report as an error; the rest of the batch proceeds.
    pub async fn predict_batch(
        &self,
        smiles_list: &[String],
        aliases: Option<&[String]>,
    ) -> Result<Vec<SmilesReport>> {
        let ids = self.resolver.resolve_many(aliases)?;
        self.predict_batch_resolved(smiles_list, &ids).await
    }

    /// [`predict_batch`](Self::predict_batch) with pre-resolved ids.
    pub async fn predict_batch_resolved(
        &self,
        smiles_list: &[String],
        ids: &[&'static str],
    ) -> Result<Vec<SmilesReport>> {
        let mut slot = self.checkout().await?;
        let mut reports = Vec::with_capacity(smiles_list.len());
        for smiles in smiles_list {
            match slot.run(smiles).await {
                Ok(()) => {
                    let results = read_properties(&slot, ids);
                    reports.push(SmilesReport::success(smiles, results));
                }
                Err(err) => {
                    warn!(event = "predict.run_failed", smiles = %smiles, error = %err);
                    reports.push(SmilesReport::failed(smiles, &err));
                }
            }
        }
        info!(event = "batch.finished", total = reports.len());
        Ok(reports)
    }

    async fn checkout(&self) -> Result<PoolSlot> {
        match self.acquire_timeout {
            Some(timeout) => self.pool.acquire_timeout(timeout).await,
            None => Ok(self.pool.acquire().await),
        }
    }
}

/// Read each requested property independently; one faulting read never
/// aborts its siblings.
fn read_properties(
    slot: &PoolSlot,
    ids: &[&'static str],
) -> IndexMap<&'static str, PropertyResult> {
    let mut results = IndexMap::with_capacity(ids.len());
    for &id in ids {
        let entry = match slot.get(id) {
            Ok(value) => PropertyResult::success(value),
            Err(err) => {
                warn!(event = "predict.property_failed", property = id, error = %err);
                PropertyResult::failed(&err)
            }
        };
        results.insert(id, entry);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::StaticModel;
    use crate::model::StubModel;

    fn static_service(values: Vec<(&'static str, f64)>) -> PredictionService {
        PredictionService::with_models(&ServiceConfig::default(), move || {
            Box::new(StaticModel::new(values.clone()))
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_predict_one_defaults_to_full_catalog_order() {
        let service = PredictionService::with_models(&ServiceConfig::default(), || {
            Box::new(StubModel::new())
        })
        .unwrap();

        let report = service.predict_one("CCO", None).await.unwrap();
        assert_eq!(report.status, Status::Success);
        assert_eq!(report.results.len(), CATALOG.len());

        let keys: Vec<&str> = report.results.keys().copied().collect();
        let expected: Vec<&str> = CATALOG.iter().map(|p| p.id).collect();
        assert_eq!(keys, expected);
    }

    #[tokio::test]
    async fn test_absent_property_is_a_success_with_no_value() {
        let service = static_service(vec![("logP", 2.5)]);
        let request = vec!["logP".to_string(), "QED".to_string()];
        let report = service.predict_one("CCO", Some(&request)).await.unwrap();

        assert_eq!(report.results["logP"].value, Some(2.5));
        assert_eq!(report.results["QED"].status, Status::Success);
        assert_eq!(report.results["QED"].value, None);
    }

    #[tokio::test]
    async fn test_poisoned_property_does_not_abort_siblings() {
        let service = static_service(vec![
            ("logP", 2.5),
            ("QED", 0.7),
            ("tpsa", f64::NAN),
        ]);
        let request = vec!["logP".to_string(), "QED".to_string(), "tpsa".to_string()];
        let report = service.predict_one("CCO", Some(&request)).await.unwrap();

        assert_eq!(report.results["logP"].status, Status::Success);
        assert_eq!(report.results["QED"].status, Status::Success);
        assert_eq!(report.results["tpsa"].status, Status::Error);
        assert!(report.results["tpsa"].error.as_deref().unwrap().contains("tpsa"));
    }

    #[tokio::test]
    async fn test_unknown_alias_fails_before_acquiring_a_worker() {
        let service = static_service(vec![("logP", 2.5)]);
        let request = vec!["logP".to_string(), "bogus".to_string()];
        let err = service.predict_one("CCO", Some(&request)).await.unwrap_err();
        assert!(matches!(err, AdmetError::UnknownProperty { .. }));
        assert_eq!(service.pool().idle(), service.pool().capacity());
    }

    #[tokio::test]
    async fn test_pool_is_whole_after_a_failed_run() {
        let service = PredictionService::with_models(&ServiceConfig::default(), || {
            Box::new(crate::fakes::FailingModel::new("boom"))
        })
        .unwrap();

        let err = service.predict_one("CCO", None).await.unwrap_err();
        assert!(matches!(err, AdmetError::Model(_)));
        assert_eq!(service.pool().idle(), service.pool().capacity());
    }
}
