//! Error taxonomy for the prediction serving core.

/// Errors produced by an inference backend.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model failed to load: {0}")]
    Load(String),

    #[error("inference failed for '{smiles}': {reason}")]
    Inference { smiles: String, reason: String },
}

/// Serving-core errors.
#[derive(Debug, thiserror::Error)]
pub enum AdmetError {
    #[error("duplicate property id in catalog: {id}")]
    DuplicateProperty { id: String },

    #[error("alias '{alias}' maps to both '{first}' and '{second}'")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },

    #[error("unknown property alias '{alias}'; recognized aliases: {recognized}")]
    UnknownProperty { alias: String, recognized: String },

    #[error("worker pool must have at least one worker")]
    EmptyPool,

    #[error("timed out after {waited_secs}s waiting for a free worker")]
    AcquireTimeout { waited_secs: u64 },

    #[error("prediction for '{property}' is not a finite number ({value})")]
    CorruptPrediction { property: String, value: f64 },

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for serving-core operations.
pub type Result<T> = std::result::Result<T, AdmetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_property_names_the_alias() {
        let err = AdmetError::UnknownProperty {
            alias: "logp2".to_string(),
            recognized: "logP, logp".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("logp2"));
        assert!(msg.contains("logP"));
    }

    #[test]
    fn test_model_error_wraps_into_admet_error() {
        let err: AdmetError = ModelError::Inference {
            smiles: "CCO".to_string(),
            reason: "backend down".to_string(),
        }
        .into();
        assert!(err.to_string().contains("CCO"));
        assert!(err.to_string().contains("backend down"));
    }

    #[test]
    fn test_acquire_timeout_display() {
        let err = AdmetError::AcquireTimeout { waited_secs: 30 };
        assert!(err.to_string().contains("30"));
    }
}
