//! Service configuration.

use std::time::Duration;

use crate::error::{AdmetError, Result};

/// Startup configuration for the prediction service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Number of pooled workers; each owns one engine instance.
    pub pool_size: usize,
    /// Optional bound on how long a request waits for a free worker.
    /// `None` means wait indefinitely.
    pub acquire_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pool_size: 1,
            acquire_timeout: None,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(AdmetError::EmptyPool);
        }
        Ok(())
    }
}
