//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use ta_core::{EngineError, Result};

/// How a run evaluates its requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Execution {
    /// One column after another on the calling thread.
    #[default]
    Sequential,
    /// Columns fanned out over a fixed pool of worker threads.
    Parallel {
        /// Number of worker threads (>= 1).
        workers: usize,
    },
}

/// Configuration for a [`crate::Pipeline`].
///
/// # JSON
///
/// ```json
/// {"execution": {"mode": "parallel", "workers": 4}}
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Execution strategy.
    pub execution: Execution,
}

impl PipelineConfig {
    /// Create a new configuration (sequential execution).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequential execution.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            execution: Execution::Sequential,
        }
    }

    /// Parallel execution over `workers` threads.
    #[must_use]
    pub fn parallel(workers: usize) -> Self {
        Self {
            execution: Execution::Parallel { workers },
        }
    }

    /// Set the execution strategy.
    #[must_use]
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if a parallel configuration
    /// asks for zero workers.
    pub fn validate(&self) -> Result<()> {
        if let Execution::Parallel { workers: 0 } = self.execution {
            return Err(EngineError::invalid_parameter("workers", 0, "integer >= 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] for malformed JSON or an
    /// invalid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            EngineError::invalid_parameter("config", e, "a pipeline configuration object")
        })?;
        config.validate()?;
        Ok(config)
    }
}
