//! Pipeline orchestrator.
//!
//! A run has two phases. Planning resolves every request (kernel lookup,
//! parameter validation, input fields, label) without computing anything, so
//! a bad request fails the run before any kernel executes. Execution then
//! fills one pre-allocated column-major buffer, handing each kernel an
//! exclusive `&mut` chunk for its column.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use ta_core::{
    EngineError, FeatureMatrix, Kernel, KernelParams, Result, SeriesBuffer, SeriesSet,
};
use ta_kernels::KernelRegistry;
use tracing::{debug, debug_span, trace, warn};

use crate::config::{Execution, PipelineConfig};
use crate::request::IndicatorRequest;

/// One resolved request, ready to execute.
struct PlannedColumn<'a> {
    kernel: Arc<dyn Kernel>,
    params: KernelParams,
    inputs: Vec<SeriesBuffer<'a>>,
    label: String,
}

impl PlannedColumn<'_> {
    fn execute(&self, out: &mut [f64]) -> Result<()> {
        trace!(kernel = self.kernel.name(), label = %self.label, "computing column");
        self.kernel.compute(&self.inputs, &self.params, out)
    }
}

/// Assembles kernel outputs into a [`FeatureMatrix`].
///
/// A pipeline holds no per-run state: the same instance can serve any number
/// of runs, from any number of threads.
///
/// # Example
///
/// ```
/// use ta_core::{Field, SeriesSet};
/// use ta_pipeline::{IndicatorRequest, Pipeline};
///
/// let close = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let set = SeriesSet::new().with(Field::Close, &close).unwrap();
///
/// let pipeline = Pipeline::default();
/// let matrix = pipeline
///     .run(&set, &[IndicatorRequest::new("ema", 3), IndicatorRequest::new("sma", 2)])
///     .unwrap();
///
/// assert_eq!(matrix.shape(), (5, 2));
/// assert_eq!(matrix.column_by_label("ema_3").unwrap()[4], 4.0);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    registry: KernelRegistry,
    pool: Option<Arc<ThreadPool>>,
}

impl Pipeline {
    /// Create a pipeline with the built-in kernels.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the configuration is
    /// invalid or its worker pool cannot be started.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_registry(config, KernelRegistry::with_defaults())
    }

    /// Create a pipeline resolving kernels from `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the configuration is
    /// invalid or its worker pool cannot be started.
    pub fn with_registry(config: PipelineConfig, registry: KernelRegistry) -> Result<Self> {
        config.validate()?;

        let pool = match config.execution {
            Execution::Sequential => None,
            Execution::Parallel { workers } => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("ta-pipeline-{i}"))
                    .build()
                    .map_err(|e| {
                        EngineError::invalid_parameter(
                            "workers",
                            workers,
                            format!("a startable thread pool ({e})"),
                        )
                    })?;
                Some(Arc::new(pool))
            }
        };

        debug!(execution = ?config.execution, kernels = registry.len(), "pipeline created");
        Ok(Self {
            config,
            registry,
            pool,
        })
    }

    /// The configuration this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The kernel registry requests resolve against.
    #[must_use]
    pub fn registry(&self) -> &KernelRegistry {
        &self.registry
    }

    /// Compute one column per request and assemble them in request order.
    ///
    /// # Errors
    ///
    /// Fails the whole run, returning no matrix, if the series set is empty,
    /// a kernel name is unknown, a parameter is invalid, or a required field
    /// is missing.
    pub fn run(&self, series: &SeriesSet<'_>, requests: &[IndicatorRequest]) -> Result<FeatureMatrix> {
        if series.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        let rows = series.len();
        let plan = self.plan(series, requests)?;

        let span = debug_span!(
            "pipeline_run",
            rows,
            cols = plan.len(),
            execution = ?self.config.execution
        );
        let _enter = span.enter();

        let mut data = vec![f64::NAN; rows * plan.len()];
        match &self.pool {
            None => data
                .chunks_mut(rows)
                .zip(&plan)
                .try_for_each(|(column, planned)| planned.execute(column))?,
            Some(pool) => pool.install(|| {
                data.par_chunks_mut(rows)
                    .zip(plan.par_iter())
                    .try_for_each(|(column, planned)| planned.execute(column))
            })?,
        }

        let labels = plan.into_iter().map(|planned| planned.label).collect();
        let matrix = FeatureMatrix::from_column_major(rows, labels, data)?;
        debug!(rows, cols = matrix.cols(), "pipeline run complete");
        Ok(matrix)
    }

    /// Resolve every request against the series set, in request order.
    fn plan<'a>(
        &self,
        series: &SeriesSet<'a>,
        requests: &[IndicatorRequest],
    ) -> Result<Vec<PlannedColumn<'a>>> {
        let rows = series.len();

        requests
            .iter()
            .map(|request| {
                let kernel = self.registry.get(&request.kernel)?;
                let params = request.params()?;
                kernel.validate(&params)?;

                let inputs = kernel
                    .required_fields(&params)
                    .into_iter()
                    .map(|field| series.require(kernel.name(), field))
                    .collect::<Result<Vec<_>>>()?;

                let label = request.label();
                if params.period > rows {
                    warn!(
                        label = %label,
                        period = params.period,
                        rows,
                        "period exceeds series length, column will be all NaN"
                    );
                }

                Ok(PlannedColumn {
                    kernel,
                    params,
                    inputs,
                    label,
                })
            })
            .collect()
    }
}

impl Default for Pipeline {
    /// Sequential pipeline with the built-in kernels.
    fn default() -> Self {
        Self {
            config: PipelineConfig::sequential(),
            registry: KernelRegistry::with_defaults(),
            pool: None,
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}
