//! Kernel registry for resolving requests by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ta_core::{EngineError, Kernel, Result};
use tracing::debug;

use crate::momentum::{LogReturn, Roc, Rsi};
use crate::trend::{Ema, Sma};
use crate::volatility::{Atr, BollingerBand, RollingStd};

/// Registry of kernels keyed by lowercase name.
///
/// Kernels are stateless, so one shared instance serves every request and
/// every worker thread. Several names may map to the same kernel.
///
/// # Example
///
/// ```
/// use ta_kernels::KernelRegistry;
///
/// let registry = KernelRegistry::with_defaults();
/// assert_eq!(registry.get("EMA").unwrap().name(), "ema");
/// assert_eq!(registry.get("rolling_mean").unwrap().name(), "sma");
/// assert!(registry.get("vwap").is_err());
/// ```
#[derive(Clone, Default)]
pub struct KernelRegistry {
    kernels: HashMap<String, Arc<dyn Kernel>>,
}

impl KernelRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernels: HashMap::new(),
        }
    }

    /// Registers a kernel under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, kernel: Arc<dyn Kernel>) {
        let key = name.to_ascii_lowercase();
        debug!(name = %key, kernel = kernel.name(), "registering kernel");
        self.kernels.insert(key, kernel);
    }

    /// Registers a kernel under its own name.
    pub fn register_kernel<K: Kernel + 'static>(&mut self, kernel: K) {
        let name = kernel.name();
        self.register(name, Arc::new(kernel));
    }

    /// Looks up a kernel by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownKernel`] if the name is not registered.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Kernel>> {
        self.kernels
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| EngineError::UnknownKernel(name.to_string()))
    }

    /// Checks if a kernel is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kernels.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kernels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Creates a registry with every built-in kernel and its aliases.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Trend
        registry.register_kernel(Sma);
        registry.register("rolling_mean", Arc::new(Sma));
        registry.register("bb_middle", Arc::new(Sma));
        registry.register_kernel(Ema);

        // Momentum
        registry.register_kernel(Rsi);
        registry.register_kernel(Roc);
        registry.register_kernel(LogReturn);

        // Volatility
        registry.register_kernel(RollingStd);
        registry.register_kernel(BollingerBand::upper());
        registry.register_kernel(BollingerBand::lower());
        registry.register_kernel(BollingerBand::percent_b());
        registry.register_kernel(BollingerBand::width());
        registry.register_kernel(Atr);

        registry
    }
}

impl fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelRegistry")
            .field("names", &self.names())
            .finish()
    }
}
