//! Rayon thread-pool configuration
//!
//! The flag codec and numeric helpers run elementwise on Rayon's global
//! pool through ndarray's `rayon` feature; this module sizes that pool.

use crate::errors::{HydroError, Result};
use rayon::ThreadPoolBuilder;
use tracing::info;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Worker threads; Rayon's default (one per core) if `None`
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Uses every available CPU core
    pub fn all_cores() -> Self {
        Self::with_threads(num_cpus::get())
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Builds the global Rayon pool.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::ThreadPoolError`] if the thread count is zero
    /// or the global pool was already initialised.
    pub fn setup_global_pool(&self) -> Result<()> {
        match self.num_threads {
            Some(0) => Err(HydroError::ThreadPoolError(
                "Thread count must be at least 1".to_string(),
            )),
            Some(num_threads) => {
                ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build_global()
                    .map_err(|e| {
                        HydroError::ThreadPoolError(format!(
                            "Failed to initialize thread pool with {num_threads} threads: {e}"
                        ))
                    })?;
                info!("Configured parallel processing with {num_threads} threads");
                Ok(())
            }
            None => {
                info!("Using default thread pool configuration");
                Ok(())
            }
        }
    }

    /// Threads in the current pool
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
    pub available_parallelism: usize,
}

impl ParallelInfo {
    pub fn log(&self) {
        info!(
            "Parallel processing: {} threads, {} CPU cores, available parallelism {}",
            self.current_threads, self.available_cores, self.available_parallelism
        );
    }
}

pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        current_threads: rayon::current_num_threads(),
        available_cores: num_cpus::get(),
        available_parallelism: std::thread::available_parallelism().map_or(1, |p| p.get()),
    }
}
