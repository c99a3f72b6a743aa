//! Unified service container for wlweb
//!
//! Provides shared access to the configuration and the kernel evaluator.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::kernel::{self, Evaluator};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Kernel session or pool
    pub evaluator: Arc<dyn Evaluator>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, sizing the kernel pool from it
    ///
    /// No kernel is spawned until the first evaluation or an explicit start.
    pub fn new(config: Config) -> Self {
        let evaluator = kernel::create_session(&config.kernel);
        Self::with_evaluator(config, evaluator)
    }

    /// Create services around an existing evaluator
    pub fn with_evaluator(config: Config, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            config: Arc::new(config),
        }
    }

    /// Start the kernels in the background
    pub fn preload(&self) -> JoinHandle<Result<()>> {
        let evaluator = Arc::clone(&self.evaluator);
        tokio::spawn(async move { evaluator.start().await })
    }
}
