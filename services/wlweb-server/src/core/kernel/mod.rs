//! Kernel sessions and pools
//!
//! A kernel is an external `WolframKernel` process driven through its
//! text interface. [`KernelSession`] owns one process, [`KernelPool`]
//! spreads evaluations over several sessions. Both implement
//! [`Evaluator`], which is all the HTTP adapter depends on.
//!
//! # Architecture
//!
//! - **protocol**: request framing and reply parsing
//! - **session**: single kernel process lifecycle
//! - **pool**: idle-slot dispatch across sessions

pub mod pool;
pub mod protocol;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::KernelConfig;
use crate::core::error::Result;
use crate::core::expr::Expr;

pub use pool::KernelPool;
pub use session::KernelSession;

/// Outcome of one kernel evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Evaluation {
    /// String results verbatim, anything else in InputForm
    pub result: String,

    /// Messages issued during the evaluation (e.g. `Power::infy`)
    #[serde(default)]
    pub messages: Vec<String>,
}

impl Evaluation {
    /// True when the evaluation issued no messages
    pub fn is_success(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Something that can evaluate expressions in a kernel
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Start the underlying kernel(s); a no-op when already running
    async fn start(&self) -> Result<()>;

    /// Evaluate an expression, starting the kernel first if needed
    async fn evaluate(&self, expr: &Expr) -> Result<Evaluation>;

    /// Terminate the underlying kernel(s)
    async fn stop(&self) -> Result<()>;

    /// Whether at least one kernel is running
    fn started(&self) -> bool;
}

/// Build a single session or a pool depending on `config.poolsize`
pub fn create_session(config: &KernelConfig) -> Arc<dyn Evaluator> {
    if config.poolsize <= 1 {
        Arc::new(KernelSession::new(0, config.clone()))
    } else {
        Arc::new(KernelPool::new(config.clone()))
    }
}
