//! Pool of kernel sessions
//!
//! Each slot is a dedicated [`KernelSession`]. Evaluations take an idle
//! slot from a queue and hand it back when done, so at most `poolsize`
//! evaluations run at once and a busy kernel is never shared.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::core::config::KernelConfig;
use crate::core::error::{Result, WlwebError};
use crate::core::expr::Expr;
use crate::core::kernel::session::KernelSession;
use crate::core::kernel::{Evaluation, Evaluator};

/// Idle slot borrowed from the pool, returned on drop
struct SlotGuard<'a> {
    index: usize,
    idle_tx: &'a mpsc::UnboundedSender<usize>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        // Fails only once the pool itself is gone
        let _ = self.idle_tx.send(self.index);
    }
}

/// Fixed-size set of kernel sessions
pub struct KernelPool {
    sessions: Vec<Arc<KernelSession>>,
    idle_tx: mpsc::UnboundedSender<usize>,
    idle_rx: Mutex<mpsc::UnboundedReceiver<usize>>,
}

impl KernelPool {
    pub fn new(config: KernelConfig) -> Self {
        let size = config.poolsize.max(1);
        let (idle_tx, idle_rx) = mpsc::unbounded_channel();

        let sessions = (0..size)
            .map(|id| Arc::new(KernelSession::new(id, config.clone())))
            .collect();
        for index in 0..size {
            let _ = idle_tx.send(index);
        }

        Self {
            sessions,
            idle_tx,
            idle_rx: Mutex::new(idle_rx),
        }
    }

    pub fn size(&self) -> usize {
        self.sessions.len()
    }

    /// Wait for an idle session
    async fn acquire(&self) -> Result<SlotGuard<'_>> {
        let index = self
            .idle_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| WlwebError::KernelTerminated("kernel pool closed".into()))?;

        debug!(kernel = index, "Acquired pool slot");
        Ok(SlotGuard {
            index,
            idle_tx: &self.idle_tx,
        })
    }
}

#[async_trait]
impl Evaluator for KernelPool {
    async fn start(&self) -> Result<()> {
        info!(poolsize = self.size(), "Starting kernel pool");

        let mut tasks = JoinSet::new();
        for session in &self.sessions {
            let session = Arc::clone(session);
            tasks.spawn(async move { (session.id(), session.start().await) });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((id, Err(e))) => {
                    error!(kernel = id, error = %e, "Kernel failed to start");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    error!(error = %e, "Kernel start task panicked");
                    first_error.get_or_insert(WlwebError::KernelStartFailed(e.to_string()));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn evaluate(&self, expr: &Expr) -> Result<Evaluation> {
        let slot = self.acquire().await?;
        self.sessions[slot.index].evaluate(expr).await
    }

    async fn stop(&self) -> Result<()> {
        for session in &self.sessions {
            session.stop().await?;
        }
        Ok(())
    }

    fn started(&self) -> bool {
        self.sessions.iter().any(|session| session.started())
    }
}
