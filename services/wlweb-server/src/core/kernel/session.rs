//! Single kernel process
//!
//! A [`KernelSession`] owns at most one kernel process. The process is
//! spawned lazily on first use (or eagerly through [`Evaluator::start`]),
//! evaluations are serialized through an async mutex, and a process that
//! dies, stops answering or breaks its pipes is killed and discarded so
//! the next evaluation starts a fresh one. The same happens when a caller
//! drops an evaluation halfway through writing its request line.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::config::KernelConfig;
use crate::core::error::{Result, WlwebError};
use crate::core::expr::Expr;
use crate::core::kernel::protocol;
use crate::core::kernel::{Evaluation, Evaluator};

/// Grace period for a kernel to exit after `Quit[]`
const QUIT_GRACE: Duration = Duration::from_secs(5);

/// Running kernel process and its pipes
struct KernelProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_seq: u64,
    /// Set while a request line is being written. Still set afterwards
    /// means the write was cancelled and the kernel holds a partial line.
    writing: bool,
}

impl KernelProcess {
    fn spawn(id: usize, config: &KernelConfig) -> Result<Self> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WlwebError::KernelStartFailed(format!("{}: {e}", config.path)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WlwebError::KernelStartFailed("kernel stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WlwebError::KernelStartFailed("kernel stdout unavailable".into()))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_stderr(id, stderr));
        }

        debug!(kernel = id, pid = ?child.id(), "Kernel process spawned");

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_seq: 1,
            writing: false,
        })
    }

    /// Send one request and wait for its reply
    async fn roundtrip(&mut self, id: usize, expr: &Expr) -> Result<Evaluation> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let request = protocol::encode_request(seq, expr);
        self.writing = true;
        self.stdin.write_all(request.as_bytes()).await?;
        self.stdin.flush().await?;
        self.writing = false;

        self.read_reply(id, seq).await
    }

    async fn read_reply(&mut self, id: usize, seq: u64) -> Result<Evaluation> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.stdout.read_until(b'\n', &mut buf).await? == 0 {
                let status = self.child.try_wait().ok().flatten();
                return Err(WlwebError::KernelTerminated(match status {
                    Some(status) => format!("kernel exited with {status}"),
                    None => "kernel closed its output".to_string(),
                }));
            }

            let line = String::from_utf8_lossy(&buf);
            match protocol::parse_reply(&line) {
                Some(reply) if reply.seq == seq => return reply.evaluation,
                Some(reply) => {
                    debug!(kernel = id, seq = reply.seq, expected = seq, "Discarding stale reply");
                }
                None => {
                    let output = line.trim_end();
                    if !output.is_empty() {
                        debug!(kernel = id, output = %output, "Kernel output");
                    }
                }
            }
        }
    }

    async fn kill(mut self, id: usize) {
        if let Err(e) = self.child.kill().await {
            debug!(kernel = id, error = %e, "Kernel already gone");
        }
    }

    /// Ask the kernel to quit, killing it if it does not comply in time
    async fn shutdown(mut self, id: usize) {
        let quit = async {
            self.stdin
                .write_all(protocol::quit_request().as_bytes())
                .await?;
            self.stdin.flush().await?;
            self.child.wait().await
        };

        match tokio::time::timeout(QUIT_GRACE, quit).await {
            Ok(Ok(status)) => info!(kernel = id, %status, "Kernel stopped"),
            Ok(Err(e)) => {
                debug!(kernel = id, error = %e, "Kernel quit failed, killing");
                self.kill(id).await;
            }
            Err(_) => {
                warn!(kernel = id, "Kernel ignored Quit[], killing");
                self.kill(id).await;
            }
        }
    }
}

async fn forward_stderr(id: usize, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        warn!(kernel = id, stderr = %line, "Kernel stderr");
    }
}

/// One kernel process, started on demand
pub struct KernelSession {
    id: usize,
    config: KernelConfig,
    process: Mutex<Option<KernelProcess>>,
    running: AtomicBool,
}

impl KernelSession {
    pub fn new(id: usize, config: KernelConfig) -> Self {
        Self {
            id,
            config,
            process: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Spawn a kernel and wait for it to answer `$Version`
    async fn launch(&self) -> Result<KernelProcess> {
        info!(kernel = self.id, path = %self.config.path, "Starting kernel");

        let mut process = KernelProcess::spawn(self.id, &self.config)?;
        let secs = self.config.startup_timeout_sec;
        let version_expr = Expr::symbol("$Version");
        let handshake = process.roundtrip(self.id, &version_expr);

        match tokio::time::timeout(Duration::from_secs(secs), handshake).await {
            Ok(Ok(version)) => {
                info!(kernel = self.id, version = %version.result, "Kernel ready");
                self.running.store(true, Ordering::SeqCst);
                Ok(process)
            }
            Ok(Err(e)) => {
                process.kill(self.id).await;
                Err(WlwebError::KernelStartFailed(e.to_string()))
            }
            Err(_) => {
                process.kill(self.id).await;
                Err(WlwebError::KernelStartFailed(format!(
                    "no answer within {secs}s"
                )))
            }
        }
    }
}

#[async_trait]
impl Evaluator for KernelSession {
    async fn start(&self) -> Result<()> {
        let mut guard = self.process.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        Ok(())
    }

    async fn evaluate(&self, expr: &Expr) -> Result<Evaluation> {
        let mut guard = self.process.lock().await;
        if guard.as_ref().is_some_and(|process| process.writing) {
            warn!(kernel = self.id, "Previous request was cut off mid-write, restarting kernel");
            self.running.store(false, Ordering::SeqCst);
            if let Some(process) = guard.take() {
                process.kill(self.id).await;
            }
        }
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let Some(process) = guard.as_mut() else {
            return Err(WlwebError::KernelTerminated("kernel unavailable".into()));
        };

        let secs = self.config.evaluation_timeout_sec;
        let outcome = tokio::time::timeout(
            Duration::from_secs(secs),
            process.roundtrip(self.id, expr),
        )
        .await
        .unwrap_or(Err(WlwebError::EvaluationTimeout(secs)));

        if let Err(e) = &outcome {
            if e.is_kernel_failure() {
                warn!(kernel = self.id, error = %e, "Discarding kernel");
                self.running.store(false, Ordering::SeqCst);
                if let Some(process) = guard.take() {
                    process.kill(self.id).await;
                }
            }
        }

        outcome
    }

    async fn stop(&self) -> Result<()> {
        let mut guard = self.process.lock().await;
        if let Some(process) = guard.take() {
            process.shutdown(self.id).await;
        }
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn started(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
