//! Tokio process executor: runs kubectl / helm invocations
//!
//! Implements [`ProcessExecutorPort`] by spawning the program directly (no
//! shell) with `tokio::process`.
//!
//! - stdout and stderr are drained concurrently by spawned tasks into bounded
//!   buffers; bytes beyond `max_output_bytes` are discarded but the pipe keeps
//!   draining so the child never blocks on a full pipe
//! - each child leads its own process group; on timeout or cancellation the
//!   whole group is killed and whatever was captured so far is kept
//! - `kill_on_drop` plus `PR_SET_PDEATHSIG` (Linux) make sure no child
//!   outlives a cancelled call or a dead server

use async_trait::async_trait;
use kubegate_application::ports::process_executor::{ExecutorError, ProcessExecutorPort};
use kubegate_domain::tool::{
    command::BuiltInvocation,
    entities::Program,
    value_objects::{ExecutionOutcome, ExecutionStatus},
};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Read chunk size for child pipes.
const CHUNK_SIZE: usize = 64 * 1024;

/// Default capture limit per stream (1 MiB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// How long to wait for pipe readers once the child has exited or been killed.
const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Where the executor finds its programs and which cluster they target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Binary for [`Program::Kubectl`] (path or name on `PATH`)
    pub kubectl: String,
    /// Binary for [`Program::Helm`]
    pub helm: String,
    /// Exported as `KUBECONFIG` to every child when set
    pub kubeconfig: Option<PathBuf>,
    /// Passed as `--context` (kubectl) / `--kube-context` (helm) when set
    pub context: Option<String>,
    /// Capture limit per stream
    pub max_output_bytes: usize,
    /// Wait for pipe readers after exit or kill
    pub drain_grace: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            helm: "helm".to_string(),
            kubeconfig: None,
            context: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }
}

impl ExecutorSettings {
    pub fn binary(&self, program: Program) -> &str {
        match program {
            Program::Kubectl => &self.kubectl,
            Program::Helm => &self.helm,
        }
    }

    /// Arguments prepended to every invocation of `program`.
    pub fn global_args(&self, program: Program) -> Vec<String> {
        match &self.context {
            Some(context) => {
                let flag = match program {
                    Program::Kubectl => "--context",
                    Program::Helm => "--kube-context",
                };
                vec![flag.to_string(), context.clone()]
            }
            None => Vec::new(),
        }
    }
}

/// Captured bytes of one pipe.
#[derive(Debug, Default)]
struct Capture {
    buf: Vec<u8>,
    truncated: bool,
}

type SharedCapture = Arc<Mutex<Capture>>;

/// Adapter running invocations as real child processes.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessExecutor {
    settings: ExecutorSettings,
}

impl TokioProcessExecutor {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self { settings }
    }

    fn command(&self, invocation: &BuiltInvocation) -> Result<Command, ExecutorError> {
        let program = invocation.program;
        let mut cmd = Command::new(self.settings.binary(program));
        cmd.args(self.settings.global_args(program));
        cmd.args(&invocation.args);

        if let Some(kubeconfig) = &self.settings.kubeconfig {
            cmd.env("KUBECONFIG", kubeconfig);
        }

        cmd.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        match &invocation.stdout_file {
            Some(path) => {
                let file = std::fs::File::create(path).map_err(|source| ExecutorError::OutputFile {
                    path: path.clone(),
                    source,
                })?;
                cmd.stdout(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::piped());
            }
        }
        cmd.stderr(Stdio::piped());

        // Kill child on drop so a cancelled call leaves no orphan
        cmd.kill_on_drop(true);

        // Own process group, so grandchildren can be killed with the child
        #[cfg(unix)]
        cmd.process_group(0);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        Ok(cmd)
    }

    /// Collect both pipes, waiting at most one shared grace period.
    async fn finish_captures(&self, readers: [Option<Reader>; 2]) -> [(String, bool); 2] {
        let [mut stdout, mut stderr] = readers;
        let wait_all = async {
            tokio::join!(wait_reader(stdout.as_mut()), wait_reader(stderr.as_mut()));
        };
        // A grandchild may still hold a pipe open; don't wait on it forever
        if tokio::time::timeout(self.settings.drain_grace, wait_all).await.is_err() {
            debug!("Pipe still open after grace period, abandoning reader");
        }
        [self.take_capture(stdout), self.take_capture(stderr)]
    }

    fn take_capture(&self, reader: Option<Reader>) -> (String, bool) {
        let Some((handle, capture)) = reader else {
            return (String::new(), false);
        };
        handle.abort();

        let capture = std::mem::take(&mut *capture.lock().unwrap_or_else(PoisonError::into_inner));
        let mut text = String::from_utf8_lossy(&capture.buf).into_owned();
        if capture.truncated {
            text.push_str(&format!(
                "\n[output truncated at {} bytes]",
                self.settings.max_output_bytes
            ));
        }
        (text, capture.truncated)
    }
}

type Reader = (JoinHandle<()>, SharedCapture);

/// Wait until the reader task has hit EOF.
async fn wait_reader(reader: Option<&mut Reader>) {
    if let Some((handle, _)) = reader {
        let _ = handle.await;
    }
}

/// Kills the child's whole process group when dropped, unless disarmed.
///
/// Armed while the child may still be running, so a timed-out or cancelled
/// call takes its grandchildren down too. Disarmed once the child has been
/// reaped, when the group id may already belong to someone else.
struct GroupKill {
    pgid: Option<i32>,
}

impl GroupKill {
    fn new(child: &Child) -> Self {
        Self {
            pgid: child.id().and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupKill {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: i32) {
    // SAFETY: killpg takes plain integers and touches no memory of ours
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(pgid, "killpg failed: {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: i32) {}

/// Drain `reader` to EOF, keeping at most `limit` bytes.
async fn drain<R>(mut reader: R, sink: SharedCapture, limit: usize)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut capture = sink.lock().unwrap_or_else(PoisonError::into_inner);
                let room = limit.saturating_sub(capture.buf.len());
                if n > room {
                    capture.buf.extend_from_slice(&chunk[..room]);
                    capture.truncated = true;
                } else {
                    capture.buf.extend_from_slice(&chunk[..n]);
                }
            }
        }
    }
}

fn spawn_reader<R>(reader: Option<R>, limit: usize) -> Option<Reader>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    reader.map(|reader| {
        let capture = SharedCapture::default();
        let handle = tokio::spawn(drain(reader, capture.clone(), limit));
        (handle, capture)
    })
}

#[async_trait]
impl ProcessExecutorPort for TokioProcessExecutor {
    async fn execute(
        &self,
        invocation: &BuiltInvocation,
        timeout: Duration,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        let start = Instant::now();
        let program = self.settings.binary(invocation.program).to_string();
        debug!(command = %invocation, ?timeout, "Spawning process");

        let mut child = self
            .command(invocation)?
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Write stdin from a task so a chatty child can't deadlock against us
        if let (Some(payload), Some(mut stdin)) = (invocation.stdin.clone(), child.stdin.take()) {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                    debug!("Failed to write stdin: {}", e);
                }
                // stdin is dropped here, closing the pipe
            });
        }

        let limit = self.settings.max_output_bytes;
        let stdout_reader = spawn_reader(child.stdout.take(), limit);
        let stderr_reader = spawn_reader(child.stderr.take(), limit);

        // Declared after `child` so it fires first if this future is dropped
        let mut group = GroupKill::new(&child);

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => {
                group.disarm();
                Some(status)
            }
            Ok(Err(source)) => {
                group.kill();
                let _ = child.kill().await;
                return Err(ExecutorError::Io { program, source });
            }
            Err(_) => {
                warn!(command = %invocation, "Process timed out after {:?}, killing", timeout);
                group.kill();
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed-out process: {}", e);
                }
                None
            }
        };

        let [(stdout, stdout_truncated), (stderr, stderr_truncated)] =
            self.finish_captures([stdout_reader, stderr_reader]).await;

        let status = match status {
            Some(s) if s.success() => ExecutionStatus::Success,
            Some(s) => ExecutionStatus::Failure { exit_code: s.code() },
            None => ExecutionStatus::Timeout,
        };

        let duration_ms = start.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;
        debug!(?status, duration_ms, "Process finished");

        Ok(ExecutionOutcome {
            status,
            stdout,
            stderr,
            duration_ms,
            truncated: stdout_truncated || stderr_truncated,
        })
    }
}
