//! Process runner backed by a tokio worker.
//!
//! All jobs, dispatched or blocking, go through one FIFO queue drained by a
//! single task, so commands never overlap and run in submission order.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Completion, Completions, Invocation, JobKind, Output, Runner};
use crate::core::types::JobId;
use crate::error::{ExecError, Result};

enum Request {
    Dispatch {
        id: JobId,
        kind: JobKind,
        invocation: Invocation,
    },
    Blocking {
        invocation: Invocation,
        reply: oneshot::Sender<std::result::Result<Output, ExecError>>,
    },
}

/// Runs external programs as OS processes.
pub struct SystemRunner {
    queue: mpsc::UnboundedSender<Request>,
    next_id: AtomicU64,
    // Dropping the runtime stops the worker; keep it last.
    _runtime: Runtime,
}

impl SystemRunner {
    /// Start the worker and return the runner with its completion receiver.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Runtime` if the tokio runtime cannot be built.
    pub fn start() -> Result<(Self, Completions)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("passkeep-exec")
            .enable_all()
            .build()
            .map_err(ExecError::Runtime)?;

        let (queue, requests) = mpsc::unbounded_channel();
        let (done, completions) = mpsc::unbounded_channel();
        runtime.spawn(worker(requests, done));

        Ok((
            Self {
                queue,
                next_id: AtomicU64::new(1),
                _runtime: runtime,
            },
            Completions::new(completions),
        ))
    }
}

impl Runner for SystemRunner {
    fn dispatch(&self, kind: JobKind, invocation: Invocation) -> Result<JobId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, %kind, command = %invocation.command_line(), "dispatching job");
        self.queue
            .send(Request::Dispatch {
                id,
                kind,
                invocation,
            })
            .map_err(|_| ExecError::RunnerClosed)?;
        Ok(id)
    }

    fn run_blocking(&self, invocation: Invocation) -> Result<Output> {
        trace!(command = %invocation.command_line(), "running blocking");
        let (reply, answer) = oneshot::channel();
        self.queue
            .send(Request::Blocking { invocation, reply })
            .map_err(|_| ExecError::RunnerClosed)?;
        let output = answer.blocking_recv().map_err(|_| ExecError::RunnerClosed)??;
        Ok(output)
    }
}

async fn worker(
    mut requests: mpsc::UnboundedReceiver<Request>,
    done: mpsc::UnboundedSender<Completion>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            Request::Dispatch {
                id,
                kind,
                invocation,
            } => {
                let result = execute(&invocation).await;
                if let Ok(output) = &result {
                    debug!(id, %kind, exit_code = output.exit_code, "job finished");
                }
                // The receiver may be gone; the job still ran.
                let _ = done.send(Completion { id, kind, result });
            }
            Request::Blocking { invocation, reply } => {
                let _ = reply.send(execute(&invocation).await);
            }
        }
    }
}

async fn execute(invocation: &Invocation) -> std::result::Result<Output, ExecError> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(if invocation.capture_stdout {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stderr(if invocation.capture_stderr {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    if let Some(dir) = &invocation.current_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: invocation.program.display().to_string(),
        source,
    })?;

    if let Some(input) = &invocation.input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(ExecError::Stdin)?;
        }
    }

    let output = child.wait_with_output().await.map_err(ExecError::Wait)?;

    Ok(Output {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: Zeroizing::new(output.stdout),
        stderr: output.stderr,
    })
}
