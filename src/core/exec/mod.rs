//! External command execution.
//!
//! Every gpg and git call goes through a [`Runner`]. Two modes coexist:
//!
//! - **dispatch**: queue a job and return its [`JobId`] immediately; the
//!   [`Completion`] arrives later on a [`Completions`] receiver.
//! - **blocking**: run a command and wait for its [`Output`].
//!
//! ## Adding a New Runner
//!
//! 1. Implement the `Runner` trait
//! 2. Deliver a `Completion` for every dispatched job
//! 3. Re-export from this module

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::warn;
use zeroize::Zeroizing;

use crate::core::types::JobId;
use crate::error::{ExecError, Result};

mod system;


pub use system::SystemRunner;

/// Command runner trait.
///
/// Abstracts process execution so the engine and mutators can be driven by
/// real processes or by a scripted stand-in.
pub trait Runner {
    /// Queue a command without waiting for it.
    ///
    /// # Returns
    ///
    /// The job id its [`Completion`] will carry.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::RunnerClosed` if the runner no longer accepts work.
    fn dispatch(&self, kind: JobKind, invocation: Invocation) -> Result<JobId>;

    /// Run a command and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the process cannot be spawned or awaited. A
    /// non-zero exit is not an error.
    fn run_blocking(&self, invocation: Invocation) -> Result<Output>;
}

/// Category label for a dispatched job.
///
/// Used by callers to tell completions apart; the runner does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    GitInit,
    GitPull,
    GitPush,
    GitAdd,
    GitCommit,
    GitRm,
    Show,
    Insert,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GitInit => "git init",
            Self::GitPull => "git pull",
            Self::GitPush => "git push",
            Self::GitAdd => "git add",
            Self::GitCommit => "git commit",
            Self::GitRm => "git rm",
            Self::Show => "show",
            Self::Insert => "insert",
        };
        f.write_str(name)
    }
}

/// A single external command: program, arguments, optional stdin and
/// capture flags.
#[derive(Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub input: Option<Zeroizing<Vec<u8>>>,
    pub current_dir: Option<PathBuf>,
    pub capture_stdout: bool,
    pub capture_stderr: bool,
}

impl Invocation {
    /// New invocation capturing both output streams.
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            input: None,
            current_dir: None,
            capture_stdout: true,
            capture_stderr: true,
        }
    }

    /// Feed `input` to the process on stdin, byte for byte.
    pub fn input(mut self, input: impl AsRef<[u8]>) -> Self {
        self.input = Some(Zeroizing::new(input.as_ref().to_vec()));
        self
    }

    /// Run the process inside `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Choose which output streams are collected.
    pub fn capture(mut self, stdout: bool, stderr: bool) -> Self {
        self.capture_stdout = stdout;
        self.capture_stderr = stderr;
        self
    }

    /// Program and arguments joined for log output.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("input", &self.input.as_ref().map(|_| "<redacted>"))
            .field("current_dir", &self.current_dir)
            .field("capture_stdout", &self.capture_stdout)
            .field("capture_stderr", &self.capture_stderr)
            .finish()
    }
}

/// Exit status and captured streams of a finished process.
///
/// Streams are kept as raw bytes: decrypted secrets pass through stdout and
/// must reach the next encryption unchanged, whatever their encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Process exit code, `-1` when terminated by a signal.
    pub exit_code: i32,
    pub stdout: Zeroizing<Vec<u8>>,
    pub stderr: Vec<u8>,
}

impl Output {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout decoded for display or parsing; invalid UTF-8 is replaced.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// stderr decoded for display or logging; invalid UTF-8 is replaced.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// stdout followed by stderr, as text.
    pub fn combined(&self) -> String {
        let mut text = self.stdout_text();
        text.push_str(&self.stderr_text());
        text
    }
}

/// Run a blocking command, turning execution errors into a failed [`Output`].
///
/// Callers that tolerate any outcome of an external command use this instead
/// of propagating; the error is logged and reported as exit code `-1`.
pub fn run_lenient(runner: &dyn Runner, invocation: Invocation) -> Output {
    let line = invocation.command_line();
    runner.run_blocking(invocation).unwrap_or_else(|e| {
        warn!(command = %line, error = %e, "command could not be run");
        Output {
            exit_code: -1,
            stdout: Zeroizing::default(),
            stderr: e.to_string().into_bytes(),
        }
    })
}

/// Completion notice for a dispatched job.
#[derive(Debug)]
pub struct Completion {
    pub id: JobId,
    pub kind: JobKind,
    pub result: std::result::Result<Output, ExecError>,
}

impl Completion {
    /// Whether the process ran and exited with status zero.
    pub fn succeeded(&self) -> bool {
        matches!(&self.result, Ok(output) if output.success())
    }
}

/// Receiving side of the completion channel.
///
/// Completions arrive in the order jobs finish; [`Completions::wait`] buffers
/// the ones it skips so none are lost.
pub struct Completions {
    rx: mpsc::UnboundedReceiver<Completion>,
    pending: VecDeque<Completion>,
}

impl Completions {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Completion>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
        }
    }

    /// Block until the completion for `id` arrives.
    ///
    /// Returns `None` if the runner shut down first. Must not be called from
    /// inside an async context.
    pub fn wait(&mut self, id: JobId) -> Option<Completion> {
        if let Some(pos) = self.pending.iter().position(|c| c.id == id) {
            return self.pending.remove(pos);
        }
        while let Some(completion) = self.rx.blocking_recv() {
            if completion.id == id {
                return Some(completion);
            }
            self.pending.push_back(completion);
        }
        None
    }

    /// Block until every job in `ids` has completed, in the order given.
    pub fn wait_all(&mut self, ids: &[JobId]) -> Vec<Completion> {
        ids.iter().filter_map(|id| self.wait(*id)).collect()
    }
}
