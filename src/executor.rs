use crate::error::{ConfindError, Result};
use log::debug;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// What happened when an external command was run to completion.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Capability to run one external command synchronously.
///
/// The locator only ever hands over a discrete argument vector, never a
/// shell string. Implementations must guarantee that a command exceeding
/// the timeout is killed and reaped before returning.
pub trait ProcessExecutor: Send + Sync {
    fn execute(&self, argv: &[String], timeout: Duration) -> Result<ExecOutcome>;
}

impl<E: ProcessExecutor + ?Sized> ProcessExecutor for std::sync::Arc<E> {
    fn execute(&self, argv: &[String], timeout: Duration) -> Result<ExecOutcome> {
        (**self).execute(argv, timeout)
    }
}

/// Executor backed by `std::process`. Stateless, so one instance can
/// serve any number of concurrent callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }

    fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<(ExitStatus, bool)> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok((status, false));
            }
            if Instant::now() >= deadline {
                // Kill and reap so no process outlives the call.
                let _ = child.kill();
                let status = child.wait()?;
                return Ok((status, true));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, argv: &[String], timeout: Duration) -> Result<ExecOutcome> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ConfindError::Other("empty argument vector".to_string()))?;

        debug!("Executing {program} with args {args:?} (timeout {timeout:?})");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes on side threads so a chatty child can never
        // fill a pipe buffer and deadlock against the wait loop.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_reader = thread::spawn(move || read_all(stdout_pipe));
        let stderr_reader = thread::spawn(move || read_all(stderr_pipe));

        let (status, timed_out) = Self::wait_with_deadline(&mut child, timeout)?;

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        Ok(ExecOutcome {
            success: status.success() && !timed_out,
            exit_code: status.code(),
            stdout,
            stderr,
            timed_out,
        })
    }
}

fn read_all(pipe: Option<impl Read>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buf);
    }
    buf
}
