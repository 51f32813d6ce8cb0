//! Process invocation for the SDK executable
//!
//! An [`Invocation`] describes one run of the tool: program, working directory,
//! a verbatim argument string and whether the OS shell interprets the command.
//! Running it blocks for at most the given timeout; a child still alive at that
//! point is killed and reaped.

use crate::constants::POLL_INTERVAL;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};


/// Start configuration for one run of the SDK executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub working_dir: PathBuf,
    pub arguments: String,
    pub use_shell: bool,
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The process exited before the timeout. `code` is `None` when it was
    /// terminated by a signal.
    Exited { code: Option<i32> },
    /// The timeout elapsed; the process was killed
    TimedOut,
    /// The process could not be started
    StartFailed { message: String },
    /// Waiting on the process failed; the process was killed
    WaitFailed { message: String },
}

impl InvocationOutcome {
    /// True only for a zero exit code within the timeout
    pub fn success(&self) -> bool {
        matches!(self, InvocationOutcome::Exited { code: Some(0) })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvocationOutcome::Exited { code } => *code,
            _ => None,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, InvocationOutcome::TimedOut)
    }

    pub fn start_error(&self) -> Option<&str> {
        match self {
            InvocationOutcome::StartFailed { message } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationOutcome::Exited { code: Some(code) } => {
                write!(f, "exited with code {}", code)
            }
            InvocationOutcome::Exited { code: None } => write!(f, "terminated by signal"),
            InvocationOutcome::TimedOut => write!(f, "timed out"),
            InvocationOutcome::StartFailed { message } => {
                write!(f, "failed to start: {}", message)
            }
            InvocationOutcome::WaitFailed { message } => write!(f, "failed to wait: {}", message),
        }
    }
}

impl Invocation {
    pub fn new(
        program: impl Into<PathBuf>,
        working_dir: impl AsRef<Path>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
            arguments: arguments.into(),
            use_shell: false,
        }
    }

    pub fn with_shell(mut self, use_shell: bool) -> Self {
        self.use_shell = use_shell;
        self
    }

    /// Program and arguments as a single line, the way a shell would see them
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy();
        if self.arguments.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, self.arguments)
        }
    }

    /// Build the `Command` that runs this invocation
    pub fn to_command(&self) -> Result<Command> {
        let mut cmd = if self.use_shell {
            shell_command(&self.program, &self.arguments)?
        } else {
            let args = shlex::split(&self.arguments)
                .with_context(|| format!("Failed to parse arguments: {}", self.arguments))?;
            let mut cmd = Command::new(&self.program);
            cmd.args(args);
            cmd
        };
        cmd.current_dir(&self.working_dir);
        Ok(cmd)
    }

    /// Run to completion or until `timeout` elapses
    pub fn execute(&self, timeout: Duration) -> InvocationOutcome {
        let mut cmd = match self.to_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Could not prepare {}: {:#}", self.command_line(), e);
                return InvocationOutcome::StartFailed {
                    message: format!("{:#}", e),
                };
            }
        };

        debug!("Running command: {:?}", cmd);
        info!(
            "Running {} in {}",
            self.command_line(),
            self.working_dir.display()
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {}: {}", self.program.display(), e);
                return InvocationOutcome::StartFailed {
                    message: e.to_string(),
                };
            }
        };

        let outcome = wait_with_timeout(&mut child, timeout);
        debug!("{} {}", self.program.display(), outcome);
        outcome
    }
}

#[cfg(not(windows))]
fn shell_command(program: &Path, arguments: &str) -> Result<Command> {
    let program = program.to_string_lossy();
    let quoted = shlex::try_quote(&program)
        .map_err(|e| anyhow::anyhow!("Cannot quote program {}: {}", program, e))?;

    // exec so that killing the shell on timeout stops the tool itself
    let mut script = format!("exec {}", quoted);
    if !arguments.is_empty() {
        script.push(' ');
        script.push_str(arguments);
    }

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    Ok(cmd)
}

#[cfg(windows)]
fn shell_command(program: &Path, arguments: &str) -> Result<Command> {
    use std::os::windows::process::CommandExt;

    let mut line = format!("\"{}\"", program.display());
    if !arguments.is_empty() {
        line.push(' ');
        line.push_str(arguments);
    }

    // cmd.exe does not understand the \" escapes of Command::arg. /S strips
    // exactly one pair of outer quotes and runs the rest verbatim.
    let mut cmd = Command::new("cmd");
    cmd.raw_arg("/S /C").raw_arg(format!("\"{}\"", line));
    Ok(cmd)
}

/// Join separate arguments into one argument string that survives both
/// shell and direct execution on this platform
#[cfg(not(windows))]
pub fn join_arguments(args: &[String]) -> Result<String> {
    shlex::try_join(args.iter().map(String::as_str)).context("Failed to quote arguments")
}

/// Join separate arguments into one argument string that survives both
/// shell and direct execution on this platform
#[cfg(windows)]
pub fn join_arguments(args: &[String]) -> Result<String> {
    let mut quoted = Vec::with_capacity(args.len());
    for arg in args {
        if arg.contains('"') {
            anyhow::bail!("Argument contains a double quote: {}", arg);
        }
        // Quoting keeps backslashes in paths intact when the string is split
        if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\\') {
            quoted.push(format!("\"{}\"", arg));
        } else {
            quoted.push(arg.clone());
        }
    }
    Ok(quoted.join(" "))
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> InvocationOutcome {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return InvocationOutcome::Exited {
                    code: status.code(),
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to wait on child process {}: {}", child.id(), e);
                terminate(child);
                return InvocationOutcome::WaitFailed {
                    message: e.to_string(),
                };
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            warn!(
                "Process {} still running after {:?}, killing it",
                child.id(),
                timeout
            );
            terminate(child);
            return InvocationOutcome::TimedOut;
        }

        std::thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}

fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Kill of process {} failed: {}", child.id(), e);
    }
    // Reap so the child does not linger as a zombie
    let _ = child.wait();
}
