use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Captured result of one finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub status: String,
}

/// Runs a version-control binary with argument lists inside one working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    dir: PathBuf,
}

impl CommandRunner {
    pub fn new<P: AsRef<Path>>(program: &str, dir: P) -> Self {
        Self {
            program: program.to_string(),
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn git<P: AsRef<Path>>(dir: P) -> Self {
        Self::new("git", dir)
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend_from_slice(args);
        parts.join(" ")
    }

    /// Executes the command and captures both streams without judging the exit status.
    pub fn capture(&self, args: &[&str]) -> Result<CommandOutput> {
        let command = self.describe(args);
        debug!(event = "git.command_started", command = %command, dir = %self.dir.display());

        let output = Command::new(&self.program)
            .current_dir(&self.dir)
            .args(args)
            .output()
            .map_err(|source| ReportError::Spawn {
                command: command.clone(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            status: output.status.to_string(),
        })
    }

    /// Executes the command and returns stdout, or `CommandFailed` carrying stderr.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.capture(args)?;
        if output.success {
            debug!(
                event = "git.command_completed",
                command = %self.describe(args),
                bytes = output.stdout.len()
            );
            Ok(output.stdout)
        } else {
            let command = self.describe(args);
            warn!(
                event = "git.command_failed",
                command = %command,
                status = %output.status,
                stderr = %output.stderr.trim()
            );
            Err(ReportError::CommandFailed {
                command,
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = CommandRunner::new("gmetrics-no-such-binary", ".");
        match runner.run(&["--version"]) {
            Err(ReportError::Spawn { command, .. }) => {
                assert_eq!(command, "gmetrics-no-such-binary --version");
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[test]
    fn failing_git_command_carries_stderr() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        match CommandRunner::git(dir.path()).run(&["rev-parse", "HEAD"]) {
            Err(ReportError::CommandFailed { stderr, .. }) => assert!(!stderr.is_empty()),
            other => panic!("expected command failure, got {other:?}"),
        }
    }
}
