// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::error::Error;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, info, warn};

use super::JjCommand;

/// Runs `jj`. The UI only talks to this trait so tests can substitute a recorder.
pub trait CommandRunner {
    /// Runs to completion and returns stdout.
    fn run(&self, command: &JjCommand) -> Result<Vec<u8>, RunError>;

    /// Starts the command and returns its stdout as a stream.
    fn stream(&self, command: &JjCommand) -> Result<Box<dyn Read + Send>, RunError>;
}

#[derive(Debug)]
pub enum RunError {
    Spawn {
        command: String,
        source: io::Error,
    },
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { command, source } => write!(f, "failed to start `{command}`: {source}"),
            Self::Failed {
                command,
                code,
                stderr,
            } => {
                let reason = stderr.lines().next().unwrap_or("").trim();
                match code {
                    Some(code) => write!(f, "`{command}` exited with {code}: {reason}"),
                    None => write!(f, "`{command}` was terminated: {reason}"),
                }
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    repo_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            repo_dir: repo_dir.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn command(&self, command: &JjCommand) -> Command {
        let mut process = Command::new(&self.program);
        process
            .arg("--no-pager")
            .args(command.args())
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null());
        process
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &JjCommand) -> Result<Vec<u8>, RunError> {
        info!(%command, "running");
        let output = self
            .command(command)
            .output()
            .map_err(|source| RunError::Spawn {
                command: command.to_string(),
                source,
            })?;
        if !output.status.success() {
            let err = RunError::Failed {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            warn!(%err, "command failed");
            return Err(err);
        }
        Ok(output.stdout)
    }

    fn stream(&self, command: &JjCommand) -> Result<Box<dyn Read + Send>, RunError> {
        debug!(%command, "streaming");
        let spawn_err = |source| RunError::Spawn {
            command: command.to_string(),
            source,
        };
        let mut child = self
            .command(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_err)?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child stdout was not captured",
            )));
        };
        Ok(Box::new(ChildStream { child, stdout }))
    }
}

/// Stdout of a running child. Dropping it kills the child, so a closed log stream never leaves a
/// `jj log` running in the background.
struct ChildStream {
    child: Child,
    stdout: ChildStdout,
}

impl Read for ChildStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl Drop for ChildStream {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}
