use crate::core::{EnvminError, EnvminResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of one external build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into an `ExternalBuild` error carrying the captured output
    pub fn into_result(self, description: &str) -> EnvminResult<BuildOutput> {
        if self.success() {
            return Ok(self);
        }

        let status = match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "was terminated by a signal".to_string(),
        };
        Err(EnvminError::ExternalBuild {
            message: format!("{} {}", description, status),
            exit_code: self.exit_code,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Builds an environment in place (e.g. `ant clean exejar`).
///
/// Blocks until the build finishes; there is no timeout.
pub trait BuildRunner {
    /// Run the build inside `working_dir` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns `ExternalBuild` when the build cannot be launched. A build that
    /// runs and fails is reported through `BuildOutput::exit_code`.
    fn run_build(&self, working_dir: &Path) -> EnvminResult<BuildOutput>;

    /// Human readable form of the command, used in messages
    fn describe(&self) -> String;
}

/// Runs a configured build command as a subprocess with `JAVA_HOME` set
pub struct CommandBuildRunner {
    command: Vec<String>,
    java_home: PathBuf,
}

impl CommandBuildRunner {
    pub fn new(command: Vec<String>, java_home: &Path) -> EnvminResult<Self> {
        if command.is_empty() {
            return Err(EnvminError::Config(
                "build command must name a program".to_string(),
            ));
        }

        Ok(Self {
            command,
            java_home: java_home.to_path_buf(),
        })
    }

    /// `PATH` with the JDK's `bin` directory in front
    fn search_path(&self) -> EnvminResult<OsString> {
        let mut entries = vec![self.java_home.join("bin")];
        if let Some(existing) = std::env::var_os("PATH") {
            entries.extend(std::env::split_paths(&existing));
        }

        std::env::join_paths(entries)
            .map_err(|e| EnvminError::Config(format!("Invalid PATH entry: {}", e)))
    }

    fn launch_error(&self, working_dir: &Path, reason: impl std::fmt::Display) -> EnvminError {
        EnvminError::ExternalBuild {
            message: format!(
                "Failed to execute '{}' in {}: {}",
                self.describe(),
                working_dir.display(),
                reason
            ),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

impl BuildRunner for CommandBuildRunner {
    fn run_build(&self, working_dir: &Path) -> EnvminResult<BuildOutput> {
        let search_path = self.search_path()?;
        let program = which::which_in(&self.command[0], Some(&search_path), working_dir)
            .map_err(|e| self.launch_error(working_dir, e))?;

        debug!(program = %program.display(), cwd = %working_dir.display(), "running build");

        let output = Command::new(&program)
            .args(&self.command[1..])
            .current_dir(working_dir)
            .env("JAVA_HOME", &self.java_home)
            .env("PATH", &search_path)
            .output()
            .map_err(|e| self.launch_error(working_dir, e))?;

        Ok(BuildOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn describe(&self) -> String {
        self.command.join(" ")
    }
}
