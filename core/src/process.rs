//! # Process Runner
//!
//! Synchronous execution of external commands (git), behind a trait so the
//! orchestrator can be driven by a mock in tests.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Interface for executing an external command.
///
/// Abstracted to allow mocking command execution in tests without requiring `git`.
pub trait CommandExecutor {
    /// Executes the command to completion and returns its output.
    fn execute(&self, program: &str, args: &[&str]) -> AppResult<Output>;
}

/// Standard executor using `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    /// Working directory for spawned commands. Inherited when `None`.
    pub current_dir: Option<PathBuf>,
}

impl ShellExecutor {
    /// Executor running commands inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: Some(dir.into()),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> AppResult<Output> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        Ok(command.output()?)
    }
}

/// Runs a command and converts a non-zero exit into `AppError::ExternalCommand`.
pub fn run_checked<E: CommandExecutor + ?Sized>(
    executor: &E,
    program: &str,
    args: &[&str],
) -> AppResult<Output> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(%command, "Running command");

    let output = executor.execute(program, args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let diagnostic = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(AppError::ExternalCommand {
            command: format!("{} ({})", command, output.status),
            diagnostic,
        });
    }

    Ok(output)
}

/// Thin git client over a `CommandExecutor`.
pub struct Git<'a, E: CommandExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> Git<'a, E> {
    /// Wraps an executor.
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// `git add <paths...>`
    pub fn stage(&self, paths: &[&Path]) -> AppResult<()> {
        let paths: Vec<String> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        let mut args = vec!["add"];
        args.extend(paths.iter().map(String::as_str));
        run_checked(self.executor, "git", &args)?;
        info!(files = paths.len(), "Staged files");
        Ok(())
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> AppResult<()> {
        run_checked(self.executor, "git", &["commit", "-m", message])?;
        info!("Committed changes");
        Ok(())
    }

    /// `git push <remote> <branch>`
    pub fn push(&self, remote: &str, branch: &str) -> AppResult<()> {
        run_checked(self.executor, "git", &["push", remote, branch])?;
        info!(remote, branch, "Pushed");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    /// Mock executor recording every invocation, failing on a chosen subcommand.
    pub(crate) struct MockExecutor {
        pub(crate) calls: RefCell<Vec<Vec<String>>>,
        pub(crate) fail_on: Option<&'static str>,
    }

    impl MockExecutor {
        pub(crate) fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(&self, program: &str, args: &[&str]) -> AppResult<Output> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().map(|s| s.to_string()));
            self.calls.borrow_mut().push(call);

            let fail = self.fail_on.is_some_and(|sub| args.first() == Some(&sub));
            Ok(Output {
                status: ExitStatus::from_raw(if fail { 1 << 8 } else { 0 }),
                stdout: Vec::new(),
                stderr: if fail { b"Mock Error\n".to_vec() } else { Vec::new() },
            })
        }
    }

    #[test]
    fn test_git_commands_are_argument_vectors() {
        let executor = MockExecutor::new(None);
        let git = Git::new(&executor);

        git.stage(&[Path::new("Code.gs"), Path::new(".github/workflows/ci.yml")])
            .unwrap();
        git.commit("fix: a\n\nbody with \"quotes\"").unwrap();
        git.push("origin", "main").unwrap();

        let calls = executor.calls.take();
        assert_eq!(calls[0], ["git", "add", "Code.gs", ".github/workflows/ci.yml"]);
        assert_eq!(calls[1], ["git", "commit", "-m", "fix: a\n\nbody with \"quotes\""]);
        assert_eq!(calls[2], ["git", "push", "origin", "main"]);
    }

    #[test]
    fn test_failure_carries_diagnostic() {
        let executor = MockExecutor::new(Some("push"));
        let err = Git::new(&executor).push("origin", "main").unwrap_err();

        match err {
            AppError::ExternalCommand {
                command,
                diagnostic,
            } => {
                assert!(command.starts_with("git push origin main"));
                assert_eq!(diagnostic, "Mock Error");
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_shell_executor_runs_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exec = ShellExecutor::in_dir(dir.path());
        // If `pwd` is unavailable the executor must still surface an IO error.
        match exec.execute("pwd", &[]) {
            Ok(output) => {
                assert!(output.status.success());
                let printed = String::from_utf8_lossy(&output.stdout);
                let expected = dir.path().canonicalize().unwrap();
                assert_eq!(Path::new(printed.trim()).canonicalize().unwrap(), expected);
            }
            Err(err) => assert!(matches!(err, AppError::Io(_))),
        }
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let exec = ShellExecutor::default();
        let err = run_checked(&exec, "definitely-not-a-real-program-xyz", &[]).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
