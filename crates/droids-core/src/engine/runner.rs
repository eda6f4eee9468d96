use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' exited with {}", program.display(), describe_exit(*code))]
    ExitStatus { program: PathBuf, code: Option<i32> },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// Capability to launch external programs (the structure viewer).
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` in `working_dir` and waits for it to finish.
    fn run(&self, program: &Path, args: &[String], working_dir: &Path) -> Result<(), RunnerError>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[String], working_dir: &Path) -> Result<(), RunnerError> {
        debug!(program = %program.display(), ?args, "Launching external command.");
        let status = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
            .map_err(|source| RunnerError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::ExitStatus {
                program: program.to_path_buf(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = SystemCommandRunner
            .run(
                Path::new("/nonexistent/droids-viewer"),
                &[],
                Path::new("."),
            )
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[test]
    fn exit_status_error_names_the_code() {
        let err = RunnerError::ExitStatus {
            program: PathBuf::from("ChimeraX"),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "'ChimeraX' exited with status 2");
    }
}
