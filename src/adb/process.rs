// Production runner: shells out to the real adb executable
use super::error::RunnerError;
use super::types::{CommandRunner, RunnerCallback, RunnerOutput};
use std::process::Output;
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "adb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbProcess {
    program: String,
}

impl Default for AdbProcess {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl AdbProcess {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `<program> version` so a missing install is reported before any
    /// daemon command is attempted.
    pub async fn ensure_available(&self) -> Result<String, RunnerError> {
        let output = Command::new(&self.program)
            .arg("version")
            .output()
            .await;
        match Self::collect(&self.program, output)? {
            Some(version) => Ok(version.lines().next().unwrap_or_default().to_string()),
            None => Ok(String::new()),
        }
    }

    async fn output(program: String, args: Vec<String>) -> RunnerOutput {
        let output = Command::new(&program).args(&args).output().await;
        Self::collect(&program, output)
    }

    fn collect(program: &str, output: std::io::Result<Output>) -> RunnerOutput {
        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::NotFound {
                    program: program.to_string(),
                }
            } else {
                RunnerError::Spawn {
                    program: program.to_string(),
                    source: e,
                }
            }
        })?;
        if !output.status.success() {
            return Err(RunnerError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((!stdout.is_empty()).then_some(stdout))
    }
}

impl CommandRunner for AdbProcess {
    fn run(&self, args: Vec<String>, done: RunnerCallback) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return done(Err(RunnerError::NoRuntime)),
        };
        let program = self.program.clone();
        handle.spawn(async move {
            done(Self::output(program, args).await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn default_program_is_adb() {
        assert_eq!(AdbProcess::default().program(), "adb");
    }

    #[test]
    fn run_without_runtime_reports_error() {
        let (tx, mut rx) = oneshot::channel();
        AdbProcess::default().run(
            vec!["version".to_string()],
            Box::new(move |r: RunnerOutput| {
                let _ = tx.send(r);
            }),
        );
        let result = rx.try_recv().expect("callback should fire synchronously");
        assert!(matches!(result, Err(RunnerError::NoRuntime)));
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let runner = AdbProcess::new("adb-bridge-test-binary-that-does-not-exist");
        let (tx, rx) = oneshot::channel();
        runner.run(
            vec!["devices".to_string()],
            Box::new(move |r: RunnerOutput| {
                let _ = tx.send(r);
            }),
        );
        let result = rx.await.unwrap();
        match result {
            Err(RunnerError::NotFound { program }) => {
                assert_eq!(program, "adb-bridge-test-binary-that-does-not-exist")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ensure_available_reports_missing_binary() {
        let runner = AdbProcess::new("adb-bridge-test-binary-that-does-not-exist");
        let err = runner.ensure_available().await.unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));
    }
}
