use thiserror::Error;

/// A specialized `Result` type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure reported by a process runner while executing the adb binary.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(
        "'{program}' binary not found in PATH. Install Android Platform Tools (https://developer.android.com/tools/adb) or pass --adb=<path>."
    )]
    NotFound { program: String },

    #[error("Failed to invoke '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("adb exited with {}: {}", exit_label(.code), .stderr.trim())]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("No tokio runtime available to spawn adb")]
    NoRuntime,

    #[error("Process runner dropped its completion callback without reporting a result")]
    CallbackDropped,

    #[error("{0}")]
    Other(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}

/// The error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("no device connected: {source}")]
    NoDevice { source: RunnerError },

    #[error("device unauthorized, accept the USB debugging prompt on the device: {source}")]
    Unauthorized { source: RunnerError },

    #[error("invalid device id: {output:?}")]
    InvalidDeviceId { output: String },

    #[error("unable to determine device name from getprop or default.prop")]
    DeviceNameNotFound,
}

impl BridgeError {
    /// Wrap a runner failure, recognising the adb messages for a missing or
    /// unauthorized device.
    pub fn from_runner(source: RunnerError) -> Self {
        let stderr = match &source {
            RunnerError::ExitStatus { stderr, .. } => stderr.as_str(),
            RunnerError::Other(message) => message.as_str(),
            _ => return BridgeError::Runner(source),
        };
        if stderr.contains("no devices/emulators found") || stderr.contains("device not found") {
            BridgeError::NoDevice { source }
        } else if stderr.contains("unauthorized") {
            BridgeError::Unauthorized { source }
        } else {
            BridgeError::Runner(source)
        }
    }

    /// True when a device command failed because the file it read is absent.
    pub fn is_missing_file(&self) -> bool {
        match self {
            BridgeError::Runner(RunnerError::ExitStatus { stderr, .. }) => {
                stderr.contains("No such file or directory")
            }
            _ => false,
        }
    }

    /// True when the failure means nothing usable is attached to the daemon.
    pub fn is_no_device(&self) -> bool {
        matches!(
            self,
            BridgeError::NoDevice { .. } | BridgeError::Unauthorized { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit(stderr: &str) -> RunnerError {
        RunnerError::ExitStatus {
            code: Some(1),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn classifies_missing_device() {
        let err = BridgeError::from_runner(exit("adb: no devices/emulators found\n"));
        assert!(matches!(err, BridgeError::NoDevice { .. }));
        assert!(err.is_no_device());

        let err = BridgeError::from_runner(exit("error: device not found"));
        assert!(matches!(err, BridgeError::NoDevice { .. }));
    }

    #[test]
    fn classifies_unauthorized_device() {
        let err = BridgeError::from_runner(exit(
            "adb: device unauthorized.\nThis adb server's $ADB_VENDOR_KEYS is not set",
        ));
        assert!(matches!(err, BridgeError::Unauthorized { .. }));
    }

    #[test]
    fn other_failures_stay_runner_errors() {
        let err = BridgeError::from_runner(exit("error: closed"));
        assert!(matches!(err, BridgeError::Runner(_)));
        assert!(!err.is_no_device());

        let err = BridgeError::from_runner(RunnerError::CallbackDropped);
        assert!(matches!(err, BridgeError::Runner(RunnerError::CallbackDropped)));
    }

    #[test]
    fn missing_file_detection() {
        let err = BridgeError::from_runner(exit(
            "cat: /etc/system-image/channel.ini: No such file or directory\n",
        ));
        assert!(err.is_missing_file());
        assert!(!BridgeError::from_runner(exit("error: closed")).is_missing_file());
        assert!(!BridgeError::DeviceNameNotFound.is_missing_file());
    }

    #[test]
    fn invalid_device_id_message() {
        let err = BridgeError::InvalidDeviceId {
            output: "garbage".to_string(),
        };
        assert!(err.to_string().contains("invalid device id"));
    }

    #[test]
    fn exit_status_message_includes_stderr() {
        let msg = exit("  boom\n").to_string();
        assert_eq!(msg, "adb exited with status 1: boom");
        let msg = RunnerError::ExitStatus {
            code: None,
            stderr: String::new(),
        }
        .to_string();
        assert_eq!(msg, "adb exited with signal: ");
    }
}
