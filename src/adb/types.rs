// Core bridge types and the process-runner seam
use super::error::RunnerError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Captured stdout of one adb invocation; `None` when the command printed nothing.
pub type RunnerOutput = Result<Option<String>, RunnerError>;

/// Completion callback handed to a [`CommandRunner`]. Must be called exactly once.
pub type RunnerCallback = Box<dyn FnOnce(RunnerOutput) + Send + 'static>;

/// Executes the adb binary with the given arguments and reports the outcome
/// through `done`. Implementations may complete synchronously or from a
/// spawned task.
pub trait CommandRunner: Send + Sync {
    fn run(&self, args: Vec<String>, done: RunnerCallback);
}

impl<F> CommandRunner for F
where
    F: Fn(Vec<String>, RunnerCallback) + Send + Sync,
{
    fn run(&self, args: Vec<String>, done: RunnerCallback) {
        self(args, done)
    }
}

/// Destination for the human readable progress messages of lifecycle operations.
#[derive(Clone, Default)]
pub enum LogSink {
    /// The process-wide `log` facade at info level.
    #[default]
    Standard,
    Custom(Arc<dyn Fn(&str) + Send + Sync>),
}

impl LogSink {
    pub fn custom(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        LogSink::Custom(Arc::new(f))
    }

    pub fn log(&self, message: &str) {
        match self {
            LogSink::Standard => log::info!("{message}"),
            LogSink::Custom(f) => f(message),
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, LogSink::Standard)
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Standard => f.write_str("LogSink::Standard"),
            LogSink::Custom(_) => f.write_str("LogSink::Custom(..)"),
        }
    }
}

/// Operating system family detected on the attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOs {
    UbuntuTouch,
    Android,
}

impl DeviceOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceOs::UbuntuTouch => "ubuntutouch",
            DeviceOs::Android => "android",
        }
    }
}

impl fmt::Display for DeviceOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection state as reported by `adb get-state` and `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Device,
    Recovery,
    Bootloader,
    Sideload,
    Offline,
    Unauthorized,
    Other(String),
}

impl DeviceState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "device" => DeviceState::Device,
            "recovery" => DeviceState::Recovery,
            "bootloader" => DeviceState::Bootloader,
            "sideload" => DeviceState::Sideload,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            other => DeviceState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Device => f.write_str("device"),
            DeviceState::Recovery => f.write_str("recovery"),
            DeviceState::Bootloader => f.write_str("bootloader"),
            DeviceState::Sideload => f.write_str("sideload"),
            DeviceState::Offline => f.write_str("offline"),
            DeviceState::Unauthorized => f.write_str("unauthorized"),
            DeviceState::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebootTarget {
    #[default]
    System,
    Bootloader,
    Recovery,
}

impl RebootTarget {
    /// Extra argument appended to `reboot`, if any.
    pub fn arg(&self) -> Option<&'static str> {
        match self {
            RebootTarget::System => None,
            RebootTarget::Bootloader => Some("bootloader"),
            RebootTarget::Recovery => Some("recovery"),
        }
    }
}

impl fmt::Display for RebootTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arg().unwrap_or("system"))
    }
}

/// One line of `adb devices -l`.
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct Device {
    pub serial: String,
    pub state: DeviceState,
    pub transport_id: Option<String>,
}
