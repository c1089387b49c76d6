// ADB module - client for the Android Debug Bridge daemon.
// Commands are issued through an injectable process runner (the adb binary by
// default) and their textual output is interpreted into typed results.

pub mod client;
pub mod error;
pub mod parse;
pub mod process;
pub mod types;


pub use client::{BridgeClient, BridgeOptions, DEFAULT_PORT, PORT_ENV};
pub use error::{BridgeError, BridgeResult, RunnerError};
pub use process::AdbProcess;
pub use types::{
    CommandRunner, Device, DeviceOs, DeviceState, LogSink, RebootTarget, RunnerCallback,
    RunnerOutput,
};
