pub mod adb;
pub mod args;

pub use adb::{BridgeClient, BridgeError, BridgeOptions, BridgeResult};
