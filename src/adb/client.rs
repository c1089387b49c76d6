use super::error::{BridgeError, BridgeResult, RunnerError};
use super::parse;
use super::process::AdbProcess;
use super::types::{
    CommandRunner, Device, DeviceOs, DeviceState, LogSink, RebootTarget, RunnerCallback,
    RunnerOutput,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

pub const DEFAULT_PORT: u16 = 5037;

/// Environment variable adb itself reads for the server port.
pub const PORT_ENV: &str = "ANDROID_ADB_SERVER_PORT";

const CHANNEL_INI: &str = "/etc/system-image/channel.ini";

/// Construction options for [`BridgeClient`]. Unset fields fall back to the
/// production runner, the standard log sink and port 5037.
#[derive(Clone, Default)]
pub struct BridgeOptions {
    pub exec: Option<Arc<dyn CommandRunner>>,
    pub log: Option<LogSink>,
    pub port: Option<u16>,
}

impl BridgeOptions {
    /// Options seeded from the environment (`ANDROID_ADB_SERVER_PORT`).
    pub fn from_env() -> Self {
        Self {
            port: Self::port_from(std::env::var(PORT_ENV).ok()),
            ..Self::default()
        }
    }

    fn port_from(raw: Option<String>) -> Option<u16> {
        let raw = raw?;
        match raw.trim().parse() {
            Ok(port) => Some(port),
            Err(e) => {
                log::warn!("ignoring {PORT_ENV}={raw:?}: {e}");
                None
            }
        }
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.exec = Some(Arc::new(runner));
        self
    }

    pub fn with_log(mut self, sink: LogSink) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn with_log_fn(self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.with_log(LogSink::custom(f))
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// Client for a single adb daemon. Holds only immutable configuration, so
/// every operation is an independent request/response cycle.
#[derive(Clone)]
pub struct BridgeClient {
    exec: Arc<dyn CommandRunner>,
    log: LogSink,
    port: u16,
}

impl Default for BridgeClient {
    fn default() -> Self {
        Self::new(BridgeOptions::default())
    }
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient")
            .field("log", &self.log)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl BridgeClient {
    pub fn new(options: BridgeOptions) -> Self {
        Self {
            exec: options
                .exec
                .unwrap_or_else(|| Arc::new(AdbProcess::default())),
            log: options.log.unwrap_or_default(),
            port: options.port.unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn log_sink(&self) -> &LogSink {
        &self.log
    }

    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.exec
    }

    /// Hand `args` to the runner untouched.
    pub fn exec(&self, args: Vec<String>, done: RunnerCallback) {
        self.exec.run(args, done)
    }

    /// Run an adb subcommand against the configured daemon port and await its
    /// stdout. Every daemon-directed command goes through here.
    pub async fn exec_port<S: AsRef<str>>(&self, extra: &[S]) -> BridgeResult<Option<String>> {
        let mut args = Vec::with_capacity(extra.len() + 2);
        args.push("-P".to_string());
        args.push(self.port.to_string());
        args.extend(extra.iter().map(|a| a.as_ref().to_string()));
        log::debug!("adb {}", args.join(" "));

        let (tx, rx) = oneshot::channel();
        self.exec(
            args,
            Box::new(move |result: RunnerOutput| {
                let _ = tx.send(result);
            }),
        );
        match rx.await {
            Ok(Ok(stdout)) => Ok(stdout),
            Ok(Err(e)) => Err(BridgeError::from_runner(e)),
            Err(_) => Err(BridgeError::Runner(RunnerError::CallbackDropped)),
        }
    }

    /// Kill any running daemon, then start a fresh one on our port.
    pub async fn start_server(&self) -> BridgeResult<()> {
        self.kill_server().await?;
        self.log
            .log(&format!("starting adb server on port {}", self.port));
        self.exec_port(&["start-server"]).await?;
        Ok(())
    }

    pub async fn kill_server(&self) -> BridgeResult<()> {
        self.log.log("killing all running adb servers");
        self.exec_port(&["kill-server"]).await?;
        Ok(())
    }

    /// Run a command on the device. Output is returned as captured.
    pub async fn shell<S: AsRef<str>>(&self, args: &[S]) -> BridgeResult<Option<String>> {
        let mut command = Vec::with_capacity(args.len() + 1);
        command.push("shell");
        command.extend(args.iter().map(|a| a.as_ref()));
        self.exec_port(&command).await
    }

    pub async fn get_serialno(&self) -> BridgeResult<String> {
        let output = self.exec_port(&["get-serialno"]).await?;
        parse::parse_serialno(output.as_deref()).ok_or_else(|| BridgeError::InvalidDeviceId {
            output: output.unwrap_or_default(),
        })
    }

    pub async fn get_prop(&self, name: &str) -> BridgeResult<Option<String>> {
        let output = self.shell(&["getprop", name]).await?;
        Ok(parse::parse_prop_value(output.as_deref()))
    }

    /// Device codename from `ro.product.device`, falling back to
    /// `default.prop` where getprop is unavailable.
    pub async fn get_device_name(&self) -> BridgeResult<String> {
        let output = self.shell(&["getprop", "ro.product.device"]).await?;
        if !parse::getprop_unavailable(output.as_deref()) {
            return parse::parse_prop_value(output.as_deref()).ok_or(BridgeError::DeviceNameNotFound);
        }
        log::debug!("getprop unavailable, reading default.prop");
        let props = self.shell(&["cat", "default.prop"]).await?;
        parse::parse_default_prop_device(props.as_deref()).ok_or(BridgeError::DeviceNameNotFound)
    }

    /// A missing channel.ini means Android, not an error. adb forwards the
    /// exit status of `cat`, so the missing file may also arrive as a failure.
    pub async fn get_os(&self) -> BridgeResult<DeviceOs> {
        let output = match self.shell(&["cat", CHANNEL_INI]).await {
            Ok(output) => output,
            Err(e) if e.is_missing_file() => None,
            Err(e) => return Err(e),
        };
        Ok(parse::parse_os(output.as_deref()))
    }

    /// `false` when no device is reachable or it has not authorized us.
    pub async fn has_access(&self) -> BridgeResult<bool> {
        match self.shell(&["echo", "."]).await {
            Ok(output) => Ok(parse::parse_access(output.as_deref())),
            Err(e) if e.is_no_device() => {
                log::debug!("no shell access: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_state(&self) -> BridgeResult<DeviceState> {
        let output = self.exec_port(&["get-state"]).await?;
        Ok(parse::parse_state(output.as_deref()))
    }

    /// Resolves once the daemon sees a device. No timeout is applied here.
    pub async fn wait_for_device(&self) -> BridgeResult<()> {
        self.exec_port(&["wait-for-device"]).await?;
        Ok(())
    }

    pub async fn reboot(&self, target: RebootTarget) -> BridgeResult<()> {
        self.log.log(&format!("rebooting to {target}"));
        match target.arg() {
            Some(arg) => self.exec_port(&["reboot", arg]).await?,
            None => self.exec_port(&["reboot"]).await?,
        };
        Ok(())
    }

    pub async fn devices(&self) -> BridgeResult<Vec<Device>> {
        let output = self.exec_port(&["devices", "-l"]).await?;
        Ok(parse::parse_devices(output.as_deref().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_from_environment_value() {
        assert_eq!(BridgeOptions::port_from(Some("5040".to_string())), Some(5040));
        assert_eq!(BridgeOptions::port_from(Some(" 5041\n".to_string())), Some(5041));
        assert_eq!(BridgeOptions::port_from(Some("not-a-port".to_string())), None);
        assert_eq!(BridgeOptions::port_from(Some("70000".to_string())), None);
        assert_eq!(BridgeOptions::port_from(None), None);
    }
}
