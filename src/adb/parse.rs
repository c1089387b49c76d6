// Interpretation of raw adb output
use super::types::{Device, DeviceOs, DeviceState};

const DEVICE_PROP: &str = "ro.product.device";

/// Serial numbers are a single alphanumeric token. adb prints `unknown` when
/// the daemon has no device to ask. Network and emulator serials such as
/// `192.168.1.5:5555` or `emulator-5554` are rejected, even though
/// `parse_devices` reports them.
pub fn parse_serialno(output: Option<&str>) -> Option<String> {
    let token = output?.trim_end();
    let valid = !token.is_empty()
        && token != "unknown"
        && token.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| token.to_string())
}

/// Trimmed getprop value, `None` when the property is unset.
pub fn parse_prop_value(output: Option<&str>) -> Option<String> {
    let value = output?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `getprop` output that can't be trusted as the device codename: empty, or
/// the shell complaining the binary is missing (recovery images).
pub fn getprop_unavailable(output: Option<&str>) -> bool {
    match output {
        None => true,
        Some(out) => out.trim().is_empty() || out.contains("getprop: not found"),
    }
}

/// Find `ro.product.device=<name>` in a `default.prop` listing.
pub fn parse_default_prop_device(output: Option<&str>) -> Option<String> {
    output?.lines().find_map(|line| {
        let value = line.trim().strip_prefix(DEVICE_PROP)?.strip_prefix('=')?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// channel.ini only exists on system-image based Ubuntu Touch installs.
pub fn parse_os(channel_ini: Option<&str>) -> DeviceOs {
    match channel_ini {
        Some(contents) if !contents.trim().is_empty() => DeviceOs::UbuntuTouch,
        _ => DeviceOs::Android,
    }
}

/// `echo .` comes back verbatim only when the shell is usable.
pub fn parse_access(echo: Option<&str>) -> bool {
    echo.is_some_and(|out| out.trim_end_matches(['\r', '\n']) == ".")
}

pub fn parse_state(output: Option<&str>) -> DeviceState {
    DeviceState::parse(output.unwrap_or_default())
}

pub fn parse_devices(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip_while(|line| !line.starts_with("List of devices"))
        .skip(1)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?.to_string();
            let state = DeviceState::parse(parts.next()?);
            let transport_id = parts
                .find_map(|part| part.strip_prefix("transport_id:"))
                .map(str::to_string);
            Some(Device {
                serial,
                state,
                transport_id,
            })
        })
        .collect()
}
