use crate::adb::RebootTarget;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartServer,
    KillServer,
    Serialno,
    DeviceName,
    Os,
    Access,
    State,
    Wait,
    Devices,
    Reboot(RebootTarget),
    Getprop(String),
    Shell(Vec<String>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub port: Option<u16>,
    pub adb_path: Option<String>,
    pub debug_mode: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    Help,
    Version,
}

impl Args {
    /// Parse the process arguments, printing help or version as a side
    /// effect. `Ok(None)` means there is nothing left to run; `Err` means the
    /// usage was invalid.
    pub fn parse() -> Result<Option<Self>, String> {
        Self::parse_from(env::args().skip(1)).and_then(Self::handle)
    }

    fn handle(parsed: Parsed) -> Result<Option<Self>, String> {
        match parsed {
            Parsed::Run(args) => Ok(Some(args)),
            Parsed::Help => {
                print_help();
                Ok(None)
            }
            Parsed::Version => {
                println!("{}", version_line());
                Ok(None)
            }
        }
    }

    pub fn parse_from<I>(args: I) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut port: Option<u16> = None;
        let mut adb_path: Option<String> = None;
        let mut debug_mode = false;
        let mut words: Vec<String> = Vec::new();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if !words.is_empty() {
                // Everything after the subcommand belongs to it (shell args may start with '-')
                words.push(arg);
                words.extend(iter.by_ref());
                break;
            }
            if arg == "--help" || arg == "-h" {
                return Ok(Parsed::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Parsed::Version);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--port=") {
                port = Some(
                    val.parse::<u16>()
                        .map_err(|_| format!("Invalid port value: {val}"))?,
                );
            } else if let Some(val) = arg.strip_prefix("--adb=") {
                if val.is_empty() {
                    return Err("--adb requires a path".to_string());
                }
                adb_path = Some(val.to_string());
            } else if arg.starts_with('-') {
                return Err(format!("Unknown argument: {arg}"));
            } else {
                words.push(arg);
            }
        }

        let (name, rest) = words
            .split_first()
            .ok_or_else(|| "Missing command".to_string())?;
        let command = match (name.as_str(), rest) {
            ("start-server", []) => Command::StartServer,
            ("kill-server", []) => Command::KillServer,
            ("serialno", []) => Command::Serialno,
            ("device-name", []) => Command::DeviceName,
            ("os", []) => Command::Os,
            ("access", []) => Command::Access,
            ("state", []) => Command::State,
            ("wait", []) => Command::Wait,
            ("devices", []) => Command::Devices,
            ("reboot", []) => Command::Reboot(RebootTarget::System),
            ("reboot", [target]) => Command::Reboot(match target.as_str() {
                "bootloader" => RebootTarget::Bootloader,
                "recovery" => RebootTarget::Recovery,
                "system" => RebootTarget::System,
                other => return Err(format!("Unknown reboot target: {other}")),
            }),
            ("getprop", [prop]) => Command::Getprop(prop.clone()),
            ("shell", args) if !args.is_empty() => Command::Shell(args.to_vec()),
            ("shell" | "getprop", _) => return Err(format!("'{name}' needs arguments")),
            (other, []) => return Err(format!("Unknown command: {other}")),
            (other, _) => return Err(format!("Unexpected arguments for '{other}'")),
        };

        Ok(Parsed::Run(Args {
            command,
            port,
            adb_path,
            debug_mode,
        }))
    }
}

pub fn version_line() -> String {
    format!(
        "adb-bridge v{} (c) {}",
        env!("BRIDGE_VERSION_DISPLAY"),
        env!("BRIDGE_BUILD_YEAR")
    )
}

fn print_help() {
    println!("🤖 adb-bridge - Android Debug Bridge control layer");
    println!();
    println!("USAGE:");
    println!("    adb-bridge [FLAGS] <COMMAND> [ARGS...]");
    println!();
    println!("COMMANDS:");
    println!("    start-server            Kill running adb servers and start a new one");
    println!("    kill-server             Kill running adb servers");
    println!("    serialno                Print the serial number of the attached device");
    println!("    device-name             Print the device codename (ro.product.device)");
    println!("    os                      Print 'ubuntutouch' or 'android'");
    println!("    access                  Check for working shell access (exit 1 if none)");
    println!("    state                   Print the device state (device, recovery, ...)");
    println!("    wait                    Block until a device is available");
    println!("    devices                 List devices known to the daemon");
    println!("    reboot [bootloader|recovery]");
    println!("                            Reboot the device");
    println!("    getprop NAME            Print a system property");
    println!("    shell ARGS...           Run a command on the device");
    println!();
    println!("FLAGS:");
    println!("    --port=N                adb server port (default 5037, or $ANDROID_ADB_SERVER_PORT)");
    println!("    --adb=PATH              adb executable to use (default: adb from PATH)");
    println!("    --debug                 Log every adb invocation");
    println!("    --help, -h              Show this help message");
    println!("    --version, -v           Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    adb-bridge start-server");
    println!("    adb-bridge --port=5038 os");
    println!("    adb-bridge shell ls -l /sdcard");
}
