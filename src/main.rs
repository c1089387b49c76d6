use adb_bridge::adb::{AdbProcess, BridgeClient, BridgeOptions, BridgeResult};
use adb_bridge::args::{Args, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            eprintln!("Run 'adb-bridge --help' for usage.");
            return ExitCode::from(2);
        }
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let runner = args
            .adb_path
            .as_deref()
            .map(AdbProcess::new)
            .unwrap_or_default();
        if let Err(e) = runner.ensure_available().await {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }

        let mut options = BridgeOptions::from_env().with_runner(runner);
        if let Some(port) = args.port {
            options = options.with_port(port);
        }
        let client = BridgeClient::new(options);

        match run(&client, args.command).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("❌ {e}");
                ExitCode::FAILURE
            }
        }
    })
}

async fn run(client: &BridgeClient, command: Command) -> BridgeResult<ExitCode> {
    match command {
        Command::StartServer => client.start_server().await?,
        Command::KillServer => client.kill_server().await?,
        Command::Serialno => println!("{}", client.get_serialno().await?),
        Command::DeviceName => println!("{}", client.get_device_name().await?),
        Command::Os => println!("{}", client.get_os().await?),
        Command::Access => {
            let access = client.has_access().await?;
            println!("{access}");
            if !access {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::State => println!("{}", client.get_state().await?),
        Command::Wait => client.wait_for_device().await?,
        Command::Devices => {
            for device in client.devices().await? {
                match device.transport_id {
                    Some(tid) => println!("{}\t{}\ttransport_id:{tid}", device.serial, device.state),
                    None => println!("{}\t{}", device.serial, device.state),
                }
            }
        }
        Command::Reboot(target) => client.reboot(target).await?,
        Command::Getprop(name) => {
            if let Some(value) = client.get_prop(&name).await? {
                println!("{value}");
            }
        }
        Command::Shell(args) => {
            if let Some(out) = client.shell(&args).await? {
                print!("{out}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
