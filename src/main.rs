//! vtnvme - Virtium NVMe vendor diagnostics
//!
//! Extracts event logs and crash dumps, reads and writes the vendor
//! identity strings, and decodes vendor telemetry and SMART data of
//! Virtium industrial SSDs.
//!
//! # Architecture
//!
//! Every command is written against the `AdminChannel` trait from
//! `vtnvme-core`:
//! - **linux** - `/dev/nvmeX` controller nodes through the admin passthrough ioctl
//! - **dummy** - An in-memory drive emulator for testing

mod cli;
mod commands;
mod settings;

use clap::Parser;
use cli::{Cli, Commands};
use commands::vtview::VtviewConfig;
use settings::{Settings, VtviewSettings};
use vtnvme_device::open_device;

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(commands::exit_code(e.as_ref()));
    }
}

fn run(command: Commands) -> commands::CmdResult {
    match command {
        Commands::GetEventLog { device, output } => {
            let mut handle = open_device(&device.device)?;
            commands::dump::run_get_event_log(&mut handle, &output)
        }
        Commands::GetCrashInfo { device, do_erase } => {
            let mut handle = open_device(&device.device)?;
            commands::dump::run_get_crash_info(&mut handle, do_erase)
        }
        Commands::GetCrashDump {
            device,
            img_dump,
            output,
        } => {
            let mut handle = open_device(&device.device)?;
            commands::dump::run_get_crash_dump(&mut handle, img_dump, &output)
        }
        Commands::GetSn { device } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_get_sn(&mut handle)
        }
        Commands::GetMn { device } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_get_mn(&mut handle)
        }
        Commands::SetInfo {
            device,
            serial_num,
            model_num,
        } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_set_info(
                &mut handle,
                serial_num.as_deref(),
                model_num.as_deref(),
            )
        }
        Commands::GetOp { device } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_get_op(&mut handle)
        }
        Commands::SetOp {
            device,
            over_provision,
        } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_set_op(&mut handle, &over_provision)
        }
        Commands::GetMaverickFwVersion { device } => {
            let mut handle = open_device(&device.device)?;
            commands::params::run_get_fw_version(&mut handle)
        }
        Commands::ParseMaverickTelemetry { device } => {
            let mut handle = open_device(&device.device)?;
            commands::logs::run_parse_telemetry(&mut handle)
        }
        Commands::ParseSeries61VsInfo { device } => {
            let mut handle = open_device(&device.device)?;
            commands::logs::run_parse_series61(&mut handle)
        }
        Commands::ShowIdentify { device } => {
            let mut handle = open_device(&device.device)?;
            commands::identify::run_show_identify(&mut handle)
        }
        Commands::SaveSmartToVtviewLog {
            device,
            run_time,
            freq,
            output_file,
            test_name,
            settings,
        } => {
            let file_settings = match settings {
                Some(path) => Settings::from_toml_file(&path)?.vtview,
                None => VtviewSettings::default(),
            };
            let cfg = VtviewConfig::resolve(
                run_time,
                freq,
                output_file,
                test_name,
                &file_settings,
                chrono::Local::now().date_naive(),
            );
            log::debug!("Logger settings: {:?}", cfg);

            let mut handle = open_device(&device.device)?;
            let port = handle.port().to_string();
            commands::vtview::run_save_smart_to_vtview_log(&mut handle, &port, &cfg)
        }
        Commands::ListDevices => {
            commands::list_devices();
            Ok(())
        }
    }
}
