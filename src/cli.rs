//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Generate dynamic help text for the device argument
fn device_help() -> String {
    format!(
        "Device node (/dev/nvme0) or name[:key=value,...] [available: {}]",
        vtnvme_device::device_names_short()
    )
}

/// Parse a non-negative number of hours
fn parse_hours(s: &str) -> Result<f64, String> {
    let hours: f64 = s.parse().map_err(|e| format!("Invalid number: {}", e))?;
    if !hours.is_finite() || hours < 0.0 {
        return Err(format!("Hours must be a non-negative number, got {}", s));
    }
    Ok(hours)
}

#[derive(Parser)]
#[command(name = "vtnvme")]
#[command(author, version, about = "Virtium NVMe vendor diagnostics", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// The device argument shared by every command
#[derive(Args, Debug, Clone)]
pub struct DeviceArg {
    #[arg(help = device_help())]
    pub device: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the drive's event log
    GetEventLog {
        #[command(flatten)]
        device: DeviceArg,

        /// Output file
        #[arg(long, default_value = "eventlog.dat")]
        output: PathBuf,
    },

    /// Show crash dump information, optionally erasing every image
    GetCrashInfo {
        #[command(flatten)]
        device: DeviceArg,

        /// Erase the crash dump images after reading the information
        #[arg(short = 'e', long)]
        do_erase: bool,
    },

    /// Extract one crash dump image
    GetCrashDump {
        #[command(flatten)]
        device: DeviceArg,

        /// Crash dump image to extract
        #[arg(short, long = "img-dump", default_value_t = 1)]
        img_dump: u8,

        /// Output file
        #[arg(long, default_value = "crashdump.dat")]
        output: PathBuf,
    },

    /// Show the vendor serial number
    GetSn {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Show the vendor model number
    GetMn {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Set the serial number and/or model number
    SetInfo {
        #[command(flatten)]
        device: DeviceArg,

        /// New serial number
        #[arg(short, long)]
        serial_num: Option<String>,

        /// New model number
        #[arg(short = 'n', long)]
        model_num: Option<String>,
    },

    /// Show the over-provisioning percentage
    GetOp {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Set the over-provisioning percentage
    SetOp {
        #[command(flatten)]
        device: DeviceArg,

        /// New over-provisioning value
        #[arg(short = 'o', long)]
        over_provision: String,
    },

    /// Show the custom firmware version string of Series 32 drives
    GetMaverickFwVersion {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Parse the host telemetry data block of Series 32 drives
    ParseMaverickTelemetry {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Parse the vendor log page 0xC6 of Series 61 drives
    ParseSeries61VsInfo {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Show the identify controller data in detail
    ShowIdentify {
        #[command(flatten)]
        device: DeviceArg,
    },

    /// Periodically append SMART data to a vtView log file
    ///
    /// Temperature characterization:
    ///   vtnvme save-smart-to-vtview-log /dev/nvme0 --run-time 100 --freq 0.25 --test-name burn-in
    ///
    /// Endurance testing:
    ///   vtnvme save-smart-to-vtview-log /dev/nvme0 --run-time 100 --freq 1 --test-name endurance
    #[command(verbatim_doc_comment)]
    SaveSmartToVtviewLog {
        #[command(flatten)]
        device: DeviceArg,

        /// Hours to log data [default: 20]
        #[arg(short, long, value_parser = parse_hours)]
        run_time: Option<f64>,

        /// Hours between samples (0.25 = 15 minutes) [default: 10]
        #[arg(short, long, value_parser = parse_hours)]
        freq: Option<f64>,

        /// Log file [default: ./vtView-Smart-log-YYYY-MM-DD.txt]
        #[arg(short, long)]
        output_file: Option<PathBuf>,

        /// Name of the test, stored in the log header
        #[arg(short = 'n', long)]
        test_name: Option<String>,

        /// TOML settings file with a [vtview] table
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// List device backends
    ListDevices,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_crash_dump_defaults() {
        let cli = Cli::try_parse_from(["vtnvme", "get-crash-dump", "/dev/nvme0"]).unwrap();
        match cli.command {
            Commands::GetCrashDump {
                device,
                img_dump,
                output,
            } => {
                assert_eq!(device.device, "/dev/nvme0");
                assert_eq!(img_dump, 1);
                assert_eq!(output, PathBuf::from("crashdump.dat"));
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "vtnvme", "-vv", "set-info", "dummy", "-s", "SN1", "-n", "Model",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::SetInfo {
                serial_num,
                model_num,
                ..
            } => {
                assert_eq!(serial_num.as_deref(), Some("SN1"));
                assert_eq!(model_num.as_deref(), Some("Model"));
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_negative_hours_rejected() {
        let parsed = Cli::try_parse_from([
            "vtnvme",
            "save-smart-to-vtview-log",
            "dummy",
            "--run-time",
            "-1",
        ]);
        assert!(parsed.is_err());
        assert_eq!(parse_hours("0.25"), Ok(0.25));
    }
}
