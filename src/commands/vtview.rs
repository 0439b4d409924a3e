//! Periodic SMART logger writing vtView log files
//!
//! A log file is plain text, one record per line. The first record of a
//! session is a `header;` line carrying a JSON description of the drive,
//! followed by one `log;` line per sample with `name;value;` pairs.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use vtnvme_core::admin::{self, FIRMWARE_LOG_LEN, SMART_LOG_LEN};
use vtnvme_core::structs::{self, FirmwareLog, IdController, IdNamespace, SmartLog, IDENTIFY_LEN};
use vtnvme_core::{AdminChannel, Error};

use super::CmdResult;
use crate::settings::VtviewSettings;

const HOUR_IN_SECONDS: f64 = 3600.0;
const DEFAULT_RUN_TIME_HOURS: f64 = 20.0;
const DEFAULT_FREQUENCY_HOURS: f64 = 10.0;
const DEFAULT_TEST_NAME: &str = "Put the name of your test here";

/// Resolved logger settings
#[derive(Debug, Clone, PartialEq)]
pub struct VtviewConfig {
    pub run_time_hours: f64,
    pub record_frequency_hours: f64,
    pub output_file: PathBuf,
    pub test_name: String,
}

impl VtviewConfig {
    /// Merge command line values over the settings file over the defaults
    pub fn resolve(
        run_time: Option<f64>,
        freq: Option<f64>,
        output_file: Option<PathBuf>,
        test_name: Option<String>,
        settings: &VtviewSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            run_time_hours: run_time
                .or(settings.run_time_hours)
                .unwrap_or(DEFAULT_RUN_TIME_HOURS),
            record_frequency_hours: freq
                .or(settings.record_frequency_hours)
                .unwrap_or(DEFAULT_FREQUENCY_HOURS),
            output_file: output_file
                .or_else(|| settings.output_file.clone())
                .unwrap_or_else(|| default_log_file_name(today)),
            test_name: test_name
                .or_else(|| settings.test_name.clone())
                .unwrap_or_else(|| DEFAULT_TEST_NAME.to_string()),
        }
    }
}

/// `./vtView-Smart-log-YYYY-MM-DD.txt`
pub fn default_log_file_name(today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("./vtView-Smart-log-{}.txt", today.format("%Y-%m-%d")))
}

/// Time source for the sampling loop
pub trait Clock {
    /// Seconds since the Unix epoch
    fn now(&self) -> i64;
    /// Block for `secs` seconds
    fn sleep(&mut self, secs: u64);
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sleep(&mut self, secs: u64) {
        std::thread::sleep(std::time::Duration::from_secs(secs));
    }
}

#[derive(Serialize)]
struct Header<'a> {
    session: Session<'a>,
    devices: [Device<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Session<'a> {
    test_name: &'a str,
    date_time: String,
}

#[derive(Serialize)]
struct Device<'a> {
    model: &'a str,
    port: &'a str,
    #[serde(rename = "SN")]
    sn: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    identify: String,
    #[serde(rename = "firmwareSlot")]
    firmware_slot: String,
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Replace the trailing padding spaces of a text field with NULs
fn zero_trailing_spaces(field: &mut [u8]) {
    for b in field.iter_mut().rev() {
        if *b != b' ' {
            break;
        }
        *b = 0;
    }
}

/// Local `YYYY-MM-DD HH:MM:SS` of an epoch timestamp
fn local_date_time(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// The `header;` record describing the drive under test
pub fn header_line(
    test_name: &str,
    date_time: String,
    port: &str,
    identify: &[u8; IDENTIFY_LEN],
    firmware: &[u8; FIRMWARE_LOG_LEN],
) -> Result<String, Box<dyn std::error::Error>> {
    let mut raw = *identify;
    zero_trailing_spaces(&mut raw[4..24]);
    zero_trailing_spaces(&mut raw[24..64]);
    let ctrl = structs::view::<IdController>(&raw).map_err(Error::from)?;

    let header = Header {
        session: Session {
            test_name,
            date_time,
        },
        devices: [Device {
            model: ctrl.model(),
            port,
            sn: ctrl.serial(),
            kind: "NVMe",
            identify: hex_upper(&raw),
            firmware_slot: hex_upper(firmware),
        }],
    };
    Ok(format!("header;{}\n", serde_json::to_string(&header)?))
}

/// One `log;` record
pub fn write_log_line<W: fmt::Write>(
    out: &mut W,
    timestamp: i64,
    port: &str,
    ctrl: &IdController,
    ns: &IdNamespace,
    smart: &SmartLog,
) -> fmt::Result {
    let fr_end = ctrl.fr.iter().position(|&b| b == 0).unwrap_or(ctrl.fr.len());
    let fr = String::from_utf8_lossy(&ctrl.fr[..fr_end]);
    let capacity = ns.capacity_bytes() as f64 / 1_000_000_000.0;

    write!(
        out,
        "log;{};{};{};{};{};",
        ctrl.serial(),
        timestamp,
        port,
        ctrl.model(),
        fr
    )?;
    write!(out, "Capacity;{:.6};", capacity)?;
    write!(out, "Critical_Warning;{};", smart.critical_warning)?;
    write!(
        out,
        "Temperature;{};",
        structs::kelvin_to_celsius(smart.temperature.get())
    )?;
    write!(out, "Available_Spare;{};", smart.avail_spare)?;
    write!(out, "Available_Spare_Threshold;{};", smart.spare_thresh)?;
    write!(out, "Percentage_Used;{};", smart.percent_used)?;

    for (name, value) in [
        ("Data_Units_Read", smart.data_units_read),
        ("Data_Units_Written", smart.data_units_written),
        ("Host_Read_Commands", smart.host_reads),
        ("Host_Write_Commands", smart.host_writes),
        ("Controller_Busy_Time", smart.ctrl_busy_time),
        ("Power_Cycles", smart.power_cycles),
        ("Power_On_Hours", smart.power_on_hours),
        ("Unsafe_Shutdowns", smart.unsafe_shutdowns),
        ("Media_Errors", smart.media_errors),
        ("Num_Err_Log_Entries", smart.num_err_log_entries),
    ] {
        write!(out, "{};{};", name, value.get())?;
    }

    write!(out, "Warning_Temperature_Time;{};", smart.warning_temp_time.get())?;
    write!(
        out,
        "Critical_Composite_Temperature_Time;{};",
        smart.critical_comp_time.get()
    )?;
    for (i, sensor) in smart.temp_sensor.iter().enumerate() {
        match sensor.get() {
            0 => {
                write!(out, "Temperature_Sensor_{};NC;", i)?;
            }
            k => {
                write!(out, "Temperature_Sensor_{};{};", i, structs::kelvin_to_celsius(k))?;
            }
        }
    }

    for (name, value) in [
        ("Thermal_Management_T1_Trans_Count", smart.thm_temp1_trans_count),
        ("Thermal_Management_T2_Trans_Count", smart.thm_temp2_trans_count),
        ("Thermal_Management_T1_Total_Time", smart.thm_temp1_total_time),
        ("Thermal_Management_T2_Total_Time", smart.thm_temp2_total_time),
    ] {
        write!(out, "{};{};", name, value.get())?;
    }
    out.write_str("NandWrites;0;\n")
}

fn append(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}

fn append_or_report(path: &Path, text: &str) -> CmdResult {
    append(path, text).map_err(|e| {
        println!("Cannot open {}", path.display());
        e.into()
    })
}

/// Print `message` and hand the error back when a command fails
fn report<T>(result: vtnvme_core::Result<T>, message: &str) -> vtnvme_core::Result<T> {
    result.inspect_err(|e| {
        log::debug!("{}: {}", message, e);
        println!("{}", message);
    })
}

fn write_header<C: AdminChannel + ?Sized>(
    channel: &mut C,
    port: &str,
    cfg: &VtviewConfig,
    timestamp: i64,
) -> CmdResult {
    println!("Log file: {}", cfg.output_file.display());

    let mut identify = [0u8; IDENTIFY_LEN];
    report(
        admin::identify_controller(channel, &mut identify),
        "Cannot read identify device",
    )?;
    let mut firmware = [0u8; FIRMWARE_LOG_LEN];
    report(
        admin::firmware_log(channel, &mut firmware),
        "Cannot read device firmware log",
    )?;
    if let Ok(fw) = structs::view::<FirmwareLog>(&firmware) {
        log::debug!("Active firmware slot {}", fw.active_slot());
    }

    let line = header_line(
        &cfg.test_name,
        local_date_time(timestamp),
        port,
        &identify,
        &firmware,
    )?;
    append_or_report(&cfg.output_file, &line)
}

fn add_entry<C: AdminChannel + ?Sized>(
    channel: &mut C,
    port: &str,
    cfg: &VtviewConfig,
    timestamp: i64,
) -> CmdResult {
    let nsid = report(channel.namespace_id(), "Cannot read namespace-id")?;

    let mut ns_raw = [0u8; IDENTIFY_LEN];
    report(
        admin::identify_namespace(channel, nsid, &mut ns_raw),
        "Cannot read namespace identify",
    )?;
    let mut ctrl_raw = [0u8; IDENTIFY_LEN];
    report(
        admin::identify_controller(channel, &mut ctrl_raw),
        "Cannot read device identify controller",
    )?;
    let mut smart_raw = [0u8; SMART_LOG_LEN];
    report(
        admin::smart_log(channel, &mut smart_raw),
        "Cannot read device SMART log",
    )?;

    let ns = structs::view::<IdNamespace>(&ns_raw).map_err(Error::from)?;
    let ctrl = structs::view::<IdController>(&ctrl_raw).map_err(Error::from)?;
    let smart = structs::view::<SmartLog>(&smart_raw).map_err(Error::from)?;
    let mut line = String::new();
    write_log_line(&mut line, timestamp, port, ctrl, ns, smart)?;
    append_or_report(&cfg.output_file, &line)
}

/// Write the header, then sample SMART data until the run time elapses
///
/// Returns the number of samples written.
pub fn run_logger<C, K>(
    channel: &mut C,
    port: &str,
    cfg: &VtviewConfig,
    clock: &mut K,
) -> Result<u32, Box<dyn std::error::Error>>
where
    C: AdminChannel + ?Sized,
    K: Clock,
{
    println!("Running...");
    println!("Collecting data for device {}", port);
    println!("Running for {:.6} hour(s)", cfg.run_time_hours);
    println!(
        "Logging SMART data for every {:.6} hour(s)",
        cfg.record_frequency_hours
    );

    write_header(channel, port, cfg, clock.now())?;

    let total = (cfg.run_time_hours * HOUR_IN_SECONDS) as i64;
    let mut freq = ((cfg.record_frequency_hours * HOUR_IN_SECONDS) as i64).max(1);
    let end = clock.now() + total;
    let mut samples = 0;

    loop {
        let now = clock.now();
        if now >= end {
            break;
        }
        if let Err(e) = add_entry(channel, port, cfg, now) {
            println!("Cannot update driver log");
            return Err(e);
        }
        samples += 1;
        log::debug!("Sample {} written", samples);

        freq = freq.min(end - now);
        clock.sleep(freq as u64);
    }
    Ok(samples)
}

/// `save-smart-to-vtview-log` against the wall clock
pub fn run_save_smart_to_vtview_log<C: AdminChannel + ?Sized>(
    channel: &mut C,
    port: &str,
    cfg: &VtviewConfig,
) -> CmdResult {
    let samples = run_logger(channel, port, cfg, &mut SystemClock)?;
    log::info!("Wrote {} samples to {}", samples, cfg.output_file.display());
    Ok(())
}
