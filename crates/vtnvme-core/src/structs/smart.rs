use zerocopy::byteorder::little_endian::{U128, U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// SMART / Health Information log page (LID 0x02)
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct SmartLog {
    /// Critical warning bits
    pub critical_warning: u8,
    /// Composite temperature in Kelvin
    pub temperature: U16,
    /// Available spare, percent
    pub avail_spare: u8,
    /// Available spare threshold, percent
    pub spare_thresh: u8,
    /// Percentage used
    pub percent_used: u8,
    /// Endurance group critical warning summary
    pub endurance_group_warning: u8,
    _rsvd7: [u8; 25],
    /// Data units read, thousands of 512-byte units
    pub data_units_read: U128,
    /// Data units written, thousands of 512-byte units
    pub data_units_written: U128,
    /// Host read commands
    pub host_reads: U128,
    /// Host write commands
    pub host_writes: U128,
    /// Controller busy time in minutes
    pub ctrl_busy_time: U128,
    /// Power cycles
    pub power_cycles: U128,
    /// Power-on hours
    pub power_on_hours: U128,
    /// Unsafe shutdowns
    pub unsafe_shutdowns: U128,
    /// Media and data integrity errors
    pub media_errors: U128,
    /// Error log entries
    pub num_err_log_entries: U128,
    /// Minutes above the warning composite temperature
    pub warning_temp_time: U32,
    /// Minutes above the critical composite temperature
    pub critical_comp_time: U32,
    /// Temperature sensors 1-8 in Kelvin, 0 when not implemented
    pub temp_sensor: [U16; 8],
    /// Thermal management temperature 1 transition count
    pub thm_temp1_trans_count: U32,
    /// Thermal management temperature 2 transition count
    pub thm_temp2_trans_count: U32,
    /// Seconds spent in thermal management temperature 1
    pub thm_temp1_total_time: U32,
    /// Seconds spent in thermal management temperature 2
    pub thm_temp2_total_time: U32,
    _rsvd232: [u8; 280],
}
