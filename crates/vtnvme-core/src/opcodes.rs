//! Admin command opcodes and fixed vendor envelope fields
//!
//! Bits 1:0 of an NVMe opcode encode the data direction: `01b` moves data
//! from host to controller, `10b` from controller to host.

// ============================================================================
// Standard admin commands
// ============================================================================

/// Get Log Page
pub const GET_LOG_PAGE: u8 = 0x02;
/// Identify
pub const IDENTIFY: u8 = 0x06;

// ============================================================================
// Virtium vendor-specific commands
// ============================================================================

/// Arm a vendor sub-operation (host-to-controller control buffer)
pub const VENDOR_ARM: u8 = 0xFD;
/// Execute the armed sub-operation, data from controller to host
pub const VENDOR_EXECUTE: u8 = 0xFE;
/// Execute the armed sub-operation, data from host to controller
pub const VENDOR_EXECUTE_WRITE: u8 = 0xFD;

/// cdw12 of every arm command
pub const ARM_CDW12: u32 = 0x00FC;
/// cdw10 of every arm command
pub const ARM_CDW10: u32 = 128;
/// cdw12 of every execute command
pub const EXECUTE_CDW12: u32 = 0x00FD;

// ============================================================================
// Identify CNS values and log identifiers
// ============================================================================

/// Identify Namespace data structure
pub const CNS_NAMESPACE: u32 = 0x00;
/// Identify Controller data structure
pub const CNS_CONTROLLER: u32 = 0x01;

/// SMART / Health Information
pub const LID_SMART: u8 = 0x02;
/// Firmware Slot Information
pub const LID_FIRMWARE_SLOT: u8 = 0x03;
/// Telemetry Host-Initiated
pub const LID_TELEMETRY_HOST: u8 = 0x07;
/// Series 61 vendor-specific counters
pub const LID_SERIES61_VENDOR: u8 = 0xC6;

/// Namespace ID addressing every namespace
pub const NSID_ALL: u32 = 0xFFFF_FFFF;
