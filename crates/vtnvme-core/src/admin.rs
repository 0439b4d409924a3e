//! Standard NVMe admin commands
//!
//! Identify and Get Log Page, each a single round trip into a caller
//! buffer. Decode the result with [`crate::structs::view`].

use crate::channel::AdminChannel;
use crate::command::AdminCommand;
use crate::error::Result;
use crate::opcodes;
use crate::structs::IDENTIFY_LEN;

/// SMART / Health Information log length
pub const SMART_LOG_LEN: usize = 512;
/// Firmware Slot Information log length
pub const FIRMWARE_LOG_LEN: usize = 512;
/// Host telemetry log length read by `parse-maverick-telemetry`
pub const TELEMETRY_LOG_LEN: usize = 1024;
/// Series 61 vendor log length
pub const SERIES61_LOG_LEN: usize = 4096;

/// Identify Controller (CNS 0x01)
pub fn identify_controller<C: AdminChannel + ?Sized>(
    channel: &mut C,
    buf: &mut [u8; IDENTIFY_LEN],
) -> Result<()> {
    let mut cmd = AdminCommand::identify(opcodes::CNS_CONTROLLER, 0, buf);
    channel.submit(&mut cmd)?;
    Ok(())
}

/// Identify Namespace (CNS 0x00)
pub fn identify_namespace<C: AdminChannel + ?Sized>(
    channel: &mut C,
    nsid: u32,
    buf: &mut [u8; IDENTIFY_LEN],
) -> Result<()> {
    let mut cmd = AdminCommand::identify(opcodes::CNS_NAMESPACE, nsid, buf);
    channel.submit(&mut cmd)?;
    Ok(())
}

/// Get Log Page filling the whole of `buf`
///
/// `buf.len()` must be a multiple of 4.
pub fn get_log_page<C: AdminChannel + ?Sized>(
    channel: &mut C,
    nsid: u32,
    lid: u8,
    lsp: u8,
    rae: bool,
    buf: &mut [u8],
) -> Result<()> {
    log::debug!("get log page {:#04x} ({} bytes)", lid, buf.len());
    let mut cmd = AdminCommand::get_log_page(nsid, lid, lsp, rae, buf);
    channel.submit(&mut cmd)?;
    Ok(())
}

/// SMART / Health Information for the whole controller
pub fn smart_log<C: AdminChannel + ?Sized>(
    channel: &mut C,
    buf: &mut [u8; SMART_LOG_LEN],
) -> Result<()> {
    get_log_page(channel, opcodes::NSID_ALL, opcodes::LID_SMART, 0, false, buf)
}

/// Firmware Slot Information
pub fn firmware_log<C: AdminChannel + ?Sized>(
    channel: &mut C,
    buf: &mut [u8; FIRMWARE_LOG_LEN],
) -> Result<()> {
    get_log_page(
        channel,
        opcodes::NSID_ALL,
        opcodes::LID_FIRMWARE_SLOT,
        0,
        false,
        buf,
    )
}

/// Host-initiated telemetry, header plus the first data block
pub fn telemetry_host<C: AdminChannel + ?Sized>(
    channel: &mut C,
    buf: &mut [u8; TELEMETRY_LOG_LEN],
) -> Result<()> {
    get_log_page(
        channel,
        opcodes::NSID_ALL,
        opcodes::LID_TELEMETRY_HOST,
        1,
        false,
        buf,
    )
}

/// Series 61 vendor counters (log 0xC6)
pub fn series61_vendor_log<C: AdminChannel + ?Sized>(
    channel: &mut C,
    buf: &mut [u8; SERIES61_LOG_LEN],
) -> Result<()> {
    get_log_page(
        channel,
        opcodes::NSID_ALL,
        opcodes::LID_SERIES61_VENDOR,
        1,
        false,
        buf,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockChannel;
    use crate::structs::{view, IdController, SmartLog};

    #[test]
    fn test_identify_controller() {
        let mut ch = MockChannel::new();
        let mut reply = [0u8; 64];
        reply[4..12].copy_from_slice(b"SN000042");
        ch.respond_with(opcodes::IDENTIFY, &reply);

        let mut buf = [0u8; IDENTIFY_LEN];
        identify_controller(&mut ch, &mut buf).unwrap();
        let ctrl = view::<IdController>(&buf).unwrap();
        assert_eq!(ctrl.serial(), "SN000042");

        let sent = &ch.calls[0];
        assert_eq!(sent.opcode, 0x06);
        assert_eq!(sent.cdw10, 1);
        assert_eq!(sent.data_len, 4096);
    }

    #[test]
    fn test_identify_namespace_targets_nsid() {
        let mut ch = MockChannel::new();
        let mut buf = [0u8; IDENTIFY_LEN];
        identify_namespace(&mut ch, 3, &mut buf).unwrap();
        assert_eq!(ch.calls[0].cdw10, 0);
        assert_eq!(ch.calls[0].nsid, 3);
    }

    #[test]
    fn test_smart_log() {
        let mut ch = MockChannel::new();
        ch.respond_with(opcodes::GET_LOG_PAGE, &[0x01, 0x3E, 0x01]);
        let mut buf = [0u8; SMART_LOG_LEN];
        smart_log(&mut ch, &mut buf).unwrap();
        let log = view::<SmartLog>(&buf).unwrap();
        assert_eq!(log.critical_warning, 1);
        assert_eq!(log.temperature.get(), 0x013E);

        let sent = &ch.calls[0];
        assert_eq!(sent.nsid, 0xFFFF_FFFF);
        assert_eq!(sent.cdw10, 0x02 | (127 << 16));
    }

    #[test]
    fn test_vendor_logs_set_lsp() {
        let mut ch = MockChannel::new();
        let mut tele = [0u8; TELEMETRY_LOG_LEN];
        telemetry_host(&mut ch, &mut tele).unwrap();
        let mut c6 = [0u8; SERIES61_LOG_LEN];
        series61_vendor_log(&mut ch, &mut c6).unwrap();

        assert_eq!(ch.calls[0].cdw10, 0x07 | (1 << 8) | (255 << 16));
        assert_eq!(ch.calls[1].cdw10, 0xC6 | (1 << 8) | (1023 << 16));
        assert_eq!(ch.calls[1].data_len, 4096);
    }

    #[test]
    fn test_failure_is_reported() {
        let mut ch = MockChannel::new();
        ch.fail_call(0, 0x4002);
        let mut buf = [0u8; FIRMWARE_LOG_LEN];
        let err = firmware_log(&mut ch, &mut buf).unwrap_err();
        assert_eq!(err.channel_status(), Some(0x4002));
        assert!(matches!(err, Error::Channel(_)));
    }
}
