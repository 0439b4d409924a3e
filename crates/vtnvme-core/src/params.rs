//! Scalar vendor parameters
//!
//! Single round-trip reads and writes of short ASCII values (firmware
//! string, serial number, model number, over-provisioning percentage).

use crate::channel::AdminChannel;
use crate::error::{ParameterMismatch, Result};
use crate::vendor::{selectors, VendorSession, CONTROL_BUFFER_LEN};

/// Longest value any scalar parameter returns
pub const MAX_PARAM_LEN: usize = 100;

/// A value read back from the drive
pub type ParamString = heapless::String<MAX_PARAM_LEN>;

/// Selector and transfer shape of one scalar parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarParam {
    /// Arm selector
    pub selector: &'static [u8],
    /// cdw10 of the execute command
    pub cdw10: u32,
    /// Transfer length of the execute command
    pub len: u32,
}

/// Custom firmware version string
pub const FIRMWARE_STRING: ScalarParam = ScalarParam {
    selector: selectors::FW_STRING,
    cdw10: 25,
    len: 100,
};

/// Serial number, read
pub const SERIAL_NUMBER: ScalarParam = ScalarParam {
    selector: selectors::GET_SERIAL,
    cdw10: 5,
    len: 20,
};

/// Model number, read
pub const MODEL_NUMBER: ScalarParam = ScalarParam {
    selector: selectors::GET_MODEL,
    cdw10: 10,
    len: 40,
};

/// Over-provisioning percentage, read
pub const OVER_PROVISIONING: ScalarParam = ScalarParam {
    selector: selectors::GET_OVER_PROVISIONING,
    cdw10: 1,
    len: 4,
};

/// Serial number, write
pub const SERIAL_NUMBER_WRITE: ScalarParam = ScalarParam {
    selector: selectors::SET_SERIAL,
    cdw10: 5,
    len: 20,
};

/// Model number, write
pub const MODEL_NUMBER_WRITE: ScalarParam = ScalarParam {
    selector: selectors::SET_MODEL,
    cdw10: 10,
    len: 40,
};

/// Over-provisioning percentage, write
pub const OVER_PROVISIONING_WRITE: ScalarParam = ScalarParam {
    selector: selectors::SET_OVER_PROVISIONING,
    cdw10: 3,
    len: 10,
};

/// Render a returned field as text
///
/// Stops at the first NUL, drops trailing spaces and replaces
/// non-printable bytes with `.`.
pub fn decode_ascii(bytes: &[u8]) -> ParamString {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let mut field = &bytes[..end];
    while let [rest @ .., b' '] = field {
        field = rest;
    }

    let mut s = ParamString::new();
    for &b in field.iter().take(MAX_PARAM_LEN) {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        };
        // Capacity matches the `take` above
        let _ = s.push(c);
    }
    s
}

fn check_value(value: &str, capacity: usize) -> Result<()> {
    if !value.is_ascii() {
        return Err(ParameterMismatch::NotAscii.into());
    }
    if value.len() > capacity {
        return Err(ParameterMismatch::ValueTooLong {
            len: value.len(),
            capacity,
        }
        .into());
    }
    Ok(())
}

/// Read a scalar parameter
pub fn read_param<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    param: &ScalarParam,
) -> Result<ParamString> {
    session.arm(param.selector)?;
    let bytes = session.execute_into_control(param.cdw10, param.len)?;
    Ok(decode_ascii(bytes))
}

/// Read the custom firmware version string
pub fn read_firmware_string<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
) -> Result<ParamString> {
    read_param(session, &FIRMWARE_STRING)
}

/// Read the serial number
pub fn read_serial_number<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
) -> Result<ParamString> {
    read_param(session, &SERIAL_NUMBER)
}

/// Read the model number
pub fn read_model_number<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
) -> Result<ParamString> {
    read_param(session, &MODEL_NUMBER)
}

/// Read the over-provisioning percentage
pub fn read_over_provisioning<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
) -> Result<ParamString> {
    read_param(session, &OVER_PROVISIONING)
}

/// Write a value through a separate zero-padded payload buffer
fn write_payload<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    param: &ScalarParam,
    value: &str,
) -> Result<()> {
    let capacity = param.len as usize;
    check_value(value, capacity)?;

    let mut payload = [0u8; MAX_PARAM_LEN];
    payload[..value.len()].copy_from_slice(value.as_bytes());

    session.arm(param.selector)?;
    session.execute_write(param.cdw10, param.len, &mut payload[..capacity])
}

/// Write the serial number (at most 20 ASCII bytes)
pub fn write_serial_number<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    serial: &str,
) -> Result<()> {
    write_payload(session, &SERIAL_NUMBER_WRITE, serial)
}

/// Write the model number (at most 40 ASCII bytes)
pub fn write_model_number<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    model: &str,
) -> Result<()> {
    write_payload(session, &MODEL_NUMBER_WRITE, model)
}

/// Write the over-provisioning percentage
///
/// The value travels in the control buffer right after the selector.
pub fn write_over_provisioning<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    value: &str,
) -> Result<()> {
    let param = &OVER_PROVISIONING_WRITE;
    let offset = param.selector.len();
    check_value(value, CONTROL_BUFFER_LEN - offset)?;

    let control = session.control_mut();
    control.load(param.selector);
    control.patch(offset, value.as_bytes())?;
    session.arm_prepared()?;
    session.execute_into_control(param.cdw10, param.len)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockChannel;
    use crate::opcodes;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_ascii(b"VT123   \0\0garbage").as_str(), "VT123");
        assert_eq!(decode_ascii(b"A\x01B").as_str(), "A.B");
        assert_eq!(decode_ascii(&[0u8; 20]).as_str(), "");
    }

    #[test]
    fn test_read_serial_number() {
        let mut ch = MockChannel::new();
        ch.respond_with(opcodes::VENDOR_EXECUTE, b"VTSN0001            ");
        let mut session = VendorSession::new(&mut ch);
        let sn = read_serial_number(&mut session).unwrap();
        assert_eq!(sn.as_str(), "VTSN0001");

        assert_eq!(&ch.calls[0].data[..4], &[0x25, 0x05, 0x01, 0x00]);
        assert_eq!(ch.calls[1].cdw10, 5);
        assert_eq!(ch.calls[1].data_len, 20);
    }

    #[test]
    fn test_read_model_and_firmware() {
        let mut ch = MockChannel::new();
        ch.respond_with(opcodes::VENDOR_EXECUTE, b"StorFly VSFB25");
        ch.respond_with(opcodes::VENDOR_EXECUTE, b"FW 1.2.3");
        let mut session = VendorSession::new(&mut ch);
        assert_eq!(read_model_number(&mut session).unwrap().as_str(), "StorFly VSFB25");
        assert_eq!(read_firmware_string(&mut session).unwrap().as_str(), "FW 1.2.3");

        assert_eq!(&ch.calls[0].data[..3], &[0x25, 0x05, 0x00]);
        assert_eq!((ch.calls[1].cdw10, ch.calls[1].data_len), (10, 40));
        assert_eq!(&ch.calls[2].data[..2], &[0x16, 0x00]);
        assert_eq!((ch.calls[3].cdw10, ch.calls[3].data_len), (25, 100));
    }

    #[test]
    fn test_write_serial_uses_write_direction() {
        let mut ch = MockChannel::new();
        let mut session = VendorSession::new(&mut ch);
        write_serial_number(&mut session, "NEWSN").unwrap();

        assert_eq!(&ch.calls[0].data[..3], selectors::SET_SERIAL);
        let exec = &ch.calls[1];
        assert_eq!(exec.opcode, opcodes::VENDOR_EXECUTE_WRITE);
        assert_eq!(exec.cdw12, 0x00FD);
        assert_eq!(exec.cdw10, 5);
        assert_eq!(exec.data_len, 20);
        assert_eq!(exec.data.len(), 20);
        assert_eq!(&exec.data[..6], b"NEWSN\0");
    }

    #[test]
    fn test_write_model_too_long() {
        let mut ch = MockChannel::new();
        let mut session = VendorSession::new(&mut ch);
        let long = "M".repeat(41);
        let err = write_model_number(&mut session, &long).unwrap_err();
        assert_eq!(
            err,
            Error::ParameterMismatch(ParameterMismatch::ValueTooLong {
                len: 41,
                capacity: 40
            })
        );
        assert!(ch.calls.is_empty());
    }

    #[test]
    fn test_write_rejects_non_ascii() {
        let mut ch = MockChannel::new();
        let mut session = VendorSession::new(&mut ch);
        assert!(write_serial_number(&mut session, "SN\u{e9}").is_err());
        assert!(ch.calls.is_empty());
    }

    #[test]
    fn test_write_over_provisioning() {
        let mut ch = MockChannel::new();
        let mut session = VendorSession::new(&mut ch);
        write_over_provisioning(&mut session, "28").unwrap();

        assert_eq!(&ch.calls[0].data[..6], &[0x27, 0x05, 0x01, b'2', b'8', 0]);
        let exec = &ch.calls[1];
        assert_eq!(exec.opcode, opcodes::VENDOR_EXECUTE);
        assert_eq!(exec.cdw10, 3);
        assert_eq!(exec.data_len, 10);
    }

    #[test]
    fn test_read_over_provisioning() {
        let mut ch = MockChannel::new();
        ch.respond_with(opcodes::VENDOR_EXECUTE, b"7\0\0\0");
        let mut session = VendorSession::new(&mut ch);
        assert_eq!(read_over_provisioning(&mut session).unwrap().as_str(), "7");
        assert_eq!((ch.calls[1].cdw10, ch.calls[1].data_len), (1, 4));
    }
}
