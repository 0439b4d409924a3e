//! Standard NVMe data structures
//!
//! Fixed little-endian layouts returned by Identify and Get Log Page. Every
//! type is byte-aligned so a view can be taken straight from a transfer
//! buffer without copying.

mod firmware;
mod identify;
mod namespace;
mod series61;
mod smart;
mod telemetry;

pub use firmware::FirmwareLog;
pub use identify::{Cmic, IdController, Lpa, Oacs, Oncs, PowerState};
pub use namespace::{IdNamespace, LbaFormat};
pub use series61::{Series61VendorLog, SERIES61_COUNTERS};
pub use smart::SmartLog;
pub use telemetry::{TelemetryBlock, TELEMETRY_BLOCK_OFFSET};

use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::DecodeError;

/// Size of an Identify data structure
pub const IDENTIFY_LEN: usize = 4096;

/// Reinterpret the head of `bytes` as `T`
pub fn view<T>(bytes: &[u8]) -> Result<&T, DecodeError>
where
    T: FromBytes + KnownLayout + Immutable,
{
    T::ref_from_prefix(bytes)
        .map(|(v, _)| v)
        .map_err(|_| DecodeError::Truncated {
            needed: core::mem::size_of::<T>(),
            got: bytes.len(),
        })
}

/// `(value as i32) - 273`, Kelvin to Celsius
pub fn kelvin_to_celsius(kelvin: u16) -> i32 {
    kelvin as i32 - 273
}

/// Printable part of a space-padded ASCII identify field
pub fn ascii_field(raw: &[u8]) -> &str {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text = core::str::from_utf8(&raw[..end]).unwrap_or("");
    text.trim_end_matches(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        use core::mem::size_of;
        assert_eq!(size_of::<IdController>(), 4096);
        assert_eq!(size_of::<PowerState>(), 32);
        assert_eq!(size_of::<IdNamespace>(), 4096);
        assert_eq!(size_of::<SmartLog>(), 512);
        assert_eq!(size_of::<FirmwareLog>(), 512);
        assert_eq!(size_of::<TelemetryBlock>(), 432);
        assert_eq!(size_of::<Series61VendorLog>(), 135 * 8);
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let buf = [0u8; 100];
        assert_eq!(
            view::<SmartLog>(&buf).unwrap_err(),
            DecodeError::Truncated {
                needed: 512,
                got: 100
            }
        );
    }

    #[test]
    fn test_ascii_field() {
        assert_eq!(ascii_field(b"VT-SN-01            "), "VT-SN-01");
        assert_eq!(ascii_field(b"ABC\0\0\0"), "ABC");
        assert_eq!(ascii_field(b"  "), "");
    }
}
