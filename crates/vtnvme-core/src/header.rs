//! Info header decoding
//!
//! Both bulk datasets start with a small info blob that tells the host how
//! much data follows. The blobs are decoded here, in process, into
//! [`ExtractionParameters`].
//!
//! Event log info (12 bytes, little-endian):
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 4 | record count |
//! | 4 | 4 | record size in bytes |
//! | 8 | 4 | record type |
//!
//! Crash dump info (first 12 of 4096 bytes, little-endian):
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 4 | page size, excluding the 0x200 byte page trailer |
//! | 4 | 2 | pages per image |
//! | 6 | 2 | stored images |
//! | 8 | 4 | image size |

use crate::error::DecodeError;

/// Record type of event log token records
pub const EVENT_LOG_KIND_TOKEN: u32 = 2;

/// Kind tag assigned to crash dump parameters
///
/// The crash info header carries no type field of its own.
pub const CRASH_DUMP_KIND: u32 = 0x77;

/// Bytes each crash dump page carries beyond the advertised page size
pub const CRASH_PAGE_TRAILER: u32 = 0x200;

/// Length of the event log info blob
pub const EVENT_LOG_INFO_LEN: usize = 12;

/// Length of the crash info blob
pub const CRASH_INFO_LEN: usize = 4096;

/// Parameters of one bulk extraction, fixed once decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionParameters {
    /// Pages or records to fetch
    pub unit_count: u32,
    /// Bytes per page or record
    pub unit_size: u32,
    /// Type discriminator that must match the operation
    pub kind_tag: u32,
    /// Crash images on the drive (0 for the event log)
    pub image_count: u32,
}

/// Decoded event log info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLogInfo {
    /// Number of records
    pub record_count: u32,
    /// Size of one record in bytes
    pub record_size: u32,
    /// Record type
    pub record_type: u32,
}

impl EventLogInfo {
    /// Extraction parameters for fetching every record
    pub fn parameters(&self) -> ExtractionParameters {
        ExtractionParameters {
            unit_count: self.record_count,
            unit_size: self.record_size,
            kind_tag: self.record_type,
            image_count: 0,
        }
    }
}

/// Decoded crash dump info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashInfo {
    /// Page size excluding the page trailer
    pub page_size: u32,
    /// Pages per image
    pub page_count: u16,
    /// Stored images
    pub image_count: u16,
    /// Size of one image
    pub image_size: u32,
}

impl CrashInfo {
    /// Bytes transferred per page, trailer included
    pub fn page_transfer_size(&self) -> u32 {
        self.page_size.saturating_add(CRASH_PAGE_TRAILER)
    }

    /// Extraction parameters for fetching one image
    pub fn dump_parameters(&self) -> ExtractionParameters {
        ExtractionParameters {
            unit_count: self.page_count as u32,
            unit_size: self.page_transfer_size(),
            kind_tag: CRASH_DUMP_KIND,
            image_count: self.image_count as u32,
        }
    }
}

fn le32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn require(blob: &[u8], needed: usize) -> Result<(), DecodeError> {
    if blob.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            got: blob.len(),
        });
    }
    Ok(())
}

/// Decode the event log info blob
pub fn decode_event_log_info(blob: &[u8]) -> Result<EventLogInfo, DecodeError> {
    require(blob, EVENT_LOG_INFO_LEN)?;
    let info = EventLogInfo {
        record_count: le32(blob, 0),
        record_size: le32(blob, 4),
        record_type: le32(blob, 8),
    };
    if info.record_count != 0 && info.record_size == 0 {
        return Err(DecodeError::ZeroUnitSize {
            units: info.record_count,
        });
    }
    Ok(info)
}

/// Decode the crash dump info blob
///
/// Only the first 12 bytes are interpreted.
pub fn decode_crash_info(blob: &[u8]) -> Result<CrashInfo, DecodeError> {
    require(blob, 12)?;
    Ok(CrashInfo {
        page_size: le32(blob, 0),
        page_count: le16(blob, 4),
        image_count: le16(blob, 6),
        image_size: le32(blob, 8),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_event_log_info() {
        let blob = [3, 0, 0, 0, 0x00, 0x10, 0, 0, 2, 0, 0, 0];
        let info = decode_event_log_info(&blob).unwrap();
        assert_eq!(info.record_count, 3);
        assert_eq!(info.record_size, 4096);
        assert_eq!(info.record_type, EVENT_LOG_KIND_TOKEN);

        let params = info.parameters();
        assert_eq!(params.unit_count, 3);
        assert_eq!(params.unit_size, 4096);
        assert_eq!(params.kind_tag, 2);
    }

    #[test]
    fn test_decode_uses_full_words() {
        // The top byte of each field is significant
        let blob = [0, 0, 0, 1, 0, 0, 0, 0, 2, 0, 0, 0];
        let info = decode_event_log_info(&blob);
        assert_eq!(
            info,
            Err(DecodeError::ZeroUnitSize {
                units: 0x0100_0000
            })
        );
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(
            decode_event_log_info(&[0u8; 11]),
            Err(DecodeError::Truncated { needed: 12, got: 11 })
        );
        assert!(decode_crash_info(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_decode_empty_log_is_valid() {
        let info = decode_event_log_info(&[0u8; 12]).unwrap();
        assert_eq!(info.record_count, 0);
    }

    #[test]
    fn test_decode_crash_info() {
        let mut blob = [0u8; CRASH_INFO_LEN];
        blob[..12].copy_from_slice(&[0x00, 0x10, 0, 0, 0x40, 0x01, 2, 0, 0x00, 0x00, 0x14, 0]);
        let info = decode_crash_info(&blob).unwrap();
        assert_eq!(info.page_size, 4096);
        assert_eq!(info.page_count, 320);
        assert_eq!(info.image_count, 2);
        assert_eq!(info.image_size, 0x14_0000);

        let params = info.dump_parameters();
        assert_eq!(params.unit_size, 4096 + 0x200);
        assert_eq!(params.unit_count, 320);
        assert_eq!(params.image_count, 2);
    }
}
