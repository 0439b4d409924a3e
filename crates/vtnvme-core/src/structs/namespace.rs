use zerocopy::byteorder::little_endian::{U16, U64};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// LBA format descriptor
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
pub struct LbaFormat {
    /// Metadata size
    pub ms: U16,
    /// LBA data size as a power of two
    pub ds: u8,
    /// Relative performance
    pub rp: u8,
}

/// Identify Namespace data structure (CNS 0x00)
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct IdNamespace {
    /// Namespace size in logical blocks
    pub nsze: U64,
    /// Namespace capacity in logical blocks
    pub ncap: U64,
    /// Namespace utilization in logical blocks
    pub nuse: U64,
    /// Namespace features
    pub nsfeat: u8,
    /// Number of LBA formats, zero based
    pub nlbaf: u8,
    /// Formatted LBA size
    pub flbas: u8,
    /// Metadata capabilities
    pub mc: u8,
    /// End-to-end data protection capabilities
    pub dpc: u8,
    /// End-to-end data protection type settings
    pub dps: u8,
    /// Multi-path I/O and namespace sharing
    pub nmic: u8,
    /// Reservation capabilities
    pub rescap: u8,
    _rsvd32: [u8; 96],
    /// LBA formats
    pub lbaf: [LbaFormat; 16],
    _rsvd192: [u8; 3904],
}

impl IdNamespace {
    /// The LBA format in use
    pub fn current_format(&self) -> &LbaFormat {
        &self.lbaf[(self.flbas & 0x0F) as usize]
    }

    /// Bytes per logical block of the current format
    ///
    /// Zero when the data size does not fit in 64 bits.
    pub fn block_size(&self) -> u64 {
        1u64.checked_shl(self.current_format().ds as u32).unwrap_or(0)
    }

    /// Namespace size in bytes
    pub fn capacity_bytes(&self) -> u128 {
        self.nsze.get() as u128 * self.block_size() as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::view;

    #[test]
    fn test_capacity_uses_current_format() {
        let mut raw = [0u8; 4096];
        raw[0..8].copy_from_slice(&1_000_000u64.to_le_bytes());
        raw[26] = 0x01;
        // lbaf[0]: 512-byte blocks, lbaf[1]: 4096-byte blocks
        raw[128 + 2] = 9;
        raw[132 + 2] = 12;

        let ns = view::<IdNamespace>(&raw).unwrap();
        assert_eq!(ns.block_size(), 4096);
        assert_eq!(ns.capacity_bytes(), 4_096_000_000);
    }
}
