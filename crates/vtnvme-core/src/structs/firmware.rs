use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// Firmware Slot Information log page (LID 0x03)
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct FirmwareLog {
    /// Active firmware info
    pub afi: u8,
    _rsvd1: [u8; 7],
    /// Revision in each of the seven slots
    pub frs: [[u8; 8]; 7],
    _rsvd64: [u8; 448],
}

impl FirmwareLog {
    /// Slot the running firmware was loaded from
    pub fn active_slot(&self) -> u8 {
        self.afi & 0x07
    }
}
