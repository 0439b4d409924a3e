use bitflags::bitflags;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use super::ascii_field;

bitflags! {
    /// Optional Admin Command Support
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Oacs: u16 {
        /// Security Send / Security Receive
        const SECURITY          = 1 << 0;
        /// Format NVM
        const FORMAT_NVM        = 1 << 1;
        /// Firmware Commit / Firmware Image Download
        const FIRMWARE          = 1 << 2;
        /// Namespace Management
        const NS_MANAGEMENT     = 1 << 3;
        /// Device Self-test
        const SELF_TEST         = 1 << 4;
        /// Directive Send / Directive Receive
        const DIRECTIVES        = 1 << 5;
        /// NVMe-MI Send / NVMe-MI Receive
        const NVME_MI           = 1 << 6;
        /// Virtualization Management
        const VIRTUALIZATION    = 1 << 7;
        /// Doorbell Buffer Config
        const DOORBELL_BUFFER   = 1 << 8;
        /// Get LBA Status
        const GET_LBA_STATUS    = 1 << 9;
    }
}

bitflags! {
    /// Optional NVM Command Support
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Oncs: u16 {
        /// Compare
        const COMPARE           = 1 << 0;
        /// Write Uncorrectable
        const WRITE_UNCORRECTABLE = 1 << 1;
        /// Dataset Management
        const DATASET_MANAGEMENT = 1 << 2;
        /// Write Zeroes
        const WRITE_ZEROES      = 1 << 3;
        /// Save field in Set Features and Select in Get Features
        const SAVE_SELECT       = 1 << 4;
        /// Reservations
        const RESERVATIONS      = 1 << 5;
        /// Timestamp feature
        const TIMESTAMP         = 1 << 6;
        /// Verify
        const VERIFY            = 1 << 7;
    }
}

bitflags! {
    /// Controller Multi-Path I/O and Namespace Sharing Capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Cmic: u8 {
        /// More than one subsystem port
        const MULTI_PORT        = 1 << 0;
        /// Two or more controllers
        const MULTI_CONTROLLER  = 1 << 1;
        /// SR-IOV virtual function
        const SRIOV             = 1 << 2;
        /// Asymmetric namespace access reporting
        const ANA               = 1 << 3;
    }
}

bitflags! {
    /// Log Page Attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Lpa: u8 {
        /// SMART log per namespace
        const SMART_PER_NS      = 1 << 0;
        /// Commands Supported and Effects log
        const CMD_EFFECTS       = 1 << 1;
        /// Extended data for Get Log Page
        const EXTENDED_DATA     = 1 << 2;
        /// Telemetry Host-Initiated and Controller-Initiated logs
        const TELEMETRY         = 1 << 3;
        /// Persistent Event log
        const PERSISTENT_EVENT  = 1 << 4;
    }
}

/// Power state descriptor
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
pub struct PowerState {
    /// Maximum power
    pub max_power: U16,
    _rsvd2: u8,
    /// Bit 0 MPS, bit 1 NOPS
    pub flags: u8,
    /// Entry latency in microseconds
    pub entry_lat: U32,
    /// Exit latency in microseconds
    pub exit_lat: U32,
    /// Relative read throughput
    pub read_tput: u8,
    /// Relative read latency
    pub read_lat: u8,
    /// Relative write throughput
    pub write_tput: u8,
    /// Relative write latency
    pub write_lat: u8,
    /// Idle power
    pub idle_power: U16,
    /// Idle power scale in bits 7:6
    pub idle_scale: u8,
    _rsvd19: u8,
    /// Active power
    pub active_power: U16,
    /// Active power workload in bits 2:0, scale in bits 7:6
    pub active_work_scale: u8,
    _rsvd23: [u8; 9],
}

impl PowerState {
    /// Non-operational state
    pub fn non_operational(&self) -> bool {
        self.flags & 0x02 != 0
    }

    /// Max power is in 0.0001 W units instead of 0.01 W
    pub fn fine_power_scale(&self) -> bool {
        self.flags & 0x01 != 0
    }
}

/// Identify Controller data structure (CNS 0x01)
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct IdController {
    /// PCI vendor ID
    pub vid: U16,
    /// PCI subsystem vendor ID
    pub ssvid: U16,
    /// Serial number, space padded
    pub sn: [u8; 20],
    /// Model number, space padded
    pub mn: [u8; 40],
    /// Firmware revision, space padded
    pub fr: [u8; 8],
    /// Recommended arbitration burst
    pub rab: u8,
    /// IEEE OUI identifier
    pub ieee: [u8; 3],
    /// Multi-path I/O and namespace sharing capabilities
    pub cmic: u8,
    /// Maximum data transfer size
    pub mdts: u8,
    /// Controller ID
    pub cntlid: U16,
    /// Version
    pub ver: U32,
    /// RTD3 resume latency
    pub rtd3r: U32,
    /// RTD3 entry latency
    pub rtd3e: U32,
    /// Optional asynchronous events supported
    pub oaes: U32,
    /// Controller attributes
    pub ctratt: U32,
    _rsvd100: [u8; 11],
    /// Controller type
    pub cntrltype: u8,
    /// FRU globally unique identifier
    pub fguid: [u8; 16],
    _rsvd128: [u8; 128],
    /// Optional admin command support
    pub oacs: U16,
    /// Abort command limit
    pub acl: u8,
    /// Asynchronous event request limit
    pub aerl: u8,
    /// Firmware updates
    pub frmw: u8,
    /// Log page attributes
    pub lpa: u8,
    /// Error log page entries
    pub elpe: u8,
    /// Number of power states supported, zero based
    pub npss: u8,
    /// Admin vendor specific command configuration
    pub avscc: u8,
    /// Autonomous power state transition attributes
    pub apsta: u8,
    /// Warning composite temperature threshold
    pub wctemp: U16,
    /// Critical composite temperature threshold
    pub cctemp: U16,
    /// Maximum time for firmware activation
    pub mtfa: U16,
    /// Host memory buffer preferred size
    pub hmpre: U32,
    /// Host memory buffer minimum size
    pub hmmin: U32,
    /// Total NVM capacity in bytes
    pub tnvmcap: [u8; 16],
    /// Unallocated NVM capacity in bytes
    pub unvmcap: [u8; 16],
    /// Replay protected memory block support
    pub rpmbs: U32,
    /// Extended device self-test time
    pub edstt: U16,
    /// Device self-test options
    pub dsto: u8,
    /// Firmware update granularity
    pub fwug: u8,
    /// Keep alive support
    pub kas: U16,
    /// Host controlled thermal management attributes
    pub hctma: U16,
    /// Minimum thermal management temperature
    pub mntmt: U16,
    /// Maximum thermal management temperature
    pub mxtmt: U16,
    /// Sanitize capabilities
    pub sanicap: U32,
    _rsvd332: [u8; 180],
    /// Submission queue entry size
    pub sqes: u8,
    /// Completion queue entry size
    pub cqes: u8,
    /// Maximum outstanding commands
    pub maxcmd: U16,
    /// Number of namespaces
    pub nn: U32,
    /// Optional NVM command support
    pub oncs: U16,
    /// Fused operation support
    pub fuses: U16,
    /// Format NVM attributes
    pub fna: u8,
    /// Volatile write cache
    pub vwc: u8,
    /// Atomic write unit normal
    pub awun: U16,
    /// Atomic write unit power fail
    pub awupf: U16,
    /// NVM vendor specific command configuration
    pub nvscc: u8,
    _rsvd531: u8,
    /// Atomic compare and write unit
    pub acwu: U16,
    _rsvd534: [u8; 2],
    /// SGL support
    pub sgls: U32,
    _rsvd540: [u8; 228],
    /// NVM subsystem NVMe qualified name
    pub subnqn: [u8; 256],
    _rsvd1024: [u8; 1024],
    /// Power state descriptors
    pub psd: [PowerState; 32],
    /// Vendor specific area
    pub vs: [u8; 1024],
}

impl IdController {
    /// Serial number without padding
    pub fn serial(&self) -> &str {
        ascii_field(&self.sn)
    }

    /// Model number without padding
    pub fn model(&self) -> &str {
        ascii_field(&self.mn)
    }

    /// Firmware revision without padding
    pub fn firmware_revision(&self) -> &str {
        ascii_field(&self.fr)
    }

    /// Supported optional admin commands
    pub fn admin_commands(&self) -> Oacs {
        Oacs::from_bits_retain(self.oacs.get())
    }

    /// Supported optional NVM commands
    pub fn nvm_commands(&self) -> Oncs {
        Oncs::from_bits_retain(self.oncs.get())
    }

    /// Multi-path and sharing capabilities
    pub fn multipath(&self) -> Cmic {
        Cmic::from_bits_retain(self.cmic)
    }

    /// Log page attributes
    pub fn log_page_attributes(&self) -> Lpa {
        Lpa::from_bits_retain(self.lpa)
    }

    /// Firmware slots the controller supports
    pub fn firmware_slots(&self) -> u8 {
        (self.frmw >> 1) & 0x07
    }

    /// Power state descriptors that are in use
    pub fn power_states(&self) -> &[PowerState] {
        let count = core::cmp::min(self.npss as usize + 1, self.psd.len());
        &self.psd[..count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::view;

    fn sample() -> [u8; 4096] {
        let mut raw = [0u8; 4096];
        raw[0..2].copy_from_slice(&0x1D78u16.to_le_bytes());
        raw[4..24].copy_from_slice(b"VT0123456789        ");
        raw[24..64].fill(b' ');
        raw[24..38].copy_from_slice(b"StorFly VSFBM4");
        raw[64..72].copy_from_slice(b"1.2.3   ");
        raw[76] = 0x01;
        raw[256..258].copy_from_slice(&0x0016u16.to_le_bytes());
        raw[260] = 0x02 << 1;
        raw[261] = 0x08;
        raw[263] = 2;
        raw[520..522].copy_from_slice(&0x005Fu16.to_le_bytes());
        // psd[1].flags = NOPS
        raw[2048 + 32 + 3] = 0x02;
        raw[3072] = 0xAB;
        raw
    }

    #[test]
    fn test_identify_fields() {
        let raw = sample();
        let ctrl = view::<IdController>(&raw).unwrap();
        assert_eq!(ctrl.vid.get(), 0x1D78);
        assert_eq!(ctrl.serial(), "VT0123456789");
        assert_eq!(ctrl.model(), "StorFly VSFBM4");
        assert_eq!(ctrl.firmware_revision(), "1.2.3");
        assert_eq!(ctrl.firmware_slots(), 2);
        assert_eq!(ctrl.vs[0], 0xAB);
    }

    #[test]
    fn test_capability_flags() {
        let raw = sample();
        let ctrl = view::<IdController>(&raw).unwrap();
        assert_eq!(
            ctrl.admin_commands(),
            Oacs::FORMAT_NVM | Oacs::FIRMWARE | Oacs::SELF_TEST
        );
        assert!(ctrl.nvm_commands().contains(Oncs::COMPARE | Oncs::TIMESTAMP));
        assert!(!ctrl.nvm_commands().contains(Oncs::RESERVATIONS));
        assert_eq!(ctrl.multipath(), Cmic::MULTI_PORT);
        assert_eq!(ctrl.log_page_attributes(), Lpa::TELEMETRY);
    }

    #[test]
    fn test_power_states_follow_npss() {
        let raw = sample();
        let ctrl = view::<IdController>(&raw).unwrap();
        let states = ctrl.power_states();
        assert_eq!(states.len(), 3);
        assert!(!states[0].non_operational());
        assert!(states[1].non_operational());
    }
}
