//! Host telemetry data block of Series 32 (Maverick) drives
//!
//! The block starts right after the 512-byte telemetry log header.

use zerocopy::byteorder::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// Offset of [`TelemetryBlock`] within the host telemetry log
pub const TELEMETRY_BLOCK_OFFSET: usize = 0x200;

/// Vendor drive health block
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct TelemetryBlock {
    // Thermal, 0x200
    _rsvd0: [u8; 16],
    /// Lifetime minimum composite temperature
    pub min_composite_temp: U16,
    _rsvd1: [u8; 2],
    /// Lifetime maximum composite temperature
    pub max_composite_temp: U16,
    _rsvd2: [u8; 10],
    /// Shutdown transitions
    pub shutdown_transition_count: U32,
    _rsvd3: [u8; 4],
    /// Highest thermal state since power-on
    pub max_thermal_state: u8,
    _rsvd4: [u8; 7],

    // Bad blocks, 0x230
    /// Available spare blocks
    pub num_valid_spare_block: U16,
    /// Factory bad blocks
    pub num_initial_invalid_block: U16,
    /// Runtime bad blocks
    pub run_time_bad_block: U16,
    /// Blocks retired by host reads
    pub on_line_retired_block: U16,
    /// Blocks retired by background management
    pub off_line_retired_block: U16,
    _rsvd5: [u8; 6],

    // Program/erase, 0x240
    /// Total erase count
    pub total_erase_count: U32,
    /// Maximum erase count
    pub max_erase_count: U32,
    /// Minimum erase count
    pub min_erase_count: U32,
    /// Average erase count
    pub avg_erase_count: U32,
    /// Total erase count of pSLC blocks
    pub slc_total_erase_count: U32,
    /// Maximum erase count of pSLC blocks
    pub slc_max_erase_count: U32,
    /// Minimum erase count of pSLC blocks
    pub slc_min_erase_count: U32,
    /// Average erase count of pSLC blocks
    pub slc_avg_erase_count: U32,
    /// Total erase count of TLC blocks
    pub tlc_total_erase_count: U32,
    /// Maximum erase count of TLC blocks
    pub tlc_max_erase_count: U32,
    /// Minimum erase count of TLC blocks
    pub tlc_min_erase_count: U32,
    /// Average erase count of TLC blocks
    pub tlc_avg_erase_count: U32,
    _rsvd6: [u8; 16],

    // Endurance, 0x280
    /// SLC remaining life from erase count, percent
    pub slc_remaining_life_pe: u8,
    /// SLC remaining life from spare count, percent
    pub slc_remaining_life_spare: u8,
    _rsvd7: [u8; 4],
    /// TLC remaining life from erase count, percent
    pub tlc_remaining_life_pe: u8,
    _rsvd8: [u8; 9],
    /// SLC sectors programmed
    pub slc_total_write_count: U64,
    /// TLC sectors programmed
    pub tlc_total_write_count: U64,

    // Retry, 0x2A0
    _rsvd9: [u8; 4],
    /// LDPC soft decodes
    pub hw_entry_soft_decode: U32,
    /// RAID decodes
    pub hw_entry_raid_count: U32,
    /// Blocks refreshed by host reads
    pub on_line_refresh_count: U32,
    /// Blocks refreshed by background management
    pub off_line_refresh_count: U32,
    /// Uncorrectable chunks on host reads
    pub on_line_unc_chunk_count: U32,
    /// Uncorrectable chunks during background management
    pub off_line_unc_chunk_count: U32,
    /// Blocks with program failures
    pub program_fail_blk_count: U16,
    /// Blocks with erase failures
    pub erase_fail_blk_count: U16,
    /// Blocks with uncorrectable read errors
    pub read_ecc_fail_blk_count: U16,
    _rsvd10: [u8; 30],

    // Scan, 0x2E0
    /// Scans while serving I/O
    pub on_line_scan_times: U32,
    /// Blocks scanned while serving I/O
    pub on_line_scan_blkcnt: U32,
    /// Scans while idle
    pub off_line_scan_times: U32,
    /// Blocks scanned while idle
    pub off_line_scan_blkcnt: U32,
    _rsvd12: [u8; 16],

    // Errors, 0x300
    /// Read commands completed with an uncorrectable error
    pub read_unc_cmd_count: U32,
    /// PCIe fatal errors during I/O
    pub pcie_fatal_err_count: U32,
    /// PCIe link speed downshifts
    pub pcie_interface_downsft_count: U32,
    /// End-to-end protection errors
    pub e2e_tag_err_count: U32,
    /// DRAM single-bit errors
    pub dram_one_bit_err_count: U16,
    /// DRAM double-bit errors
    pub dram_two_bit_err_count: U16,
    /// SRAM single-bit errors
    pub tsb_one_bit_err_count: U16,
    /// SRAM double-bit errors
    pub tsb_two_bit_err_count: U16,
    _rsvd13: [u8; 8],
    /// 3.3 V rail dropping to 2.7 V at init
    pub vdt_27_fail_count: U32,
    /// Link-ups at Gen1
    pub pcie_gen1_link_count: U32,
    /// Link-ups at Gen2
    pub pcie_gen2_link_count: U32,
    /// Link-ups at Gen3
    pub pcie_gen3_link_count: U32,
    /// ECRC events
    pub ecrc_event_count: U64,
    /// LCRC events
    pub lcrc_event_count: U64,
    /// Link-ups at Gen4
    pub pcie_gen4_link_count: U32,
    _rsvd14: [u8; 28],

    // System, 0x360
    _rsvd15: [u8; 12],
    /// Current link speed
    pub pcie_link_speed: u8,
    /// Current link width
    pub pcie_link_width: u8,
    _rsvd16: [u8; 18],

    // 0x380
    /// Temperature of every NAND die
    pub nand_temp: [u8; 32],
    /// PCIe error register
    pub pcie_error_reg0: U32,
    /// Link-ups at x1
    pub pciex1_link_count: U32,
    /// Link-ups at x2
    pub pciex2_link_count: U32,
    /// Link-ups at x4
    pub pciex4_link_count: U32,
}

impl TelemetryBlock {
    /// Scalar fields with their display labels, in layout order
    pub fn fields(&self) -> [(&'static str, u64); 56] {
        [
            ("min composite temp", self.min_composite_temp.get().into()),
            ("max composite temp", self.max_composite_temp.get().into()),
            ("shutdown transition count", self.shutdown_transition_count.get().into()),
            ("max thermal state", self.max_thermal_state.into()),
            ("total spare block count", self.num_valid_spare_block.get().into()),
            ("total initial bad block count", self.num_initial_invalid_block.get().into()),
            ("total runtime bad block count", self.run_time_bad_block.get().into()),
            ("on line retired block", self.on_line_retired_block.get().into()),
            ("off line retired block", self.off_line_retired_block.get().into()),
            ("total erase count", self.total_erase_count.get().into()),
            ("max erase count", self.max_erase_count.get().into()),
            ("min erase count", self.min_erase_count.get().into()),
            ("avg erase count", self.avg_erase_count.get().into()),
            ("slc total erase count", self.slc_total_erase_count.get().into()),
            ("slc max erase count", self.slc_max_erase_count.get().into()),
            ("slc min erase count", self.slc_min_erase_count.get().into()),
            ("slc avg erase count", self.slc_avg_erase_count.get().into()),
            ("tlc total erase count", self.tlc_total_erase_count.get().into()),
            ("tlc max erase count", self.tlc_max_erase_count.get().into()),
            ("tlc min erase count", self.tlc_min_erase_count.get().into()),
            ("tlc avg erase count", self.tlc_avg_erase_count.get().into()),
            ("percent slc remaining life pe", self.slc_remaining_life_pe.into()),
            ("percent slc remaining life spare count", self.slc_remaining_life_spare.into()),
            ("percent tlc remaining life pe", self.tlc_remaining_life_pe.into()),
            ("total slc progam sector count", self.slc_total_write_count.get()),
            ("total tlc progam sector count", self.tlc_total_write_count.get()),
            ("hw entry soft decode", self.hw_entry_soft_decode.get().into()),
            ("hw entry raid count", self.hw_entry_raid_count.get().into()),
            ("on line refresh count", self.on_line_refresh_count.get().into()),
            ("off line refresh count", self.off_line_refresh_count.get().into()),
            ("on line unc chunk count", self.on_line_unc_chunk_count.get().into()),
            ("off line unc chunk count", self.off_line_unc_chunk_count.get().into()),
            ("program fail block count", self.program_fail_blk_count.get().into()),
            ("erase fail blk count", self.erase_fail_blk_count.get().into()),
            ("Total read ECC uncorrectable block count", self.read_ecc_fail_blk_count.get().into()),
            ("on line scan times", self.on_line_scan_times.get().into()),
            ("on line scan block count", self.on_line_scan_blkcnt.get().into()),
            ("off line scan times", self.off_line_scan_times.get().into()),
            ("off line scan block count", self.off_line_scan_blkcnt.get().into()),
            ("unc error read command count", self.read_unc_cmd_count.get().into()),
            ("pcie fatal error count", self.pcie_fatal_err_count.get().into()),
            ("pcie interface downshift count", self.pcie_interface_downsft_count.get().into()),
            ("e2e error count", self.e2e_tag_err_count.get().into()),
            ("dram 1 bit error count", self.dram_one_bit_err_count.get().into()),
            ("dram 2 bit error count", self.dram_two_bit_err_count.get().into()),
            ("sram 1 bit error count", self.tsb_one_bit_err_count.get().into()),
            ("sram 2 bit error count", self.tsb_two_bit_err_count.get().into()),
            ("Total initial VDT detected 3.3V dropped to 2.7V count", self.vdt_27_fail_count.get().into()),
            ("PCIe link up in Gen1 count", self.pcie_gen1_link_count.get().into()),
            ("PCIe link up in Gen2 count", self.pcie_gen2_link_count.get().into()),
            ("PCIe link up in Gen3 count", self.pcie_gen3_link_count.get().into()),
            ("ecrc event count", self.ecrc_event_count.get()),
            ("lcrc event count", self.lcrc_event_count.get()),
            ("PCIe link up in Gen4 count", self.pcie_gen4_link_count.get().into()),
            ("Current PCIe link up speed", self.pcie_link_speed.into()),
            ("Current PCIe link up width", self.pcie_link_width.into()),
        ]
    }

    /// Error register and width counters, printed after the die temperatures
    pub fn link_fields(&self) -> [(&'static str, u64); 4] {
        [
            ("PCIe error register", self.pcie_error_reg0.get().into()),
            ("PCIe link up in width=x1 count", self.pciex1_link_count.get().into()),
            ("PCIe link up in width=x2 count", self.pciex2_link_count.get().into()),
            ("PCIe link up in width=x4 count", self.pciex4_link_count.get().into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::view;

    // Offsets relative to the start of the block
    const GEN4: usize = 0x140;
    const LINK_SPEED: usize = 0x360 - 0x200 + 12;
    const NAND_TEMP: usize = 0x380 - 0x200;

    #[test]
    fn test_telemetry_offsets() {
        let mut raw = [0u8; 432];
        raw[16..18].copy_from_slice(&20u16.to_le_bytes());
        raw[0x30..0x32].copy_from_slice(&99u16.to_le_bytes());
        raw[0x40..0x44].copy_from_slice(&12345u32.to_le_bytes());
        raw[0x90..0x98].copy_from_slice(&0xDEAD_BEEFu64.to_le_bytes());
        raw[GEN4..GEN4 + 4].copy_from_slice(&4u32.to_le_bytes());
        raw[LINK_SPEED] = 3;
        raw[LINK_SPEED + 1] = 4;
        raw[NAND_TEMP] = 41;
        raw[428..432].copy_from_slice(&7u32.to_le_bytes());

        let block = view::<TelemetryBlock>(&raw).unwrap();
        assert_eq!(block.min_composite_temp.get(), 20);
        assert_eq!(block.num_valid_spare_block.get(), 99);
        assert_eq!(block.total_erase_count.get(), 12345);
        assert_eq!(block.slc_total_write_count.get(), 0xDEAD_BEEF);
        assert_eq!(block.pcie_gen4_link_count.get(), 4);
        assert_eq!(block.pcie_link_speed, 3);
        assert_eq!(block.pcie_link_width, 4);
        assert_eq!(block.nand_temp[0], 41);
        assert_eq!(block.pciex4_link_count.get(), 7);
    }

    #[test]
    fn test_gen_labels_are_distinct() {
        let raw = [0u8; 432];
        let block = view::<TelemetryBlock>(&raw).unwrap();
        let fields = block.fields();
        let gen3 = fields.iter().filter(|(l, _)| l.contains("Gen3")).count();
        let gen4 = fields.iter().filter(|(l, _)| l.contains("Gen4")).count();
        assert_eq!((gen3, gen4), (1, 1));
    }
}
