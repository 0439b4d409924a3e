//! Series 61 vendor log page 0xC6
//!
//! A flat run of little-endian 64-bit counters.

use zerocopy::byteorder::little_endian::U64;
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// Number of named counters reported by [`Series61VendorLog::counters`]
pub const SERIES61_COUNTERS: usize = 119;

/// Vendor counters of Series 61 (SM226x) drives
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned, Debug, Clone)]
pub struct Series61VendorLog {
    /// Eight version bytes, most significant first
    pub version: U64,
    pub realloc_sector_count: U64,
    pub slc_realloc_sector_count: U64,
    pub power_on_hours_count: U64,
    pub uncorrectable_error_count1: U64,
    pub uncorrectable_error_count2: U64,
    pub ecc_unc: U64,
    pub soft_ldpc_correction_event_count: U64,
    pub tlc_read_retry_fail: U64,
    pub slc_read_retry_fail: U64,
    pub temperature: U64,
    pub read_retry_trigger: U64,
    pub total_lbas_written: U64,
    pub total_lbas_read: U64,
    pub ps3_count: U64,
    pub ps4_count: U64,
    pub l1_2_count: U64,
    pub tlc_avail_spare_blocks: U64,
    pub slc_avail_spare_blocks: U64,
    pub wear_range_delta1: U64,
    pub wear_range_delta2: U64,
    pub high_temp: U64,
    pub low_temp: U64,
    pub avg_temp: U64,
    pub recent_high: U64,
    pub recent_low: U64,
    pub auto_calibration_fail: U64,
    pub slc_nand_data_read: U64,
    pub tlc_nand_data_read: U64,
    pub valid_block_counts: U64,
    pub slc_nand_writes: U64,
    pub tlc_nand_writes: U64,
    pub tlc_qlc_wear_leveling_count: U64,
    pub slc_wear_leveling_count: U64,
    pub tlc_nand_writes_due_to_wear_leveling: U64,
    pub slc_nand_writes_due_to_wear_leveling: U64,
    pub current_tlc_spare_super_block: U64,
    pub current_slc_spare_super_block: U64,
    pub slc_to_tlc_defrag_count: U64,
    pub tlc_defrag_count: U64,
    pub slc_defrag_count: U64,
    pub read_back_fail_count: U64,
    pub tlc_program_fail: U64,
    pub slc_program_fail: U64,
    pub tlc_erase_fail: U64,
    pub slc_erase_fail: U64,
    pub tlc_erase_cycle_avg: U64,
    pub tlc_erase_cycle_max: U64,
    pub tlc_erase_cycle_min: U64,
    pub slc_erase_cycle_avg: U64,
    pub slc_erase_cycle_max: U64,
    pub slc_erase_cycle_min: U64,
    pub ps0_to_ps1_entry: U64,
    pub ps1_to_ps0_exit: U64,
    pub ps1_to_ps2_entry: U64,
    pub ps2_to_ps1_exit: U64,
    pub ps2_to_ps_shut_down_entry: U64,
    pub link_downshift: U64,
    pub idle_sleep_count: U64,
    pub l1_event_count: U64,
    pub ecrc_event_count: U64,
    pub lcrc_event_count: U64,
    pub slc2tlc_data_eviction_idle: U64,
    pub slc2tlc_data_eviction_runtime: U64,
    pub dram_ecc_corrected: U64,
    pub sram_ecc_corrected: U64,
    pub e2e_fail_detected: U64,
    pub ps3_5_count: U64,
    pub throttling_light_count: U64,
    pub throttling_heavy_count: U64,
    pub throttling_light_duration: U64,
    pub throttling_heavy_duration: U64,
    pub retry_count: U64,
    pub soft_decode_count: U64,
    pub manf_bad_blocks: U64,
    pub manf_bad_blocks_worst: U64,
    pub slc_valid_block_counts: U64,
    pub tlc_valid_block_counts: U64,
    pub slc_system_block_writes: U64,
    pub slc_writes_due_to_read_disturb: U64,
    pub tlc_writes_due_to_read_disturb: U64,
    pub max_open_block_ssgs_count: U64,
    pub max_closed_block_ssgs_count: U64,
    pub l2p_table_swap: U64,
    _rsvd1: U64,
    pub slc_max_cw_error_count_with_rr_pass: U64,
    pub tlc_qlc_max_cw_error_count_with_rr_pass: U64,
    pub total_erase_pool_block_count: U64,
    pub dslc_blocks_in_link_table: U64,
    pub max_dslc_erase_cycle_count: U64,
    pub avg_dslc_erase_cycle_count: U64,
    pub dslc_nand_write: U64,
    pub dslc_nand_read: U64,
    pub dslc_to_dslc_defrag_count: U64,
    pub dslc_program_fail: U64,
    pub dslc_erase_fail: U64,
    pub dslc_retired_blocks: U64,
    pub dslc_alloc_size: U64,
    pub recondition_counts: U64,
    pub min_dslc_erase_count: U64,
    pub max_total_erase_count: U64,
    pub min_total_erase_count: U64,
    pub avg_total_erase_count: U64,
    pub max_open_ssgs_count: U64,
    pub max_closed_ssgs_count: U64,
    pub slc_dummy_writes: U64,
    pub tlc_dummy_writes: U64,
    pub dslc_dummy_writes: U64,
    _rsvd2: U64,
    pub dummy_reads: U64,
    pub core_dump_count: U64,
    pub data_trim: U64,
    _rsvd3: [U64; 13],
    pub tlc_wai_with_dslc_as_tlc_size: U64,
    pub tlc_wai_with_dslc_as_slc_size: U64,
    pub slc_wai: U64,
    pub tlc_total_erase_count: U64,
    pub slc_total_erase_count: U64,
    pub dslc_total_erase_count: U64,
    pub tlc_block_sector_count: U64,
    pub map_block_pop_count: U64,
    pub gw_pro_block_pop_count: U64,
    pub dram_retrain_count: U64,
}

impl Series61VendorLog {
    /// Version bytes in display order
    pub fn version_bytes(&self) -> [u8; 8] {
        self.version.get().to_be_bytes()
    }

    /// Every named counter with its display label, in layout order
    pub fn counters(&self) -> [(&'static str, u64); SERIES61_COUNTERS] {
        [
            ("reallocSectorCount", self.realloc_sector_count.get()),
            ("slcReallocSectorCount", self.slc_realloc_sector_count.get()),
            ("powerOnHoursCount", self.power_on_hours_count.get()),
            ("uncorrectableErrorCount1", self.uncorrectable_error_count1.get()),
            ("uncorrectableErrorCount2", self.uncorrectable_error_count2.get()),
            ("eccUnc", self.ecc_unc.get()),
            ("softLDPCCorrectionEventCount", self.soft_ldpc_correction_event_count.get()),
            ("tlcReadRetryFail", self.tlc_read_retry_fail.get()),
            ("slcReadRetryFail", self.slc_read_retry_fail.get()),
            ("temperature", self.temperature.get()),
            ("readRetryTrigger", self.read_retry_trigger.get()),
            ("totalLBAsWritten", self.total_lbas_written.get()),
            ("totalLBAsRead", self.total_lbas_read.get()),
            ("ps3Count", self.ps3_count.get()),
            ("ps4Count", self.ps4_count.get()),
            ("l1_2Count", self.l1_2_count.get()),
            ("tlcAvailSpareBlocks", self.tlc_avail_spare_blocks.get()),
            ("slcAvailSpareBlocks", self.slc_avail_spare_blocks.get()),
            ("wearRangeDelta1", self.wear_range_delta1.get()),
            ("wearRangeDelta2", self.wear_range_delta2.get()),
            ("highTemp", self.high_temp.get()),
            ("lowTemp", self.low_temp.get()),
            ("avgTemp", self.avg_temp.get()),
            ("recentHigh", self.recent_high.get()),
            ("recentLow", self.recent_low.get()),
            ("autoCalibrationFail", self.auto_calibration_fail.get()),
            ("slcNandDataRead", self.slc_nand_data_read.get()),
            ("tlcNandDataRead", self.tlc_nand_data_read.get()),
            ("validBlockCounts", self.valid_block_counts.get()),
            ("sclNandWrites", self.slc_nand_writes.get()),
            ("tlcNandWrites", self.tlc_nand_writes.get()),
            ("tlc_qlcWearLevelingCount", self.tlc_qlc_wear_leveling_count.get()),
            ("slcWearLevelingCount", self.slc_wear_leveling_count.get()),
            ("tlcNandWritesDueToWearLeveling", self.tlc_nand_writes_due_to_wear_leveling.get()),
            ("slcNandWritesDueToWearLeveing", self.slc_nand_writes_due_to_wear_leveling.get()),
            ("currentTLCSpareSuperBlock", self.current_tlc_spare_super_block.get()),
            ("currentSLCSpareSuperBlock", self.current_slc_spare_super_block.get()),
            ("slcToTLCDefragCount", self.slc_to_tlc_defrag_count.get()),
            ("tlcDefragCount", self.tlc_defrag_count.get()),
            ("slcDefragCount", self.slc_defrag_count.get()),
            ("readBackFailCount", self.read_back_fail_count.get()),
            ("tlcProgramFail", self.tlc_program_fail.get()),
            ("slcProgramFail", self.slc_program_fail.get()),
            ("tlcEraseFail", self.tlc_erase_fail.get()),
            ("slcEraseFail", self.slc_erase_fail.get()),
            ("tlcEraseCycleAvg", self.tlc_erase_cycle_avg.get()),
            ("tlcEraseCycleMax", self.tlc_erase_cycle_max.get()),
            ("tlcEraseCycleMin", self.tlc_erase_cycle_min.get()),
            ("slcEraseCycleAvg", self.slc_erase_cycle_avg.get()),
            ("slcEraseCycleMax", self.slc_erase_cycle_max.get()),
            ("slcEraseCycleMin", self.slc_erase_cycle_min.get()),
            ("ps0ToPs1Entry", self.ps0_to_ps1_entry.get()),
            ("ps1ToPs0Exit", self.ps1_to_ps0_exit.get()),
            ("ps1ToPs2Entry", self.ps1_to_ps2_entry.get()),
            ("ps2ToPs1Exit", self.ps2_to_ps1_exit.get()),
            ("ps2ToPsShutDownEntry", self.ps2_to_ps_shut_down_entry.get()),
            ("linkDownshift", self.link_downshift.get()),
            ("idleSleepCount", self.idle_sleep_count.get()),
            ("l1EventCount", self.l1_event_count.get()),
            ("ecrcEventCount", self.ecrc_event_count.get()),
            ("lcrcEventCount", self.lcrc_event_count.get()),
            ("slc2tlcDataEvictionIdle", self.slc2tlc_data_eviction_idle.get()),
            ("slc2tlcDataEvictionRuntime", self.slc2tlc_data_eviction_runtime.get()),
            ("dramEccCorrected", self.dram_ecc_corrected.get()),
            ("sramEccCorrected", self.sram_ecc_corrected.get()),
            ("e2eFailDetected", self.e2e_fail_detected.get()),
            ("ps3_5Count", self.ps3_5_count.get()),
            ("throttlingLightCount", self.throttling_light_count.get()),
            ("throttlingHeavyCount", self.throttling_heavy_count.get()),
            ("throttlingLightDuration", self.throttling_light_duration.get()),
            ("throttlingHeavyDuration", self.throttling_heavy_duration.get()),
            ("retryCount", self.retry_count.get()),
            ("softDecodeCount", self.soft_decode_count.get()),
            ("manfBadBlocks", self.manf_bad_blocks.get()),
            ("manfBadBlocksWorst", self.manf_bad_blocks_worst.get()),
            ("slcValidBlockCounts", self.slc_valid_block_counts.get()),
            ("tlcValidBlockCounts", self.tlc_valid_block_counts.get()),
            ("slcSystemBlockWrites", self.slc_system_block_writes.get()),
            ("slcWritesDueToReadDistrub", self.slc_writes_due_to_read_disturb.get()),
            ("tlcWritesDueToReadDistrub", self.tlc_writes_due_to_read_disturb.get()),
            ("maxOpenBlockSsgsCount", self.max_open_block_ssgs_count.get()),
            ("maxClosedBlockSsgsCount", self.max_closed_block_ssgs_count.get()),
            ("l2pTableSwap", self.l2p_table_swap.get()),
            ("slcMaxCwErrorCountWithRrPass", self.slc_max_cw_error_count_with_rr_pass.get()),
            ("tlc_qlcMaxCwErrorCountWithRrPass", self.tlc_qlc_max_cw_error_count_with_rr_pass.get()),
            ("totalErasePoolBlockCount", self.total_erase_pool_block_count.get()),
            ("dslcBlocksInLinkTable", self.dslc_blocks_in_link_table.get()),
            ("maxDslcEraseCycleCount", self.max_dslc_erase_cycle_count.get()),
            ("avgDslcEraseCycleCount", self.avg_dslc_erase_cycle_count.get()),
            ("dslcNandWrite", self.dslc_nand_write.get()),
            ("dslcNandRead", self.dslc_nand_read.get()),
            ("dslcToDslcDefragCount", self.dslc_to_dslc_defrag_count.get()),
            ("dslcProgramFail", self.dslc_program_fail.get()),
            ("dslcEraseFail", self.dslc_erase_fail.get()),
            ("dslcRetiredBlocks", self.dslc_retired_blocks.get()),
            ("dslcAllocSize", self.dslc_alloc_size.get()),
            ("reconditionCounts", self.recondition_counts.get()),
            ("minDslcEraseCount", self.min_dslc_erase_count.get()),
            ("maxTotalEraseCount", self.max_total_erase_count.get()),
            ("minTotalEraseCount", self.min_total_erase_count.get()),
            ("avgTotalEraseCount", self.avg_total_erase_count.get()),
            ("maxOpenSsgsCount", self.max_open_ssgs_count.get()),
            ("maxClosedSsgsCount", self.max_closed_ssgs_count.get()),
            ("slcDummyWrites", self.slc_dummy_writes.get()),
            ("tlcDummyWrites", self.tlc_dummy_writes.get()),
            ("dslcDummyWrites", self.dslc_dummy_writes.get()),
            ("dummyReads", self.dummy_reads.get()),
            ("coreDumpCount", self.core_dump_count.get()),
            ("dataTrim", self.data_trim.get()),
            ("tlcWaiWithDslcAsTlcSize", self.tlc_wai_with_dslc_as_tlc_size.get()),
            ("tlcWaiWithDslcAsSlcSize", self.tlc_wai_with_dslc_as_slc_size.get()),
            ("slcWai", self.slc_wai.get()),
            ("tlcTotalEraseCount", self.tlc_total_erase_count.get()),
            ("slcTotalEraseCount", self.slc_total_erase_count.get()),
            ("dslcTotalEraseCount", self.dslc_total_erase_count.get()),
            ("tlcBlockSectorCount", self.tlc_block_sector_count.get()),
            ("mapBlockPopCount", self.map_block_pop_count.get()),
            ("gwProBlockPopCount", self.gw_pro_block_pop_count.get()),
            ("dramRetrainCount", self.dram_retrain_count.get()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::view;

    fn put(raw: &mut [u8], index: usize, value: u64) {
        raw[index * 8..index * 8 + 8].copy_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn test_counters_skip_reserved_slots() {
        let mut raw = [0u8; 4096];
        put(&mut raw, 1, 11);
        // slot 84 is reserved, slot 85 is slcMaxCwErrorCountWithRrPass
        put(&mut raw, 84, 0xFFFF);
        put(&mut raw, 85, 85);
        put(&mut raw, 134, 134);

        let log = view::<Series61VendorLog>(&raw).unwrap();
        let counters = log.counters();
        assert_eq!(counters[0], ("reallocSectorCount", 11));
        assert!(counters.iter().all(|&(_, v)| v != 0xFFFF));
        assert!(counters.contains(&("slcMaxCwErrorCountWithRrPass", 85)));
        assert_eq!(counters[SERIES61_COUNTERS - 1], ("dramRetrainCount", 134));
    }

    #[test]
    fn test_version_bytes() {
        let mut raw = [0u8; 4096];
        put(&mut raw, 0, 0x0102_0304_0506_0708);
        let log = view::<Series61VendorLog>(&raw).unwrap();
        assert_eq!(log.version_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
