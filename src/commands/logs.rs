//! Vendor log page parsers

use vtnvme_core::admin::{self, SERIES61_LOG_LEN, TELEMETRY_LOG_LEN};
use vtnvme_core::structs::{self, Series61VendorLog, TelemetryBlock, TELEMETRY_BLOCK_OFFSET};
use vtnvme_core::AdminChannel;

use super::CmdResult;

/// Render the Series 32 telemetry block, one field per line
pub fn format_telemetry(block: &TelemetryBlock) -> String {
    let mut out = String::new();
    for (label, value) in block.fields() {
        out.push_str(&format!("{}: {}\n", label, value));
    }

    let temps: Vec<String> = block.nand_temp.iter().map(|t| t.to_string()).collect();
    out.push_str(&format!("All NAND die temps: {} \n", temps.join(" ")));

    for (label, value) in block.link_fields() {
        out.push_str(&format!("{}: {}\n", label, value));
    }
    out
}

/// Render the Series 61 vendor counters, one per line
pub fn format_series61(log: &Series61VendorLog) -> String {
    let version: String = log
        .version_bytes()
        .iter()
        .map(|&b| (b as i8).to_string())
        .collect();
    let mut out = format!("version8: {}\n", version);
    for (label, value) in log.counters() {
        out.push_str(&format!("{}: {}\n", label, value as i64));
    }
    out
}

pub fn run_parse_telemetry<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut raw = [0u8; TELEMETRY_LOG_LEN];
    admin::telemetry_host(channel, &mut raw)?;
    let block = structs::view::<TelemetryBlock>(&raw[TELEMETRY_BLOCK_OFFSET..])
        .map_err(vtnvme_core::Error::from)?;
    print!("{}", format_telemetry(block));
    Ok(())
}

pub fn run_parse_series61<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut raw = [0u8; SERIES61_LOG_LEN];
    if let Err(e) = admin::series61_vendor_log(channel, &mut raw) {
        println!("Invalid log page access!");
        return Err(e.into());
    }
    let log = structs::view::<Series61VendorLog>(&raw).map_err(vtnvme_core::Error::from)?;
    print!("{}", format_series61(log));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtnvme_dummy::DummyNvme;

    #[test]
    fn test_telemetry_lines() {
        let mut nvme = DummyNvme::new_default();
        let mut raw = [0u8; TELEMETRY_LOG_LEN];
        admin::telemetry_host(&mut nvme, &mut raw).unwrap();
        let block = structs::view::<TelemetryBlock>(&raw[TELEMETRY_BLOCK_OFFSET..]).unwrap();
        let text = format_telemetry(block);

        assert!(text.starts_with("min composite temp: 20\n"));
        assert!(text.contains("max composite temp: 71\n"));
        assert!(text.contains("Current PCIe link up width: 4\n"));
        assert!(text.contains("All NAND die temps: 40 41 42 43 40"));
        assert!(text.ends_with("PCIe link up in width=x4 count: 0\n"));
        assert_eq!(text.lines().count(), 56 + 1 + 4);
    }

    #[test]
    fn test_series61_lines() {
        let mut raw = vec![0u8; SERIES61_LOG_LEN];
        // version8 = 01 02 .. 08 read most significant byte first
        raw[0..8].copy_from_slice(&0x0102_0304_0506_07F8u64.to_le_bytes());
        raw[8..16].copy_from_slice(&17u64.to_le_bytes());
        let log = structs::view::<Series61VendorLog>(&raw).unwrap();
        let text = format_series61(log);

        assert!(text.starts_with("version8: 1234567-8\n"));
        assert!(text.contains("reallocSectorCount: 17\n"));
    }

    #[test]
    fn test_series61_unsupported_log_page() {
        struct NoVendorLog(DummyNvme);
        impl AdminChannel for NoVendorLog {
            fn submit(
                &mut self,
                cmd: &mut vtnvme_core::AdminCommand<'_>,
            ) -> vtnvme_core::Result<u32> {
                if cmd.cdw10 & 0xFF == 0xC6 {
                    return Err(vtnvme_core::Error::Channel(vtnvme_core::error::ChannelError {
                        opcode: cmd.opcode,
                        status: 0x0109,
                    }));
                }
                self.0.submit(cmd)
            }
        }

        let mut channel = NoVendorLog(DummyNvme::new_default());
        let err = run_parse_series61(&mut channel).unwrap_err();
        assert_eq!(crate::commands::exit_code(err.as_ref()), 255);
    }
}
