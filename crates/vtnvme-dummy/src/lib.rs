//! vtnvme-dummy - In-memory Virtium NVMe drive emulator
//!
//! This crate provides an admin channel that answers the standard Identify
//! and Get Log Page commands and the two-phase vendor protocol from
//! memory. It is useful for testing and development without real hardware.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use vtnvme_core::error::{ChannelError, Error, ResourceError, Result};
use vtnvme_core::header::CRASH_PAGE_TRAILER;
use vtnvme_core::vendor::CONTROL_BUFFER_LEN;
use vtnvme_core::{opcodes, AdminChannel, AdminCommand};

/// NVMe status codes returned by the emulator
pub mod status {
    /// Invalid Command Opcode
    pub const INVALID_OPCODE: i32 = 0x0001;
    /// Invalid Field in Command
    pub const INVALID_FIELD: i32 = 0x0002;
    /// Invalid Log Page
    pub const INVALID_LOG_PAGE: i32 = 0x0109;
}

/// Configuration for the dummy drive
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Serial number
    pub serial: &'static str,
    /// Model number
    pub model: &'static str,
    /// Firmware revision
    pub firmware_revision: &'static str,
    /// Custom firmware version string
    pub firmware_string: &'static str,
    /// Over-provisioning percentage
    pub over_provisioning: &'static str,
    /// Event log records
    pub event_records: u32,
    /// Bytes per event log record
    pub event_record_size: u32,
    /// Record type reported in the event log info
    pub event_record_type: u32,
    /// Stored crash dump images
    pub crash_images: u16,
    /// Pages per crash dump image
    pub crash_pages: u16,
    /// Crash dump page size without trailer
    pub crash_page_size: u32,
    /// Namespace size in 512-byte blocks
    pub namespace_blocks: u64,
    /// Composite temperature in Kelvin
    pub temperature: u16,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            serial: "VTDUMMY00000001",
            model: "Virtium StorFly Emulated",
            firmware_revision: "EMU0001",
            firmware_string: "VT-EMU-FW 1.00",
            over_provisioning: "7",
            event_records: 3,
            event_record_size: 4096,
            event_record_type: 2,
            crash_images: 1,
            crash_pages: 4,
            crash_page_size: 4096,
            // 64 GB
            namespace_blocks: 125_000_000,
            temperature: 310,
        }
    }
}

/// Contents of event log record `index`
pub fn event_record(index: u32, size: u32) -> impl Iterator<Item = u8> {
    let tag = index.to_le_bytes();
    (0..size).map(move |i| match i {
        0..=3 => tag[i as usize],
        _ => (index as u8).wrapping_mul(31).wrapping_add(i as u8),
    })
}

/// Contents of crash dump page `index` of `image`, trailer included
pub fn crash_page(image: u8, index: u16, size: u32) -> impl Iterator<Item = u8> {
    let tag = index.to_le_bytes();
    (0..size).map(move |i| match i {
        0 => image,
        1..=2 => tag[i as usize - 1],
        _ => image ^ (index as u8) ^ (i as u8),
    })
}

/// Emulated Virtium NVMe drive
///
/// The arm command stores the control buffer; the following execute is
/// answered from whatever selector was armed last. Event log records
/// stream from an internal cursor that the info request rewinds. Crash
/// page arms that follow each other are numbered; arm `n` must carry page
/// index `n` two bytes after the index of arm `n - 1`.
#[cfg(feature = "alloc")]
pub struct DummyNvme {
    config: DummyConfig,
    control: [u8; CONTROL_BUFFER_LEN],
    armed: bool,
    event_cursor: u32,
    crash_slot: Option<u16>,
    crash_erased: bool,
    serial: String,
    model: String,
    over_provisioning: String,
    submitted: usize,
    failures: Vec<(usize, i32)>,
}

#[cfg(feature = "alloc")]
impl DummyNvme {
    /// Create a new dummy drive with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            serial: config.serial.into(),
            model: config.model.into(),
            over_provisioning: config.over_provisioning.into(),
            config,
            control: [0; CONTROL_BUFFER_LEN],
            armed: false,
            event_cursor: 0,
            crash_slot: None,
            crash_erased: false,
            submitted: 0,
            failures: Vec::new(),
        }
    }

    /// Create a new dummy drive with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current serial number
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Current model number
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Current over-provisioning setting
    pub fn over_provisioning(&self) -> &str {
        &self.over_provisioning
    }

    /// Stored crash images, zero after an erase
    pub fn crash_images(&self) -> u16 {
        if self.crash_erased {
            0
        } else {
            self.config.crash_images
        }
    }

    /// Commands submitted so far
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Complete command number `nth` (zero based) with `status`
    pub fn fail_command(&mut self, nth: usize, status: i32) {
        self.failures.push((nth, status));
    }

    /// The whole event log as the host should receive it
    pub fn expected_event_log(&self) -> Vec<u8> {
        (0..self.config.event_records)
            .flat_map(|i| event_record(i, self.config.event_record_size))
            .collect()
    }

    /// One crash image as the host should receive it
    pub fn expected_crash_image(&self, image: u8) -> Vec<u8> {
        let size = self.crash_transfer_size();
        (0..self.config.crash_pages)
            .flat_map(|p| crash_page(image, p, size))
            .collect()
    }

    fn crash_transfer_size(&self) -> u32 {
        self.config.crash_page_size + CRASH_PAGE_TRAILER
    }

    fn reject(opcode: u8, status: i32) -> Error {
        log::debug!("dummy_nvme: opcode {:#04x} -> status {:#06x}", opcode, status);
        Error::Channel(ChannelError { opcode, status })
    }

    fn handle_arm(&mut self, cmd: &mut AdminCommand<'_>) -> Result<()> {
        let payload = cmd.payload();
        self.crash_slot = if payload.starts_with(&[0x78, 0x01]) {
            Some(self.crash_slot.map_or(0, |n| n.saturating_add(1)))
        } else {
            None
        };
        self.control.fill(0);
        let len = core::cmp::min(payload.len(), CONTROL_BUFFER_LEN);
        self.control[..len].copy_from_slice(&payload[..len]);
        self.armed = true;
        log::trace!("dummy_nvme: armed {:02X?}", &self.control[..6]);
        Ok(())
    }

    fn handle_execute_write(&mut self, cmd: &mut AdminCommand<'_>) -> Result<()> {
        if !self.armed {
            return Err(Self::reject(cmd.opcode, status::INVALID_FIELD));
        }
        let value = ascii_value(cmd.payload());
        match (self.control[0], self.control[1], self.control[2]) {
            (0x26, 0x05, 0x01) => self.serial = value,
            (0x26, 0x05, 0x00) => self.model = value,
            _ => return Err(Self::reject(cmd.opcode, status::INVALID_FIELD)),
        }
        Ok(())
    }

    fn handle_execute(&mut self, cmd: &mut AdminCommand<'_>) -> Result<()> {
        if !self.armed {
            return Err(Self::reject(cmd.opcode, status::INVALID_FIELD));
        }
        let opcode = cmd.opcode;
        let c = self.control;
        let out = cmd.payload_mut();
        out.fill(0);

        match (c[0], c[1]) {
            (0x82, 0x01) => {
                self.event_cursor = 0;
                let info = [
                    self.config.event_records,
                    self.config.event_record_size,
                    self.config.event_record_type,
                ];
                for (chunk, value) in out.chunks_mut(4).zip(info) {
                    let bytes = value.to_le_bytes();
                    chunk.copy_from_slice(&bytes[..chunk.len()]);
                }
            }
            (0x83, 0x01) => {
                if self.event_cursor >= self.config.event_records {
                    return Err(Self::reject(opcode, status::INVALID_FIELD));
                }
                let record = event_record(self.event_cursor, self.config.event_record_size);
                for (dst, src) in out.iter_mut().zip(record) {
                    *dst = src;
                }
                self.event_cursor += 1;
            }
            (0x77, 0x01) => {
                let images = self.crash_images();
                let mut info = [0u8; 12];
                info[0..4].copy_from_slice(&self.config.crash_page_size.to_le_bytes());
                info[4..6].copy_from_slice(&self.config.crash_pages.to_le_bytes());
                info[6..8].copy_from_slice(&images.to_le_bytes());
                let image_size = self.config.crash_page_size * self.config.crash_pages as u32;
                info[8..12].copy_from_slice(&image_size.to_le_bytes());
                let n = core::cmp::min(out.len(), info.len());
                out[..n].copy_from_slice(&info[..n]);
            }
            (0x78, 0x01) => {
                let image = c[2];
                let slot = self.crash_slot.unwrap_or(0);
                let at = 3 + 2 * slot as usize;
                if at + 2 > CONTROL_BUFFER_LEN {
                    return Err(Self::reject(opcode, status::INVALID_FIELD));
                }
                let page = u16::from_le_bytes([c[at], c[at + 1]]);
                if page != slot
                    || image as u16 > self.crash_images()
                    || page >= self.config.crash_pages
                {
                    return Err(Self::reject(opcode, status::INVALID_FIELD));
                }
                for (dst, src) in out.iter_mut().zip(crash_page(image, page, self.crash_transfer_size())) {
                    *dst = src;
                }
            }
            (0x79, 0x01) => {
                log::debug!("dummy_nvme: crash dump erased");
                self.crash_erased = true;
            }
            (0x16, _) => copy_str(out, self.config.firmware_string),
            (0x25, 0x05) if c[2] == 0x01 => copy_str(out, &self.serial),
            (0x25, 0x05) => copy_str(out, &self.model),
            (0x27, 0x05) if c[2] == 0x01 => {
                self.over_provisioning = ascii_value(&c[3..]);
            }
            (0x27, 0x05) => copy_str(out, &self.over_provisioning),
            _ => return Err(Self::reject(opcode, status::INVALID_FIELD)),
        }
        Ok(())
    }

    fn handle_identify(&self, cmd: &mut AdminCommand<'_>) -> Result<()> {
        let opcode = cmd.opcode;
        let cdw10 = cmd.cdw10;
        let out = cmd.payload_mut();
        if out.len() < 4096 {
            return Err(Self::reject(opcode, status::INVALID_FIELD));
        }
        out.fill(0);
        match cdw10 & 0xFF {
            0x01 => self.fill_identify_controller(out),
            0x00 => {
                out[0..8].copy_from_slice(&self.config.namespace_blocks.to_le_bytes());
                out[8..16].copy_from_slice(&self.config.namespace_blocks.to_le_bytes());
                // lbaf[0]: 512-byte data
                out[128 + 2] = 9;
            }
            _ => return Err(Self::reject(opcode, status::INVALID_FIELD)),
        }
        Ok(())
    }

    fn fill_identify_controller(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&0x1D78u16.to_le_bytes());
        out[2..4].copy_from_slice(&0x1D78u16.to_le_bytes());
        pad_str(&mut out[4..24], &self.serial);
        pad_str(&mut out[24..64], &self.model);
        pad_str(&mut out[64..72], self.config.firmware_revision);
        out[77] = 5;
        // Version 1.4
        out[80..84].copy_from_slice(&0x0001_0400u32.to_le_bytes());
        // Format NVM, firmware download, self-test
        out[256..258].copy_from_slice(&0x0016u16.to_le_bytes());
        out[259] = 3;
        // Two firmware slots
        out[260] = 0x02 << 1;
        out[261] = 0x08;
        out[262] = 63;
        out[263] = 2;
        out[266..268].copy_from_slice(&358u16.to_le_bytes());
        out[268..270].copy_from_slice(&363u16.to_le_bytes());
        out[512] = 0x66;
        out[513] = 0x44;
        out[516..520].copy_from_slice(&1u32.to_le_bytes());
        out[520..522].copy_from_slice(&0x005Fu16.to_le_bytes());
        out[525] = 0x01;

        let states: [(u16, u32, u32, u8); 3] = [(900, 0, 0, 0), (600, 5, 5, 0), (5, 2000, 8000, 0x02)];
        for (i, (mp, enlat, exlat, flags)) in states.into_iter().enumerate() {
            let psd = &mut out[2048 + i * 32..2048 + (i + 1) * 32];
            psd[0..2].copy_from_slice(&mp.to_le_bytes());
            psd[3] = flags;
            psd[4..8].copy_from_slice(&enlat.to_le_bytes());
            psd[8..12].copy_from_slice(&exlat.to_le_bytes());
            psd[12] = i as u8;
            psd[13] = i as u8;
            psd[14] = i as u8;
            psd[15] = i as u8;
        }
        copy_str(&mut out[3072..], "VIRTIUM");
    }

    fn handle_get_log_page(&self, cmd: &mut AdminCommand<'_>) -> Result<()> {
        let lid = (cmd.cdw10 & 0xFF) as u8;
        let opcode = cmd.opcode;
        let out = cmd.payload_mut();
        out.fill(0);
        match lid {
            opcodes::LID_SMART if out.len() >= 512 => {
                out[1..3].copy_from_slice(&self.config.temperature.to_le_bytes());
                out[3] = 100;
                out[4] = 10;
                out[5] = 1;
                out[32..40].copy_from_slice(&1_234_567u64.to_le_bytes());
                out[48..56].copy_from_slice(&765_432u64.to_le_bytes());
                out[112..120].copy_from_slice(&42u64.to_le_bytes());
                out[128..136].copy_from_slice(&1_000u64.to_le_bytes());
                out[144..152].copy_from_slice(&3u64.to_le_bytes());
                out[200..202].copy_from_slice(&(self.config.temperature - 2).to_le_bytes());
            }
            opcodes::LID_FIRMWARE_SLOT if out.len() >= 512 => {
                out[0] = 0x01;
                pad_str(&mut out[8..16], self.config.firmware_revision);
            }
            opcodes::LID_TELEMETRY_HOST if out.len() >= 1024 => {
                let block = &mut out[512..];
                block[16..18].copy_from_slice(&20u16.to_le_bytes());
                block[20..22].copy_from_slice(&71u16.to_le_bytes());
                // Valid spare blocks
                block[0x30..0x32].copy_from_slice(&96u16.to_le_bytes());
                block[0x40..0x44].copy_from_slice(&1_500u32.to_le_bytes());
                block[0x140..0x144].copy_from_slice(&12u32.to_le_bytes());
                block[0x16C] = 4;
                block[0x16D] = 4;
                for (i, t) in block[0x180..0x1A0].iter_mut().enumerate() {
                    *t = 40 + (i as u8 % 4);
                }
            }
            opcodes::LID_SERIES61_VENDOR => {
                for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
                    chunk.copy_from_slice(&(i as u64 * 10).to_le_bytes());
                }
            }
            _ => return Err(Self::reject(opcode, status::INVALID_LOG_PAGE)),
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl AdminChannel for DummyNvme {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> Result<u32> {
        let nth = self.submitted;
        self.submitted += 1;

        if cmd.data_len as usize > cmd.data.len() {
            return Err(Error::Resource(ResourceError::BufferTooSmall {
                needed: cmd.data_len as usize,
                got: cmd.data.len(),
            }));
        }
        if let Some(&(_, status)) = self.failures.iter().find(|(n, _)| *n == nth) {
            return Err(Self::reject(cmd.opcode, status));
        }

        log::trace!(
            "dummy_nvme: opcode={:#04x} cdw10={:#x} cdw12={:#x} len={}",
            cmd.opcode,
            cmd.cdw10,
            cmd.cdw12,
            cmd.data_len
        );

        match (cmd.opcode, cmd.cdw12) {
            (opcodes::VENDOR_ARM, opcodes::ARM_CDW12) => self.handle_arm(cmd)?,
            (opcodes::VENDOR_EXECUTE_WRITE, opcodes::EXECUTE_CDW12) => {
                self.handle_execute_write(cmd)?
            }
            (opcodes::VENDOR_EXECUTE, opcodes::EXECUTE_CDW12) => self.handle_execute(cmd)?,
            (opcodes::IDENTIFY, _) => self.handle_identify(cmd)?,
            (opcodes::GET_LOG_PAGE, _) => self.handle_get_log_page(cmd)?,
            _ => return Err(Self::reject(cmd.opcode, status::INVALID_OPCODE)),
        }
        Ok(0)
    }

    fn namespace_id(&mut self) -> Result<u32> {
        Ok(1)
    }
}

#[cfg(feature = "alloc")]
fn ascii_value(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| b as char).collect()
}

#[cfg(feature = "alloc")]
fn copy_str(out: &mut [u8], s: &str) {
    let n = core::cmp::min(out.len(), s.len());
    out[..n].copy_from_slice(&s.as_bytes()[..n]);
}

#[cfg(feature = "alloc")]
fn pad_str(out: &mut [u8], s: &str) {
    out.fill(b' ');
    copy_str(out, s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtnvme_core::extract::{self, Dataset, ExtractOutcome, NoProgress};
    use vtnvme_core::params;
    use vtnvme_core::structs::{self, IdController, SmartLog};
    use vtnvme_core::vendor::VendorSession;
    use vtnvme_core::{admin, error::ParameterMismatch};

    fn extract_to_vec(
        nvme: &mut DummyNvme,
        dataset: Dataset,
    ) -> (Result<ExtractOutcome>, Vec<u8>) {
        let mut out = Vec::new();
        let sink = &mut out;
        let mut session = VendorSession::new(nvme);
        let result = extract::extract(&mut session, dataset, move |_| Ok(sink), &mut NoProgress);
        (result, out)
    }

    #[test]
    fn test_event_log_round_trip() {
        let mut nvme = DummyNvme::new_default();
        let expected = nvme.expected_event_log();
        let (result, out) = extract_to_vec(&mut nvme, Dataset::EventLog);

        match result.unwrap() {
            ExtractOutcome::Completed { stats, .. } => {
                assert_eq!(stats.pages, 3);
                assert_eq!(stats.bytes, 3 * 4096);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn test_event_log_wrong_type() {
        let mut nvme = DummyNvme::new(DummyConfig {
            event_record_type: 1,
            ..Default::default()
        });
        let (result, out) = extract_to_vec(&mut nvme, Dataset::EventLog);
        assert!(matches!(
            result,
            Err(Error::ParameterMismatch(ParameterMismatch::KindTag { found: 1, .. }))
        ));
        assert!(out.is_empty());
        // Info arm and execute only
        assert_eq!(nvme.submitted(), 2);
    }

    #[test]
    fn test_event_log_partial_failure() {
        let mut nvme = DummyNvme::new_default();
        let expected = nvme.expected_event_log();
        // 0,1 info; 2,3 first record; 4,5 second record
        nvme.fail_command(5, 0x4002);
        let (result, out) = extract_to_vec(&mut nvme, Dataset::EventLog);

        assert_eq!(result.unwrap_err().channel_status(), Some(0x4002));
        assert_eq!(out, &expected[..4096]);
    }

    #[test]
    fn test_crash_dump_image() {
        let mut nvme = DummyNvme::new(DummyConfig {
            crash_images: 2,
            crash_pages: 3,
            crash_page_size: 1024,
            ..Default::default()
        });
        let expected = nvme.expected_crash_image(2);
        let (result, out) = extract_to_vec(&mut nvme, Dataset::CrashDump { image: 2 });
        assert!(matches!(result, Ok(ExtractOutcome::Completed { .. })));
        assert_eq!(out.len(), 3 * (1024 + 512));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_crash_dump_missing_image() {
        let mut nvme = DummyNvme::new_default();
        let (result, out) = extract_to_vec(&mut nvme, Dataset::CrashDump { image: 5 });
        assert!(matches!(
            result,
            Err(Error::ParameterMismatch(ParameterMismatch::NoSuchImage {
                requested: 5,
                available: 1
            }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_crash_page_index_follows_previous_index() {
        let mut nvme = DummyNvme::new_default();
        let mut page = vec![0u8; 4096 + 512];
        let fetch = |nvme: &mut DummyNvme, control: &[u8], page: &mut [u8]| {
            let mut buf = [0u8; CONTROL_BUFFER_LEN];
            buf[..control.len()].copy_from_slice(control);
            nvme.submit(&mut AdminCommand::arm(&mut buf))?;
            nvme.submit(&mut AdminCommand::execute(1152, page.len() as u32, page))
        };

        fetch(&mut nvme, &[0x78, 0x01, 1, 0, 0], &mut page).unwrap();
        assert_eq!(page[1..3], [0, 0]);
        fetch(&mut nvme, &[0x78, 0x01, 1, 0, 0, 1, 0], &mut page).unwrap();
        assert_eq!(page[1..3], [1, 0]);

        // Page 2 written over page 0's index
        let err = fetch(&mut nvme, &[0x78, 0x01, 1, 2, 0], &mut page).unwrap_err();
        assert_eq!(err.channel_status(), Some(status::INVALID_FIELD));
    }

    #[test]
    fn test_crash_erase() {
        let mut nvme = DummyNvme::new_default();
        let mut session = VendorSession::new(&mut nvme);
        let info = extract::read_crash_info(&mut session).unwrap();
        assert_eq!(info.image_count, 1);
        assert_eq!(info.page_count, 4);
        assert_eq!(info.image_size, 4 * 4096);

        let outcome = extract::erase_crash_dump(&mut session, &info).unwrap();
        assert_eq!(outcome, extract::EraseOutcome::Erased);

        let info = extract::read_crash_info(&mut session).unwrap();
        assert_eq!(info.image_count, 0);
        let before = nvme.submitted();
        let mut session = VendorSession::new(&mut nvme);
        assert_eq!(
            extract::erase_crash_dump(&mut session, &info).unwrap(),
            extract::EraseOutcome::NothingToErase
        );
        assert_eq!(nvme.submitted(), before);
    }

    #[test]
    fn test_scalar_params() {
        let mut nvme = DummyNvme::new_default();
        let mut session = VendorSession::new(&mut nvme);
        assert_eq!(params::read_serial_number(&mut session).unwrap().as_str(), "VTDUMMY00000001");
        assert_eq!(params::read_firmware_string(&mut session).unwrap().as_str(), "VT-EMU-FW 1.00");

        params::write_serial_number(&mut session, "NEW-SERIAL").unwrap();
        params::write_model_number(&mut session, "New Model").unwrap();
        params::write_over_provisioning(&mut session, "28").unwrap();

        assert_eq!(params::read_serial_number(&mut session).unwrap().as_str(), "NEW-SERIAL");
        assert_eq!(params::read_model_number(&mut session).unwrap().as_str(), "New Model");
        assert_eq!(params::read_over_provisioning(&mut session).unwrap().as_str(), "28");
        assert_eq!(nvme.serial(), "NEW-SERIAL");
    }

    #[test]
    fn test_identify_and_logs() {
        let mut nvme = DummyNvme::new_default();
        let mut id = [0u8; structs::IDENTIFY_LEN];
        admin::identify_controller(&mut nvme, &mut id).unwrap();
        let ctrl = structs::view::<IdController>(&id).unwrap();
        assert_eq!(ctrl.serial(), "VTDUMMY00000001");
        assert_eq!(ctrl.power_states().len(), 3);

        let mut smart = [0u8; admin::SMART_LOG_LEN];
        admin::smart_log(&mut nvme, &mut smart).unwrap();
        let log = structs::view::<SmartLog>(&smart).unwrap();
        assert_eq!(log.temperature.get(), 310);
        assert_eq!(log.power_on_hours.get(), 1000);

        let mut c6 = [0u8; admin::SERIES61_LOG_LEN];
        admin::series61_vendor_log(&mut nvme, &mut c6).unwrap();
        assert_eq!(&c6[8..16], &10u64.to_le_bytes());
    }

    #[test]
    fn test_execute_without_arm_fails() {
        let mut nvme = DummyNvme::new_default();
        let mut buf = [0u8; 16];
        let mut cmd = AdminCommand::execute(4, 16, &mut buf);
        let err = nvme.submit(&mut cmd).unwrap_err();
        assert_eq!(err.channel_status(), Some(status::INVALID_FIELD));
    }
}
