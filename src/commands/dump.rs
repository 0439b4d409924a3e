//! Event log and crash dump extraction

use std::path::Path;
use vtnvme_core::error::{Error, ParameterMismatch};
use vtnvme_core::extract::{self, Dataset, EraseOutcome, ExtractOutcome};
use vtnvme_core::vendor::VendorSession;
use vtnvme_core::AdminChannel;

use super::output::{FileSink, IndicatifProgress};
use super::CmdResult;

/// Extract the event log into `output`
pub fn run_get_event_log<C: AdminChannel + ?Sized>(channel: &mut C, output: &Path) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let mut progress = IndicatifProgress::new("Event log");

    let result = extract::extract(
        &mut session,
        Dataset::EventLog,
        |params| {
            println!(
                "Extracting {} event log blocks from drive to {}",
                params.unit_count,
                output.display()
            );
            FileSink::create(output)
        },
        &mut progress,
    );

    match result {
        Ok(ExtractOutcome::Empty(_)) => {
            println!("No event log blocks on drive");
            Ok(())
        }
        Ok(ExtractOutcome::Completed { .. }) => {
            println!("Finished extracting event log blocks");
            Ok(())
        }
        Err(e @ Error::ParameterMismatch(ParameterMismatch::KindTag { .. })) => {
            println!("Expected token type logs. Exiting");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Show crash dump information, then erase if asked
pub fn run_get_crash_info<C: AdminChannel + ?Sized>(channel: &mut C, erase: bool) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let info = extract::read_crash_info(&mut session)?;

    println!("Number of images: {}", info.image_count);
    println!("Page Size: {}", info.page_size);
    println!("Page Count: {}", info.page_count);
    println!("Image Size: {}", info.image_size);

    if erase {
        match extract::erase_crash_dump(&mut session, &info) {
            Ok(EraseOutcome::Erased) => println!("Crashdump erased"),
            Ok(EraseOutcome::NothingToErase) => println!("Nothing to erase"),
            Err(e) => {
                println!("Crashdump erase failed");
                return Err(e.into());
            }
        }
    }
    Ok(())
}

/// Extract crash dump `image` into `output`
pub fn run_get_crash_dump<C: AdminChannel + ?Sized>(
    channel: &mut C,
    image: u8,
    output: &Path,
) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let mut progress = IndicatifProgress::new("Crash dump");

    let result = extract::extract(
        &mut session,
        Dataset::CrashDump { image },
        |params| {
            println!(
                "Extracting {} pages of crash data from drive to file {}",
                params.unit_count,
                output.display()
            );
            FileSink::create(output)
        },
        &mut progress,
    );

    match result {
        Ok(ExtractOutcome::Empty(_)) => {
            println!("Crash dump {} has no pages", image);
            Ok(())
        }
        Ok(ExtractOutcome::Completed { .. }) => {
            println!("Finished extracting crash dump");
            Ok(())
        }
        Err(
            e @ Error::ParameterMismatch(ParameterMismatch::NoSuchImage {
                requested,
                available,
            }),
        ) => {
            println!(
                "No crash dump {} on drive. Only {} images. Exiting",
                requested, available
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::exit_code;
    use vtnvme_dummy::{DummyConfig, DummyNvme};

    #[test]
    fn test_event_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventlog.dat");
        let mut nvme = DummyNvme::new_default();

        run_get_event_log(&mut nvme, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 3 * 4096);
        assert_eq!(written, nvme.expected_event_log());
    }

    #[test]
    fn test_event_log_empty_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventlog.dat");
        let mut nvme = DummyNvme::new(DummyConfig {
            event_records: 0,
            ..Default::default()
        });

        run_get_event_log(&mut nvme, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_event_log_wrong_type_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventlog.dat");
        let mut nvme = DummyNvme::new(DummyConfig {
            event_record_type: 7,
            ..Default::default()
        });

        let err = run_get_event_log(&mut nvme, &path).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_event_log_failure_keeps_written_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventlog.dat");
        let mut nvme = DummyNvme::new_default();
        // Execute of the third record
        nvme.fail_command(7, 0x0004);

        let err = run_get_event_log(&mut nvme, &path).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 4);
        assert_eq!(std::fs::read(&path).unwrap().len(), 2 * 4096);
    }

    #[test]
    fn test_crash_dump_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashdump.dat");
        let mut nvme = DummyNvme::new_default();

        run_get_crash_dump(&mut nvme, 1, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), nvme.expected_crash_image(1));
    }

    #[test]
    fn test_crash_dump_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashdump.dat");
        let mut nvme = DummyNvme::new_default();

        assert!(run_get_crash_dump(&mut nvme, 2, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_crash_info_erase_twice() {
        let mut nvme = DummyNvme::new_default();
        run_get_crash_info(&mut nvme, true).unwrap();
        assert_eq!(nvme.crash_images(), 0);
        let submitted = nvme.submitted();

        // Info only, nothing left to erase
        run_get_crash_info(&mut nvme, true).unwrap();
        assert_eq!(nvme.submitted(), submitted + 2);
    }

    #[test]
    fn test_crash_dump_failure_keeps_written_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashdump.dat");
        let mut nvme = DummyNvme::new_default();
        let expected = nvme.expected_crash_image(1);
        // 0,1 info; 2,3 page 0; 4,5 page 1; 7 is the execute of page 2
        nvme.fail_command(7, 0x0006);

        let err = run_get_crash_dump(&mut nvme, 1, &path).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 6);
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 2 * (4096 + 512));
        assert_eq!(written, &expected[..2 * (4096 + 512)]);
    }

    #[test]
    fn test_crash_erase_failure_keeps_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashdump.dat");
        let mut nvme = DummyNvme::new_default();
        // 0,1 info; 2 erase arm; 3 erase execute
        nvme.fail_command(3, 0x0002);

        let err = run_get_crash_info(&mut nvme, true).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 2);
        assert_eq!(nvme.crash_images(), 1);

        run_get_crash_dump(&mut nvme, 1, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), nvme.expected_crash_image(1));
    }
}
