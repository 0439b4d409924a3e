//! Output files and progress reporting for bulk extraction

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use vtnvme_core::extract::{ExtractProgress, ExtractStats, PageSink};
use vtnvme_core::header::ExtractionParameters;

/// Page sink writing straight to a file, one write per page
///
/// Pages that reached the file stay there when a later page fails.
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Create (or truncate) the output file
    pub fn create(path: &Path) -> vtnvme_core::Result<Self> {
        let file = File::create(path).map_err(|e| {
            log::error!("Cannot create {}: {}", path.display(), e);
            vtnvme_core::Error::Sink
        })?;
        log::debug!("Writing to {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl PageSink for FileSink {
    fn write_page(&mut self, page: &[u8]) -> vtnvme_core::Result<()> {
        self.file.write_all(page).map_err(|e| {
            log::error!("Cannot write {}: {}", self.path.display(), e);
            vtnvme_core::Error::Sink
        })
    }

    fn finish(&mut self) -> vtnvme_core::Result<()> {
        self.file.sync_all().map_err(|e| {
            log::error!("Cannot flush {}: {}", self.path.display(), e);
            vtnvme_core::Error::Sink
        })
    }
}

/// Create a progress bar with custom phase message
fn create_progress_bar_with_phase(total: u64, phase: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
            phase
        ))
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Progress reporter using an indicatif progress bar
pub struct IndicatifProgress {
    phase: &'static str,
    bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new(phase: &'static str) -> Self {
        Self { phase, bar: None }
    }
}

impl ExtractProgress for IndicatifProgress {
    fn started(&mut self, params: &ExtractionParameters) {
        let total = params.unit_count as u64 * params.unit_size as u64;
        self.bar = Some(create_progress_bar_with_phase(total, self.phase));
    }

    fn page_done(&mut self, _pages: u32, bytes: u64) {
        if let Some(pb) = &self.bar {
            pb.set_position(bytes);
        }
    }

    fn finished(&mut self, stats: &ExtractStats) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
        log::debug!("{}: {} pages, {} bytes", self.phase, stats.pages, stats.bytes);
    }
}

impl Drop for IndicatifProgress {
    fn drop(&mut self) {
        // An aborted run leaves the bar where it stopped
        if let Some(pb) = self.bar.take() {
            pb.abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.dat");
        let mut sink = FileSink::create(&path).unwrap();
        sink.write_page(&[1, 2, 3]).unwrap();
        sink.write_page(&[4, 5]).unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_file_sink_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pages.dat");
        assert!(matches!(
            FileSink::create(&path),
            Err(vtnvme_core::Error::Sink)
        ));
    }
}
