//! Paged bulk extraction
//!
//! Pulls a multi-page dataset (the event log, or one crash dump image) out of
//! the drive through the two-phase vendor protocol:
//!
//! 1. **Init** - arm the dataset's info selector and fetch its info blob
//! 2. **Decoding** - decode the blob and validate it against the request
//! 3. **Paging** - per page: patch the control buffer, arm, execute, append
//!
//! Crash dump pages share one control buffer for the whole run. Each page
//! index is written two bytes after the previous one, so the buffer bounds
//! the number of pages an image may announce.
//! 4. **Completed** or **Aborted**
//!
//! Nothing is written and no page buffer is allocated unless Decoding
//! succeeds. The first failed round trip aborts the run; pages that were
//! already handed to the sink stay there.

use alloc::vec::Vec;

use crate::channel::AdminChannel;
use crate::error::{Error, ParameterMismatch, ResourceError, Result};
use crate::header::{
    self, CrashInfo, ExtractionParameters, CRASH_INFO_LEN, EVENT_LOG_INFO_LEN,
    EVENT_LOG_KIND_TOKEN,
};
use crate::vendor::selectors;
use crate::vendor::{VendorSession, CONTROL_BUFFER_LEN};

/// Largest crash page count whose indices all fit in the control buffer
pub const MAX_INDEXED_PAGES: u32 =
    ((CONTROL_BUFFER_LEN - selectors::CRASH_PAGE_INDEX_OFFSET) / 2) as u32;

/// cdw10 of the crash info execute command
const CRASH_INFO_CDW10: u32 = 1024;
/// cdw10 of the event log info execute command
const EVENT_LOG_INFO_CDW10: u32 = 3;
/// cdw10 of the crash erase execute command
const CRASH_ERASE_CDW10: u32 = 1024;
/// Transfer length of the crash erase execute command
const CRASH_ERASE_LEN: usize = 512;

// =============================================================================
// Datasets
// =============================================================================

/// A dataset that can be extracted page by page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// The drive's event log
    EventLog,
    /// One stored crash dump image
    CrashDump {
        /// Image number as understood by the firmware
        image: u8,
    },
}

impl Dataset {
    fn info_selector(&self) -> &'static [u8] {
        match self {
            Self::EventLog => selectors::EVENT_LOG_INFO,
            Self::CrashDump { .. } => selectors::CRASH_INFO,
        }
    }

    /// Whether every page request carries its page index
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::CrashDump { .. })
    }

    /// cdw10 of a page execute command
    fn page_cdw10(&self, params: &ExtractionParameters) -> u32 {
        match self {
            Self::EventLog => params.unit_size,
            // Crash pages are requested in dwords
            Self::CrashDump { .. } => params.unit_size / 4,
        }
    }
}

/// Encode a page index as it appears in the control buffer
pub fn encode_page_index(index: u32) -> [u8; 2] {
    [(index % 256) as u8, (index / 256) as u8]
}

// =============================================================================
// Sinks and progress
// =============================================================================

/// Destination of extracted pages
pub trait PageSink {
    /// Append one complete page
    fn write_page(&mut self, page: &[u8]) -> Result<()>;

    /// Called once after the last page
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl PageSink for Vec<u8> {
    fn write_page(&mut self, page: &[u8]) -> Result<()> {
        self.extend_from_slice(page);
        Ok(())
    }
}

impl<S: PageSink + ?Sized> PageSink for &mut S {
    fn write_page(&mut self, page: &[u8]) -> Result<()> {
        (**self).write_page(page)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Progress callback for extraction
pub trait ExtractProgress {
    /// Called when paging starts
    fn started(&mut self, params: &ExtractionParameters);

    /// Called after each page reached the sink
    fn page_done(&mut self, pages: u32, bytes: u64);

    /// Called when every page has been written
    fn finished(&mut self, stats: &ExtractStats);
}

/// A no-op progress reporter
pub struct NoProgress;

impl ExtractProgress for NoProgress {
    fn started(&mut self, _params: &ExtractionParameters) {}
    fn page_done(&mut self, _pages: u32, _bytes: u64) {}
    fn finished(&mut self, _stats: &ExtractStats) {}
}

/// Totals of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Pages written to the sink
    pub pages: u32,
    /// Bytes written to the sink
    pub bytes: u64,
}

/// Result of [`extract`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The drive holds no pages; the sink was never opened
    Empty(ExtractionParameters),
    /// Every page was written
    Completed {
        /// Decoded parameters
        params: ExtractionParameters,
        /// Totals
        stats: ExtractStats,
    },
}

// =============================================================================
// State machine
// =============================================================================

/// Position within the paging loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Next page to fetch
    pub index: u32,
    /// Pages left, including `index`
    pub remaining: u32,
    /// Control buffer offset of the next page index, indexed datasets only
    pub offset: usize,
}

/// Extraction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    /// Nothing sent yet
    Init,
    /// Info blob fetched, not yet validated
    Decoding,
    /// Parameters validated; fetching pages
    Paging(PageCursor),
    /// Every page written
    Completed,
    /// Stopped by an error
    Aborted,
}

/// One extraction run
#[derive(Debug)]
pub struct PagedExtractor {
    dataset: Dataset,
    state: ExtractState,
    params: Option<ExtractionParameters>,
}

impl PagedExtractor {
    /// Prepare a run for `dataset`
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            state: ExtractState::Init,
            params: None,
        }
    }

    /// Current state
    pub fn state(&self) -> ExtractState {
        self.state
    }

    /// Decoded parameters, once Decoding succeeded
    pub fn params(&self) -> Option<&ExtractionParameters> {
        self.params.as_ref()
    }

    /// Fetch and validate the info blob (Init and Decoding)
    pub fn decode<C: AdminChannel + ?Sized>(
        &mut self,
        session: &mut VendorSession<'_, C>,
    ) -> Result<ExtractionParameters> {
        match self.fetch_and_validate(session) {
            Ok(params) => {
                self.params = Some(params);
                self.state = ExtractState::Paging(PageCursor {
                    index: 0,
                    remaining: params.unit_count,
                    offset: selectors::CRASH_PAGE_INDEX_OFFSET,
                });
                Ok(params)
            }
            Err(e) => {
                log::debug!("{:?} aborted while decoding: {}", self.dataset, e);
                self.state = ExtractState::Aborted;
                Err(e)
            }
        }
    }

    fn fetch_and_validate<C: AdminChannel + ?Sized>(
        &mut self,
        session: &mut VendorSession<'_, C>,
    ) -> Result<ExtractionParameters> {
        session.arm(self.dataset.info_selector())?;

        let params = match self.dataset {
            Dataset::EventLog => {
                let blob = session
                    .execute_into_control(EVENT_LOG_INFO_CDW10, EVENT_LOG_INFO_LEN as u32)?;
                self.state = ExtractState::Decoding;
                let info = header::decode_event_log_info(blob)?;
                log::debug!("event log info: {:?}", info);
                info.parameters()
            }
            Dataset::CrashDump { .. } => {
                let mut blob = [0u8; CRASH_INFO_LEN];
                session.execute(CRASH_INFO_CDW10, CRASH_INFO_LEN as u32, &mut blob)?;
                self.state = ExtractState::Decoding;
                let info = header::decode_crash_info(&blob)?;
                log::debug!("crash info: {:?}", info);
                info.dump_parameters()
            }
        };

        self.validate(&params)?;
        Ok(params)
    }

    fn validate(&self, params: &ExtractionParameters) -> Result<()> {
        match self.dataset {
            Dataset::EventLog => {
                if params.kind_tag != EVENT_LOG_KIND_TOKEN {
                    return Err(ParameterMismatch::KindTag {
                        expected: EVENT_LOG_KIND_TOKEN,
                        found: params.kind_tag,
                    }
                    .into());
                }
            }
            Dataset::CrashDump { image } => {
                if image as u32 > params.image_count {
                    return Err(ParameterMismatch::NoSuchImage {
                        requested: image,
                        available: params.image_count,
                    }
                    .into());
                }
            }
        }

        if self.dataset.is_indexed() && params.unit_count > MAX_INDEXED_PAGES {
            return Err(ParameterMismatch::PageCountTooLarge {
                pages: params.unit_count,
                max: MAX_INDEXED_PAGES,
            }
            .into());
        }
        Ok(())
    }

    /// Fetch every page into `sink` (Paging)
    ///
    /// [`decode`](Self::decode) must have succeeded first.
    pub fn run<C, S, P>(
        &mut self,
        session: &mut VendorSession<'_, C>,
        sink: &mut S,
        progress: &mut P,
    ) -> Result<ExtractStats>
    where
        C: AdminChannel + ?Sized,
        S: PageSink + ?Sized,
        P: ExtractProgress,
    {
        let mut page = self.page_buffer()?;
        self.run_with_buffer(session, &mut page, sink, progress)
    }

    /// Allocate the page buffer, then open the sink
    fn open<S, F>(&mut self, open_sink: F) -> Result<(Vec<u8>, S)>
    where
        F: FnOnce(&ExtractionParameters) -> Result<S>,
    {
        let page = self.page_buffer()?;
        let params = self.ready_params()?;
        match open_sink(&params) {
            Ok(sink) => Ok((page, sink)),
            Err(e) => {
                self.state = ExtractState::Aborted;
                Err(e)
            }
        }
    }

    /// Allocate the single page buffer reused for every page
    fn page_buffer(&mut self) -> Result<Vec<u8>> {
        let size = self.ready_params()?.unit_size as usize;
        let mut page = Vec::new();
        if page.try_reserve_exact(size).is_err() {
            self.state = ExtractState::Aborted;
            return Err(Error::Resource(ResourceError::AllocationFailed { size }));
        }
        page.resize(size, 0);
        Ok(page)
    }

    fn ready_params(&self) -> Result<ExtractionParameters> {
        match (self.state, self.params) {
            (ExtractState::Paging(_), Some(params)) => Ok(params),
            _ => Err(ParameterMismatch::NotDecoded.into()),
        }
    }

    fn run_with_buffer<C, S, P>(
        &mut self,
        session: &mut VendorSession<'_, C>,
        page: &mut [u8],
        sink: &mut S,
        progress: &mut P,
    ) -> Result<ExtractStats>
    where
        C: AdminChannel + ?Sized,
        S: PageSink + ?Sized,
        P: ExtractProgress,
    {
        let params = self.ready_params()?;
        progress.started(&params);

        match self.page_loop(session, &params, page, sink, progress) {
            Ok(stats) => {
                self.state = ExtractState::Completed;
                progress.finished(&stats);
                Ok(stats)
            }
            Err(e) => {
                log::debug!("{:?} aborted in {:?}: {}", self.dataset, self.state, e);
                self.state = ExtractState::Aborted;
                Err(e)
            }
        }
    }

    fn page_loop<C, S, P>(
        &mut self,
        session: &mut VendorSession<'_, C>,
        params: &ExtractionParameters,
        page: &mut [u8],
        sink: &mut S,
        progress: &mut P,
    ) -> Result<ExtractStats>
    where
        C: AdminChannel + ?Sized,
        S: PageSink + ?Sized,
        P: ExtractProgress,
    {
        let cdw10 = self.dataset.page_cdw10(params);
        let len = params.unit_size;

        match self.dataset {
            Dataset::EventLog => session.control_mut().load(selectors::EVENT_LOG_PAGE),
            Dataset::CrashDump { image } => {
                let control = session.control_mut();
                control.load(selectors::CRASH_PAGE);
                control.patch(selectors::CRASH_PAGE_IMAGE_OFFSET, &[image])?;
            }
        }

        let mut stats = ExtractStats::default();
        let mut cursor = PageCursor {
            index: 0,
            remaining: params.unit_count,
            offset: selectors::CRASH_PAGE_INDEX_OFFSET,
        };

        while cursor.remaining > 0 {
            self.state = ExtractState::Paging(cursor);
            if self.dataset.is_indexed() {
                session
                    .control_mut()
                    .patch(cursor.offset, &encode_page_index(cursor.index))?;
                cursor.offset += 2;
            }

            session.arm_prepared()?;
            session.execute(cdw10, len, page)?;
            sink.write_page(page)?;

            stats.pages += 1;
            stats.bytes += page.len() as u64;
            progress.page_done(stats.pages, stats.bytes);

            cursor.index += 1;
            cursor.remaining -= 1;
        }

        sink.finish()?;
        Ok(stats)
    }
}

/// Extract `dataset` into the sink returned by `open_sink`
///
/// `open_sink` is called only once the parameters are validated, the drive
/// reported at least one page and the page buffer is allocated.
pub fn extract<C, S, F, P>(
    session: &mut VendorSession<'_, C>,
    dataset: Dataset,
    open_sink: F,
    progress: &mut P,
) -> Result<ExtractOutcome>
where
    C: AdminChannel + ?Sized,
    S: PageSink,
    F: FnOnce(&ExtractionParameters) -> Result<S>,
    P: ExtractProgress,
{
    let mut extractor = PagedExtractor::new(dataset);
    let params = extractor.decode(session)?;

    if params.unit_count == 0 {
        extractor.state = ExtractState::Completed;
        return Ok(ExtractOutcome::Empty(params));
    }

    let (mut page, mut sink) = extractor.open(open_sink)?;
    let stats = extractor.run_with_buffer(session, &mut page, &mut sink, progress)?;
    Ok(ExtractOutcome::Completed { params, stats })
}

// =============================================================================
// Crash info and erase
// =============================================================================

/// Outcome of [`erase_crash_dump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
    /// The drive holds no images; no command was sent
    NothingToErase,
    /// The erase command completed
    Erased,
}

/// Fetch and decode the crash dump info
pub fn read_crash_info<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
) -> Result<CrashInfo> {
    let mut blob = [0u8; CRASH_INFO_LEN];
    session.arm(selectors::CRASH_INFO)?;
    session.execute(CRASH_INFO_CDW10, CRASH_INFO_LEN as u32, &mut blob)?;
    Ok(header::decode_crash_info(&blob)?)
}

/// Erase every crash dump image, if there is any
pub fn erase_crash_dump<C: AdminChannel + ?Sized>(
    session: &mut VendorSession<'_, C>,
    info: &CrashInfo,
) -> Result<EraseOutcome> {
    if info.image_count == 0 {
        return Ok(EraseOutcome::NothingToErase);
    }

    let mut scratch = [0u8; CRASH_ERASE_LEN];
    session.arm(selectors::CRASH_ERASE)?;
    session.execute(CRASH_ERASE_CDW10, CRASH_ERASE_LEN as u32, &mut scratch)?;
    log::info!("erased {} crash dump image(s)", info.image_count);
    Ok(EraseOutcome::Erased)
}
