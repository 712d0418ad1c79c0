//! Tool session: one source, at most one result, one tagged state.
//!
//! ```text
//! Idle --select image--> Loaded(source, no result)
//! Loaded --begin_transform--> Processing
//! Processing --finish--> Loaded(source, result)
//! Loaded --select image--> Loaded(new source, no result)
//! any --select non-image--> unchanged
//! ```
//!
//! A result only exists in `Loaded`, so it can never be shown while a
//! transform is in flight, and there is never a result without a source.

use std::sync::Arc;

use crate::config::PipelineOptions;
use crate::encode::OutputFormat;
use crate::error::PipelineError;
use crate::host::{HostOptions, NativeHost, RasterHost};
use crate::params::{Quality, ScaleFactor, TransformParameter};
use crate::present::{output_file_name, Comparison};
use crate::source::{FileRef, SourceImage};
use crate::surface::Dimensions;
use crate::transform::{self, ResultImage};

/// Which of the two tools a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Re-encode as JPEG at an adjustable quality.
    Compressor,
    /// Resample to 4x and encode as PNG.
    Upscaler,
}

impl Tool {
    pub fn output_format(self) -> OutputFormat {
        match self {
            Tool::Compressor => OutputFormat::Jpeg,
            Tool::Upscaler => OutputFormat::Png,
        }
    }

    /// Appended to the original file stem when saving.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Tool::Compressor => "_compressed.jpg",
            Tool::Upscaler => "_upscaled_4x.png",
        }
    }
}

/// Identifies one transform run within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

/// The session state machine.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No source selected yet.
    #[default]
    Idle,
    /// A source is loaded; a result is present once a transform finished.
    Loaded {
        source: Arc<SourceImage>,
        result: Option<ResultImage>,
    },
    /// A transform is running against `source`.
    Processing { source: Arc<SourceImage>, job: JobId },
}

/// What happened to a file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The file was decoded and is now the source.
    Loaded(Dimensions),
    /// Not an image type; nothing changed.
    Ignored,
    /// A transform is running; nothing changed.
    Busy,
}

/// A transform detached from the session, ready to run anywhere.
#[derive(Debug)]
pub struct TransformJob {
    id: JobId,
    source: Arc<SourceImage>,
    parameter: TransformParameter,
}

impl TransformJob {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn parameter(&self) -> TransformParameter {
        self.parameter
    }

    /// Execute the transform. Always runs to completion.
    pub fn run<H: RasterHost + ?Sized>(self, host: &H) -> TransformOutcome {
        TransformOutcome {
            id: self.id,
            result: transform::apply(host, &self.source, self.parameter),
        }
    }
}

/// The completion signal of a [`TransformJob`].
#[derive(Debug)]
pub struct TransformOutcome {
    id: JobId,
    result: Result<ResultImage, PipelineError>,
}

impl TransformOutcome {
    pub(crate) fn failed(id: JobId, error: PipelineError) -> Self {
        Self {
            id,
            result: Err(error),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }
}

/// A result materialized as a file to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One tool's session.
#[derive(Debug)]
pub struct Session<H> {
    host: Arc<H>,
    tool: Tool,
    quality: Quality,
    state: SessionState,
    next_job: u64,
}

impl Session<NativeHost> {
    /// A session on the `image`-backed host, configured from `options`.
    pub fn native(tool: Tool, options: PipelineOptions) -> Self {
        let host = NativeHost::new(HostOptions {
            upscale_filter: options.upscale_filter,
            png_compression: options.png_compression,
        });
        Self::with_shared_host(tool, Arc::new(host), options.default_quality)
    }
}

impl<H: RasterHost> Session<H> {
    pub fn new(tool: Tool, host: H) -> Self {
        Self::with_shared_host(tool, Arc::new(host), Quality::default())
    }

    pub fn with_shared_host(tool: Tool, host: Arc<H>, quality: Quality) -> Self {
        Self {
            host,
            tool,
            quality,
            state: SessionState::Idle,
            next_job: 0,
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Takes effect on the next transform; never re-runs one.
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, SessionState::Processing { .. })
    }

    pub fn source(&self) -> Option<&SourceImage> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Loaded { source, .. } | SessionState::Processing { source, .. } => {
                Some(source.as_ref())
            }
        }
    }

    pub fn result(&self) -> Option<&ResultImage> {
        match &self.state {
            SessionState::Loaded { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    /// The parameter the next transform would run with.
    pub fn parameter(&self) -> TransformParameter {
        match self.tool {
            Tool::Compressor => TransformParameter::Quality(self.quality),
            Tool::Upscaler => TransformParameter::Scale(ScaleFactor),
        }
    }

    /// Load a user-selected file as the new source.
    ///
    /// Non-image types are ignored. On success any previous result is
    /// discarded. A decode failure leaves the state untouched.
    pub fn select_file(&mut self, file: FileRef) -> Result<SelectOutcome, PipelineError> {
        if !file.is_image() {
            log::debug!("ignoring {} ({})", file.name, file.mime_type);
            return Ok(SelectOutcome::Ignored);
        }
        if self.is_processing() {
            log::debug!("ignoring {} while a transform is running", file.name);
            return Ok(SelectOutcome::Busy);
        }

        let name = file.name.clone();
        let source = SourceImage::load(self.host.as_ref(), file).map_err(|e| {
            log::warn!("failed to decode {}: {}", name, e);
            e
        })?;

        let dimensions = source.dimensions();
        log::info!(
            "loaded {} ({}, {} bytes)",
            source.file_name(),
            dimensions,
            source.byte_len()
        );
        self.state = SessionState::Loaded {
            source: Arc::new(source),
            result: None,
        };
        Ok(SelectOutcome::Loaded(dimensions))
    }

    /// Enter `Processing` and hand out the job to execute.
    ///
    /// Returns `None` without a source or while already processing. Any
    /// existing result is discarded.
    pub fn begin_transform(&mut self) -> Option<TransformJob> {
        let source = match &self.state {
            SessionState::Loaded { source, .. } => Arc::clone(source),
            _ => return None,
        };

        let id = JobId(self.next_job);
        self.next_job += 1;
        self.state = SessionState::Processing {
            source: Arc::clone(&source),
            job: id,
        };

        log::debug!("{:?} job {:?} started", self.tool, id);
        Some(TransformJob {
            id,
            source,
            parameter: self.parameter(),
        })
    }

    /// Apply a finished job and return to `Loaded`.
    ///
    /// Outcomes for any job other than the pending one are dropped and
    /// `Ok(None)` is returned. A failed transform leaves no result.
    pub fn finish(
        &mut self,
        outcome: TransformOutcome,
    ) -> Result<Option<&ResultImage>, PipelineError> {
        match std::mem::take(&mut self.state) {
            SessionState::Processing { source, job } if job == outcome.id => {
                match outcome.result {
                    Ok(result) => {
                        log::debug!("{:?} job {:?} finished", self.tool, job);
                        self.state = SessionState::Loaded {
                            source,
                            result: Some(result),
                        };
                        Ok(self.result())
                    }
                    Err(e) => {
                        log::warn!("{:?} job {:?} failed: {}", self.tool, job, e);
                        self.state = SessionState::Loaded {
                            source,
                            result: None,
                        };
                        Err(e)
                    }
                }
            }
            other => {
                log::debug!("dropping outcome of stale job {:?}", outcome.id);
                self.state = other;
                Ok(None)
            }
        }
    }

    /// Begin, execute on the calling thread, and finish.
    pub fn run(&mut self) -> Result<Option<&ResultImage>, PipelineError> {
        let Some(job) = self.begin_transform() else {
            return Ok(None);
        };
        let outcome = job.run(self.host.as_ref());
        self.finish(outcome)
    }

    /// The current result as a file named after the source.
    pub fn download(&self) -> Option<Download> {
        let SessionState::Loaded {
            source,
            result: Some(result),
        } = &self.state
        else {
            return None;
        };

        Some(Download {
            file_name: output_file_name(source.file_name(), self.tool.file_suffix()),
            mime_type: result.mime_type(),
            bytes: result.blob().bytes().to_vec(),
        })
    }

    /// Figures for the before/after display, if a source is loaded.
    pub fn comparison(&self) -> Option<Comparison> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Loaded { source, result } => Some(Comparison::new(source, result.as_ref())),
            SessionState::Processing { source, .. } => Some(Comparison::new(source, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::CountingHost;

    fn image(name: &str, w: u8, h: u8) -> FileRef {
        FileRef::new(name, "image/png", CountingHost::payload(w, h))
    }

    fn compressor() -> Session<CountingHost> {
        Session::new(Tool::Compressor, CountingHost::default())
    }

    fn upscaler() -> Session<CountingHost> {
        Session::new(Tool::Upscaler, CountingHost::default())
    }

    #[test]
    fn test_starts_idle() {
        let session = compressor();
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.source().is_none());
        assert!(session.comparison().is_none());
        assert_eq!(session.quality().get(), 80);
    }

    #[test]
    fn test_select_image_loads_source() {
        let mut session = compressor();
        let outcome = session.select_file(image("a.png", 100, 100)).unwrap();

        assert_eq!(outcome, SelectOutcome::Loaded(Dimensions::new(100, 100)));
        assert!(matches!(
            session.state(),
            SessionState::Loaded { result: None, .. }
        ));
    }

    #[test]
    fn test_select_non_image_is_ignored() {
        let mut session = compressor();
        session.select_file(image("a.png", 10, 10)).unwrap();
        session.run().unwrap();

        let text = FileRef::new("notes.txt", "text/plain", b"hello".to_vec());
        assert_eq!(session.select_file(text).unwrap(), SelectOutcome::Ignored);

        assert_eq!(session.source().unwrap().file_name(), "a.png");
        assert!(session.result().is_some());
        assert_eq!(CountingHost::count(&session.host().decodes), 1);
    }

    #[test]
    fn test_select_non_image_while_idle_stays_idle() {
        let mut session = compressor();
        let pdf = FileRef::new("doc.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(session.select_file(pdf).unwrap(), SelectOutcome::Ignored);
        assert!(matches!(session.state(), SessionState::Idle));
    }

    #[test]
    fn test_decode_failure_keeps_previous_state() {
        let mut session = compressor();
        session.select_file(image("good.png", 4, 4)).unwrap();
        session.run().unwrap();

        let broken = FileRef::new("bad.png", "image/png", vec![0xde, 0xad]);
        assert!(session.select_file(broken).is_err());

        assert_eq!(session.source().unwrap().file_name(), "good.png");
        assert!(session.result().is_some());
    }

    #[test]
    fn test_new_selection_discards_result() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();
        session.run().unwrap();
        assert!(session.result().is_some());

        session.select_file(image("b.png", 8, 8)).unwrap();

        assert_eq!(session.source().unwrap().file_name(), "b.png");
        assert!(session.result().is_none());
    }

    #[test]
    fn test_transform_without_source_is_noop() {
        let mut session = compressor();
        assert!(session.begin_transform().is_none());
        assert!(session.run().unwrap().is_none());
        assert!(!session.is_processing());
        assert_eq!(CountingHost::count(&session.host().encodes), 0);
    }

    #[test]
    fn test_processing_flag_spans_the_job() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();
        assert!(!session.is_processing());

        let job = session.begin_transform().unwrap();
        assert!(session.is_processing());
        assert!(session.result().is_none());
        assert!(session.begin_transform().is_none());

        let outcome = job.run(session.host().as_ref());
        assert!(session.is_processing());

        session.finish(outcome).unwrap();
        assert!(!session.is_processing());
        assert!(session.result().is_some());
    }

    #[test]
    fn test_begin_discards_previous_result() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();
        session.run().unwrap();

        let _job = session.begin_transform().unwrap();
        assert!(session.result().is_none());
        assert!(session.download().is_none());
    }

    #[test]
    fn test_select_while_processing_is_busy() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();
        let job = session.begin_transform().unwrap();

        let outcome = session.select_file(image("b.png", 9, 9)).unwrap();
        assert_eq!(outcome, SelectOutcome::Busy);

        session.finish(job.run(session.host().as_ref())).unwrap();
        assert_eq!(session.source().unwrap().file_name(), "a.png");
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();

        let first = session.begin_transform().unwrap();
        let first_outcome = first.run(session.host().as_ref());
        session.finish(first_outcome).unwrap();

        let second = session.begin_transform().unwrap();
        let stale = TransformOutcome::failed(JobId(0), PipelineError::Worker("late".into()));
        assert!(session.finish(stale).unwrap().is_none());
        assert!(session.is_processing());

        session.finish(second.run(session.host().as_ref())).unwrap();
        assert!(session.result().is_some());
    }

    #[test]
    fn test_failed_job_returns_to_loaded_without_result() {
        let mut session = compressor();
        session.select_file(image("a.png", 4, 4)).unwrap();
        let job = session.begin_transform().unwrap();

        let failed = TransformOutcome::failed(job.id(), PipelineError::Worker("boom".into()));
        assert!(session.finish(failed).is_err());

        assert!(!session.is_processing());
        assert!(session.source().is_some());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_quality_is_not_applied_reactively() {
        let mut session = compressor();
        session.select_file(image("a.png", 2, 2)).unwrap();
        session.run().unwrap();
        let before = session.result().unwrap().byte_len();

        session.set_quality(Quality::new(50).unwrap());
        assert_eq!(session.result().unwrap().byte_len(), before);
        assert_eq!(CountingHost::count(&session.host().encodes), 1);

        session.run().unwrap();
        // CountingHost: 4 px * quality
        assert_eq!(session.result().unwrap().byte_len(), 200);
    }

    #[test]
    fn test_compressor_keeps_dimensions() {
        let mut session = compressor();
        session.select_file(image("a.png", 100, 100)).unwrap();
        let result = session.run().unwrap().unwrap();

        assert_eq!(result.dimensions(), Dimensions::new(100, 100));
        assert_eq!(result.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_upscaler_multiplies_dimensions() {
        let mut session = upscaler();
        session.select_file(image("a.jpg", 50, 50)).unwrap();
        let result = session.run().unwrap().unwrap();

        assert_eq!(result.dimensions(), Dimensions::new(200, 200));
        assert_eq!(result.mime_type(), "image/png");
    }

    #[test]
    fn test_download_names() {
        let mut session = compressor();
        assert!(session.download().is_none());
        session.select_file(image("holiday.photo.png", 2, 2)).unwrap();
        assert!(session.download().is_none());
        session.run().unwrap();

        let download = session.download().unwrap();
        assert_eq!(download.file_name, "holiday.photo_compressed.jpg");
        assert_eq!(download.mime_type, "image/jpeg");
        assert_eq!(download.bytes.len() as u64, session.result().unwrap().byte_len());

        let mut session = upscaler();
        session.select_file(image("icon.webp", 2, 2)).unwrap();
        session.run().unwrap();
        assert_eq!(session.download().unwrap().file_name, "icon_upscaled_4x.png");
    }

    #[test]
    fn test_comparison_tracks_state() {
        let mut session = compressor();
        session.select_file(image("a.png", 2, 2)).unwrap();
        assert_eq!(session.comparison().unwrap().result_bytes, None);

        let job = session.begin_transform().unwrap();
        assert_eq!(session.comparison().unwrap().result_bytes, None);

        session.finish(job.run(session.host().as_ref())).unwrap();
        assert_eq!(session.comparison().unwrap().result_bytes, Some(320));
    }

    #[test]
    fn test_native_session_uses_options() {
        let options = PipelineOptions::new().with_default_quality(Quality::new(42).unwrap());
        let session = Session::native(Tool::Compressor, options);
        assert_eq!(session.quality().get(), 42);
        assert_eq!(session.tool().output_format(), OutputFormat::Jpeg);
    }
}
