//! Per-input extraction sessions.
//!
//! An [`ExtractionSession`] owns everything produced for one input file: the
//! extracted records in decode order and the number of pictures decoded to
//! get them. Nothing is shared between sessions.
//!
//! # Example
//!
//! ```no_run
//! use lumaslice::{ExtractionConfig, ExtractionSession, RegionSpec, SelectionPolicy};
//!
//! let config = ExtractionConfig::new()
//!     .with_policy(SelectionPolicy::run(0, 5)?)
//!     .with_region(RegionSpec::square(16)?);
//!
//! let mut session = ExtractionSession::new(config);
//! let outcome = session.process("input.mp4")?;
//! if outcome.is_short() {
//!     eprintln!("only {} of {} frames available", outcome.selected, outcome.requested);
//! }
//! for record in session.records() {
//!     println!("{} samples", record.pixels().len());
//! }
//! # Ok::<(), lumaslice::LumaError>(())
//! ```

use std::path::Path;

use crate::{
    annexb::{AnnexBNormalizer, Normalizer},
    configuration::{ExtractionConfig, RegionSpec},
    decoder::{FrameDecoder, H264Decoder},
    demux::{ContainerDemuxer, Demuxer},
    error::LumaError,
    region::{ExtractionRecord, extract},
    resample::{Resampler, SwsResampler},
    selector::{DecodeLoop, SelectionOutcome},
};

/// Records extracted from one input.
#[derive(Debug, Clone)]
pub struct ExtractionSession {
    config: ExtractionConfig,
    records: Vec<ExtractionRecord>,
    decoded: u64,
}

impl ExtractionSession {
    /// An empty session for `config`.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            decoded: 0,
        }
    }

    /// Extract from the H.264 video stream of the container at `path`.
    ///
    /// # Errors
    ///
    /// - [`LumaError::FileOpen`], [`LumaError::UnsupportedCodec`] when the
    ///   container cannot be used.
    /// - [`LumaError::NoVideoStream`] when it has no video stream. This one
    ///   is recoverable: the session simply holds no records.
    /// - Any error from [`run`](Self::run).
    pub fn process<P: AsRef<Path>>(&mut self, path: P) -> Result<SelectionOutcome, LumaError> {
        let mut demuxer = ContainerDemuxer::open(path)?;
        let stream = demuxer.video_stream().ok_or(LumaError::NoVideoStream)?;
        let mut normalizer = AnnexBNormalizer::from_extradata(&stream.extradata)?;
        let mut decoder = H264Decoder::new()?;
        let mut resampler = SwsResampler::new(self.config.scaling_filter);

        self.run(&mut demuxer, &mut normalizer, &mut decoder, &mut resampler)
    }

    /// Extract using caller-supplied collaborators.
    ///
    /// Each selected picture is resampled to the region size first when
    /// resampling is enabled. The window is always taken at the picture
    /// origin; the region's `x` and `y` only apply to direct [`extract`]
    /// calls.
    ///
    /// # Errors
    ///
    /// - [`LumaError::NoVideoStream`] if the demuxer reports no video stream.
    /// - The first decode, resample, or extraction error. Records extracted
    ///   and pictures decoded before the failure stay in the session.
    pub fn run<D, N, F, R>(
        &mut self,
        demuxer: &mut D,
        normalizer: &mut N,
        decoder: &mut F,
        resampler: &mut R,
    ) -> Result<SelectionOutcome, LumaError>
    where
        D: Demuxer,
        N: Normalizer,
        F: FrameDecoder,
        R: Resampler<F::Picture>,
    {
        let stream_index = demuxer.video_stream().ok_or(LumaError::NoVideoStream)?.index;
        let policy = self.config.policy;
        let region = self.config.region;
        let window = RegionSpec { x: 0, y: 0, ..region };
        let resample = self.config.resample;
        let records = &mut self.records;

        log::debug!(
            "Extracting {policy:?} with {}x{} region from stream {stream_index}{}",
            region.width,
            region.height,
            if resample { " (resampled)" } else { "" }
        );

        let mut decode_loop = DecodeLoop::new(demuxer, normalizer, decoder, stream_index, policy);
        let result = decode_loop.run(|ordinal, picture| {
            let record = if resample {
                let resampled = resampler.resample(picture, window.width, window.height)?;
                extract(&resampled, &window)?
            } else {
                extract(picture, &window)?
            };
            log::debug!("Extracted picture {ordinal}");
            records.push(record);
            Ok(())
        });

        self.decoded += decode_loop.outcome().decoded;
        result
    }

    /// The configuration this session extracts with.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracted records, in decode order.
    pub fn records(&self) -> &[ExtractionRecord] {
        &self.records
    }

    /// Take ownership of the extracted records.
    pub fn into_records(self) -> Vec<ExtractionRecord> {
        self.records
    }

    /// Pictures decoded so far, selected or not.
    pub fn decoded_count(&self) -> u64 {
        self.decoded
    }
}
