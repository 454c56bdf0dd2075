//! # lumaslice
//!
//! Extract luma (Y-plane) pixel regions from selected frames of H.264 video.
//!
//! `lumaslice` walks a container's video stream, rewrites each access unit
//! to start-code framing, decodes it with FFmpeg (via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)), picks decoded
//! pictures by their ordinal position, and copies a rectangular window of
//! luma samples out of each one. Pictures can optionally be resampled to the
//! window size first. The extracted samples serialize to JSON for downstream
//! tools such as perceptual hashing or test-vector generation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lumaslice::{
//!     ExtractionConfig, ExtractionSession, OutputShape, RegionSpec, SelectionPolicy, output,
//! };
//!
//! let config = ExtractionConfig::new()
//!     .with_policy(SelectionPolicy::run(30, 3)?)
//!     .with_region(RegionSpec::square(32)?)
//!     .with_resample(true);
//!
//! let mut session = ExtractionSession::new(config);
//! session.process("input.mp4")?;
//!
//! if let Some(json) = output::render(session.records(), OutputShape::Array, false)? {
//!     output::write_document("frames.json", &json)?;
//! }
//! # Ok::<(), lumaslice::LumaError>(())
//! ```
//!
//! ## Pipeline
//!
//! Each stage sits behind a small trait so it can be replaced (for example
//! by stubs in tests):
//!
//! | Stage | Trait | FFmpeg-backed implementation |
//! |-------|-------|------------------------------|
//! | Demultiplexing | [`Demuxer`] | [`ContainerDemuxer`] |
//! | Framing | [`Normalizer`] | [`AnnexBNormalizer`] (`h264_mp4toannexb`) |
//! | Decoding | [`FrameDecoder`] | [`H264Decoder`] |
//! | Resampling | [`Resampler`] | [`SwsResampler`] |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod access_unit;
pub mod annexb;
pub mod configuration;
pub mod decoder;
pub mod demux;
pub mod error;
pub mod ffmpeg;
pub mod output;
pub mod picture;
pub mod region;
pub mod resample;
pub mod selector;
pub mod session;
mod utilities;

pub use access_unit::{AccessUnit, Framing};
pub use annexb::{AnnexBNormalizer, Normalizer};
pub use configuration::{ExtractionConfig, RegionSpec, ScalingFilter, SelectionPolicy};
pub use decoder::{FrameDecoder, H264Decoder};
pub use demux::{ContainerDemuxer, Demuxer, StreamInfo};
pub use error::LumaError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use output::OutputShape;
pub use picture::{LUMA_PLANE, Picture, PlanarPicture};
pub use region::{ExtractionRecord, extract};
pub use resample::{Resampler, SwsResampler};
pub use selector::{DecodeLoop, SelectionOutcome};
pub use session::ExtractionSession;
