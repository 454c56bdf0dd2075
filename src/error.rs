//! Error types for the `lumaslice` crate.
//!
//! [`LumaError`] is the single error type returned by every fallible
//! operation. Variants carry the context needed to diagnose a failure
//! (paths, region geometry, upstream FFmpeg messages) without extra logging
//! at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `lumaslice` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LumaError {
    /// The input container could not be opened or probed.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::ContainerDemuxer::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container has no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The video stream is not H.264.
    #[error("Unsupported video codec: {0}")]
    UnsupportedCodec(String),

    /// FFmpeg was built without an H.264 decoder.
    #[error("H.264 decoder not found")]
    CodecNotFound,

    /// The decoder produced a picture that is not 8-bit planar YUV 4:2:0.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Codec configuration or an access unit has broken framing.
    #[error("Malformed bitstream: {0}")]
    MalformedBitstream(String),

    /// A picture's plane buffer is smaller than its declared geometry.
    #[error("Malformed picture: {0}")]
    MalformedPicture(String),

    /// The decoder rejected an access unit or failed mid-stream.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// A scaling context could not be built for the requested conversion.
    #[error(
        "Cannot resample {source_width}x{source_height} to {target_width}x{target_height}: {reason}"
    )]
    ResamplerInit {
        /// Width of the source picture.
        source_width: u32,
        /// Height of the source picture.
        source_height: u32,
        /// Requested output width.
        target_width: u32,
        /// Requested output height.
        target_height: u32,
        /// Upstream reason.
        reason: String,
    },

    /// The extraction window does not fit inside the luma plane.
    #[error(
        "Region {width}x{height} at ({x}, {y}) exceeds luma plane {stride}x{plane_height}"
    )]
    RegionOutOfBounds {
        /// Left edge of the region.
        x: u32,
        /// Top edge of the region.
        y: u32,
        /// Region width.
        width: u32,
        /// Region height.
        height: u32,
        /// Luma plane stride in bytes.
        stride: usize,
        /// Picture height in rows.
        plane_height: u32,
    },

    /// A region with a zero dimension was requested.
    #[error("Invalid region {width}x{height}: dimensions must be non-zero")]
    InvalidRegion {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A run selection with a count of zero was requested.
    #[error("Frame count must be greater than zero")]
    InvalidCount,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while writing output.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// Records could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

impl LumaError {
    /// Whether the caller may carry on after this error.
    ///
    /// Only a missing video stream is recoverable: the input simply yields no
    /// records. Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LumaError::NoVideoStream)
    }
}

impl From<FfmpegError> for LumaError {
    fn from(error: FfmpegError) -> Self {
        LumaError::FfmpegError(error.to_string())
    }
}
