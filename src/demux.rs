//! Container demultiplexing.
//!
//! [`Demuxer`] is the narrow interface the decode loop pulls access units
//! through. [`ContainerDemuxer`] implements it on top of libavformat.
//!
//! # Example
//!
//! ```no_run
//! use lumaslice::{ContainerDemuxer, Demuxer};
//!
//! let mut demuxer = ContainerDemuxer::open("input.mp4")?;
//! let video = demuxer.video_stream().cloned();
//! while let Some(unit) = demuxer.next_access_unit()? {
//!     println!("stream {} / {} bytes", unit.stream_index, unit.size());
//! }
//! # let _ = video;
//! # Ok::<(), lumaslice::LumaError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::Id as CodecId, format::context::Input, media::Type,
};
use ffmpeg_sys_next::AVCodecParameters;

use crate::{access_unit::AccessUnit, error::LumaError};

/// Description of the video stream chosen for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Stream index inside the container.
    pub index: usize,
    /// Codec name as reported by FFmpeg (e.g. `"h264"`).
    pub codec_name: String,
    /// Coded width, if known.
    pub width: u32,
    /// Coded height, if known.
    pub height: u32,
    /// Codec configuration record (avcC for MP4-family containers, Annex B
    /// parameter sets or nothing for raw streams).
    pub extradata: Vec<u8>,
}

/// A source of access units.
pub trait Demuxer {
    /// The video stream to extract from, if the input has one.
    fn video_stream(&self) -> Option<&StreamInfo>;

    /// Read the next access unit, in container order.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn next_access_unit(&mut self) -> Result<Option<AccessUnit>, LumaError>;
}

/// A container file opened through FFmpeg.
pub struct ContainerDemuxer {
    input_context: Input,
    video_stream: Option<StreamInfo>,
    file_path: PathBuf,
    exhausted: bool,
}

impl Debug for ContainerDemuxer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerDemuxer")
            .field("video_stream", &self.video_stream)
            .field("file_path", &self.file_path)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl ContainerDemuxer {
    /// Open a container and locate its first video stream.
    ///
    /// A missing video stream is not an error here; it surfaces as
    /// `video_stream() == None` so the caller can decide what to do.
    ///
    /// # Errors
    ///
    /// - [`LumaError::FileOpen`] if the file cannot be opened or probed.
    /// - [`LumaError::UnsupportedCodec`] if the first video stream is not H.264.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LumaError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening media file: {}", file_path.display());

        crate::ffmpeg::init().map_err(|error| LumaError::FileOpen {
            path: file_path.clone(),
            reason: error.to_string(),
        })?;

        let input_context = ffmpeg_next::format::input(&path).map_err(|error| LumaError::FileOpen {
            path: file_path.clone(),
            reason: error.to_string(),
        })?;

        let video_stream = input_context
            .streams()
            .find(|stream| stream.parameters().medium() == Type::Video)
            .map(|stream| {
                let parameters = stream.parameters();
                let id = parameters.id();
                // SAFETY: `parameters` wraps the stream's live AVCodecParameters,
                // which outlive this closure; extradata is read-only here.
                let (width, height, extradata) = unsafe {
                    let raw: &AVCodecParameters = &*parameters.as_ptr();
                    let extradata = if raw.extradata.is_null() || raw.extradata_size <= 0 {
                        Vec::new()
                    } else {
                        let size = raw.extradata_size as usize;
                        std::slice::from_raw_parts(raw.extradata, size).to_vec()
                    };
                    (raw.width.max(0) as u32, raw.height.max(0) as u32, extradata)
                };
                (
                    id,
                    StreamInfo {
                        index: stream.index(),
                        codec_name: id.name().to_string(),
                        width,
                        height,
                        extradata,
                    },
                )
            });

        let video_stream = match video_stream {
            Some((CodecId::H264, info)) => {
                log::debug!(
                    "Video stream {}: {}x{}, {} bytes of codec configuration",
                    info.index,
                    info.width,
                    info.height,
                    info.extradata.len()
                );
                Some(info)
            }
            Some((_, info)) => return Err(LumaError::UnsupportedCodec(info.codec_name)),
            None => None,
        };

        Ok(Self {
            input_context,
            video_stream,
            file_path,
            exhausted: false,
        })
    }

    /// Path the demuxer was opened with.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl Demuxer for ContainerDemuxer {
    fn video_stream(&self) -> Option<&StreamInfo> {
        self.video_stream.as_ref()
    }

    fn next_access_unit(&mut self) -> Result<Option<AccessUnit>, LumaError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut packet = Packet::empty();
        match packet.read(&mut self.input_context) {
            Ok(()) => {
                let data = packet.data().map(<[u8]>::to_vec).unwrap_or_default();
                Ok(Some(AccessUnit::new(packet.stream(), data)))
            }
            Err(FfmpegError::Eof) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(error) => {
                // Any other read failure ends the input, as a short file would.
                log::warn!(
                    "Read error in {}, treating as end of input: {error}",
                    self.file_path.display()
                );
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}
