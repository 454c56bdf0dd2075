//! H.264 bitstream normalization.
//!
//! MP4-family containers store H.264 as length-prefixed NAL units and keep
//! the sequence and picture parameter sets in an avcC configuration record.
//! The decoder used here is opened without that record, so every access unit
//! is run through FFmpeg's `h264_mp4toannexb` bitstream filter first. The
//! filter rewrites the unit to start-code framing (Annex B) and inserts the
//! parameter sets in-band ahead of IDR pictures that do not carry their own.

use std::{
    ffi::{CStr, c_int},
    fmt::{Debug, Formatter, Result as FmtResult},
    ptr,
};

use ffmpeg_next::{Error as FfmpegError, Packet, util::error::EAGAIN};
use ffmpeg_sys_next::{AV_INPUT_BUFFER_PADDING_SIZE, AVBSFContext, AVCodecID, AVMediaType};

use crate::{
    access_unit::{AccessUnit, Framing},
    error::LumaError,
};

const MP4_TO_ANNEX_B: &CStr = c"h264_mp4toannexb";

/// Converts access units to start-code delimited framing.
pub trait Normalizer {
    /// Rewrite `unit` to [`Framing::AnnexB`].
    ///
    /// Units already in Annex B framing come back unchanged.
    fn normalize(&mut self, unit: AccessUnit) -> Result<AccessUnit, LumaError>;
}

/// Rewrites length-prefixed H.264 access units to Annex B.
///
/// Built from the stream's codec configuration. Streams that are already
/// start-code framed (no configuration, or an Annex B configuration) are
/// passed through without touching FFmpeg.
///
/// # Example
///
/// ```no_run
/// use lumaslice::{AccessUnit, AnnexBNormalizer, Normalizer};
///
/// # let avcc: Vec<u8> = Vec::new();
/// # let payload: Vec<u8> = Vec::new();
/// let mut normalizer = AnnexBNormalizer::from_extradata(&avcc)?;
/// let unit = normalizer.normalize(AccessUnit::new(0, payload))?;
/// assert!(unit.data.starts_with(&[0, 0, 1]) || unit.data.starts_with(&[0, 0, 0, 1]));
/// # Ok::<(), lumaslice::LumaError>(())
/// ```
#[derive(Debug)]
pub struct AnnexBNormalizer {
    filter: Option<BitstreamFilter>,
}

impl AnnexBNormalizer {
    /// Choose the conversion from the stream's codec configuration.
    ///
    /// # Errors
    ///
    /// - [`LumaError::MalformedBitstream`] if `extradata` is neither empty,
    ///   Annex B, nor an avcC record the filter accepts.
    /// - [`LumaError::FfmpegError`] if FFmpeg lacks the filter or cannot
    ///   allocate it.
    pub fn from_extradata(extradata: &[u8]) -> Result<Self, LumaError> {
        if extradata.is_empty() || has_start_code(extradata) {
            log::debug!("Stream is already start-code framed");
            return Ok(Self::passthrough());
        }

        log::debug!("Opening h264_mp4toannexb with {} bytes of avcC", extradata.len());
        Ok(Self {
            filter: Some(BitstreamFilter::open(extradata)?),
        })
    }

    /// A normalizer that only re-tags units.
    pub fn passthrough() -> Self {
        Self { filter: None }
    }
}

impl Normalizer for AnnexBNormalizer {
    fn normalize(&mut self, unit: AccessUnit) -> Result<AccessUnit, LumaError> {
        if unit.framing == Framing::AnnexB {
            return Ok(unit);
        }

        match self.filter.as_mut() {
            None => Ok(AccessUnit::annex_b(unit.stream_index, unit.data)),
            Some(filter) => {
                let data = filter.filter(&unit.data)?;
                Ok(AccessUnit::annex_b(unit.stream_index, data))
            }
        }
    }
}

/// Owned `h264_mp4toannexb` filter context.
struct BitstreamFilter {
    context: *mut AVBSFContext,
}

impl BitstreamFilter {
    fn open(extradata: &[u8]) -> Result<Self, LumaError> {
        crate::ffmpeg::init()?;

        let extradata_size = c_int::try_from(extradata.len())
            .map_err(|_| malformed(format!("{}-byte avcC record", extradata.len())))?;

        // SAFETY: the context is owned by `Self` as soon as it is allocated, so
        // every early return below frees it through `Drop`. `par_in` belongs
        // to the context; its extradata is allocated with `av_mallocz` (with
        // the padding FFmpeg readers expect) and freed by `av_bsf_free`.
        unsafe {
            let definition = ffmpeg_sys_next::av_bsf_get_by_name(MP4_TO_ANNEX_B.as_ptr());
            if definition.is_null() {
                return Err(LumaError::FfmpegError(
                    "FFmpeg was built without the h264_mp4toannexb filter".to_string(),
                ));
            }

            let mut context: *mut AVBSFContext = ptr::null_mut();
            let result = ffmpeg_sys_next::av_bsf_alloc(definition, &mut context);
            if result < 0 || context.is_null() {
                return Err(LumaError::FfmpegError(format!(
                    "failed to allocate h264_mp4toannexb: {}",
                    FfmpegError::from(result)
                )));
            }
            let filter = Self { context };

            let parameters = (*context).par_in;
            (*parameters).codec_type = AVMediaType::AVMEDIA_TYPE_VIDEO;
            (*parameters).codec_id = AVCodecID::AV_CODEC_ID_H264;

            let buffer = ffmpeg_sys_next::av_mallocz(
                extradata.len() + AV_INPUT_BUFFER_PADDING_SIZE as usize,
            ) as *mut u8;
            if buffer.is_null() {
                return Err(LumaError::FfmpegError("failed to allocate avcC buffer".to_string()));
            }
            ptr::copy_nonoverlapping(extradata.as_ptr(), buffer, extradata.len());
            (*parameters).extradata = buffer;
            (*parameters).extradata_size = extradata_size;

            let result = ffmpeg_sys_next::av_bsf_init(context);
            if result < 0 {
                return Err(malformed(format!(
                    "avcC record rejected: {}",
                    FfmpegError::from(result)
                )));
            }

            Ok(filter)
        }
    }

    /// Run one access unit through the filter and collect its output.
    fn filter(&mut self, data: &[u8]) -> Result<Vec<u8>, LumaError> {
        let mut input = Packet::copy(data);
        let mut output = Vec::with_capacity(data.len() + 64);

        // SAFETY: `self.context` is a live, initialised filter context. The
        // filter takes the reference held by `input` and leaves it blank;
        // each received packet is owned and unreferenced by `Packet`'s drop.
        unsafe {
            let result = ffmpeg_sys_next::av_bsf_send_packet(self.context, input.as_mut_ptr());
            if result < 0 {
                return Err(malformed(format!(
                    "filter refused access unit: {}",
                    FfmpegError::from(result)
                )));
            }

            loop {
                let mut filtered = Packet::empty();
                let result = ffmpeg_sys_next::av_bsf_receive_packet(
                    self.context,
                    filtered.as_mut_ptr(),
                );
                if result >= 0 {
                    output.extend_from_slice(filtered.data().unwrap_or_default());
                    continue;
                }
                match FfmpegError::from(result) {
                    FfmpegError::Eof => break,
                    FfmpegError::Other { errno } if errno == EAGAIN => break,
                    error => {
                        return Err(malformed(format!("{}-byte access unit: {error}", data.len())));
                    }
                }
            }
        }

        Ok(output)
    }
}

impl Drop for BitstreamFilter {
    fn drop(&mut self) {
        // SAFETY: `context` came from `av_bsf_alloc` and is freed only here.
        unsafe { ffmpeg_sys_next::av_bsf_free(&mut self.context) };
    }
}

impl Debug for BitstreamFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BitstreamFilter").field("name", &MP4_TO_ANNEX_B).finish_non_exhaustive()
    }
}

fn has_start_code(data: &[u8]) -> bool {
    data.starts_with(&[0, 0, 1]) || data.starts_with(&[0, 0, 0, 1])
}

fn malformed(message: String) -> LumaError {
    LumaError::MalformedBitstream(message)
}
