//! H.264 decoding.
//!
//! [`FrameDecoder`] follows FFmpeg's send/receive model: access units go in
//! with [`send`](FrameDecoder::send), reconstructed pictures come out of
//! [`receive`](FrameDecoder::receive). A received picture borrows the
//! decoder, so it must be consumed before the decoder is used again.

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::{Id as CodecId, context::Context as CodecContext},
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    util::error::EAGAIN,
};

use crate::{access_unit::AccessUnit, error::LumaError, picture::Picture};

/// A sequential picture decoder.
pub trait FrameDecoder {
    /// Picture type produced by the decoder.
    type Picture: Picture;

    /// Submit one normalized access unit.
    fn send(&mut self, unit: &AccessUnit) -> Result<(), LumaError>;

    /// Signal that no more access units will be sent.
    fn send_eof(&mut self) -> Result<(), LumaError>;

    /// Take the next reconstructed picture, if one is ready.
    fn receive(&mut self) -> Result<Option<&Self::Picture>, LumaError>;
}

/// FFmpeg's H.264 decoder.
///
/// Opened without container configuration: SPS and PPS must arrive in-band,
/// which the [`AnnexBNormalizer`](crate::AnnexBNormalizer) guarantees.
pub struct H264Decoder {
    decoder: VideoDecoder,
    frame: VideoFrame,
}

impl H264Decoder {
    /// Find and open the H.264 decoder.
    ///
    /// # Errors
    ///
    /// - [`LumaError::CodecNotFound`] if FFmpeg has no H.264 decoder.
    /// - [`LumaError::FfmpegError`] if the decoder context cannot be opened.
    pub fn new() -> Result<Self, LumaError> {
        crate::ffmpeg::init()?;

        let codec = ffmpeg_next::decoder::find(CodecId::H264).ok_or(LumaError::CodecNotFound)?;
        log::debug!("Opening decoder {}", codec.name());
        let decoder = CodecContext::new_with_codec(codec).decoder().video()?;

        Ok(Self {
            decoder,
            frame: VideoFrame::empty(),
        })
    }
}

impl FrameDecoder for H264Decoder {
    type Picture = VideoFrame;

    fn send(&mut self, unit: &AccessUnit) -> Result<(), LumaError> {
        let packet = Packet::copy(&unit.data);
        self.decoder
            .send_packet(&packet)
            .map_err(|error| LumaError::DecodeError(error.to_string()))
    }

    fn send_eof(&mut self) -> Result<(), LumaError> {
        self.decoder
            .send_eof()
            .map_err(|error| LumaError::DecodeError(error.to_string()))
    }

    fn receive(&mut self) -> Result<Option<&VideoFrame>, LumaError> {
        match self.decoder.receive_frame(&mut self.frame) {
            Ok(()) => match self.frame.format() {
                Pixel::YUV420P | Pixel::YUVJ420P => Ok(Some(&self.frame)),
                other => Err(LumaError::UnsupportedPixelFormat(format!("{other:?}"))),
            },
            Err(FfmpegError::Eof) => Ok(None),
            Err(FfmpegError::Other { errno }) if errno == EAGAIN => Ok(None),
            Err(error) => Err(LumaError::DecodeError(error.to_string())),
        }
    }
}
