//! Picture resampling.
//!
//! [`Resampler`] converts a picture to new dimensions in the same planar
//! format. The source size is always the picture's own size, and the output
//! covers the whole source frame.

use ffmpeg_next::{
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

use crate::{configuration::ScalingFilter, error::LumaError, picture::Picture};

/// Converts pictures of type `P` to a target size.
pub trait Resampler<P: Picture> {
    /// Resampled picture type. Owned by the caller.
    type Output: Picture;

    /// Resample `picture` to `width` x `height`.
    fn resample(
        &mut self,
        picture: &P,
        width: u32,
        height: u32,
    ) -> Result<Self::Output, LumaError>;
}

/// libswscale-backed resampler for decoded frames.
///
/// The scaling context is kept between calls and rebuilt whenever the source
/// or target definition changes.
pub struct SwsResampler {
    flags: ScalingFlags,
    context: Option<ScalingContext>,
}

impl SwsResampler {
    /// A resampler using `filter` for every conversion.
    pub fn new(filter: ScalingFilter) -> Self {
        Self {
            flags: filter.to_ffmpeg_flags(),
            context: None,
        }
    }

    fn context_for(
        &mut self,
        picture: &VideoFrame,
        width: u32,
        height: u32,
    ) -> Result<&mut ScalingContext, LumaError> {
        let format = picture.format();
        let reusable = self.context.as_ref().is_some_and(|context| {
            let input = context.input();
            let output = context.output();
            input.format == format
                && input.width == picture.width()
                && input.height == picture.height()
                && output.width == width
                && output.height == height
        });

        if !reusable {
            log::debug!(
                "Building scaler {}x{} -> {}x{} ({format:?})",
                picture.width(),
                picture.height(),
                width,
                height
            );
            let context = ScalingContext::get(
                format,
                picture.width(),
                picture.height(),
                format,
                width,
                height,
                self.flags,
            )
            .map_err(|error| LumaError::ResamplerInit {
                source_width: picture.width(),
                source_height: picture.height(),
                target_width: width,
                target_height: height,
                reason: error.to_string(),
            })?;
            self.context = Some(context);
        }

        self.context
            .as_mut()
            .ok_or_else(|| LumaError::FfmpegError("scaling context unavailable".to_string()))
    }
}

impl Default for SwsResampler {
    fn default() -> Self {
        Self::new(ScalingFilter::default())
    }
}

impl Resampler<VideoFrame> for SwsResampler {
    type Output = VideoFrame;

    fn resample(
        &mut self,
        picture: &VideoFrame,
        width: u32,
        height: u32,
    ) -> Result<VideoFrame, LumaError> {
        let context = self.context_for(picture, width, height)?;
        let mut resampled = VideoFrame::empty();
        context.run(picture, &mut resampled)?;
        Ok(resampled)
    }
}
