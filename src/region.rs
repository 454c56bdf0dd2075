//! Luma region extraction.
//!
//! [`extract`] copies a window of luma samples into an owned
//! [`ExtractionRecord`]. The right edge of the window is checked against the
//! plane *stride*, not the picture's logical width: a window may reach into
//! the decoder's alignment padding.

use serde::Serialize;

use crate::{
    configuration::RegionSpec,
    error::LumaError,
    picture::{LUMA_PLANE, Picture},
};

/// Luma samples of one extracted window, row-major.
///
/// Serializes as `{"pixels": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    pixels: Vec<u8>,
    #[serde(skip)]
    width: u32,
    #[serde(skip)]
    height: u32,
}

impl ExtractionRecord {
    /// The samples, `width * height` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Window width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Take ownership of the samples.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Copy `region` out of the luma plane of `picture`.
///
/// Nothing is copied unless the whole window fits.
///
/// # Errors
///
/// - [`LumaError::InvalidRegion`] if either dimension of `region` is zero.
/// - [`LumaError::RegionOutOfBounds`] if `region.x + region.width` exceeds
///   the luma stride or `region.y + region.height` exceeds the picture height.
/// - [`LumaError::MalformedPicture`] if the plane buffer is shorter than its
///   stride and height imply.
pub fn extract<P: Picture + ?Sized>(
    picture: &P,
    region: &RegionSpec,
) -> Result<ExtractionRecord, LumaError> {
    if region.width == 0 || region.height == 0 {
        return Err(LumaError::InvalidRegion {
            width: region.width,
            height: region.height,
        });
    }

    let stride = picture.stride(LUMA_PLANE);
    let plane_height = picture.height();

    let right = region.x as usize + region.width as usize;
    let bottom = u64::from(region.y) + u64::from(region.height);
    if right > stride || bottom > u64::from(plane_height) {
        return Err(LumaError::RegionOutOfBounds {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            stride,
            plane_height,
        });
    }

    let plane = picture.data(LUMA_PLANE);
    let width = region.width as usize;
    let mut pixels = vec![0u8; region.sample_count()];

    for (row, output) in pixels.chunks_exact_mut(width).enumerate() {
        let start = (region.y as usize + row) * stride + region.x as usize;
        let source = plane.get(start..start + width).ok_or_else(|| {
            LumaError::MalformedPicture(format!(
                "luma plane holds {} bytes, row {} needs {}",
                plane.len(),
                region.y as usize + row,
                start + width
            ))
        })?;
        output.copy_from_slice(source);
    }

    Ok(ExtractionRecord {
        pixels,
        width: region.width,
        height: region.height,
    })
}
