//! Decoded pictures.
//!
//! [`Picture`] is the read-only view of a planar YUV 4:2:0 picture that the
//! region extractor and resampler work with. It is implemented for FFmpeg's
//! [`VideoFrame`] and for the owned [`PlanarPicture`].

use ffmpeg_next::frame::Video as VideoFrame;

/// Index of the luma (Y) plane.
pub const LUMA_PLANE: usize = 0;

/// A planar YUV 4:2:0 picture.
pub trait Picture {
    /// Logical width in luma samples.
    fn width(&self) -> u32;

    /// Height in luma rows.
    fn height(&self) -> u32;

    /// Bytes between the starts of consecutive rows of `plane`. May exceed
    /// the logical row width.
    fn stride(&self, plane: usize) -> usize;

    /// Sample bytes of `plane`, `stride(plane)` bytes per row.
    fn data(&self, plane: usize) -> &[u8];
}

impl Picture for VideoFrame {
    fn width(&self) -> u32 {
        VideoFrame::width(self)
    }

    fn height(&self) -> u32 {
        VideoFrame::height(self)
    }

    fn stride(&self, plane: usize) -> usize {
        VideoFrame::stride(self, plane)
    }

    fn data(&self, plane: usize) -> &[u8] {
        VideoFrame::data(self, plane)
    }
}

/// An owned planar YUV 4:2:0 picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarPicture {
    width: u32,
    height: u32,
    strides: [usize; 3],
    planes: [Vec<u8>; 3],
}

impl PlanarPicture {
    /// A picture with every luma sample set to `luma` and neutral chroma.
    ///
    /// `luma_stride` is clamped to at least `width`.
    pub fn filled(width: u32, height: u32, luma_stride: usize, luma: u8) -> Self {
        let luma_stride = luma_stride.max(width as usize);
        let chroma_width = (width as usize).div_ceil(2);
        let chroma_height = (height as usize).div_ceil(2);
        Self {
            width,
            height,
            strides: [luma_stride, chroma_width, chroma_width],
            planes: [
                vec![luma; luma_stride * height as usize],
                vec![128; chroma_width * chroma_height],
                vec![128; chroma_width * chroma_height],
            ],
        }
    }

    /// A picture whose luma samples are produced by `sample(column, row)`.
    /// Padding bytes beyond `width` are zero.
    pub fn from_fn<F>(width: u32, height: u32, luma_stride: usize, mut sample: F) -> Self
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut picture = Self::filled(width, height, luma_stride, 0);
        let stride = picture.strides[0];
        for row in 0..height {
            for column in 0..width {
                picture.planes[0][row as usize * stride + column as usize] = sample(column, row);
            }
        }
        picture
    }
}

impl Picture for PlanarPicture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self, plane: usize) -> usize {
        self.strides.get(plane).copied().unwrap_or(0)
    }

    fn data(&self, plane: usize) -> &[u8] {
        self.planes.get(plane).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_picture_geometry() {
        let picture = PlanarPicture::filled(5, 3, 8, 42);
        assert_eq!(picture.stride(LUMA_PLANE), 8);
        assert_eq!(picture.data(LUMA_PLANE).len(), 24);
        assert_eq!(picture.stride(1), 3);
        assert_eq!(picture.data(2).len(), 6);
        assert!(picture.data(3).is_empty());
    }

    #[test]
    fn from_fn_leaves_padding_zeroed() {
        let picture = PlanarPicture::from_fn(2, 2, 4, |column, row| (row * 10 + column) as u8 + 1);
        assert_eq!(picture.data(LUMA_PLANE), &[1, 2, 0, 0, 11, 12, 0, 0]);
    }
}
