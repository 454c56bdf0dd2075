//! Extraction configuration.
//!
//! [`ExtractionConfig`] bundles the choices that shape one extraction run:
//! which decoded pictures are selected ([`SelectionPolicy`]), the size of the
//! luma window ([`RegionSpec`]), and whether pictures are resampled to that
//! size first.
//!
//! # Example
//!
//! ```
//! use lumaslice::{ExtractionConfig, RegionSpec, SelectionPolicy};
//!
//! let config = ExtractionConfig::new()
//!     .with_policy(SelectionPolicy::run(10, 4)?)
//!     .with_region(RegionSpec::square(32)?)
//!     .with_resample(true);
//! assert_eq!(config.policy.count(), 4);
//! # Ok::<(), lumaslice::LumaError>(())
//! ```

use ffmpeg_next::software::scaling::Flags as ScalingFlags;

use crate::error::LumaError;

/// Which decoded pictures an extraction run keeps.
///
/// Ordinals count *successfully decoded* pictures in decoder emission order,
/// starting at 0. Access units that produce no picture, and units from other
/// streams, do not advance the ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep only the picture whose ordinal equals `offset`.
    Single {
        /// Ordinal of the picture to keep.
        offset: u64,
    },
    /// Keep `count` consecutive pictures, starting at ordinal `offset`.
    Run {
        /// Ordinal of the first picture to keep.
        offset: u64,
        /// Number of pictures to keep. Always at least 1.
        count: u64,
    },
}

impl SelectionPolicy {
    /// Select exactly one picture.
    pub fn single(offset: u64) -> Self {
        SelectionPolicy::Single { offset }
    }

    /// Select a run of `count` pictures starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LumaError::InvalidCount`] if `count` is zero.
    pub fn run(offset: u64, count: u64) -> Result<Self, LumaError> {
        if count == 0 {
            return Err(LumaError::InvalidCount);
        }
        Ok(SelectionPolicy::Run { offset, count })
    }

    /// Ordinal of the first selected picture.
    pub fn offset(&self) -> u64 {
        match *self {
            SelectionPolicy::Single { offset } | SelectionPolicy::Run { offset, .. } => offset,
        }
    }

    /// Number of pictures the policy asks for.
    pub fn count(&self) -> u64 {
        match *self {
            SelectionPolicy::Single { .. } => 1,
            SelectionPolicy::Run { count, .. } => count,
        }
    }

    /// Whether the picture with the given decode ordinal is selected.
    ///
    /// Does not account for how many pictures were already selected; the
    /// decode loop stops once [`count`](Self::count) is reached.
    pub fn selects(&self, ordinal: u64) -> bool {
        match *self {
            SelectionPolicy::Single { offset } => ordinal == offset,
            SelectionPolicy::Run { offset, .. } => ordinal >= offset,
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Single { offset: 0 }
    }
}

/// A rectangular window in a picture's luma plane.
///
/// The extraction pipeline always uses the picture origin; an explicit
/// origin is available through [`with_origin`](Self::with_origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpec {
    /// Left edge, in samples.
    pub x: u32,
    /// Top edge, in rows.
    pub y: u32,
    /// Width in samples.
    pub width: u32,
    /// Height in rows.
    pub height: u32,
}

impl RegionSpec {
    /// A `width` x `height` window at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`LumaError::InvalidRegion`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, LumaError> {
        if width == 0 || height == 0 {
            return Err(LumaError::InvalidRegion { width, height });
        }
        Ok(Self {
            x: 0,
            y: 0,
            width,
            height,
        })
    }

    /// A `side` x `side` window at the origin.
    pub fn square(side: u32) -> Result<Self, LumaError> {
        Self::new(side, side)
    }

    /// Move the window's top-left corner.
    #[must_use]
    pub fn with_origin(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Number of samples in the window.
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for RegionSpec {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 32,
            height: 32,
        }
    }
}

/// Interpolation filter used when resampling pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingFilter {
    /// Nearest-neighbour sampling.
    Point,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic interpolation. This is the default.
    #[default]
    Bicubic,
    /// Lanczos windowed sinc.
    Lanczos,
}

impl ScalingFilter {
    pub(crate) fn to_ffmpeg_flags(self) -> ScalingFlags {
        match self {
            ScalingFilter::Point => ScalingFlags::POINT,
            ScalingFilter::Bilinear => ScalingFlags::BILINEAR,
            ScalingFilter::Bicubic => ScalingFlags::BICUBIC,
            ScalingFilter::Lanczos => ScalingFlags::LANCZOS,
        }
    }
}

/// Settings for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Which decoded pictures to keep.
    pub policy: SelectionPolicy,
    /// Size of the extracted window. When resampling, also the target
    /// picture size.
    pub region: RegionSpec,
    /// Resample each selected picture to the region size before extraction.
    pub resample: bool,
    /// Filter used when `resample` is set.
    pub scaling_filter: ScalingFilter,
}

impl ExtractionConfig {
    /// First picture only, 32x32 window, no resampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select pictures with `policy`.
    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extract windows of `region`'s size.
    #[must_use]
    pub fn with_region(mut self, region: RegionSpec) -> Self {
        self.region = region;
        self
    }

    /// Resample each selected picture to the region size first.
    #[must_use]
    pub fn with_resample(mut self, resample: bool) -> Self {
        self.resample = resample;
        self
    }

    /// Filter for resampling.
    #[must_use]
    pub fn with_scaling_filter(mut self, filter: ScalingFilter) -> Self {
        self.scaling_filter = filter;
        self
    }
}
