//! Stub pipeline collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use lumaslice::{
    AccessUnit, Demuxer, FrameDecoder, Framing, LumaError, Picture, PlanarPicture, Resampler,
    StreamInfo,
};

pub const VIDEO_STREAM: usize = 0;
pub const AUDIO_STREAM: usize = 1;

/// Payload that makes [`StubDecoder`] fail.
pub const CORRUPT_PAYLOAD: &[u8] = b"corrupt";
/// Payload that [`StubDecoder`] accepts without producing a picture.
pub const NO_PICTURE_PAYLOAD: &[u8] = b"partial";

pub fn video_info() -> StreamInfo {
    StreamInfo {
        index: VIDEO_STREAM,
        codec_name: "h264".to_string(),
        width: 64,
        height: 64,
        extradata: Vec::new(),
    }
}

pub fn video_unit() -> AccessUnit {
    AccessUnit::new(VIDEO_STREAM, vec![0x65, 0x88, 0x84])
}

pub fn audio_unit() -> AccessUnit {
    AccessUnit::new(AUDIO_STREAM, vec![0xff, 0xf1])
}

/// Hands out a fixed list of access units.
pub struct StubDemuxer {
    stream: Option<StreamInfo>,
    units: VecDeque<AccessUnit>,
    pub reads: usize,
}

impl StubDemuxer {
    pub fn new(units: Vec<AccessUnit>) -> Self {
        Self {
            stream: Some(video_info()),
            units: units.into(),
            reads: 0,
        }
    }

    /// `count` video units and nothing else.
    pub fn video(count: usize) -> Self {
        Self::new((0..count).map(|_| video_unit()).collect())
    }

    pub fn without_video(units: Vec<AccessUnit>) -> Self {
        Self {
            stream: None,
            ..Self::new(units)
        }
    }
}

impl Demuxer for StubDemuxer {
    fn video_stream(&self) -> Option<&StreamInfo> {
        self.stream.as_ref()
    }

    fn next_access_unit(&mut self) -> Result<Option<AccessUnit>, LumaError> {
        let unit = self.units.pop_front();
        if unit.is_some() {
            self.reads += 1;
        }
        Ok(unit)
    }
}

/// Emits one picture per accepted video unit, built by `make(ordinal)`.
///
/// Rejects units that were not normalized. With a delay of `n`, the last
/// `n` pictures are only released after end of stream.
pub struct StubDecoder {
    make: Box<dyn FnMut(u64) -> PlanarPicture>,
    remaining: u64,
    produced: u64,
    ready: VecDeque<PlanarPicture>,
    current: Option<PlanarPicture>,
    delay: usize,
    eof: bool,
    pub sent: usize,
}

impl StubDecoder {
    /// At most `pictures` pictures in total.
    pub fn new<F>(pictures: u64, make: F) -> Self
    where
        F: FnMut(u64) -> PlanarPicture + 'static,
    {
        Self {
            make: Box::new(make),
            remaining: pictures,
            produced: 0,
            ready: VecDeque::new(),
            current: None,
            delay: 0,
            eof: false,
            sent: 0,
        }
    }

    /// 64x64 pictures with every luma sample set to `value`.
    pub fn constant(pictures: u64, value: u8) -> Self {
        Self::new(pictures, move |_| PlanarPicture::filled(64, 64, 64, value))
    }

    /// 64x64 pictures whose luma samples equal the picture's ordinal.
    pub fn numbered(pictures: u64) -> Self {
        Self::new(pictures, |ordinal| PlanarPicture::filled(64, 64, 64, ordinal as u8))
    }

    pub fn with_delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }
}

impl FrameDecoder for StubDecoder {
    type Picture = PlanarPicture;

    fn send(&mut self, unit: &AccessUnit) -> Result<(), LumaError> {
        self.sent += 1;
        if unit.framing != Framing::AnnexB {
            return Err(LumaError::DecodeError("unit was not normalized".to_string()));
        }
        if unit.data == CORRUPT_PAYLOAD {
            return Err(LumaError::DecodeError("corrupt slice".to_string()));
        }
        if unit.data == NO_PICTURE_PAYLOAD || self.remaining == 0 {
            return Ok(());
        }
        self.remaining -= 1;
        let picture = (self.make)(self.produced);
        self.produced += 1;
        self.ready.push_back(picture);
        Ok(())
    }

    fn send_eof(&mut self) -> Result<(), LumaError> {
        self.eof = true;
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<&PlanarPicture>, LumaError> {
        self.current = if self.eof || self.ready.len() > self.delay {
            self.ready.pop_front()
        } else {
            None
        };
        Ok(self.current.as_ref())
    }
}

/// Nearest-neighbour resampler that records every call.
#[derive(Default)]
pub struct StubResampler {
    /// `(source_width, source_height, target_width, target_height)` per call.
    pub calls: Vec<(u32, u32, u32, u32)>,
}

impl Resampler<PlanarPicture> for StubResampler {
    type Output = PlanarPicture;

    fn resample(
        &mut self,
        picture: &PlanarPicture,
        width: u32,
        height: u32,
    ) -> Result<PlanarPicture, LumaError> {
        self.calls.push((picture.width(), picture.height(), width, height));
        let stride = picture.stride(0);
        let source = picture.data(0);
        Ok(PlanarPicture::from_fn(width, height, width as usize, |column, row| {
            let source_column = (column * picture.width() / width) as usize;
            let source_row = (row * picture.height() / height) as usize;
            source[source_row * stride + source_column]
        }))
    }
}
