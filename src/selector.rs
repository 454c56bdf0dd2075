//! Frame selection and the decode loop.
//!
//! [`DecodeLoop`] pulls access units from a [`Demuxer`], normalizes and
//! decodes those of the video stream, numbers every reconstructed picture in
//! emission order, and hands the pictures the [`SelectionPolicy`] selects to
//! a caller-supplied handler. It reads no further than it has to: once the
//! policy is satisfied, no more access units are pulled.
//!
//! Pictures are borrowed from the decoder, so the handler has to copy out
//! whatever it needs before returning.

use crate::{
    annexb::Normalizer,
    configuration::SelectionPolicy,
    decoder::FrameDecoder,
    demux::Demuxer,
    error::LumaError,
};

/// Counters describing a finished decode loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionOutcome {
    /// Pictures the decoder emitted.
    pub decoded: u64,
    /// Pictures passed to the handler.
    pub selected: u64,
    /// Pictures the policy asked for.
    pub requested: u64,
}

impl SelectionOutcome {
    /// Whether the input ran out before the policy was satisfied.
    pub fn is_short(&self) -> bool {
        self.selected < self.requested
    }
}

/// The demux → normalize → decode → select pipeline for one input.
pub struct DecodeLoop<'a, D, N, F> {
    demuxer: &'a mut D,
    normalizer: &'a mut N,
    decoder: &'a mut F,
    stream_index: usize,
    policy: SelectionPolicy,
    decoded: u64,
    selected: u64,
}

impl<'a, D, N, F> DecodeLoop<'a, D, N, F>
where
    D: Demuxer,
    N: Normalizer,
    F: FrameDecoder,
{
    /// Build a loop over the access units of stream `stream_index`.
    pub fn new(
        demuxer: &'a mut D,
        normalizer: &'a mut N,
        decoder: &'a mut F,
        stream_index: usize,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            demuxer,
            normalizer,
            decoder,
            stream_index,
            policy,
            decoded: 0,
            selected: 0,
        }
    }

    /// Run until the policy is satisfied or the input is exhausted.
    ///
    /// `handler` receives the decode ordinal and the picture for every
    /// selected picture, in decode order. Running out of input early is not
    /// an error; check [`SelectionOutcome::is_short`].
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from the demuxer, normalizer,
    /// decoder, or handler. Decode failures are never skipped; the counters
    /// reached before the failure remain available from
    /// [`outcome`](Self::outcome).
    pub fn run<H>(&mut self, mut handler: H) -> Result<SelectionOutcome, LumaError>
    where
        H: FnMut(u64, &F::Picture) -> Result<(), LumaError>,
    {
        while !self.is_satisfied() {
            let Some(unit) = self.demuxer.next_access_unit()? else {
                log::debug!(
                    "Input exhausted after {} decoded pictures, draining decoder",
                    self.decoded
                );
                self.decoder.send_eof()?;
                self.drain(&mut handler)?;
                break;
            };

            if unit.stream_index != self.stream_index || unit.is_empty() {
                continue;
            }

            let unit = self.normalizer.normalize(unit)?;
            log::trace!(
                "Access unit: {} bytes [{}]",
                unit.size(),
                crate::utilities::hex_preview(&unit.data, 16)
            );

            self.decoder.send(&unit)?;
            self.drain(&mut handler)?;
        }

        Ok(self.outcome())
    }

    /// Counters so far, whether or not [`run`](Self::run) succeeded.
    pub fn outcome(&self) -> SelectionOutcome {
        SelectionOutcome {
            decoded: self.decoded,
            selected: self.selected,
            requested: self.policy.count(),
        }
    }

    fn is_satisfied(&self) -> bool {
        self.selected >= self.policy.count()
    }

    /// Receive every picture the decoder has ready.
    fn drain<H>(&mut self, handler: &mut H) -> Result<(), LumaError>
    where
        H: FnMut(u64, &F::Picture) -> Result<(), LumaError>,
    {
        while self.selected < self.policy.count() {
            let Some(picture) = self.decoder.receive()? else {
                return Ok(());
            };

            let ordinal = self.decoded;
            self.decoded += 1;

            if self.policy.selects(ordinal) {
                handler(ordinal, picture)?;
                self.selected += 1;
            }
        }
        Ok(())
    }
}
