//! Compressed access units read from a container.

/// How the NAL units inside an [`AccessUnit`] are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// As stored by the container. For MP4-family files this is usually
    /// length-prefixed NAL units.
    Container,
    /// Start-code delimited elementary stream (ITU-T H.264 Annex B).
    AnnexB,
}

/// One compressed unit of a single elementary stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessUnit {
    /// Index of the stream this unit belongs to.
    pub stream_index: usize,
    /// Compressed payload.
    pub data: Vec<u8>,
    /// Framing of `data`.
    pub framing: Framing,
}

impl AccessUnit {
    /// A unit as read from the container.
    pub fn new(stream_index: usize, data: Vec<u8>) -> Self {
        Self {
            stream_index,
            data,
            framing: Framing::Container,
        }
    }

    /// A unit whose payload is already start-code delimited.
    pub fn annex_b(stream_index: usize, data: Vec<u8>) -> Self {
        Self {
            stream_index,
            data,
            framing: Framing::AnnexB,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the unit carries no payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
