//! Frame types moved through the pipeline.
//!
//! A [`Frame`] is a fixed-size byte payload tagged with the domain it
//! belongs to. It is deliberately not `Clone`: the producer hands it to
//! the queue, the queue hands it to the consumer, and nobody keeps a copy.

use std::fmt;
use std::str::FromStr;

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

use crate::error::DaqError;

/// Payload size of a single frame (16 MiB).
pub const FRAME_SIZE: usize = 16 * 1024 * 1024;

// ── FrameKind ────────────────────────────────────────────────────

/// Domain a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Untagged raw data.
    #[default]
    Generic,
    Video,
    Audio,
    #[serde(alias = "hw")]
    Hardware,
    Network,
}

impl FrameKind {
    /// Every kind, in declaration order.
    pub const ALL: [FrameKind; 5] = [
        FrameKind::Generic,
        FrameKind::Video,
        FrameKind::Audio,
        FrameKind::Hardware,
        FrameKind::Network,
    ];

    /// Short name used on the command line and in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            FrameKind::Generic => "generic",
            FrameKind::Video => "video",
            FrameKind::Audio => "audio",
            FrameKind::Hardware => "hw",
            FrameKind::Network => "network",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameKind {
    type Err = DaqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(FrameKind::Generic),
            "video" => Ok(FrameKind::Video),
            "audio" => Ok(FrameKind::Audio),
            "hw" | "hardware" => Ok(FrameKind::Hardware),
            "network" => Ok(FrameKind::Network),
            _ => Err(DaqError::UnknownFrameKind(s.to_string())),
        }
    }
}

// ── Frame ────────────────────────────────────────────────────────

/// One unit of payload, tagged by domain.
///
/// Every variant wraps the same fixed-size buffer; the variant is the tag.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    Generic(BytesMut),
    Video(BytesMut),
    Audio(BytesMut),
    Hardware(BytesMut),
    Network(BytesMut),
}

impl Frame {
    /// Allocate a zero-filled frame of `size` bytes tagged with `kind`.
    pub fn zeroed(kind: FrameKind, size: usize) -> Self {
        Self::from_payload(kind, BytesMut::zeroed(size))
    }

    /// Wrap an existing buffer.
    pub fn from_payload(kind: FrameKind, payload: BytesMut) -> Self {
        match kind {
            FrameKind::Generic => Frame::Generic(payload),
            FrameKind::Video => Frame::Video(payload),
            FrameKind::Audio => Frame::Audio(payload),
            FrameKind::Hardware => Frame::Hardware(payload),
            FrameKind::Network => Frame::Network(payload),
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Generic(_) => FrameKind::Generic,
            Frame::Video(_) => FrameKind::Video,
            Frame::Audio(_) => FrameKind::Audio,
            Frame::Hardware(_) => FrameKind::Hardware,
            Frame::Network(_) => FrameKind::Network,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Generic(p)
            | Frame::Video(p)
            | Frame::Audio(p)
            | Frame::Hardware(p)
            | Frame::Network(p) => p,
        }
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        match self {
            Frame::Generic(p)
            | Frame::Video(p)
            | Frame::Audio(p)
            | Frame::Hardware(p)
            | Frame::Network(p) => p,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Give up the tag and return the buffer.
    pub fn into_payload(self) -> BytesMut {
        match self {
            Frame::Generic(p)
            | Frame::Video(p)
            | Frame::Audio(p)
            | Frame::Hardware(p)
            | Frame::Network(p) => p,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
