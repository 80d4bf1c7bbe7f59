//! Per-kind frame handling between dequeue and send.
//!
//! [`KindDispatcher`] stamps the payload head with the frame's domain
//! label and simulates the processing cost of that domain. The frame is
//! consumed and its buffer frozen into a read-only [`Bytes`] view.

use std::thread;
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::error::DaqError;
use crate::frame::Frame;

/// Turns a dequeued frame into the bytes handed to the sink.
pub trait Dispatch: Send {
    fn dispatch(&mut self, frame: Frame) -> Result<Bytes, DaqError>;
}

impl<F> Dispatch for F
where
    F: FnMut(Frame) -> Result<Bytes, DaqError> + Send,
{
    fn dispatch(&mut self, frame: Frame) -> Result<Bytes, DaqError> {
        self(frame)
    }
}

// ── KindDispatcher ───────────────────────────────────────────────

/// Dispatcher for the built-in domains.
///
/// | Kind     | Label           | Load  |
/// |----------|-----------------|-------|
/// | Video    | `video_frame`   | 10 ms |
/// | Audio    | `audio_frame`   | 20 ms |
/// | Hardware | `hw_frame`      | —     |
/// | Network  | `network_frame` | 30 ms |
///
/// `Generic` frames carry no domain and are rejected with
/// [`DaqError::UnknownFrameKind`].
#[derive(Debug, Clone)]
pub struct KindDispatcher {
    simulate_load: bool,
}

impl KindDispatcher {
    pub fn new() -> Self {
        Self {
            simulate_load: true,
        }
    }

    /// Same tagging, no sleeps.
    pub fn without_load() -> Self {
        Self {
            simulate_load: false,
        }
    }

    fn handle(&self, mut payload: BytesMut, label: &str, load: Duration) -> Bytes {
        stamp(&mut payload, label);
        if self.simulate_load && !load.is_zero() {
            thread::sleep(load);
        }
        payload.freeze()
    }
}

impl Default for KindDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for KindDispatcher {
    fn dispatch(&mut self, frame: Frame) -> Result<Bytes, DaqError> {
        let view = match frame {
            Frame::Video(p) => self.handle(p, "video_frame", Duration::from_millis(10)),
            Frame::Audio(p) => self.handle(p, "audio_frame", Duration::from_millis(20)),
            Frame::Hardware(p) => self.handle(p, "hw_frame", Duration::ZERO),
            Frame::Network(p) => self.handle(p, "network_frame", Duration::from_millis(30)),
            Frame::Generic(_) => {
                return Err(DaqError::UnknownFrameKind("generic".into()));
            }
        };
        Ok(view)
    }
}

/// Write `label` plus a NUL terminator over the start of `payload`,
/// truncated to the payload length.
fn stamp(payload: &mut [u8], label: &str) {
    let tag = label.bytes().chain(std::iter::once(0));
    for (dst, src) in payload.iter_mut().zip(tag) {
        *dst = src;
    }
}

// ── Tests ────────────────────────────────────────────────────────
