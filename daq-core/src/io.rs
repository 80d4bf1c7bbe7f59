//! Capability traits for the hardware edges of the pipeline.
//!
//! The producer and consumer only see these traits, never a concrete
//! device. Closures implement them, which keeps tests free of stubs.

/// Fills a frame buffer with freshly acquired data.
pub trait Acquire: Send {
    /// Overwrite `output` with one frame's worth of data. Infallible from
    /// the pipeline's point of view.
    fn acquire(&mut self, output: &mut [u8]);
}

impl<F> Acquire for F
where
    F: FnMut(&mut [u8]) + Send,
{
    fn acquire(&mut self, output: &mut [u8]) {
        self(output)
    }
}

/// Fire-and-forget destination for processed frames.
pub trait Sink: Send {
    fn send(&mut self, input: &[u8]);
}

impl<F> Sink for F
where
    F: FnMut(&[u8]) + Send,
{
    fn send(&mut self, input: &[u8]) {
        self(input)
    }
}
