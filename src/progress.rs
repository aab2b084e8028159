//! Progress reporting.
//!
//! Operations report a handful of percentage checkpoints rather than a
//! continuous stream. Values reaching a sink never decrease and never
//! exceed 100.

/// Receiver of progress checkpoints (0-100).
pub trait ProgressSink {
    /// Called at each checkpoint.
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// A sink that discards every checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Wraps a sink and enforces the monotonic 0-100 contract.
pub(crate) struct Progress<'a> {
    sink: &'a mut dyn ProgressSink,
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: None }
    }

    /// Report a checkpoint; values below the previous one are dropped.
    pub(crate) fn checkpoint(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent < last) {
            return;
        }
        log::trace!("progress {}%", percent);
        self.last = Some(percent);
        self.sink.report(percent);
    }

    /// Report `base + span * done / total`, rounded down.
    pub(crate) fn step(&mut self, base: u8, span: u8, done: usize, total: usize) {
        let offset = if total == 0 {
            span as usize
        } else {
            span as usize * done.min(total) / total
        };
        self.checkpoint(base.saturating_add(offset as u8));
    }

    pub(crate) fn finish(&mut self) {
        self.checkpoint(100);
    }
}
