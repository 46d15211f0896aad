use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Observer notified once after every state change that needs a repaint.
pub trait RenderTrigger {
    /// Request a repaint.
    fn request_render(&mut self);
}

impl<F: FnMut()> RenderTrigger for F {
    fn request_render(&mut self) {
        self()
    }
}

/// Shareable pending-redraw counter for hosts that poll instead of handling callbacks.
#[derive(Clone, Debug, Default)]
pub struct RedrawFlag(Arc<AtomicU64>);

impl RedrawFlag {
    /// New flag with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests accumulated since the last [`RedrawFlag::take`].
    pub fn pending(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Return and reset the pending count.
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::AcqRel)
    }
}

impl RenderTrigger for RedrawFlag {
    fn request_render(&mut self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/trigger.rs"]
mod tests;
