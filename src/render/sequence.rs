use std::sync::atomic::{AtomicU64, Ordering};

/// Generation tag handed out when a render request starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    /// Monotonic generation number.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Drops completions of renders that were overtaken by a newer, already accepted one.
///
/// Hosts call [`RenderSequencer::begin`] when a render is requested and
/// [`RenderSequencer::accept`] when its result arrives; only accepted results should be shown.
#[derive(Debug, Default)]
pub struct RenderSequencer {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl RenderSequencer {
    /// Fresh sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new render request.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a completed render may be displayed. Accepting a ticket retires every older one.
    pub fn accept(&self, ticket: RenderTicket) -> bool {
        self.accepted.fetch_max(ticket.0, Ordering::AcqRel) < ticket.0
    }

    /// Whether `ticket` is the most recently issued request.
    pub fn is_latest(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sequence.rs"]
mod tests;
