//! The compilation context fragment units are bound to.

use std::cell::Cell;

/// Shared state for one compilation's composition.
///
/// Every [`FragmentUnit`](crate::FragmentUnit) and the resulting
/// [`CompositeModule`](crate::CompositeModule) borrow the context they
/// were created against; units from different contexts cannot be
/// merged. Interior counters make the context `!Sync`, so a single
/// context cannot be shared across threads, matching the
/// one-composition-at-a-time contract. Independent contexts are fully
/// independent.
#[derive(Debug, Default)]
pub struct ComposeContext {
    units_materialized: Cell<usize>,
    bytes_loaded: Cell<u64>,
}

impl ComposeContext {
    /// Create a fresh context for one compilation.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn note_materialized(&self, payload_len: usize) {
        self.units_materialized.set(self.units_materialized.get() + 1);
        self.bytes_loaded
            .set(self.bytes_loaded.get() + payload_len as u64);
    }

    /// How many fragment units have been materialized against this
    /// context.
    pub fn units_materialized(&self) -> usize {
        self.units_materialized.get()
    }

    /// Total payload bytes loaded into this context.
    pub fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let ctx = ComposeContext::new();
        assert_eq!(ctx.units_materialized(), 0);
        assert_eq!(ctx.bytes_loaded(), 0);
    }

    #[test]
    fn materialization_is_recorded() {
        let ctx = ComposeContext::new();
        ctx.note_materialized(16);
        ctx.note_materialized(8);
        assert_eq!(ctx.units_materialized(), 2);
        assert_eq!(ctx.bytes_loaded(), 24);
    }
}
