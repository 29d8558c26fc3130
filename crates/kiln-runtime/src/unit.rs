//! Materialized fragment units.

use crate::context::ComposeContext;

/// A runtime fragment loaded into a compilation context, ready to be
/// link-merged.
///
/// Uniquely owned until
/// [`CompositeModule::link_in`](crate::CompositeModule::link_in)
/// consumes it; no unit outlives the merge that absorbed it.
#[derive(Debug)]
pub struct FragmentUnit<'ctx> {
    ctx: &'ctx ComposeContext,
    name: &'static str,
    payload: &'static [u8],
    symbols: &'static [&'static str],
}

impl<'ctx> FragmentUnit<'ctx> {
    pub(crate) fn new(
        ctx: &'ctx ComposeContext,
        name: &'static str,
        payload: &'static [u8],
        symbols: &'static [&'static str],
    ) -> Self {
        ctx.note_materialized(payload.len());
        Self {
            ctx,
            name,
            payload,
            symbols,
        }
    }

    /// Fragment name this unit was materialized from.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The precompiled payload.
    pub fn payload(&self) -> &'static [u8] {
        self.payload
    }

    /// Symbols this unit defines.
    pub fn symbols(&self) -> &'static [&'static str] {
        self.symbols
    }

    pub(crate) fn context(&self) -> &'ctx ComposeContext {
        self.ctx
    }
}
