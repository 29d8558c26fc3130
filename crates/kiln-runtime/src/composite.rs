//! The composite runtime module.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::context::ComposeContext;
use crate::error::{ComposeError, Result};
use crate::unit::FragmentUnit;

/// A content digest over merged payloads (SHA-256 hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Hex string form of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single merged runtime module for one compilation.
///
/// Seeded from the first selected fragment unit and grown by repeated
/// binary link-merge. The composite exclusively owns everything merged
/// into it: [`link_in`](Self::link_in) takes its source unit by value
/// and the unit is gone afterwards.
#[derive(Debug)]
pub struct CompositeModule<'ctx> {
    ctx: &'ctx ComposeContext,
    fragments: Vec<&'static str>,
    /// Exported symbol -> defining fragment.
    symbols: BTreeMap<&'static str, &'static str>,
    hasher: Sha256,
    payload_bytes: u64,
}

impl<'ctx> CompositeModule<'ctx> {
    /// Seed the accumulator from its first unit.
    pub fn new(seed: FragmentUnit<'ctx>) -> Result<Self> {
        let mut module = Self {
            ctx: seed.context(),
            fragments: Vec::new(),
            symbols: BTreeMap::new(),
            hasher: Sha256::new(),
            payload_bytes: 0,
        };
        module.absorb(seed)?;
        Ok(module)
    }

    /// Link-merge `unit` into the composite, consuming it.
    ///
    /// Fails when the unit is bound to a different context or defines a
    /// symbol the composite already exports. On failure the whole
    /// composition is abandoned by the caller; no partially merged
    /// module is ever handed out.
    pub fn link_in(&mut self, unit: FragmentUnit<'ctx>) -> Result<()> {
        if !std::ptr::eq(self.ctx, unit.context()) {
            return Err(ComposeError::Link {
                fragment: unit.name(),
                detail: "unit is bound to a different compilation context".into(),
            });
        }
        self.absorb(unit)
    }

    fn absorb(&mut self, unit: FragmentUnit<'ctx>) -> Result<()> {
        for &symbol in unit.symbols() {
            if let Some(&previous) = self.symbols.get(symbol) {
                return Err(ComposeError::Link {
                    fragment: unit.name(),
                    detail: format!(
                        "duplicate definition of symbol '{symbol}' (already defined by '{previous}')"
                    ),
                });
            }
            self.symbols.insert(symbol, unit.name());
        }
        self.hasher.update(unit.payload());
        self.payload_bytes += unit.payload().len() as u64;
        self.fragments.push(unit.name());
        Ok(())
    }

    /// Resolve an exported symbol to the fragment that defines it.
    pub fn lookup(&self, symbol: &str) -> Option<&'static str> {
        self.symbols.get(symbol).copied()
    }

    /// Fragment names in merge order.
    pub fn fragments(&self) -> &[&'static str] {
        &self.fragments
    }

    /// All exported symbols, sorted.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.symbols.keys().copied()
    }

    /// Number of exported symbols.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Total merged payload size in bytes.
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bytes
    }

    /// Content digest over merged payloads, in merge order.
    pub fn content_digest(&self) -> ContentDigest {
        let digest = self.hasher.clone().finalize();
        ContentDigest(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}
