//! Globally-unique symbol allocation for generated identifiers.
//!
//! Every emitted artifact that is referenced by name (group ids, element ids,
//! container/cuboid/requirement-set locals, template placeholders derived from
//! them) gets its symbol from one allocator instance, so uniqueness holds
//! across the whole compilation run regardless of prefix.
//!
//! Symbol generation is the only non-deterministic part of the pipeline. The
//! seeded mode swaps the random tail for a counter, which makes two runs over
//! the same input byte-identical and keeps that property testable.

use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug)]
enum SymbolSource {
    /// Production mode: uuid-v4 tails.
    Random,
    /// Deterministic mode for tests and reproducible builds.
    Counter(u64),
}

/// Allocates collision-free symbols that are valid bare identifiers in the
/// generated output.
#[derive(Debug)]
pub struct SymbolAllocator {
    source: SymbolSource,
    used: HashSet<String>,
}

impl SymbolAllocator {
    /// Allocator with random (uuid-v4) symbol tails.
    pub fn new() -> Self {
        SymbolAllocator {
            source: SymbolSource::Random,
            used: HashSet::new(),
        }
    }

    /// Allocator with a deterministic counter tail starting at `start`.
    pub fn seeded(start: u64) -> Self {
        SymbolAllocator {
            source: SymbolSource::Counter(start),
            used: HashSet::new(),
        }
    }

    /// Produce a fresh symbol `<prefix>_<tail>`. No two calls on the same
    /// allocator return the same symbol, even with different prefixes.
    pub fn allocate(&mut self, prefix: &str) -> String {
        let prefix = sanitize_prefix(prefix);

        loop {
            let candidate = match &mut self.source {
                SymbolSource::Random => {
                    format!("{}_{}", prefix, Uuid::new_v4().to_string().replace('-', "_"))
                }
                SymbolSource::Counter(next) => {
                    let value = *next;
                    *next += 1;
                    format!("{}_{}", prefix, value)
                }
            };

            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Number of symbols handed out so far.
    pub fn allocated(&self) -> usize {
        self.used.len()
    }
}

impl Default for SymbolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Restrict a prefix to `[A-Za-z0-9_]` and force a non-numeric first
/// character, so the symbol is a valid identifier in the output language.
fn sanitize_prefix(prefix: &str) -> String {
    let mut cleaned: String = prefix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    match cleaned.chars().next() {
        None => cleaned.push('v'),
        Some(first) if first.is_ascii_digit() => cleaned.insert(0, 'v'),
        Some(_) => {}
    }

    cleaned
}
