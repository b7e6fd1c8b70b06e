//! Collision-free table and subquery aliases.
//!
//! An [`AliasGenerator`] hands out aliases per base name: the first request
//! for `t1` yields `t1`, the next ones `t1_1`, `t1_2`, ...
//!
//! Aliases compare by identity, not by text. Two aliases created separately
//! are never equal even when they render the same; mixing generated aliases
//! with hand-written ones that happen to match (`t1_1`) is the caller's
//! responsibility.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ALIAS_ID: AtomicU64 = AtomicU64::new(1);

/// A table/subquery alias.
#[derive(Clone)]
pub struct Alias {
    id: u64,
    base: Arc<str>,
    suffix: Option<u32>,
    name: Arc<str>,
}

impl Alias {
    fn create(base: &str, suffix: Option<u32>) -> Self {
        let name: Arc<str> = match suffix {
            Some(n) => format!("{base}_{n}").into(),
            None => base.into(),
        };
        Self {
            id: NEXT_ALIAS_ID.fetch_add(1, Ordering::Relaxed),
            base: base.into(),
            suffix,
            name,
        }
    }

    /// A hand-picked alias, outside any generator.
    pub fn named(name: &str) -> Self {
        Self::create(name, None)
    }

    /// The base name this alias was requested with.
    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// The numeric suffix, if this was not the first request for its base.
    pub fn suffix(&self) -> Option<u32> {
        self.suffix
    }

    /// The rendered alias text (unescaped).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Alias {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Alias {}

impl std::hash::Hash for Alias {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-statement alias allocator.
#[derive(Debug, Clone, Default)]
pub struct AliasGenerator {
    next_suffix: HashMap<String, u32>,
}

impl AliasGenerator {
    /// Create an empty generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next alias for `base`.
    pub fn generate(&mut self, base: &str) -> Alias {
        match self.next_suffix.get_mut(base) {
            None => {
                self.next_suffix.insert(base.to_string(), 1);
                Alias::create(base, None)
            }
            Some(next) => {
                let suffix = *next;
                *next += 1;
                Alias::create(base, Some(suffix))
            }
        }
    }
}
