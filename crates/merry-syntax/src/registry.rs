//! The program registry: command key to codebox.

use crate::codebox::{Codebox, CommandKey};
use fxhash::FxHashMap;

/// All codeboxes of a loaded program, keyed by [`CommandKey`].
///
/// Keys are single characters, so hashing uses `FxHash`. Inserting under an
/// existing key replaces the previous codebox; the loader decides whether
/// that is an error.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    codeboxes: FxHashMap<CommandKey, Codebox>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `codebox` under its key, returning the codebox it replaced.
    pub fn insert(&mut self, codebox: Codebox) -> Option<Codebox> {
        self.codeboxes.insert(codebox.key(), codebox)
    }

    /// Looks up the codebox invoked by `key`.
    #[must_use]
    pub fn get(&self, key: CommandKey) -> Option<&Codebox> {
        self.codeboxes.get(&key)
    }

    /// Returns the main (unnamed) codebox.
    #[must_use]
    pub fn main(&self) -> Option<&Codebox> {
        self.get(CommandKey::MAIN)
    }

    /// Returns `true` if a codebox is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: CommandKey) -> bool {
        self.codeboxes.contains_key(&key)
    }

    /// Number of registered codeboxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codeboxes.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codeboxes.is_empty()
    }

    /// Registered keys in a stable order (main first, then by character).
    #[must_use]
    pub fn keys(&self) -> Vec<CommandKey> {
        let mut keys: Vec<CommandKey> = self.codeboxes.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates over all codeboxes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (CommandKey, &Codebox)> {
        self.codeboxes.iter().map(|(key, codebox)| (*key, codebox))
    }
}

impl IntoIterator for Registry {
    type Item = Codebox;
    type IntoIter = std::collections::hash_map::IntoValues<CommandKey, Codebox>;

    fn into_iter(self) -> Self::IntoIter {
        self.codeboxes.into_values()
    }
}

impl FromIterator<Codebox> for Registry {
    /// Collects codeboxes; later ones win on key collisions.
    fn from_iter<I: IntoIterator<Item = Codebox>>(iter: I) -> Self {
        let mut registry = Self::new();
        for codebox in iter {
            registry.insert(codebox);
        }
        registry
    }
}
