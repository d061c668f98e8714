//! Command registry keyed by command name.
//!
//! The registry is filled once while the bot starts and only read afterwards, so it
//! needs no locking. Registration order is preserved for `all()`, which is what the
//! help listing and command deployment iterate over.

use std::collections::HashMap;
use tracing::debug;

/// Names of the commands listed under "Moderation" in the help overview.
pub const MODERATION_COMMANDS: [&str; 5] = ["kick", "ban", "timeout", "clear", "warn"];

/// Anything the registry can key by name.
pub trait Named {
    /// Unique command name
    fn name(&self) -> &str;
}

/// Help overview grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Everything not in [`MODERATION_COMMANDS`]
    General,
    /// Listed in [`MODERATION_COMMANDS`]
    Moderation,
}

impl Category {
    /// Category of a command name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if MODERATION_COMMANDS.contains(&name) {
            Self::Moderation
        } else {
            Self::General
        }
    }
}

/// Ordered name → entry mapping with unique names.
#[derive(Debug)]
pub struct CommandRegistry<D> {
    entries: Vec<D>,
    index: HashMap<String, usize>,
}

impl<D> Default for CommandRegistry<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<D: Named> CommandRegistry<D> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, replacing any entry with the same name in place.
    pub fn register(&mut self, entry: D) {
        let name = entry.name().to_string();
        if let Some(&position) = self.index.get(&name) {
            self.entries[position] = entry;
            debug!(command = %name, "Command re-registered");
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push(entry);
            debug!(command = %name, "Command registered");
        }
    }

    /// Removes the entry named `name`. Returns whether one was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(position) = self.index.remove(name) else {
            return false;
        };
        self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        debug!(command = %name, "Command unregistered");
        true
    }

    /// The entry named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&D> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Every entry in registration order.
    #[must_use]
    pub fn all(&self) -> &[D] {
        &self.entries
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Named::name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Named> FromIterator<D> for CommandRegistry<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entry in iter {
            registry.register(entry);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Stub {
        name: &'static str,
        revision: u8,
    }

    impl Named for Stub {
        fn name(&self) -> &str {
            self.name
        }
    }

    fn stub(name: &'static str, revision: u8) -> Stub {
        Stub { name, revision }
    }

    #[test]
    fn test_lookup_after_register() {
        let registry: CommandRegistry<Stub> = [stub("ping", 1), stub("kick", 1)].into_iter().collect();

        assert_eq!(registry.lookup("ping"), Some(&stub("ping", 1)));
        assert_eq!(registry.lookup("kick"), Some(&stub("kick", 1)));
        assert_eq!(registry.lookup("ban"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register(stub("ping", 1));
        registry.register(stub("kick", 1));
        registry.register(stub("ping", 2));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("ping"), Some(&stub("ping", 2)));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ping", "kick"]);
    }

    #[test]
    fn test_unregister_keeps_index_consistent() {
        let mut registry: CommandRegistry<Stub> =
            [stub("ping", 1), stub("kick", 1), stub("ban", 1)].into_iter().collect();

        assert!(registry.unregister("ping"));
        assert!(!registry.unregister("ping"));

        assert_eq!(registry.lookup("kick"), Some(&stub("kick", 1)));
        assert_eq!(registry.lookup("ban"), Some(&stub("ban", 1)));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["kick", "ban"]);
    }

    #[test]
    fn test_category() {
        assert_eq!(Category::of("clear"), Category::Moderation);
        assert_eq!(Category::of("warn"), Category::Moderation);
        assert_eq!(Category::of("userinfo"), Category::General);
    }
}
