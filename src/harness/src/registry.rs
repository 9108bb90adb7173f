//! The operation registry.
//!
//! The registry is built once per worker from the operations the build target
//! supports. Its `enabled` flags are changed only by the selector, before the
//! benchmark loop starts.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hint::black_box;

use crate::abi;
use crate::probe;

/// A zero-argument probe. Returns `true` if the kernel reported success.
pub type Probe = fn() -> bool;

/// One named operation.
#[derive(Clone)]
pub struct OperationEntry {
    probe: Probe,
    name: &'static str,
    enabled: bool,
}

impl OperationEntry {
    /// Creates an enabled entry.
    pub const fn new(name: &'static str, probe: Probe) -> Self {
        Self {
            probe,
            name,
            enabled: true,
        }
    }

    /// Operation name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the benchmark loop exercises this entry.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Runs the probe.
    #[inline]
    pub fn invoke(&self) -> bool {
        (self.probe)()
    }

    /// Runs the probe through a pointer the optimizer cannot see through.
    ///
    /// The call is always a real indirect call, never inlined or elided.
    #[inline]
    pub fn invoke_opaque(&self) -> bool {
        let probe = black_box(self.probe);
        black_box(probe())
    }
}

impl fmt::Debug for OperationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationEntry")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// The always-present no-op entry used by the overhead calibrator.
pub static DUMMY: OperationEntry = OperationEntry::new("dummy", probe::dummy);

/// Ordered, name-unique list of operations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<OperationEntry>,
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    /// Builds the registry for the current build target.
    ///
    /// Operations without a resolvable entry-point number are left out.
    pub fn native() -> Self {
        let mut registry = Self::new();
        for ep in abi::ENTRY_POINTS.iter().filter(|ep| ep.is_resolved()) {
            if let Some(probe) = probe::probe_for(ep.name) {
                registry.insert(OperationEntry::new(ep.name, probe));
            }
        }
        log::trace!("native registry: {:?}", registry.names());
        registry
    }

    /// Builds a registry from arbitrary entries, dropping duplicate names.
    pub fn from_entries(entries: impl IntoIterator<Item = OperationEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    /// Append an entry. Returns `false` if the name is already taken.
    pub fn insert(&mut self, entry: OperationEntry) -> bool {
        if self.get(entry.name).is_some() {
            log::warn!("duplicate operation '{}' ignored", entry.name);
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Get an entry by name.
    pub fn get(&self, name: &str) -> Option<&OperationEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut OperationEntry> {
        self.entries.iter_mut()
    }

    /// Entries the benchmark loop will exercise.
    pub fn enabled(&self) -> impl Iterator<Item = &OperationEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }

    /// Every entry name, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Space-separated names of the enabled entries.
    ///
    /// Returns `None` if the string could not be allocated.
    pub fn enabled_names(&self) -> Option<String> {
        let mut out = String::new();
        for entry in self.enabled() {
            out.try_reserve(entry.name.len() + 1).ok()?;
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(entry.name);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> bool {
        true
    }

    #[test]
    fn test_registry_order_and_lookup() {
        let registry = Registry::from_entries([
            OperationEntry::new("getcpu", pass),
            OperationEntry::new("gettimeofday", pass),
            OperationEntry::new("time", pass),
        ]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), ["getcpu", "gettimeofday", "time"]);
        assert!(registry.get("time").is_some());
        assert!(registry.get("Time").is_none());
        assert!(registry.iter().all(OperationEntry::is_enabled));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = Registry::new();
        assert!(registry.insert(OperationEntry::new("time", pass)));
        assert!(!registry.insert(OperationEntry::new("time", probe::dummy)));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("time").unwrap().invoke());
    }

    #[test]
    fn test_enabled_names() {
        let mut registry = Registry::from_entries([
            OperationEntry::new("a", pass),
            OperationEntry::new("b", pass),
            OperationEntry::new("c", pass),
        ]);
        assert_eq!(registry.enabled_names().as_deref(), Some("a b c"));

        registry.entries[1].set_enabled(false);
        assert_eq!(registry.enabled_names().as_deref(), Some("a c"));

        assert_eq!(Registry::new().enabled_names().as_deref(), Some(""));
    }

    #[test]
    fn test_dummy_entry() {
        assert_eq!(DUMMY.name(), "dummy");
        assert!(DUMMY.is_enabled());
        assert!(!DUMMY.invoke_opaque());
    }

    #[test]
    fn test_native_matches_build_target() {
        let registry = Registry::native();
        if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
            assert_eq!(registry.names(), ["getcpu", "gettimeofday", "time"]);
        } else {
            assert!(registry.is_empty());
        }
        assert!(registry.get("dummy").is_none());
    }
}
