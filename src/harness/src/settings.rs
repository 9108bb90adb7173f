//! Settings store shared between the option parser and the workers.
//!
//! Option setters write into a [`SettingStore`] while the command line is
//! parsed. Each worker takes a [`SettingSnapshot`] when it is spawned, so the
//! lookup in the hot path never takes a lock.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use spin::RwLock;
use trapbench_hal::Settings;

use crate::select::FUNC_SETTING;

/// Global, lock-protected settings.
#[derive(Debug, Default)]
pub struct SettingStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl SettingStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Store a string value, replacing any previous one.
    pub fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    /// Read a value back.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Copy of every setting, for handing to a worker.
    pub fn snapshot(&self) -> SettingSnapshot {
        SettingSnapshot(self.values.read().clone())
    }
}

/// Immutable copy of a [`SettingStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingSnapshot(BTreeMap<String, String>);

impl SettingSnapshot {
    /// Insert a value.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

impl Settings for SettingSnapshot {
    fn setting(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Maps an option name to the function that stores its value.
#[derive(Debug, Clone, Copy)]
pub struct OptionSetter {
    /// Option name without leading dashes.
    pub option: &'static str,
    /// Stores the option's argument.
    pub set: fn(&SettingStore, &str),
}

/// Sets the operation the workers should restrict themselves to.
pub fn set_func(store: &SettingStore, name: &str) {
    store.set(FUNC_SETTING, name);
}

/// Setters for every option this benchmark owns.
pub static OPTION_SETTERS: &[OptionSetter] = &[OptionSetter {
    option: FUNC_SETTING,
    set: set_func,
}];

/// Runs the setter registered for `option`. Returns `false` if there is none.
pub fn apply(setters: &[OptionSetter], store: &SettingStore, option: &str, value: &str) -> bool {
    match setters.iter().find(|s| s.option == option) {
        Some(setter) => {
            (setter.set)(store, value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_snapshot() {
        let store = SettingStore::new();
        assert!(store.get(FUNC_SETTING).is_none());

        set_func(&store, "time");
        let snap = store.snapshot();
        assert_eq!(snap.setting(FUNC_SETTING), Some("time"));

        // later writes do not leak into an existing snapshot
        set_func(&store, "getcpu");
        assert_eq!(snap.setting(FUNC_SETTING), Some("time"));
        assert_eq!(store.get(FUNC_SETTING).as_deref(), Some("getcpu"));
    }

    #[test]
    fn test_apply_known_and_unknown() {
        let store = SettingStore::new();
        assert!(apply(OPTION_SETTERS, &store, "x86syscall-func", "gettimeofday"));
        assert_eq!(store.get("x86syscall-func").as_deref(), Some("gettimeofday"));
        assert!(!apply(OPTION_SETTERS, &store, "x86syscall-ops", "10"));
    }
}
