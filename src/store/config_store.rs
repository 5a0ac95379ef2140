//! Namespaced, thread-safe config store.

use dashmap::DashMap;

use crate::observability::metrics;
use crate::store::convert::{convert_or, FromConfigValue};
use crate::store::parser::{parse_entries, split_config_name};

/// In-memory config values, grouped by namespace.
///
/// Written only through [`ConfigStore::reload_config_content`]; read from any
/// number of threads. Each entry is replaced under its shard lock, so a reader
/// sees either the old or the new value of a key, never a partial one.
#[derive(Debug, Default)]
pub struct ConfigStore {
    namespaces: DashMap<String, DashMap<String, String>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a reload blob into the store.
    ///
    /// Entries are applied one at a time; keys missing from `content` keep
    /// their previous value. Returns the number of entries applied.
    pub fn reload_config_content(&self, content: &str) -> usize {
        if content.is_empty() {
            return 0;
        }

        let mut applied = 0;
        for entry in parse_entries(content) {
            tracing::debug!(
                namespace = entry.namespace,
                key = entry.key,
                value = entry.value,
                "Updating config entry"
            );
            self.namespaces
                .entry(entry.namespace.to_string())
                .or_default()
                .insert(entry.key.to_string(), entry.value.to_string());
            applied += 1;
        }

        metrics::record_entries_applied(applied);
        metrics::record_store_size(self.len());
        applied
    }

    /// Look up `key` in `namespace`.
    pub fn get(&self, namespace: &str, key: &str) -> Option<String> {
        if namespace.is_empty() || key.is_empty() {
            return None;
        }
        self.namespaces
            .get(namespace)
            .and_then(|drawer| drawer.get(key).map(|v| v.value().clone()))
    }

    /// Look up a full config name of the form `namespace.key`.
    pub fn get_by_name(&self, config_name: &str) -> Option<String> {
        let (namespace, key) = split_config_name(config_name)?;
        self.get(namespace, key)
    }

    /// Look up `namespace.key`, returning `default` when absent or empty.
    pub fn get_with_default(&self, config_name: &str, default: &str) -> String {
        non_empty_or(self.get_by_name(config_name), default)
    }

    /// Two-argument form of [`ConfigStore::get_with_default`].
    pub fn get_with_default_in(&self, namespace: &str, key: &str, default: &str) -> String {
        non_empty_or(self.get(namespace, key), default)
    }

    /// Typed lookup; absent, empty and unparsable values yield `default`.
    pub fn get_typed<T: FromConfigValue>(&self, config_name: &str, default: T) -> T {
        convert_or(self.get_by_name(config_name).as_deref(), default)
    }

    pub fn get_bool(&self, config_name: &str, default: bool) -> bool {
        self.get_typed(config_name, default)
    }

    pub fn get_int(&self, config_name: &str, default: i32) -> i32 {
        self.get_typed(config_name, default)
    }

    pub fn get_long(&self, config_name: &str, default: i64) -> i64 {
        self.get_typed(config_name, default)
    }

    pub fn get_short(&self, config_name: &str, default: i16) -> i16 {
        self.get_typed(config_name, default)
    }

    pub fn get_double(&self, config_name: &str, default: f64) -> f64 {
        self.get_typed(config_name, default)
    }

    pub fn get_float(&self, config_name: &str, default: f32) -> f32 {
        self.get_typed(config_name, default)
    }

    /// Known namespace names, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Total number of entries across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.iter().map(|r| r.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
