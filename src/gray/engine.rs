//! Gray rule lookup with a derived, reset-on-reload cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::gray::identifier::GrayId;
use crate::gray::rule::GrayRule;
use crate::observability::metrics;
use crate::store::{split_config_name, ConfigStore};

type RuleCache = HashMap<String, Arc<GrayRule>>;

/// Resolves gray rules from the config store and evaluates ids against them.
///
/// Cache hits read an immutable snapshot and never lock. Misses and resets
/// are serialized by `miss_lock`, so a rule is parsed once under concurrent
/// first access and a reset can never be overtaken by a miss that read
/// pre-reload text.
#[derive(Debug)]
pub struct GrayRuleEngine {
    store: Arc<ConfigStore>,
    cache: ArcSwap<RuleCache>,
    miss_lock: Mutex<()>,
}

impl GrayRuleEngine {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            cache: ArcSwap::from_pointee(HashMap::new()),
            miss_lock: Mutex::new(()),
        }
    }

    /// Resolve the rule stored under `namespace.key`.
    pub fn parse_config(&self, namespace: &str, key: &str) -> Option<Arc<GrayRule>> {
        if namespace.is_empty() || key.is_empty() {
            return None;
        }
        let config_name = format!("{namespace}.{key}");

        if let Some(rule) = self.cache.load().get(&config_name) {
            metrics::record_rule_cache(true);
            return Some(Arc::clone(rule));
        }

        let _guard = self.miss_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have parsed it while we waited.
        if let Some(rule) = self.cache.load().get(&config_name) {
            return Some(Arc::clone(rule));
        }
        metrics::record_rule_cache(false);

        let raw = self.store.get(namespace, key)?;
        let Some(rule) = GrayRule::parse(config_name.as_str(), &raw) else {
            tracing::debug!(config_name = %config_name, raw = %raw, "Unparsable gray rule");
            return None;
        };
        let rule = Arc::new(rule);

        let mut next = RuleCache::clone(&self.cache.load());
        next.insert(config_name, Arc::clone(&rule));
        self.cache.store(Arc::new(next));
        Some(rule)
    }

    /// Resolve the rule stored under a full config name.
    pub fn parse_config_by_name(&self, config_name: &str) -> Option<Arc<GrayRule>> {
        let (namespace, key) = split_config_name(config_name)?;
        self.parse_config(namespace, key)
    }

    /// Check a string id against the rule at `config_name`.
    pub fn is_allowed(&self, config_name: &str, id: &str) -> bool {
        self.evaluate(self.parse_config_by_name(config_name), id)
    }

    /// Check a string id against the rule at `namespace.key`.
    pub fn is_allowed_in(&self, namespace: &str, key: &str, id: &str) -> bool {
        self.evaluate(self.parse_config(namespace, key), id)
    }

    /// Check an integer id against the rule at `config_name`.
    pub fn is_allowed_id(&self, config_name: &str, id: i64) -> bool {
        self.evaluate(self.parse_config_by_name(config_name), &id)
    }

    /// Check an integer id against the rule at `namespace.key`.
    pub fn is_allowed_id_in(&self, namespace: &str, key: &str, id: i64) -> bool {
        self.evaluate(self.parse_config(namespace, key), &id)
    }

    fn evaluate<I: GrayId + ?Sized>(&self, rule: Option<Arc<GrayRule>>, id: &I) -> bool {
        crate::gray::rule::is_allowed(rule.as_deref(), id)
    }

    /// Drop every cached rule.
    pub fn reset_gray_config_cache(&self) {
        let _guard = self.miss_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self.cache.swap(Arc::new(HashMap::new()));
        tracing::info!(evicted = previous.len(), "Gray rule cache reset");
    }

    /// Number of cached rules.
    pub fn cached_rules(&self) -> usize {
        self.cache.load().len()
    }
}
