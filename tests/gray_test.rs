//! Gray rule evaluation through the engine.

use std::sync::{Arc, Barrier};
use std::thread;

use gray_config::gray::{string_hash, GrayRuleEngine, RuleType};
use gray_config::store::ConfigStore;

fn engine(content: &str) -> (Arc<ConfigStore>, GrayRuleEngine) {
    let store = Arc::new(ConfigStore::new());
    store.reload_config_content(content);
    let engine = GrayRuleEngine::new(Arc::clone(&store));
    (store, engine)
}

#[test]
fn test_bare_rules() {
    let (_store, engine) = engine("[gray]\nopen=ALLOW\nclosed=Deny\n");
    for id in ["u", "alice", "", "0"] {
        assert!(engine.is_allowed("gray.open", id));
        assert!(!engine.is_allowed("gray.closed", id));
    }
    for id in [-5i64, 0, 1, 1_000_000] {
        assert!(engine.is_allowed_id("gray.open", id));
        assert!(!engine.is_allowed_id("gray.closed", id));
    }
}

#[test]
fn test_percent_rule_is_deterministic() {
    let (_store, engine) = engine("[gray]\nhalf=allow;%2\n");
    let expected = string_hash("u") % 2 != 0;
    for _ in 0..10 {
        assert_eq!(engine.is_allowed("gray.half", "u"), expected);
    }
}

#[test]
fn test_deny_with_exception() {
    let (_store, engine) = engine("[gray]\nbeta=deny;alice\n");
    assert!(engine.is_allowed("gray.beta", "alice"));
    assert!(!engine.is_allowed("gray.beta", "bob"));
}

#[test]
fn test_compound_buckets_overlap() {
    let (_store, engine) = engine("[gray]\nrollout=deny;%2;%3\n");
    let admitted = (1..=600).filter(|&id| engine.is_allowed_id("gray.rollout", id)).count();
    // ids divisible by 2 or 3: 300 + 200 - 100
    assert_eq!(admitted, 400);
}

#[test]
fn test_cache_reset_controls_visibility() {
    let (store, engine) = engine("[gray]\nbeta=deny\n");
    assert!(!engine.is_allowed("gray.beta", "zoe"));

    store.reload_config_content("[gray]\nbeta=deny;zoe\n");
    assert!(!engine.is_allowed("gray.beta", "zoe"));

    engine.reset_gray_config_cache();
    assert!(engine.is_allowed("gray.beta", "zoe"));
    let rule = engine.parse_config("gray", "beta").unwrap();
    assert_eq!(rule.rule_type, RuleType::Deny);
}

#[test]
fn test_concurrent_first_parse_shares_rule() {
    let (_store, engine) = engine("[gray]\nbeta=allow;%7;mallory\n");
    let engine = Arc::new(engine);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                engine.parse_config("gray", "beta").unwrap()
            })
        })
        .collect();

    let rules: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(rules.iter().all(|r| Arc::ptr_eq(r, &rules[0])));
    assert_eq!(engine.cached_rules(), 1);
}
