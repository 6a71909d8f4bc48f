use std::collections::BTreeMap;

use super::*;
use crate::foundation::error::BandtreeError;

fn chain() -> BTreeMap<&'static str, Vec<String>> {
    BTreeMap::from([
        ("jd", vec!["ian".into(), "bernard".into()]),
        ("bernard", vec!["jd".into(), "no".into(), "electronic".into()]),
        ("ian", vec!["jd".into()]),
        ("no", vec!["bernard".into(), "gillian".into()]),
        ("electronic", vec!["bernard".into()]),
        ("gillian", vec!["no".into()]),
    ])
}

fn run(ledger: &mut ExplorationLedger, root: &str, depth: u32) -> Vec<String> {
    let graph = chain();
    expand(ledger, root, depth, |id| {
        Ok(graph.get(id).cloned().unwrap_or_default())
    })
    .unwrap()
}

#[test]
fn deeper_record_covers_shallower_requests() {
    let mut ledger = ExplorationLedger::new();
    assert!(ledger.needs_expansion("jd", 0));
    ledger.record("jd", 2);
    assert!(!ledger.needs_expansion("jd", 1));
    assert!(!ledger.needs_expansion("jd", 2));
    assert!(ledger.needs_expansion("jd", 3));
    ledger.record("jd", 1);
    assert_eq!(ledger.explored_depth("jd"), Some(2));
}

#[test]
fn expansion_is_breadth_first_and_bounded() {
    let mut ledger = ExplorationLedger::new();
    let fetched = run(&mut ledger, "jd", 2);
    assert_eq!(fetched, vec!["jd", "ian", "bernard", "no", "electronic"]);
    assert_eq!(ledger.explored_depth("jd"), Some(2));
    assert_eq!(ledger.explored_depth("bernard"), Some(1));
    assert_eq!(ledger.explored_depth("no"), Some(0));
    assert_eq!(ledger.explored_depth("gillian"), None);
}

#[test]
fn repeated_request_fetches_nothing() {
    let mut ledger = ExplorationLedger::new();
    run(&mut ledger, "jd", 2);
    assert!(run(&mut ledger, "jd", 2).is_empty());
    assert!(run(&mut ledger, "jd", 1).is_empty());
}

#[test]
fn deeper_request_refetches_only_shallow_nodes() {
    let mut ledger = ExplorationLedger::new();
    run(&mut ledger, "jd", 1);
    let fetched = run(&mut ledger, "jd", 2);
    assert!(fetched.contains(&"jd".to_string()));
    assert!(fetched.contains(&"no".to_string()));
    assert!(!fetched.contains(&"gillian".to_string()));
}

#[test]
fn fetch_errors_propagate() {
    let mut ledger = ExplorationLedger::new();
    let err = expand(&mut ledger, "jd", 1, |_| {
        Err(BandtreeError::validation("throttled"))
    })
    .unwrap_err();
    assert!(err.to_string().contains("throttled"));
    assert!(ledger.is_empty());
}
