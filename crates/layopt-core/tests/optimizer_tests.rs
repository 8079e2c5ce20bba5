use layopt_core::optimizer::{save_outcome, Optimizer};
use layopt_core::pool::PoolOptions;

mod common;

#[test]
fn optimizer_retains_distinct_results_and_scores_baselines() {
    let res = common::bundled_resources();
    let mut optimizer = Optimizer::new(
        &res,
        PoolOptions {
            size: 8,
            workers: 2,
            seed: Some(21),
        },
    );

    let outcome = optimizer.run().unwrap();
    assert!(outcome.best_loss.is_finite());
    assert!(!outcome.reports.is_empty());
    for pair in outcome.reports.windows(2) {
        assert!(pair[0].loss <= pair[1].loss, "reports not ranked");
    }
    // Retained candidates are distinct layouts.
    for (i, a) in outcome.reports.iter().enumerate() {
        for b in outcome.reports.iter().skip(i + 1) {
            assert_ne!(a.keys, b.keys, "duplicate retained layout");
        }
    }
    assert_eq!(outcome.baseline_reports.len(), 13);
    assert!(outcome
        .baseline_reports
        .iter()
        .any(|(name, _)| name == "QWERTY"));

    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("result");
    save_outcome(&outcome, &out_dir).unwrap();
    assert!(out_dir.join("1.json").exists());
    assert!(out_dir.join("baselines.json").exists());

    let doc = std::fs::read_to_string(out_dir.join("1.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&doc).unwrap();
    assert_eq!(report["keys"].as_str().unwrap().len(), 30);
    assert!(report["stats"]["english"]["key_usage"]["heat_map"].is_array());
}
