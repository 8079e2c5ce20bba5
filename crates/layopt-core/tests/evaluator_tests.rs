use layopt_core::core_types::TASK_COUNT;
use layopt_core::evaluator::{CalibrationStatus, Evaluator, Sample, ScoreConfig};
use layopt_core::layout::baselines;

mod common;

fn status_with(bias: f64, range: f64) -> CalibrationStatus {
    CalibrationStatus {
        pool_size: 600,
        biases: [bias; TASK_COUNT],
        ranges: [range; TASK_COUNT],
    }
}

#[test]
fn scaled_cost_hits_zero_at_bias_and_one_at_bias_plus_range() {
    let cfg = ScoreConfig::default();
    let status = status_with(2.0, 4.0);
    let mut sample = Sample::from_baseline(&baselines::QWERTY).unwrap();

    sample.raw_costs = [2.0; TASK_COUNT];
    sample.calc_loss(&cfg, &status);
    assert!(sample.scaled_costs.iter().all(|&c| c == 0.0));
    assert_eq!(sample.loss, 0.0);

    sample.raw_costs = [6.0; TASK_COUNT];
    sample.calc_loss(&cfg, &status);
    assert!(sample.scaled_costs.iter().all(|&c| c == 1.0));
    assert!((sample.loss - 1.0).abs() < 1e-12);

    // Anything past bias + range clamps.
    sample.raw_costs = [60.0; TASK_COUNT];
    sample.calc_loss(&cfg, &status);
    assert!(sample.scaled_costs.iter().all(|&c| c == 1.0));

    // And anything below bias clamps to zero.
    sample.raw_costs = [-3.0; TASK_COUNT];
    sample.calc_loss(&cfg, &status);
    assert!(sample.scaled_costs.iter().all(|&c| c == 0.0));
}

#[test]
fn weights_are_normalized_and_tiny_weights_disable_tasks() {
    let doc = r#"{
        "weights": {
            "chinese": {"key_cost": 1.0, "dis_cost": 2.0, "seq_cost": 0.0},
            "english": {"key_cost": 1.0, "dis_cost": 0.0005, "seq_cost": 2.0}
        }
    }"#;
    let cfg = ScoreConfig::from_json(doc).unwrap();
    let total: f64 = cfg.weights.iter().sum();
    assert!((total - 1.0).abs() < 1e-12);
    // dis_cost/english fell below the threshold and was zeroed.
    assert_eq!(cfg.weights.iter().filter(|&&w| w == 0.0).count(), 2);
}

#[test]
fn out_of_range_weights_are_rejected() {
    let doc = r#"{
        "weights": {
            "chinese": {"key_cost": 0.3, "dis_cost": 1.0, "seq_cost": 1.0},
            "english": {"key_cost": 1.0, "dis_cost": 1.0, "seq_cost": 1.0}
        }
    }"#;
    let msg = ScoreConfig::from_json(doc).unwrap_err().to_string();
    assert!(msg.contains("weights.chinese.key_cost"), "{msg}");
    assert!(msg.contains("[0.5, 5.0]"), "{msg}");

    let doc = r#"{
        "weights": {
            "chinese": {"key_cost": 0.0, "dis_cost": 0.0, "seq_cost": 0.0},
            "english": {"key_cost": 0.0, "dis_cost": 0.0, "seq_cost": 0.0}
        }
    }"#;
    let msg = ScoreConfig::from_json(doc).unwrap_err().to_string();
    assert!(msg.contains("non-zero"), "{msg}");
}

#[test]
fn missing_weight_table_is_named() {
    let doc = r#"{"weights": {"english": {"key_cost": 1.0, "dis_cost": 1.0, "seq_cost": 1.0}}}"#;
    let msg = ScoreConfig::from_json(doc).unwrap_err().to_string();
    assert!(msg.contains("weights.chinese"), "{msg}");
}

#[test]
fn calibration_status_round_trips_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.json");

    let status = status_with(1.5, 2.5);
    status.save(&path).unwrap();
    let loaded = CalibrationStatus::load(&path).unwrap();
    assert_eq!(loaded.pool_size, 600);
    assert_eq!(loaded.biases, status.biases);

    let bad = CalibrationStatus {
        ranges: [0.0; TASK_COUNT],
        ..status_with(0.0, 1.0)
    };
    bad.save(&path).unwrap();
    assert!(CalibrationStatus::load(&path).is_err());
}

#[test]
fn evaluate_fills_raw_costs_and_loss() {
    let res = common::bundled_resources();
    let mut evaluator = Evaluator::new(&res);
    let mut sample = Sample::from_baseline(&baselines::QWERTY).unwrap();

    evaluator.evaluate(&mut sample);
    assert!(sample.raw_costs.iter().all(|&c| c > 0.0));
    assert!(sample.loss.is_finite());
    assert!((0.0..=1.0).contains(&sample.loss));
}

#[test]
fn measure_task_uses_the_raw_cost_as_loss() {
    let res = common::bundled_resources();
    let mut evaluator = Evaluator::new(&res);
    let mut sample = Sample::from_baseline(&baselines::QWERTY).unwrap();

    for task in 0..TASK_COUNT {
        evaluator.measure_task(&mut sample, task);
        assert_eq!(sample.loss, sample.raw_costs[task]);
    }
}
