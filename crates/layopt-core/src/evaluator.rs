use crate::core_types::{task_id, Language, MetricKind, TASK_COUNT};
use crate::error::{LayoptError, LpResult};
use crate::layout::{baselines::Baseline, Layout};
use crate::metrics::{DisCost, KeyCost, Metric, SeqCost};
use crate::resources::Resources;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;

/// Additive loss penalty per detected flaw, used only by the
/// penalty-aware scoring of calibration/analysis passes.
const FLAW_PENALTY: f64 = 0.01;

/// Per-task weights, pre-normalized to sum to 1.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub weights: [f64; TASK_COUNT],
}

impl ScoreConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(path)?;
        Self::from_json(&doc)
    }

    /// Parses `{"weights": {"<language>": {"<metric>": w, ...}, ...}}`.
    /// Weights below 1e-3 disable their task; all others must lie in
    /// [0.5, 5.0] before normalization.
    pub fn from_json(doc: &str) -> LpResult<Self> {
        let spec: ScoreConfigSpec = serde_json::from_str(doc)?;
        let mut weights = [0.0; TASK_COUNT];
        for language in Language::iter() {
            let by_metric = spec.weights.get(&language.to_string()).ok_or_else(|| {
                LayoptError::Config(format!("weights.{language}: missing table"))
            })?;
            for metric in MetricKind::iter() {
                let path = format!("weights.{language}.{metric}");
                let &weight = by_metric
                    .get(&metric.to_string())
                    .ok_or_else(|| LayoptError::Config(format!("{path}: missing weight")))?;
                weights[task_id(metric, language)] = Self::check_weight(weight, &path)?;
            }
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(LayoptError::Config(
                "weights: at least one task must have a non-zero weight".into(),
            ));
        }
        for weight in &mut weights {
            *weight /= total;
        }
        Ok(Self { weights })
    }

    fn check_weight(weight: f64, path: &str) -> LpResult<f64> {
        if weight.abs() < 1e-3 {
            return Ok(0.0);
        }
        if !(0.5..=5.0).contains(&weight) {
            return Err(LayoptError::Config(format!(
                "{path}: illegal weight value {weight}, should be in range [0.5, 5.0]"
            )));
        }
        Ok(weight)
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: [1.0 / TASK_COUNT as f64; TASK_COUNT],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ScoreConfigSpec {
    weights: HashMap<String, HashMap<String, f64>>,
}

/// Empirically calibrated normalization: per task, `bias` is the achievable
/// minimum raw cost and `range` the spread up to the achievable maximum.
/// Produced by the preprocessor, consumed by every subsequent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationStatus {
    pub pool_size: usize,
    pub biases: [f64; TASK_COUNT],
    pub ranges: [f64; TASK_COUNT],
}

impl CalibrationStatus {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(path)?;
        let status: Self = serde_json::from_str(&doc)?;
        status.validate()?;
        Ok(status)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> LpResult<()> {
        let doc = serde_json::to_string_pretty(self)?;
        fs::write(path, doc)?;
        Ok(())
    }

    fn validate(&self) -> LpResult<()> {
        if self.pool_size < 2 || self.pool_size % 2 != 0 {
            return Err(LayoptError::Config(format!(
                "pool_size: {} should be a positive even number",
                self.pool_size
            )));
        }
        for (task, &range) in self.ranges.iter().enumerate() {
            if range <= 0.0 {
                return Err(LayoptError::Config(format!(
                    "ranges[{task}]: {range} should be positive"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CalibrationStatus {
    fn default() -> Self {
        Self {
            pool_size: 4800,
            biases: [0.0; TASK_COUNT],
            ranges: [1.0; TASK_COUNT],
        }
    }
}

/// A layout annotated with per-task costs and a scalar loss; the unit the
/// population search operates on.
#[derive(Clone)]
pub struct Sample {
    layout: Layout,
    pub raw_costs: [f64; TASK_COUNT],
    pub scaled_costs: [f64; TASK_COUNT],
    pub flaw_counts: [usize; TASK_COUNT],
    pub loss: f64,
}

impl Sample {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            raw_costs: [0.0; TASK_COUNT],
            scaled_costs: [0.0; TASK_COUNT],
            flaw_counts: [0; TASK_COUNT],
            loss: f64::MAX,
        }
    }

    pub fn from_baseline(baseline: &Baseline) -> LpResult<Self> {
        Ok(Self::new(baseline.layout()?))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn total_flaws(&self) -> usize {
        self.flaw_counts.iter().sum()
    }

    /// Rescales each raw cost into [0, 1] by its task's calibration and
    /// combines them by the normalized weights.
    pub fn calc_loss(&mut self, cfg: &ScoreConfig, status: &CalibrationStatus) {
        for task in 0..TASK_COUNT {
            let scaled = (self.raw_costs[task] - status.biases[task]) / status.ranges[task];
            self.scaled_costs[task] = scaled.clamp(0.0, 1.0);
        }
        self.loss = (0..TASK_COUNT)
            .map(|task| self.scaled_costs[task] * cfg.weights[task])
            .sum();
    }

    pub fn calc_loss_with_penalty(&mut self, cfg: &ScoreConfig, status: &CalibrationStatus) {
        self.calc_loss(cfg, status);
        self.loss += FLAW_PENALTY * self.total_flaws() as f64;
    }
}

/// Scores samples with every enabled metric; the hot-path entry called once
/// per sample per epoch.
///
/// Metrics keep per-call scratch state, so each worker needs its own
/// instance; `Clone` exists for exactly that.
#[derive(Clone)]
pub struct Evaluator {
    metrics: Vec<Metric>, // indexed by task id
    score_cfg: ScoreConfig,
    status: CalibrationStatus,
}

impl Evaluator {
    pub fn new(res: &Resources) -> Self {
        let mut metrics = Vec::with_capacity(TASK_COUNT);
        for metric in MetricKind::iter() {
            for language in Language::iter() {
                let lang = language as usize;
                metrics.push(match metric {
                    MetricKind::KeyCost => Metric::Key(KeyCost::new(
                        res.metric_cfg.key_cost.clone(),
                        res.kc_data[lang].clone(),
                    )),
                    MetricKind::DisCost => Metric::Dis(DisCost::new(
                        res.metric_cfg.dis_cost.clone(),
                        res.dc_data[lang].clone(),
                    )),
                    MetricKind::SeqCost => Metric::Seq(SeqCost::new(
                        res.metric_cfg.seq_cost.clone(),
                        res.sc_data[lang].clone(),
                    )),
                });
            }
        }
        Self {
            metrics,
            score_cfg: res.score_cfg.clone(),
            status: res.status.clone(),
        }
    }

    /// Runs every enabled metric's cheap `measure` and refreshes the loss.
    pub fn evaluate(&mut self, sample: &mut Sample) {
        for task in 0..TASK_COUNT {
            if self.score_cfg.weights[task] > 0.0 {
                sample.raw_costs[task] = self.metrics[task].measure(&sample.layout);
            }
        }
        sample.calc_loss(&self.score_cfg, &self.status);
    }

    /// Scores a single task and uses its raw cost directly as the loss;
    /// the objective of the calibration extreme searches.
    pub fn measure_task(&mut self, sample: &mut Sample, task: usize) {
        sample.raw_costs[task] = self.metrics[task].measure(&sample.layout);
        sample.loss = sample.raw_costs[task];
    }
}
