use crate::core_types::{task_id, Language, MetricKind, TASK_COUNT};
use crate::evaluator::CalibrationStatus;
use crate::pool::{Pool, PoolOptions};
use crate::resources::Resources;
use strum::IntoEnumIterator;
use tracing::{info, warn};

/// Hard cap on restarts per extreme search / size probe.
const MAX_POOLS: usize = 50;

/// Restart patience of the size probes.
const SIZE_PROBE_PATIENCE: usize = 20;

/// Population sizes probed after the full-size reference run, largest
/// first; probing stops at the first size that regresses the loss.
const CANDIDATE_SIZES: [usize; 4] = [2400, 1200, 600, 300];
const REFERENCE_SIZE: usize = 4800;

#[derive(Clone, Copy, PartialEq)]
enum Extreme {
    Min,
    Max,
}

/// Empirical calibration: discovers each task's achievable raw-cost range
/// and the smallest population size that does not cost solution quality.
pub struct Preprocessor {
    pool: Pool,
    min_costs: [f64; TASK_COUNT],
    max_costs: [f64; TASK_COUNT],
    best_size: usize,
}

impl Preprocessor {
    pub fn new(res: &Resources, opts: PoolOptions) -> Self {
        Self {
            pool: Pool::new(res, opts),
            min_costs: [0.0; TASK_COUNT],
            max_costs: [0.0; TASK_COUNT],
            best_size: REFERENCE_SIZE,
        }
    }

    pub fn run(&mut self) -> CalibrationStatus {
        self.search_extremes();
        self.estimate_size();
        self.status()
    }

    /// For every task, runs dedicated pool searches that minimize and
    /// maximize that task's raw cost alone, yielding its achievable range.
    pub fn search_extremes(&mut self) {
        for metric in MetricKind::iter() {
            for language in Language::iter() {
                let task = task_id(metric, language);
                info!("searching extremes of {metric} on {language} statistics...");
                self.min_costs[task] = self.search_extreme(task, Extreme::Min);
                self.max_costs[task] = self.search_extreme(task, Extreme::Max);
            }
        }
        for metric in MetricKind::iter() {
            for language in Language::iter() {
                let task = task_id(metric, language);
                info!(
                    "{metric} - {language}: [{:8.5}, {:8.5}]",
                    self.min_costs[task], self.max_costs[task]
                );
            }
        }
    }

    /// One bounded restart loop toward a single task's extreme. The restart
    /// patience adapts to how many distinct extreme values have been seen:
    /// a rugged task earns more attempts than one that keeps landing on the
    /// same optimum.
    fn search_extreme(&mut self, task: usize, extreme: Extreme) -> f64 {
        self.pool.reset_stagnation_limit();
        let mut best_cost = match extreme {
            Extreme::Min => f64::MAX,
            Extreme::Max => f64::MIN,
        };
        let mut distinct: Vec<f64> = Vec::new();
        let mut patience = 5;
        let mut curr_pool = 0;
        let mut best_pool = 0;

        while curr_pool < MAX_POOLS {
            let cost = match extreme {
                Extreme::Min => self.pool.search_min(task),
                Extreme::Max => self.pool.search_max(task),
            };
            let improved = match extreme {
                Extreme::Min => cost < best_cost,
                Extreme::Max => cost > best_cost,
            };
            if improved {
                best_cost = cost;
                best_pool = curr_pool;
                if !distinct.contains(&cost) {
                    distinct.push(cost);
                }
            }
            info!(
                "[pool {:>2}]: found {:8.5}, current best is {:8.5} in pool {:>2}",
                curr_pool, cost, best_cost, best_pool
            );
            if curr_pool % 5 == 0 {
                patience = (distinct.len() * 5).clamp(5, 15);
            }
            if curr_pool - best_pool >= patience {
                break;
            }
            curr_pool += 1;
        }
        best_cost
    }

    /// Probes successively smaller populations and keeps the smallest that
    /// does not regress the full-size reference loss.
    pub fn estimate_size(&mut self) {
        self.best_size = REFERENCE_SIZE;
        let reference_loss = self.try_pool_size(REFERENCE_SIZE);
        for &size in &CANDIDATE_SIZES {
            let loss = self.try_pool_size(size);
            if loss > reference_loss {
                return;
            }
            self.best_size = size;
        }
    }

    fn try_pool_size(&mut self, size: usize) -> f64 {
        self.pool.set_size(size);
        info!("testing pool of {size} samples...");

        let mut best_loss = f64::MAX;
        let mut curr_pool = 0;
        let mut best_pool = 0;
        while curr_pool < MAX_POOLS {
            let curr_loss = self.pool.search();
            if curr_loss < best_loss {
                best_pool = curr_pool;
                best_loss = curr_loss;
            }
            info!(
                "[pool {:>2}]: found {:8.5}, current best is {:8.5} in pool {:>2}",
                curr_pool, curr_loss, best_loss, best_pool
            );
            if curr_pool - best_pool >= SIZE_PROBE_PATIENCE {
                break;
            }
            curr_pool += 1;
        }
        best_loss
    }

    /// The calibration produced by the last `run`: bias = achievable
    /// minimum, range = spread up to the achievable maximum.
    pub fn status(&self) -> CalibrationStatus {
        let mut status = CalibrationStatus {
            pool_size: self.best_size,
            biases: self.min_costs,
            ranges: [0.0; TASK_COUNT],
        };
        for task in 0..TASK_COUNT {
            let range = self.max_costs[task] - self.min_costs[task];
            if range <= 0.0 {
                warn!("task {task} has a degenerate cost range, keeping 1.0");
                status.ranges[task] = 1.0;
            } else {
                status.ranges[task] = range;
            }
        }
        status
    }
}
