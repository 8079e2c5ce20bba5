use crate::evaluator::{Evaluator, Sample};
use crate::manager::Manager;
use crate::resources::Resources;
use rayon::prelude::*;
use tracing::debug;

/// Hard cap on generations, regardless of convergence.
const MAX_EPOCHS: usize = 1000;

/// Stagnation threshold a fresh (or reset) pool starts with.
const INITIAL_STAGNATION_LIMIT: usize = 250;

/// Smoothing factor of the adaptive stagnation threshold.
const STAGNATION_ALPHA: f64 = 0.5;

const MIN_STAGNATION_LIMIT: f64 = 30.0;
const MAX_STAGNATION_LIMIT: f64 = 300.0;

#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    /// Population size; must be even.
    pub size: usize,
    /// Worker count; 0 selects the available parallelism.
    pub workers: usize,
    pub seed: Option<u64>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            size: 4800,
            workers: 0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Objective {
    /// The calibrated weighted loss over all enabled tasks.
    Loss,
    /// A single task's raw cost, used by the calibration extreme searches.
    Task(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Min,
    Max,
}

impl Direction {
    #[inline(always)]
    fn worst(self) -> f64 {
        match self {
            Direction::Min => f64::MAX,
            Direction::Max => f64::MIN,
        }
    }

    #[inline(always)]
    fn improves(self, loss: f64, best: f64) -> bool {
        match self {
            Direction::Min => loss < best,
            Direction::Max => loss > best,
        }
    }
}

/// Thread-private helpers of one worker. Managers and evaluators carry PRNG
/// state and scratch accumulators, so they are never shared across workers.
struct Worker {
    mgr: Manager,
    evl: Evaluator,
}

impl Worker {
    #[inline(always)]
    fn score(&mut self, sample: &mut Sample, objective: Objective) {
        match objective {
            Objective::Loss => self.evl.evaluate(sample),
            Objective::Task(task) => self.evl.measure_task(sample, task),
        }
    }
}

/// One independent population-based local-search run.
///
/// Every epoch, the better half reproduces: each sample of the worse half is
/// overwritten with a once-mutated copy of its rank-mate from the better
/// half, and only the overwritten half is re-evaluated. Per-sample work runs
/// fork-join over disjoint chunks of the population; the sort between passes
/// is single-threaded.
pub struct Pool {
    samples: Vec<Sample>,
    workers: Vec<Worker>,
    init_mgr: Manager,

    size: usize,
    half: usize,

    best_loss: f64,
    curr_epoch: usize,
    best_epoch: usize,
    stagnation_epochs: usize,
    max_stagnation_epochs: usize,
}

impl Pool {
    pub fn new(res: &Resources, opts: PoolOptions) -> Self {
        debug_assert!(opts.size >= 2 && opts.size % 2 == 0);
        let worker_count = if opts.workers > 0 {
            opts.workers
        } else {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        };
        let workers = (0..worker_count)
            .map(|i| Worker {
                mgr: Manager::new(&res.partition, opts.seed.map(|s| s.wrapping_add(1 + i as u64))),
                evl: Evaluator::new(res),
            })
            .collect();
        let mut init_mgr =
            Manager::new(&res.partition, opts.seed.map(|s| s.wrapping_add(9999)));
        let samples = (0..opts.size).map(|_| Sample::new(init_mgr.create())).collect();
        Self {
            samples,
            workers,
            init_mgr,
            size: opts.size,
            half: opts.size / 2,
            best_loss: f64::MAX,
            curr_epoch: 0,
            best_epoch: 0,
            stagnation_epochs: 0,
            max_stagnation_epochs: INITIAL_STAGNATION_LIMIT,
        }
    }

    /// Shrinks or grows the active population. Existing sample storage is
    /// kept and reused; new slots are filled with fresh layouts.
    pub fn set_size(&mut self, size: usize) {
        debug_assert!(size >= 2 && size % 2 == 0);
        while self.samples.len() < size {
            self.samples.push(Sample::new(self.init_mgr.create()));
        }
        self.size = size;
        self.half = size / 2;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }

    /// Restores the initial stagnation threshold, forgetting what earlier
    /// searches learned about typical convergence.
    pub fn reset_stagnation_limit(&mut self) {
        self.max_stagnation_epochs = INITIAL_STAGNATION_LIMIT;
    }

    /// The active samples, sorted by the last search's objective.
    pub fn samples(&self) -> &[Sample] {
        &self.samples[..self.size]
    }

    /// Runs the search to convergence and returns the best loss found.
    pub fn search(&mut self) -> f64 {
        self.run(Objective::Loss, Direction::Min)
    }

    /// Minimizes a single task's raw cost alone.
    pub fn search_min(&mut self, task: usize) -> f64 {
        self.run(Objective::Task(task), Direction::Min)
    }

    /// Maximizes a single task's raw cost alone.
    pub fn search_max(&mut self, task: usize) -> f64 {
        self.run(Objective::Task(task), Direction::Max)
    }

    fn run(&mut self, objective: Objective, dir: Direction) -> f64 {
        self.best_loss = dir.worst();
        self.curr_epoch = 0;
        self.best_epoch = 0;
        self.stagnation_epochs = 0;

        self.reinit_and_evaluate(objective);
        self.sort_samples(dir);

        while self.curr_epoch < MAX_EPOCHS {
            let front_loss = self.samples[0].loss;
            if dir.improves(front_loss, self.best_loss) {
                self.best_epoch = self.curr_epoch;
                self.best_loss = front_loss;
            }
            self.stagnation_epochs = self.curr_epoch - self.best_epoch;
            if self.stagnation_epochs >= self.max_stagnation_epochs {
                break;
            }
            self.update_and_evaluate(objective);
            self.sort_samples(dir);
            self.curr_epoch += 1;
        }

        self.adapt_stagnation_limit();
        debug!(
            "epochs: {:>3} (best at {:>3}, stagnated {:>3})",
            self.curr_epoch, self.best_epoch, self.stagnation_epochs
        );
        self.best_loss
    }

    /// Re-randomizes and re-scores the whole population in parallel.
    fn reinit_and_evaluate(&mut self, objective: Objective) {
        let chunk = chunk_size(self.size, self.workers.len());
        self.samples[..self.size]
            .par_chunks_mut(chunk)
            .zip(self.workers.par_iter_mut())
            .for_each(|(samples, worker)| {
                for sample in samples {
                    worker.mgr.reinit(sample.layout_mut());
                    worker.score(sample, objective);
                }
            });
    }

    /// Overwrites the worse half with mutated children of the better half
    /// and re-scores only the overwritten half, in parallel.
    fn update_and_evaluate(&mut self, objective: Objective) {
        let (parents, children) = self.samples[..self.size].split_at_mut(self.half);
        let chunk = chunk_size(self.half, self.workers.len());
        children
            .par_chunks_mut(chunk)
            .zip(parents.par_chunks(chunk))
            .zip(self.workers.par_iter_mut())
            .for_each(|((children, parents), worker)| {
                for (child, parent) in children.iter_mut().zip(parents.iter()) {
                    worker.mgr.mutate(child.layout_mut(), parent.layout());
                    worker.score(child, objective);
                }
            });
    }

    fn sort_samples(&mut self, dir: Direction) {
        let active = &mut self.samples[..self.size];
        match dir {
            Direction::Min => active.sort_by(|a, b| a.loss.total_cmp(&b.loss)),
            Direction::Max => active.sort_by(|a, b| b.loss.total_cmp(&a.loss)),
        }
    }

    /// Blends the threshold toward the epoch the best solution was found
    /// at, so later pools stop earlier once typical convergence is known.
    fn adapt_stagnation_limit(&mut self) {
        let blended = STAGNATION_ALPHA * self.max_stagnation_epochs as f64
            + (1.0 - STAGNATION_ALPHA) * self.best_epoch as f64;
        self.max_stagnation_epochs =
            blended.clamp(MIN_STAGNATION_LIMIT, MAX_STAGNATION_LIMIT) as usize;
    }
}

#[inline(always)]
fn chunk_size(items: usize, workers: usize) -> usize {
    ((items + workers - 1) / workers).max(1)
}
