use crate::analyzer::{Analyzer, SampleReport};
use crate::error::LpResult;
use crate::evaluator::Sample;
use crate::layout::baselines;
use crate::pool::{Pool, PoolOptions};
use crate::resources::Resources;
use std::fs;
use std::path::Path;
use tracing::info;

/// Hard cap on independent restarts.
const MAX_POOLS: usize = 50;

/// Consecutive non-improving restarts before giving up.
const MAX_STAGNATION_POOLS: usize = 20;

/// How many top samples each restart may contribute to the best-set.
const HARVEST_PER_POOL: usize = 30;

/// How many distinct results are persisted.
const RESULTS_TO_SAVE: usize = 5;

/// Everything a finished optimization run produced; persisted only as a
/// whole, so a failed run leaves no partial output.
pub struct SearchOutcome {
    pub best_loss: f64,
    pub reports: Vec<SampleReport>,
    pub baseline_reports: Vec<(String, SampleReport)>,
}

/// Multi-restart orchestration: bounded independent pool searches with
/// best-result retention across restarts.
pub struct Optimizer<'r> {
    res: &'r Resources,
    pool: Pool,
    best_samples: Vec<Sample>,

    best_loss: f64,
    curr_pool: usize,
    best_pool: usize,
}

impl<'r> Optimizer<'r> {
    pub fn new(res: &'r Resources, opts: PoolOptions) -> Self {
        Self {
            res,
            pool: Pool::new(res, opts),
            best_samples: Vec::new(),
            best_loss: f64::MAX,
            curr_pool: 0,
            best_pool: 0,
        }
    }

    pub fn run(&mut self) -> LpResult<SearchOutcome> {
        self.best_loss = f64::MAX;
        self.curr_pool = 0;
        self.best_pool = 0;
        self.best_samples.clear();

        info!("optimizing with {} samples per pool", self.pool.size());

        while self.curr_pool < MAX_POOLS {
            let curr_loss = self.pool.search();
            if curr_loss < self.best_loss {
                self.best_pool = self.curr_pool;
                self.best_loss = curr_loss;
            }
            info!(
                "[pool {:>2}]: current loss = {:8.5}, best loss so far is {:8.5} of pool {:>2}",
                self.curr_pool, curr_loss, self.best_loss, self.best_pool
            );
            self.harvest_best_samples();
            if self.curr_pool - self.best_pool >= MAX_STAGNATION_POOLS {
                break;
            }
            self.curr_pool += 1;
        }

        self.build_outcome()
    }

    /// Copies the restart's top samples into the global best-set, skipping
    /// layouts already retained.
    fn harvest_best_samples(&mut self) {
        for sample in self.pool.samples().iter().take(HARVEST_PER_POOL) {
            let already_kept = self
                .best_samples
                .iter()
                .any(|kept| kept.layout() == sample.layout());
            if !already_kept {
                self.best_samples.push(sample.clone());
            }
        }
    }

    fn build_outcome(&mut self) -> LpResult<SearchOutcome> {
        let mut analyzer = Analyzer::new(self.res);

        // The detailed pass recomputes every loss with the flaw penalty,
        // which can reorder the best-set.
        for sample in &mut self.best_samples {
            analyzer.analyze(sample);
        }
        self.best_samples
            .sort_by(|a, b| a.loss.total_cmp(&b.loss));

        let reports = self
            .best_samples
            .iter_mut()
            .take(RESULTS_TO_SAVE)
            .map(|sample| analyzer.analyze(sample))
            .collect();

        let mut baseline_reports = Vec::with_capacity(baselines::ALL.len());
        for baseline in &baselines::ALL {
            let mut sample = Sample::from_baseline(baseline)?;
            let report = analyzer.analyze(&mut sample);
            baseline_reports.push((baseline.name.to_string(), report));
        }

        Ok(SearchOutcome {
            best_loss: self.best_loss,
            reports,
            baseline_reports,
        })
    }
}

/// Writes one JSON document per retained candidate plus the baseline
/// scores. Serialization happens before any file is created.
pub fn save_outcome(outcome: &SearchOutcome, out_dir: &Path) -> LpResult<()> {
    let mut docs = Vec::with_capacity(outcome.reports.len() + 1);
    for (i, report) in outcome.reports.iter().enumerate() {
        docs.push((
            format!("{}.json", i + 1),
            serde_json::to_string_pretty(report)?,
        ));
    }
    let baselines: Vec<_> = outcome
        .baseline_reports
        .iter()
        .map(|(name, report)| serde_json::json!({ "name": name, "report": report }))
        .collect();
    docs.push((
        "baselines.json".to_string(),
        serde_json::to_string_pretty(&baselines)?,
    ));

    fs::create_dir_all(out_dir)?;
    for (name, doc) in docs {
        fs::write(out_dir.join(name), doc)?;
    }
    Ok(())
}
