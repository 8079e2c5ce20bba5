//! Thin host-callable entry points: run a full optimization, run the
//! calibration pass. Logging goes through `tracing`; hosts register their
//! sink by installing a subscriber before calling in.

use crate::config::RunOptions;
use crate::error::LpResult;
use crate::evaluator::CalibrationStatus;
use crate::optimizer::{save_outcome, Optimizer};
use crate::pool::PoolOptions;
use crate::preprocessor::Preprocessor;
use crate::resources::Resources;
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads every input under `root`, runs the full multi-restart search and
/// writes the result documents into `out_dir`. Returns the best loss.
pub fn run_search(root: &Path, out_dir: &Path, opts: &RunOptions) -> LpResult<f64> {
    let res = Resources::load(root)?;
    let pool_opts = PoolOptions {
        size: res.status.pool_size,
        workers: opts.workers,
        seed: opts.seed,
    };
    let mut optimizer = Optimizer::new(&res, pool_opts);
    let outcome = optimizer.run()?;
    save_outcome(&outcome, out_dir)?;
    info!("search finished, best loss = {:.5}", outcome.best_loss);
    Ok(outcome.best_loss)
}

/// Loads every input under `root`, empirically calibrates per-task cost
/// ranges and the population size, and persists the status document for
/// subsequent runs.
pub fn run_calibration(root: &Path, opts: &RunOptions) -> LpResult<CalibrationStatus> {
    let res = Resources::load(root)?;
    let pool_opts = PoolOptions {
        size: res.status.pool_size,
        workers: opts.workers,
        seed: opts.seed,
    };
    let mut preprocessor = Preprocessor::new(&res, pool_opts);
    let status = preprocessor.run();

    let status_path = Resources::status_path(root);
    if let Some(dir) = status_path.parent() {
        fs::create_dir_all(dir)?;
    }
    status.save(&status_path)?;
    info!("calibration saved to {status_path:?}");
    Ok(status)
}
