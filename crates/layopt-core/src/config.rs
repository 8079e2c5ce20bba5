use clap::Args;
use serde::{Deserialize, Serialize};

/// Knobs of one engine run, shared between the CLI and the host-callable
/// entry points.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Worker count for the parallel passes; 0 selects the available
    /// parallelism.
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Base seed for the per-worker PRNGs; unseeded runs draw from entropy.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            seed: None,
        }
    }
}
