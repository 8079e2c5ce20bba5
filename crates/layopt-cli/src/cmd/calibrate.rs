use clap::Args;
use layopt_core::api;
use layopt_core::config::RunOptions;
use layopt_core::error::LpResult;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub run: RunOptions,
}

pub fn run(root: &Path, args: &CalibrateArgs) -> LpResult<()> {
    let status = api::run_calibration(root, &args.run)?;
    info!(
        "calibrated: pool size {}, {} task ranges",
        status.pool_size,
        status.ranges.len()
    );
    Ok(())
}
