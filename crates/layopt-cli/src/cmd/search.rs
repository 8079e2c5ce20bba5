use clap::Args;
use layopt_core::api;
use layopt_core::config::RunOptions;
use layopt_core::error::LpResult;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub run: RunOptions,

    /// Directory the result documents are written to, relative to the root
    /// unless absolute.
    #[arg(short, long, default_value = "cache/result")]
    pub out: PathBuf,
}

pub fn run(root: &Path, args: &SearchArgs) -> LpResult<()> {
    let out_dir = if args.out.is_absolute() {
        args.out.clone()
    } else {
        root.join(&args.out)
    };
    let best_loss = api::run_search(root, &out_dir, &args.run)?;
    info!("results written to {out_dir:?} (best loss {best_loss:.5})");
    Ok(())
}
