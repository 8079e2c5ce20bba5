use crate::reports;
use clap::Args;
use layopt_core::analyzer::Analyzer;
use layopt_core::error::LpResult;
use layopt_core::evaluator::Sample;
use layopt_core::layout::baselines;
use layopt_core::resources::Resources;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Also rank these extra layouts, given as 30-character sequences.
    #[arg(short, long)]
    pub layout: Vec<String>,
}

pub fn run(root: &Path, args: &RankArgs) -> LpResult<()> {
    let res = Resources::load(root)?;
    let mut analyzer = Analyzer::new(&res);

    let mut rows = Vec::new();
    for baseline in &baselines::ALL {
        let mut sample = Sample::from_baseline(baseline)?;
        let report = analyzer.analyze(&mut sample);
        rows.push((baseline.name.to_string(), report));
    }
    for seq in &args.layout {
        let mut sample = Sample::new(layopt_core::layout::Layout::from_seq(seq)?);
        let report = analyzer.analyze(&mut sample);
        rows.push((seq.clone(), report));
    }

    rows.sort_by(|a, b| a.1.loss.total_cmp(&b.1.loss));
    reports::tables::ranking(&rows);
    Ok(())
}
