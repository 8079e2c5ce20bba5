use crate::core_types::Language;
use crate::error::LpResult;
use crate::evaluator::{CalibrationStatus, ScoreConfig};
use crate::metrics::{CharFreqData, MetricConfig, PairFreqData, SeqFreqData};
use crate::partition::Partition;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{info, warn};

/// Every input the engine reads, loaded once at startup and passed by
/// reference into managers, metrics and evaluators. Immutable for the rest
/// of the process; reloading while a search is in flight is unsupported.
pub struct Resources {
    pub partition: Partition,
    pub metric_cfg: MetricConfig,
    pub score_cfg: ScoreConfig,
    /// Frequency tables, indexed by language.
    pub kc_data: Vec<CharFreqData>,
    pub dc_data: Vec<PairFreqData>,
    pub sc_data: Vec<SeqFreqData>,
    pub status: CalibrationStatus,
}

impl Resources {
    /// Loads and validates everything under `root`:
    /// `conf/{partition,metric,score}.json`, per-language frequency tables
    /// under `data/<language>/`, and the calibration status under
    /// `cache/status.json` (falling back to an uncalibrated default).
    pub fn load(root: &Path) -> LpResult<Self> {
        let partition = Partition::load(root.join("conf").join("partition.json"))?;
        let metric_cfg = MetricConfig::load(root.join("conf").join("metric.json"))?;
        let score_cfg = ScoreConfig::load(root.join("conf").join("score.json"))?;

        let mut kc_data = Vec::new();
        let mut dc_data = Vec::new();
        let mut sc_data = Vec::new();
        for language in Language::iter() {
            let dir = root.join("data").join(language.to_string());
            kc_data.push(CharFreqData::load(dir.join("chars.csv"))?);
            dc_data.push(PairFreqData::load(dir.join("pairs.csv"))?);
            sc_data.push(SeqFreqData::load(dir.join("2grams.csv"), dir.join("3grams.csv"))?);
        }

        let status_path = Self::status_path(root);
        let status = if status_path.exists() {
            CalibrationStatus::load(&status_path)?
        } else {
            warn!("no calibration status at {status_path:?}, using uncalibrated defaults");
            CalibrationStatus::default()
        };

        info!("resources loaded from {root:?}");
        Ok(Self {
            partition,
            metric_cfg,
            score_cfg,
            kc_data,
            dc_data,
            sc_data,
            status,
        })
    }

    pub fn status_path(root: &Path) -> PathBuf {
        root.join("cache").join("status.json")
    }
}
