use crate::core_types::{task_id, Language, MetricKind, TASK_COUNT};
use crate::evaluator::{CalibrationStatus, Sample, ScoreConfig};
use crate::metrics::dis_cost::DisCostStats;
use crate::metrics::key_cost::KeyCostStats;
use crate::metrics::seq_cost::SeqCostStats;
use crate::metrics::{DisCost, KeyCost, SeqCost};
use crate::resources::Resources;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::{EnumCount, IntoEnumIterator};

/// Everything the analyze pass knows about one layout; serialized as one
/// result document per retained candidate or baseline.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub keys: String,
    pub loss: f64,
    pub flaws: usize,
    pub raw_costs: [f64; TASK_COUNT],
    pub scaled_costs: [f64; TASK_COUNT],
    pub flaw_counts: [usize; TASK_COUNT],
    pub weights: [f64; TASK_COUNT],
    pub qwerty_similarity: f64,
    pub stats: BTreeMap<String, LanguageStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageStats {
    pub key_usage: KeyCostStats,
    pub finger_travel: DisCostStats,
    pub ngram_pain: SeqCostStats,
}

/// Runs every metric's detailed `analyze` variant on a sample and renders
/// the full statistics. Strictly an outside-the-hot-loop tool.
pub struct Analyzer {
    kc: Vec<KeyCost>, // indexed by language
    dc: Vec<DisCost>,
    sc: Vec<SeqCost>,
    score_cfg: ScoreConfig,
    status: CalibrationStatus,
}

impl Analyzer {
    pub fn new(res: &Resources) -> Self {
        let kc = Language::iter()
            .map(|l| KeyCost::new(res.metric_cfg.key_cost.clone(), res.kc_data[l as usize].clone()))
            .collect();
        let dc = Language::iter()
            .map(|l| DisCost::new(res.metric_cfg.dis_cost.clone(), res.dc_data[l as usize].clone()))
            .collect();
        let sc = Language::iter()
            .map(|l| SeqCost::new(res.metric_cfg.seq_cost.clone(), res.sc_data[l as usize].clone()))
            .collect();
        Self {
            kc,
            dc,
            sc,
            score_cfg: res.score_cfg.clone(),
            status: res.status.clone(),
        }
    }

    /// Re-scores `sample` with the detailed metric variants (updating its
    /// raw costs, flaw counts and penalized loss) and renders the report.
    pub fn analyze(&mut self, sample: &mut Sample) -> SampleReport {
        for language in Language::iter() {
            let lang = language as usize;
            let (cost, flaws) = self.kc[lang].analyze(sample.layout());
            sample.raw_costs[task_id(MetricKind::KeyCost, language)] = cost;
            sample.flaw_counts[task_id(MetricKind::KeyCost, language)] = flaws;

            let (cost, flaws) = self.dc[lang].analyze(sample.layout());
            sample.raw_costs[task_id(MetricKind::DisCost, language)] = cost;
            sample.flaw_counts[task_id(MetricKind::DisCost, language)] = flaws;

            let (cost, flaws) = self.sc[lang].analyze(sample.layout());
            sample.raw_costs[task_id(MetricKind::SeqCost, language)] = cost;
            sample.flaw_counts[task_id(MetricKind::SeqCost, language)] = flaws;
        }
        sample.calc_loss_with_penalty(&self.score_cfg, &self.status);

        let mut stats = BTreeMap::new();
        for language in Language::iter() {
            let lang = language as usize;
            stats.insert(
                language.to_string(),
                LanguageStats {
                    key_usage: self.kc[lang].stats(),
                    finger_travel: self.dc[lang].stats(),
                    ngram_pain: self.sc[lang].stats(),
                },
            );
        }
        let similarity = self.kc.iter().map(KeyCost::similarity).sum::<f64>()
            / Language::COUNT as f64;

        SampleReport {
            keys: sample.layout().cap_seq(),
            loss: sample.loss,
            flaws: sample.total_flaws(),
            raw_costs: sample.raw_costs,
            scaled_costs: sample.scaled_costs,
            flaw_counts: sample.flaw_counts,
            weights: self.score_cfg.weights,
            qwerty_similarity: similarity,
            stats,
        }
    }
}
