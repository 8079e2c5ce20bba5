use super::config::SeqCostConfig;
use super::data::{Bigram, SeqFreqData, Trigram};
use crate::layout::Layout;
use serde::Serialize;

/// Sequence-transition metric: each recorded 2-/3-gram contributes the cost
/// of its pain level, weighted by frequency. A 3-gram's pain level is the
/// worse of its two consecutive pairs.
#[derive(Clone)]
pub struct SeqCost {
    cfg: SeqCostConfig,
    data: SeqFreqData,

    cost: f64,
    flaw_count: usize,

    pain_of_top_bigrams: Vec<u8>,
    pain_of_top_trigrams: Vec<u8>,
}

/// Pain levels of the most frequent n-grams, gathered by the analyze pass.
#[derive(Debug, Clone, Serialize)]
pub struct SeqCostStats {
    pub bigram_pain_levels: Vec<u8>,
    pub trigram_pain_levels: Vec<u8>,
}

impl SeqCost {
    pub fn new(cfg: SeqCostConfig, data: SeqFreqData) -> Self {
        Self {
            cfg,
            data,
            cost: 0.0,
            flaw_count: 0,
            pain_of_top_bigrams: Vec::new(),
            pain_of_top_trigrams: Vec::new(),
        }
    }

    pub fn measure(&mut self, layout: &Layout) -> f64 {
        let mut cost = 0.0;
        for bigram in &self.data.bigrams {
            cost += cost_of_bigram(&self.cfg, bigram, layout) * bigram.freq;
        }
        for trigram in &self.data.trigrams {
            cost += cost_of_trigram(&self.cfg, trigram, layout) * trigram.freq;
        }
        self.cost = cost;
        cost
    }

    pub fn analyze(&mut self, layout: &Layout) -> (f64, usize) {
        let mut cost = 0.0;
        let mut flaws = 0;
        let top = self.cfg.ngrams_to_test;

        self.pain_of_top_bigrams.clear();
        self.pain_of_top_trigrams.clear();

        for (i, bigram) in self.data.bigrams.iter().enumerate() {
            let level = level_of_bigram(&self.cfg, bigram, layout);
            cost += self.cfg.cost_of_pain_level[level as usize] * bigram.freq;
            if i < top {
                if level > self.cfg.max_pain_level {
                    flaws += 1;
                }
                self.pain_of_top_bigrams.push(level);
            }
        }
        for (i, trigram) in self.data.trigrams.iter().enumerate() {
            let level = level_of_trigram(&self.cfg, trigram, layout);
            cost += self.cfg.cost_of_pain_level[level as usize] * trigram.freq;
            if i < top {
                if level > self.cfg.max_pain_level {
                    flaws += 1;
                }
                self.pain_of_top_trigrams.push(level);
            }
        }

        self.cost = cost;
        self.flaw_count = flaws;
        (cost, flaws)
    }

    pub fn stats(&self) -> SeqCostStats {
        SeqCostStats {
            bigram_pain_levels: self.pain_of_top_bigrams.clone(),
            trigram_pain_levels: self.pain_of_top_trigrams.clone(),
        }
    }
}

#[inline(always)]
fn level_of_bigram(cfg: &SeqCostConfig, bigram: &Bigram, layout: &Layout) -> u8 {
    let pos1 = layout.get_pos(bigram.caps[0]);
    let pos2 = layout.get_pos(bigram.caps[1]);
    cfg.level_of_pair(pos1, pos2)
}

#[inline(always)]
fn level_of_trigram(cfg: &SeqCostConfig, trigram: &Trigram, layout: &Layout) -> u8 {
    let pos1 = layout.get_pos(trigram.caps[0]);
    let pos2 = layout.get_pos(trigram.caps[1]);
    let pos3 = layout.get_pos(trigram.caps[2]);
    cfg.level_of_pair(pos1, pos2).max(cfg.level_of_pair(pos2, pos3))
}

#[inline(always)]
fn cost_of_bigram(cfg: &SeqCostConfig, bigram: &Bigram, layout: &Layout) -> f64 {
    cfg.cost_of_pain_level[level_of_bigram(cfg, bigram, layout) as usize]
}

#[inline(always)]
fn cost_of_trigram(cfg: &SeqCostConfig, trigram: &Trigram, layout: &Layout) -> f64 {
    cfg.cost_of_pain_level[level_of_trigram(cfg, trigram, layout) as usize]
}
