use super::config::KeyCostConfig;
use super::data::CharFreqData;
use super::{is_same_finger, is_same_hand};
use crate::consts::{col_of, row_of, CAP_SET, COL_COUNT, KEY_COUNT, ROW_COUNT};
use crate::core_types::{Finger, PosRelation, FINGER_COUNT};
use crate::layout::{baselines, Layout};
use serde::Serialize;

/// Keystroke-effort metric: effort of the slot holding each character,
/// weighted by how often the character is typed.
#[derive(Clone)]
pub struct KeyCost {
    cfg: KeyCostConfig,
    data: CharFreqData,
    reference: Layout,

    cost: f64,
    flaw_count: usize,

    heat_map: [f64; KEY_COUNT],
    row_usage: [f64; ROW_COUNT],
    col_usage: [f64; COL_COUNT],
    finger_usage: [f64; FINGER_COUNT],
    left_hand_usage: f64,
    similarity: f64,
}

/// Usage statistics gathered by the analyze pass.
#[derive(Debug, Clone, Serialize)]
pub struct KeyCostStats {
    pub heat_map: Vec<f64>,
    pub row_usage: Vec<f64>,
    pub col_usage: Vec<f64>,
    pub finger_usage: Vec<f64>,
    pub left_hand_usage: f64,
    pub qwerty_similarity: f64,
}

impl KeyCost {
    pub fn new(cfg: KeyCostConfig, data: CharFreqData) -> Self {
        Self {
            cfg,
            data,
            reference: baselines::QWERTY
                .layout()
                .expect("reference baseline sequence is valid"),
            cost: 0.0,
            flaw_count: 0,
            heat_map: [0.0; KEY_COUNT],
            row_usage: [0.0; ROW_COUNT],
            col_usage: [0.0; COL_COUNT],
            finger_usage: [0.0; FINGER_COUNT],
            left_hand_usage: 0.5,
            similarity: 0.0,
        }
    }

    pub fn measure(&mut self, layout: &Layout) -> f64 {
        let mut cost = 0.0;
        for (i, &cap) in CAP_SET.iter().enumerate() {
            let pos = layout.get_pos(cap);
            cost += self.cfg.efforts[pos as usize] * self.data.freq_of_index(i);
        }
        self.cost = cost;
        cost
    }

    pub fn analyze(&mut self, layout: &Layout) -> (f64, usize) {
        self.calc_finger_usage(layout);
        self.validate_usage();
        (self.cost, self.flaw_count)
    }

    fn calc_finger_usage(&mut self, layout: &Layout) {
        self.cost = 0.0;
        self.similarity = 0.0;
        self.heat_map = [0.0; KEY_COUNT];
        self.row_usage = [0.0; ROW_COUNT];
        self.col_usage = [0.0; COL_COUNT];

        for (i, &cap) in CAP_SET.iter().enumerate() {
            let freq = self.data.freq_of_index(i);
            let ref_pos = self.reference.get_pos(cap);
            let cur_pos = layout.get_pos(cap);
            let ref_col = col_of(ref_pos);
            let cur_col = col_of(cur_pos);

            self.cost += self.cfg.efforts[cur_pos as usize] * freq;
            self.heat_map[cur_pos as usize] += freq;
            self.row_usage[row_of(cur_pos) as usize] += freq;
            self.col_usage[cur_col as usize] += freq;

            let relation = if cur_pos == ref_pos {
                Some(PosRelation::SamePosition)
            } else if is_same_finger(ref_col, cur_col) {
                Some(PosRelation::SameFinger)
            } else if is_same_hand(ref_col, cur_col) {
                Some(PosRelation::SameHand)
            } else {
                None
            };
            if let Some(relation) = relation {
                self.similarity += self.cfg.similarity_score[relation as usize] * freq;
            }
        }

        self.finger_usage = [0.0; FINGER_COUNT];
        for col in 0..COL_COUNT {
            self.finger_usage[col] = self.col_usage[col];
        }
        self.finger_usage[Finger::LeftThumb as usize] = 0.0;
        self.finger_usage[Finger::RightThumb as usize] = 0.0;
        self.finger_usage[Finger::LeftIndex as usize] = self.col_usage[3] + self.col_usage[4];
        self.finger_usage[Finger::RightIndex as usize] = self.col_usage[5] + self.col_usage[6];

        self.left_hand_usage = self.finger_usage[..Finger::LeftThumb as usize + 1].iter().sum();
    }

    fn validate_usage(&mut self) {
        self.flaw_count = 0;
        for fin in 0..FINGER_COUNT {
            if self.finger_usage[fin] > self.cfg.max_finger_usage[fin] {
                self.flaw_count += 1;
            }
        }
        if (self.left_hand_usage - 0.5).abs() > self.cfg.max_hand_imbalance {
            self.flaw_count += 1;
        }
    }

    pub fn stats(&self) -> KeyCostStats {
        KeyCostStats {
            heat_map: self.heat_map.to_vec(),
            row_usage: self.row_usage.to_vec(),
            col_usage: self.col_usage.to_vec(),
            finger_usage: self.finger_usage.to_vec(),
            left_hand_usage: self.left_hand_usage,
            qwerty_similarity: self.similarity,
        }
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }
}
