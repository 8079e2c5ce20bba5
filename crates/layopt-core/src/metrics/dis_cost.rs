use super::config::DisCostConfig;
use super::data::{PairFreqData, BREAK};
use super::finger_to_hit;
use crate::core_types::{Cap, Finger, FINGER_COUNT};
use crate::layout::Layout;
use serde::Serialize;

/// Finger-travel metric: distance covered by each finger over the recorded
/// keystroke pairs, weighted by pair frequency.
#[derive(Clone)]
pub struct DisCost {
    cfg: DisCostConfig,
    data: PairFreqData,

    cost: f64,
    flaw_count: usize,

    finger_move: [f64; FINGER_COUNT],
    finger_usage: [f64; FINGER_COUNT],
    left_hand_usage: f64,
}

/// Travel statistics gathered by the analyze pass.
#[derive(Debug, Clone, Serialize)]
pub struct DisCostStats {
    pub finger_move: Vec<f64>,
    pub finger_usage: Vec<f64>,
    pub left_hand_usage: f64,
}

impl DisCost {
    pub fn new(cfg: DisCostConfig, data: PairFreqData) -> Self {
        Self {
            cfg,
            data,
            cost: 0.0,
            flaw_count: 0,
            finger_move: [0.0; FINGER_COUNT],
            finger_usage: [0.0; FINGER_COUNT],
            left_hand_usage: 0.5,
        }
    }

    pub fn measure(&mut self, layout: &Layout) -> f64 {
        self.calc_finger_movement(layout);
        self.cost = self.finger_move.iter().sum();
        self.cost
    }

    pub fn analyze(&mut self, layout: &Layout) -> (f64, usize) {
        self.calc_finger_movement(layout);
        self.calc_and_verify_usage();
        (self.cost, self.flaw_count)
    }

    fn calc_finger_movement(&mut self, layout: &Layout) {
        let mut moved = [0.0; FINGER_COUNT];
        for record in &self.data.records {
            if record.src != BREAK && record.dst != BREAK {
                Self::move_pair(&self.cfg, &mut moved, layout, record.src, record.dst, record.freq);
            } else if record.src == BREAK {
                Self::move_single(&self.cfg, &mut moved, layout, record.dst, record.freq);
            } else {
                Self::move_single(&self.cfg, &mut moved, layout, record.src, record.freq);
            }
        }
        self.finger_move = moved;
    }

    /// A pair struck by two fingers moves each from its rest key to its
    /// struck key; a same-finger pair moves that one finger between the two
    /// keys directly.
    fn move_pair(
        cfg: &DisCostConfig,
        moved: &mut [f64; FINGER_COUNT],
        layout: &Layout,
        prev_cap: Cap,
        next_cap: Cap,
        freq: f64,
    ) {
        let prev_pos = layout.get_pos(prev_cap);
        let next_pos = layout.get_pos(next_cap);
        let prev_fin = finger_to_hit(prev_pos);
        let next_fin = finger_to_hit(next_pos);

        if prev_fin != next_fin {
            let prev_rest = DisCostConfig::rest_pos(prev_fin);
            let next_rest = DisCostConfig::rest_pos(next_fin);
            moved[prev_fin] += cfg.dis_between(prev_rest, prev_pos) * freq;
            moved[next_fin] += cfg.dis_between(next_rest, next_pos) * freq;
        } else {
            moved[prev_fin] += cfg.dis_between(prev_pos, next_pos) * freq;
        }
    }

    fn move_single(
        cfg: &DisCostConfig,
        moved: &mut [f64; FINGER_COUNT],
        layout: &Layout,
        cap: Cap,
        freq: f64,
    ) {
        let pos = layout.get_pos(cap);
        let fin = finger_to_hit(pos);
        let rest = DisCostConfig::rest_pos(fin);
        moved[fin] += cfg.dis_between(pos, rest) * freq;
    }

    fn calc_and_verify_usage(&mut self) {
        self.cost = self.finger_move.iter().sum();
        for fin in 0..FINGER_COUNT {
            self.finger_usage[fin] = if self.cost > 0.0 {
                self.finger_move[fin] / self.cost
            } else {
                0.0
            };
        }

        self.flaw_count = 0;
        for fin in 0..FINGER_COUNT {
            if self.finger_usage[fin] > self.cfg.max_finger_usage[fin] {
                self.flaw_count += 1;
            }
        }
        self.left_hand_usage = self.finger_usage[..Finger::LeftThumb as usize + 1].iter().sum();
        if (self.left_hand_usage - 0.5).abs() > self.cfg.max_hand_imbalance {
            self.flaw_count += 1;
        }
    }

    pub fn stats(&self) -> DisCostStats {
        DisCostStats {
            finger_move: self.finger_move.to_vec(),
            finger_usage: self.finger_usage.to_vec(),
            left_hand_usage: self.left_hand_usage,
        }
    }
}
