use crate::consts::{COL_COUNT, KEY_COUNT, ROW_COUNT};
use crate::core_types::{Finger, Pos, FINGER_COUNT, PAIN_LEVEL_COUNT};
use crate::error::{LayoptError, LpResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const POS_RELATION_COUNT: usize = 4;

/// The once-loaded numeric tables every metric instance reads.
#[derive(Debug, Clone)]
pub struct MetricConfig {
    pub key_cost: KeyCostConfig,
    pub dis_cost: DisCostConfig,
    pub seq_cost: SeqCostConfig,
}

impl MetricConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(path)?;
        Self::from_json(&doc)
    }

    pub fn from_json(doc: &str) -> LpResult<Self> {
        let spec: MetricConfigSpec = serde_json::from_str(doc)?;
        Ok(Self {
            key_cost: KeyCostConfig::from_spec(&spec.key_cost)?,
            dis_cost: DisCostConfig::from_spec(&spec.dis_cost)?,
            seq_cost: SeqCostConfig::from_spec(&spec.seq_cost)?,
        })
    }
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            key_cost: KeyCostConfig::default(),
            dis_cost: DisCostConfig::default(),
            seq_cost: SeqCostConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MetricConfigSpec {
    key_cost: KeyCostSpec,
    dis_cost: DisCostSpec,
    seq_cost: SeqCostSpec,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyCostSpec {
    hit_efforts: Vec<i64>,
    max_finger_usage: Vec<f64>,
    max_hand_imbalance: f64,
    #[serde(default)]
    similarity_score: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct DisCostSpec {
    x: Vec<f64>,
    y: Vec<f64>,
    max_finger_usage: Vec<f64>,
    max_hand_imbalance: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct SeqCostSpec {
    pain_levels: Vec<Vec<i64>>,
    cost_of_pain_level: Vec<f64>,
    ngrams_to_test: usize,
    max_pain_level: i64,
}

/// Key-press effort table plus finger/hand balance ceilings.
#[derive(Debug, Clone)]
pub struct KeyCostConfig {
    pub efforts: [f64; KEY_COUNT],
    pub max_finger_usage: [f64; FINGER_COUNT],
    pub max_hand_imbalance: f64,
    /// Scores per `PosRelation`, for the QWERTY-similarity statistic.
    pub similarity_score: [f64; POS_RELATION_COUNT],
}

impl KeyCostConfig {
    fn from_spec(spec: &KeyCostSpec) -> LpResult<Self> {
        let mut cfg = Self::default();
        check_len("key_cost.hit_efforts", spec.hit_efforts.len(), KEY_COUNT)?;
        for (i, &effort) in spec.hit_efforts.iter().enumerate() {
            if !(0..=10).contains(&effort) {
                return Err(LayoptError::Config(format!(
                    "key_cost.hit_efforts[{i}]: value {effort} should be in range [0, 10]"
                )));
            }
            cfg.efforts[i] = effort as f64;
        }
        cfg.max_finger_usage =
            check_finger_limits("key_cost.max_finger_usage", &spec.max_finger_usage, 0.25)?;
        if spec.max_hand_imbalance <= 0.0 || spec.max_hand_imbalance > 0.1 {
            return Err(LayoptError::Config(format!(
                "key_cost.max_hand_imbalance: value {} should be in range (0, 0.1]",
                spec.max_hand_imbalance
            )));
        }
        cfg.max_hand_imbalance = spec.max_hand_imbalance;
        if let Some(scores) = &spec.similarity_score {
            check_len("key_cost.similarity_score", scores.len(), POS_RELATION_COUNT)?;
            for (i, &s) in scores.iter().enumerate() {
                cfg.similarity_score[i] = s;
            }
        }
        Ok(cfg)
    }
}

impl Default for KeyCostConfig {
    fn default() -> Self {
        Self {
            efforts: [
                9.0, 5.0, 3.0, 6.0, 7.0, 9.0, 6.0, 3.0, 5.0, 9.0, //
                1.0, 0.0, 0.0, 0.0, 5.0, 5.0, 0.0, 0.0, 0.0, 1.0, //
                8.0, 8.0, 6.0, 4.0, 9.0, 6.0, 4.0, 6.0, 8.0, 8.0,
            ],
            max_finger_usage: [0.12, 0.16, 0.20, 0.22, 1.05, 1.05, 0.22, 0.20, 0.16, 0.12],
            max_hand_imbalance: 0.025,
            similarity_score: [1.0, 0.8, 0.3, 0.0],
        }
    }
}

/// Pairwise key distances (derived from 2D key coordinates) plus travel
/// balance ceilings.
#[derive(Debug, Clone)]
pub struct DisCostConfig {
    dis: Vec<f64>, // KEY_COUNT * KEY_COUNT
    pub max_finger_usage: [f64; FINGER_COUNT],
    pub max_hand_imbalance: f64,
}

impl DisCostConfig {
    fn from_spec(spec: &DisCostSpec) -> LpResult<Self> {
        check_len("dis_cost.x", spec.x.len(), KEY_COUNT)?;
        check_len("dis_cost.y", spec.y.len(), KEY_COUNT)?;
        let max_finger_usage =
            check_finger_limits("dis_cost.max_finger_usage", &spec.max_finger_usage, 0.35)?;
        if spec.max_hand_imbalance <= 0.0 || spec.max_hand_imbalance > 0.15 {
            return Err(LayoptError::Config(format!(
                "dis_cost.max_hand_imbalance: value {} should be in range (0, 0.15]",
                spec.max_hand_imbalance
            )));
        }
        Ok(Self {
            dis: Self::distance_matrix(&spec.x, &spec.y),
            max_finger_usage,
            max_hand_imbalance: spec.max_hand_imbalance,
        })
    }

    fn distance_matrix(x: &[f64], y: &[f64]) -> Vec<f64> {
        let mut dis = vec![0.0; KEY_COUNT * KEY_COUNT];
        for pos1 in 0..KEY_COUNT {
            for pos2 in 0..KEY_COUNT {
                dis[pos1 * KEY_COUNT + pos2] = (x[pos1] - x[pos2]).hypot(y[pos1] - y[pos2]);
            }
        }
        dis
    }

    #[inline(always)]
    pub fn dis_between(&self, pos1: Pos, pos2: Pos) -> f64 {
        self.dis[pos1 as usize * KEY_COUNT + pos2 as usize]
    }

    /// The rest key of a finger: its home-row slot. Thumbs never strike a
    /// key in the 3x10 region, so their entries are never read.
    #[inline(always)]
    pub fn rest_pos(finger: usize) -> Pos {
        (COL_COUNT + finger) as Pos
    }
}

impl Default for DisCostConfig {
    fn default() -> Self {
        // Standard row-staggered coordinates: home row offset by 0.25 keys,
        // bottom row by 0.75.
        let mut x = [0.0; KEY_COUNT];
        let mut y = [0.0; KEY_COUNT];
        for row in 0..ROW_COUNT {
            let stagger = [0.0, 0.25, 0.75][row];
            for col in 0..COL_COUNT {
                x[row * COL_COUNT + col] = col as f64 + stagger;
                y[row * COL_COUNT + col] = row as f64;
            }
        }
        Self {
            dis: Self::distance_matrix(&x, &y),
            max_finger_usage: [0.10, 0.16, 0.25, 0.30, 1.05, 1.05, 0.30, 0.25, 0.16, 0.10],
            max_hand_imbalance: 0.055,
        }
    }
}

/// Pain levels per ordered position pair plus the cost attached to each
/// level.
#[derive(Debug, Clone)]
pub struct SeqCostConfig {
    pain_levels: Vec<u8>, // KEY_COUNT * KEY_COUNT
    pub cost_of_pain_level: [f64; PAIN_LEVEL_COUNT],
    /// How many of the most frequent n-grams the analyze pass inspects.
    pub ngrams_to_test: usize,
    /// Pain levels above this count as flaws in the analyze pass.
    pub max_pain_level: u8,
}

impl SeqCostConfig {
    fn from_spec(spec: &SeqCostSpec) -> LpResult<Self> {
        check_len("seq_cost.pain_levels", spec.pain_levels.len(), KEY_COUNT)?;
        let mut pain_levels = vec![0u8; KEY_COUNT * KEY_COUNT];
        for (i, row) in spec.pain_levels.iter().enumerate() {
            check_len(&format!("seq_cost.pain_levels[{i}]"), row.len(), KEY_COUNT)?;
            for (j, &lvl) in row.iter().enumerate() {
                if !(0..PAIN_LEVEL_COUNT as i64).contains(&lvl) {
                    return Err(LayoptError::Config(format!(
                        "seq_cost.pain_levels[{i}][{j}]: value {lvl} should be \
                         in range [0, {PAIN_LEVEL_COUNT})"
                    )));
                }
                pain_levels[i * KEY_COUNT + j] = lvl as u8;
            }
        }
        check_len(
            "seq_cost.cost_of_pain_level",
            spec.cost_of_pain_level.len(),
            PAIN_LEVEL_COUNT,
        )?;
        let mut costs = [0.0; PAIN_LEVEL_COUNT];
        for (i, &cost) in spec.cost_of_pain_level.iter().enumerate() {
            if cost < 0.0 {
                return Err(LayoptError::Config(format!(
                    "seq_cost.cost_of_pain_level[{i}]: value {cost} should be non-negative"
                )));
            }
            costs[i] = cost;
        }
        if !(0..PAIN_LEVEL_COUNT as i64).contains(&spec.max_pain_level) {
            return Err(LayoptError::Config(format!(
                "seq_cost.max_pain_level: value {} should be in range [0, {PAIN_LEVEL_COUNT})",
                spec.max_pain_level
            )));
        }
        Ok(Self {
            pain_levels,
            cost_of_pain_level: costs,
            ngrams_to_test: spec.ngrams_to_test,
            max_pain_level: spec.max_pain_level as u8,
        })
    }

    #[inline(always)]
    pub fn level_of_pair(&self, pos1: Pos, pos2: Pos) -> u8 {
        self.pain_levels[pos1 as usize * KEY_COUNT + pos2 as usize]
    }

    #[inline(always)]
    pub fn cost_of_pair(&self, pos1: Pos, pos2: Pos) -> f64 {
        self.cost_of_pain_level[self.level_of_pair(pos1, pos2) as usize]
    }
}

impl Default for SeqCostConfig {
    fn default() -> Self {
        // Built-in pain table derived from the fingering model: hand
        // alternation is painless, same-finger sequences hurt most, and row
        // jumps aggravate everything.
        let mut pain_levels = vec![0u8; KEY_COUNT * KEY_COUNT];
        for pos1 in 0..KEY_COUNT as u8 {
            for pos2 in 0..KEY_COUNT as u8 {
                let fin1 = super::finger_to_hit(pos1);
                let fin2 = super::finger_to_hit(pos2);
                let row_diff =
                    (crate::consts::row_of(pos1) as i8 - crate::consts::row_of(pos2) as i8).abs();
                let same_hand = (fin1 < Finger::LeftThumb as usize)
                    == (fin2 < Finger::LeftThumb as usize);
                let level = if !same_hand {
                    0
                } else if pos1 == pos2 {
                    1
                } else if fin1 == fin2 {
                    if row_diff >= 2 {
                        4
                    } else {
                        3
                    }
                } else {
                    match row_diff {
                        0 => 1,
                        1 => 2,
                        _ => 3,
                    }
                };
                pain_levels[pos1 as usize * KEY_COUNT + pos2 as usize] = level;
            }
        }
        Self {
            pain_levels,
            cost_of_pain_level: [0.0, 1.0, 2.0, 4.0, 8.0],
            ngrams_to_test: 50,
            max_pain_level: 2,
        }
    }
}

fn check_len(path: &str, got: usize, want: usize) -> LpResult<()> {
    if got != want {
        return Err(LayoptError::Config(format!(
            "{path}: illegal size, should be {want}, got {got}"
        )));
    }
    Ok(())
}

fn check_finger_limits(
    path: &str,
    limits: &[f64],
    max: f64,
) -> LpResult<[f64; FINGER_COUNT]> {
    check_len(path, limits.len(), FINGER_COUNT)?;
    let mut out = [0.0; FINGER_COUNT];
    for (fin, &limit) in limits.iter().enumerate() {
        out[fin] = limit;
        if fin == Finger::LeftThumb as usize || fin == Finger::RightThumb as usize {
            continue;
        }
        if limit <= 0.0 || limit > max {
            return Err(LayoptError::Config(format!(
                "{path}[{fin}]: value {limit} should be in range (0, {max}]"
            )));
        }
    }
    Ok(out)
}
