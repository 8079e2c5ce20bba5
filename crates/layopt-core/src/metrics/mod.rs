pub mod config;
pub mod data;
pub mod dis_cost;
pub mod key_cost;
pub mod seq_cost;

pub use self::config::{DisCostConfig, KeyCostConfig, MetricConfig, SeqCostConfig};
pub use self::data::{CharFreqData, PairFreqData, SeqFreqData};
pub use self::dis_cost::DisCost;
pub use self::key_cost::KeyCost;
pub use self::seq_cost::SeqCost;

use crate::consts::col_of;
use crate::core_types::Pos;
use crate::layout::Layout;

/// The finger responsible for a position. Column-based: the two inner split
/// columns (4 and 5) are served by the neighboring index fingers.
#[inline(always)]
pub(crate) fn finger_to_hit(pos: Pos) -> usize {
    match col_of(pos) as usize {
        4 => 3,
        5 => 6,
        col => col,
    }
}

#[inline(always)]
pub(crate) fn is_same_finger(col1: u8, col2: u8) -> bool {
    if col1 == col2 {
        true
    } else if col1 == 3 || col1 == 4 {
        col2 == 3 || col2 == 4
    } else if col1 == 5 || col1 == 6 {
        col2 == 5 || col2 == 6
    } else {
        false
    }
}

#[inline(always)]
pub(crate) fn is_same_hand(col1: u8, col2: u8) -> bool {
    (col1 <= 4 && col2 <= 4) || (col1 >= 5 && col2 >= 5)
}

/// Type-erasing wrapper over the three concrete metrics, dispatched by tag.
#[derive(Clone)]
pub enum Metric {
    Key(KeyCost),
    Dis(DisCost),
    Seq(SeqCost),
}

impl Metric {
    /// The cheap scalar cost; the hot-path entry used inside the search loop.
    pub fn measure(&mut self, layout: &Layout) -> f64 {
        match self {
            Metric::Key(m) => m.measure(layout),
            Metric::Dis(m) => m.measure(layout),
            Metric::Seq(m) => m.measure(layout),
        }
    }

    /// The detailed variant: also computes usage statistics and counts
    /// secondary-constraint violations. Only used outside the search loop.
    pub fn analyze(&mut self, layout: &Layout) -> (f64, usize) {
        match self {
            Metric::Key(m) => m.analyze(layout),
            Metric::Dis(m) => m.analyze(layout),
            Metric::Seq(m) => m.analyze(layout),
        }
    }
}
