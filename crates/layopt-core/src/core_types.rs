use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// A key value: ASCII code of one of the 26 capital letters or the four
/// symbols ',', '.', ';', '/'.
pub type Cap = u8;

/// A key position: slot index on the 3x10 grid, row-major, 0..=29.
pub type Pos = u8;

/// One key of a layout: a key value bound to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub cap: Cap,
    pub pos: Pos,
}

impl Key {
    pub fn new(cap: Cap, pos: Pos) -> Self {
        Self { cap, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Language {
    Chinese = 0,
    English = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MetricKind {
    KeyCost = 0,
    DisCost = 1,
    SeqCost = 2,
}

/// One scoring task = one metric evaluated against one language's data.
pub const TASK_COUNT: usize = MetricKind::COUNT * Language::COUNT;

#[inline(always)]
pub fn task_id(metric: MetricKind, language: Language) -> usize {
    metric as usize * Language::COUNT + language as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter)]
pub enum Finger {
    LeftPinky = 0,
    LeftRing = 1,
    LeftMiddle = 2,
    LeftIndex = 3,
    LeftThumb = 4,
    RightThumb = 5,
    RightIndex = 6,
    RightMiddle = 7,
    RightRing = 8,
    RightPinky = 9,
}

pub const FINGER_COUNT: usize = Finger::COUNT;

/// Ordinal discomfort rating for a pair of consecutive keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumCount, EnumIter)]
pub enum PainLevel {
    No = 0,
    Mild = 1,
    Moderate = 2,
    Severe = 3,
    Extreme = 4,
}

pub const PAIN_LEVEL_COUNT: usize = PainLevel::COUNT;

/// How a key placement relates to its placement in the reference layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount)]
pub enum PosRelation {
    SamePosition = 0,
    SameFinger = 1,
    SameHand = 2,
    None = 3,
}
