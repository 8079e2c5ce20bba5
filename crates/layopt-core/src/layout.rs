use crate::consts::{is_legal_cap, is_legal_pos, CAP_SET, KEY_COUNT, MAX_KEY_CODE};
use crate::core_types::{Cap, Pos};
use crate::error::{LayoptError, LpResult};
use std::cmp::Ordering;
use std::fmt;

/// A bijective assignment of the 30 key values to the 30 positions of the
/// 3x10 grid.
///
/// One packed array stores both directions of the map: indices `0..30` hold
/// the cap sitting at that position, and the ASCII code of each cap holds the
/// position it sits at. The two index ranges do not overlap (the smallest cap
/// code is 44), so every write through [`Layout::set_key`] or
/// [`Layout::swap_keys`] can update both views atomically.
#[derive(Clone, Debug)]
pub struct Layout {
    key_map: [u8; MAX_KEY_CODE],
}

impl Layout {
    /// Builds a layout from a 30-character sequence: the caps in position
    /// order, left to right, top to bottom. E.g. QWERTY is
    /// `"QWERTYUIOPASDFGHJKL;ZXCVBNM,./"`.
    pub fn from_seq(seq: &str) -> LpResult<Self> {
        Self::validate_seq(seq)?;
        let mut layout = Self::unassigned();
        for (i, cap) in seq.bytes().enumerate() {
            layout.set_key(cap, i as Pos);
        }
        Ok(layout)
    }

    /// An all-zero layout with no keys assigned. Reading from it is
    /// meaningless until every key has been placed; only `Manager` and
    /// `Area` may operate on one.
    pub(crate) fn unassigned() -> Self {
        Self {
            key_map: [0; MAX_KEY_CODE],
        }
    }

    fn validate_seq(seq: &str) -> LpResult<()> {
        if seq.len() != KEY_COUNT {
            return Err(LayoptError::Sequence(format!(
                "\"{seq}\": expect seq length = {KEY_COUNT}, got {}",
                seq.len()
            )));
        }
        for cap in seq.bytes() {
            if !is_legal_cap(cap) {
                return Err(LayoptError::Sequence(format!(
                    "\"{seq}\": illegal key code '{}'",
                    cap as char
                )));
            }
        }
        let mut observed = [false; MAX_KEY_CODE];
        for cap in seq.bytes() {
            if observed[cap as usize] {
                return Err(LayoptError::Sequence(format!(
                    "\"{seq}\": duplicate key '{}'",
                    cap as char
                )));
            }
            observed[cap as usize] = true;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn get_cap(&self, pos: Pos) -> Cap {
        debug_assert!(is_legal_pos(pos));
        self.key_map[pos as usize]
    }

    #[inline(always)]
    pub fn get_pos(&self, cap: Cap) -> Pos {
        debug_assert!(is_legal_cap(cap));
        self.key_map[cap as usize]
    }

    /// Writes both directions of the mapping for one key.
    #[inline(always)]
    pub(crate) fn set_key(&mut self, cap: Cap, pos: Pos) {
        debug_assert!(is_legal_cap(cap));
        debug_assert!(is_legal_pos(pos));
        self.key_map[cap as usize] = pos;
        self.key_map[pos as usize] = cap;
    }

    /// Swaps the caps sitting at two positions, keeping both directions of
    /// the map consistent.
    #[inline(always)]
    pub(crate) fn swap_keys(&mut self, pos1: Pos, pos2: Pos) {
        debug_assert!(is_legal_pos(pos1));
        debug_assert!(is_legal_pos(pos2));
        self.key_map.swap(pos1 as usize, pos2 as usize);
        let cap1 = self.key_map[pos1 as usize] as usize;
        let cap2 = self.key_map[pos2 as usize] as usize;
        self.key_map.swap(cap1, cap2);
    }

    #[inline(always)]
    pub(crate) fn copy_from(&mut self, other: &Layout) {
        self.key_map = other.key_map;
    }

    /// Re-derives the bijection over all 30 slots. Only used by defensive
    /// invariant checks; the mutation primitives preserve validity.
    pub fn is_valid(&self) -> bool {
        self.elems_legal() && self.keys_unique()
    }

    fn elems_legal(&self) -> bool {
        (0..KEY_COUNT as Pos).all(|pos| is_legal_cap(self.get_cap(pos)))
            && CAP_SET.iter().all(|&cap| is_legal_pos(self.get_pos(cap)))
    }

    fn keys_unique(&self) -> bool {
        let mut observed = [false; MAX_KEY_CODE];
        for pos in 0..KEY_COUNT as Pos {
            let cap = self.get_cap(pos) as usize;
            if observed[cap] {
                return false;
            }
            observed[cap] = true;
        }
        for &cap in CAP_SET.iter() {
            let pos = self.get_pos(cap) as usize;
            if observed[pos] {
                return false;
            }
            observed[pos] = true;
        }
        true
    }

    /// The caps in position order, as a 30-character string.
    pub fn cap_seq(&self) -> String {
        self.key_map[..KEY_COUNT].iter().map(|&c| c as char).collect()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cap_seq())
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.key_map[..KEY_COUNT] == other.key_map[..KEY_COUNT]
    }
}

impl Eq for Layout {}

impl PartialOrd for Layout {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Layout {
    /// Lexicographic over the position-indexed cap sequence, so layouts can
    /// be sorted and deduplicated.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_map[..KEY_COUNT].cmp(&other.key_map[..KEY_COUNT])
    }
}

pub mod baselines {
    //! Named reference layouts, used as constant inputs for final ranking.
    //! Some layouts substitute '/' for characters outside the key set.

    use super::Layout;
    use crate::error::LpResult;

    #[derive(Debug, Clone, Copy)]
    pub struct Baseline {
        pub name: &'static str,
        pub seq: &'static str,
    }

    impl Baseline {
        pub fn layout(&self) -> LpResult<Layout> {
            Layout::from_seq(self.seq)
        }
    }

    pub const QWERTY: Baseline = Baseline {
        name: "QWERTY",
        seq: "QWERTYUIOPASDFGHJKL;ZXCVBNM,./",
    };
    pub const DVORAK: Baseline = Baseline {
        name: "Dvorak",
        seq: ";,.PYFGCRLAOEUIDHTNS/QJKXBMWVZ",
    };
    pub const COLEMAK: Baseline = Baseline {
        name: "Colemak",
        seq: "QWFPGJLUY;ARSTDHNEIOZXCVBKM,./",
    };
    pub const MINIMAK: Baseline = Baseline {
        name: "Minimak",
        seq: "QWDFKYUIL;ASTRGHNEOPZXCVBJM,./",
    };
    pub const KLAUSLER: Baseline = Baseline {
        name: "Klausler",
        seq: "K,UYPWLMFCOAEIDRNTHSQ./;ZXVGBJ",
    };
    pub const CAPEWELL: Baseline = Baseline {
        name: "Capewell",
        seq: ".YWDFJPLUQAERSGBTNIOXZCV;KMH,/",
    };
    pub const QGMLWY: Baseline = Baseline {
        name: "QGMLWY",
        seq: "QGMLWYFUB;DSTNRIAEOHZXCVJKP,./",
    };
    pub const ASSET: Baseline = Baseline {
        name: "Asset",
        seq: "QWFGJYPUL;ASETDHNIORZXCVBKM,./",
    };
    pub const ARENSITO: Baseline = Baseline {
        name: "Arensito",
        seq: "QL.P/;FUDKARENBGSITOZW,HJVCYMX",
    };
    pub const WORKMAN: Baseline = Baseline {
        name: "Workman",
        seq: "QDRWBJFUP;ASHTGYNEOIZXMCVKL,./",
    };
    pub const NORMAN: Baseline = Baseline {
        name: "Norman",
        seq: "QWDFKJURL;ASETGYNIOHZXCVBPM,./",
    };
    pub const CHIN: Baseline = Baseline {
        name: "Chin",
        seq: ",TSZBPFRD.OEAGYLNIHUXQJCVKMW;/",
    };
    pub const GOAT: Baseline = Baseline {
        name: "Goat",
        seq: ",SEZBPFRD.GOATYLNIHUXQJCVKMW;/",
    };

    pub const ALL: [Baseline; 13] = [
        QWERTY, DVORAK, COLEMAK, MINIMAK, KLAUSLER, CAPEWELL, QGMLWY, ASSET, ARENSITO, WORKMAN,
        NORMAN, CHIN, GOAT,
    ];
}
