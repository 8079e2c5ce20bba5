use crate::consts::{is_legal_cap, CAP_SET, KEY_COUNT, MAX_KEY_CODE};
use crate::core_types::{Cap, Key, Pos};
use crate::error::{LayoptError, LpResult};
use crate::layout::Layout;
use fastrand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Fewer mutable keys than this leaves nothing worth searching.
const MIN_MUTABLE_KEYS: usize = 4;

/// A region of keys that may be freely permuted among themselves.
///
/// The working position list doubles as the random-draw state: `mutate`
/// consumes it two entries at a time and only reshuffles once `ths` entries
/// (size rounded down to even) have been used, which amortizes the shuffle
/// across `size / 2` calls.
#[derive(Debug)]
pub struct Area {
    cap_list: Vec<Cap>, // ascending, canonical
    pos_list: Vec<Pos>, // working list, repeatedly shuffled
    size: usize,
    ths: usize,
    idx: usize,
}

impl Clone for Area {
    fn clone(&self) -> Self {
        // A fresh copy starts with spent amortization state so its first
        // mutate() draws from a fresh shuffle.
        Self {
            cap_list: self.cap_list.clone(),
            pos_list: self.pos_list.clone(),
            size: self.size,
            ths: self.ths,
            idx: self.ths + 1,
        }
    }
}

impl Area {
    fn new(cap_list: Vec<Cap>, pos_list: Vec<Pos>) -> Self {
        debug_assert_eq!(cap_list.len(), pos_list.len());
        let size = cap_list.len();
        let ths = size & !1;
        let mut area = Self {
            cap_list,
            pos_list,
            size,
            ths,
            idx: ths + 1,
        };
        area.cap_list.sort_unstable();
        area
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Rebuilds a random bijection for exactly this area's keys.
    pub fn assign(&mut self, layout: &mut Layout, rng: &mut Rng) {
        rng.shuffle(&mut self.pos_list);
        for (&cap, &pos) in self.cap_list.iter().zip(self.pos_list.iter()) {
            layout.set_key(cap, pos);
        }
    }

    /// Swaps the caps at two randomly drawn positions of this area.
    ///
    /// The two positions are taken sequentially from the last shuffle of the
    /// working list, so no position repeats within one amortization window.
    pub fn mutate(&mut self, layout: &mut Layout, rng: &mut Rng) {
        if self.idx >= self.ths {
            rng.shuffle(&mut self.pos_list);
            self.idx = 0;
        }
        let pos1 = self.pos_list[self.idx];
        let pos2 = self.pos_list[self.idx + 1];
        self.idx += 2;
        layout.swap_keys(pos1, pos2);
    }

    /// True iff the caps currently sitting at this area's positions in
    /// `layout` are exactly this area's caps. A mismatch means the layout
    /// was built against a different partition and `assign`/`mutate` would
    /// corrupt it.
    pub fn is_safe_for(&self, layout: &Layout) -> bool {
        let mut observed: Vec<Cap> = self.pos_list.iter().map(|&pos| layout.get_cap(pos)).collect();
        observed.sort_unstable();
        observed == self.cap_list
    }
}

/// Raw partition document, as deserialized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartitionSpec {
    #[serde(default)]
    pub pinned_keys: Vec<PinnedKeySpec>,
    #[serde(default)]
    pub mutable_areas: Vec<AreaSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinnedKeySpec {
    pub cap: String,
    pub pos: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaSpec {
    pub cap_list: Vec<String>,
    pub pos_list: Vec<i64>,
}

/// The validated split of the 30 keys into pinned keys and disjoint mutable
/// regions. Loaded once before any search starts and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Partition {
    areas: Vec<Area>,
    pinned_keys: Vec<Key>,
    /// One entry per mutable key, holding the index of the area that owns
    /// it; drawing from this list selects areas with probability
    /// proportional to their size.
    area_ids: Vec<usize>,
    num_mutable_keys: usize,
}

impl Partition {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(path)?;
        Self::from_json(&doc)
    }

    pub fn from_json(doc: &str) -> LpResult<Self> {
        let spec: PartitionSpec = serde_json::from_str(doc)?;
        Self::from_spec(&spec)
    }

    pub fn from_spec(spec: &PartitionSpec) -> LpResult<Self> {
        Builder::default().build(spec)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn pinned_keys(&self) -> &[Key] {
        &self.pinned_keys
    }

    pub fn area_ids(&self) -> &[usize] {
        &self.area_ids
    }

    pub fn num_mutable_keys(&self) -> usize {
        self.num_mutable_keys
    }
}

/// Tracks which caps/positions have been claimed, and by which config field,
/// so duplicate claims can name both occurrences. Caps and positions share
/// one table because their code ranges do not overlap.
#[derive(Default)]
struct Builder {
    claimed_by: Vec<Option<String>>,
}

impl Builder {
    fn build(mut self, spec: &PartitionSpec) -> LpResult<Partition> {
        self.claimed_by = vec![None; MAX_KEY_CODE];

        let pinned_keys = self.check_pinned_keys(spec)?;

        let num_mutable_keys = KEY_COUNT - pinned_keys.len();
        if num_mutable_keys < MIN_MUTABLE_KEYS {
            return Err(LayoptError::Config(format!(
                "too few mutable keys: require at least {MIN_MUTABLE_KEYS}, got {num_mutable_keys}"
            )));
        }

        let mut areas = self.check_areas(spec)?;
        let mut area_ids = Vec::with_capacity(num_mutable_keys);
        for (area_id, area) in areas.iter().enumerate() {
            area_ids.extend(std::iter::repeat(area_id).take(area.size()));
        }

        // Any caps/positions not claimed by pinned keys or declared areas
        // form one implicit trailing area.
        if area_ids.len() < num_mutable_keys {
            let caps: Vec<Cap> = CAP_SET
                .iter()
                .copied()
                .filter(|&cap| self.claimed_by[cap as usize].is_none())
                .collect();
            let positions: Vec<Pos> = (0..KEY_COUNT as Pos)
                .filter(|&pos| self.claimed_by[pos as usize].is_none())
                .collect();
            debug_assert_eq!(caps.len(), positions.len());
            let area_id = areas.len();
            area_ids.extend(std::iter::repeat(area_id).take(caps.len()));
            areas.push(Area::new(caps, positions));
        }
        debug_assert_eq!(area_ids.len(), num_mutable_keys);

        Ok(Partition {
            areas,
            pinned_keys,
            area_ids,
            num_mutable_keys,
        })
    }

    fn check_pinned_keys(&mut self, spec: &PartitionSpec) -> LpResult<Vec<Key>> {
        let mut pinned = Vec::with_capacity(spec.pinned_keys.len());
        for (i, key) in spec.pinned_keys.iter().enumerate() {
            let path = format!("pinned_keys[{i}]");
            let cap = self.claim_cap(&key.cap, &format!("{path}.cap"))?;
            let pos = self.claim_pos(key.pos, &format!("{path}.pos"))?;
            pinned.push(Key::new(cap, pos));
        }
        Ok(pinned)
    }

    fn check_areas(&mut self, spec: &PartitionSpec) -> LpResult<Vec<Area>> {
        let mut areas = Vec::with_capacity(spec.mutable_areas.len());
        for (i, area) in spec.mutable_areas.iter().enumerate() {
            let path = format!("mutable_areas[{i}]");
            if area.cap_list.len() != area.pos_list.len() {
                return Err(LayoptError::Config(format!(
                    "{path}: size of `cap_list` and `pos_list` must be equal, \
                     got {} and {}",
                    area.cap_list.len(),
                    area.pos_list.len()
                )));
            }
            let size = area.cap_list.len();
            if !(2..=KEY_COUNT).contains(&size) {
                return Err(LayoptError::Config(format!(
                    "{path}: illegal area size {size}, should be in range [2, {KEY_COUNT}]"
                )));
            }
            let mut caps = Vec::with_capacity(size);
            for (j, cap) in area.cap_list.iter().enumerate() {
                caps.push(self.claim_cap(cap, &format!("{path}.cap_list[{j}]"))?);
            }
            let mut positions = Vec::with_capacity(size);
            for (j, &pos) in area.pos_list.iter().enumerate() {
                positions.push(self.claim_pos(pos, &format!("{path}.pos_list[{j}]"))?);
            }
            areas.push(Area::new(caps, positions));
        }
        Ok(areas)
    }

    fn claim_cap(&mut self, cap: &str, path: &str) -> LpResult<Cap> {
        if cap.len() != 1 {
            return Err(LayoptError::Config(format!(
                "{path}: key code \"{cap}\" should be a single character"
            )));
        }
        let cap = cap.as_bytes()[0];
        if !is_legal_cap(cap) {
            return Err(LayoptError::Config(format!(
                "{path}: illegal key code '{}', should be a capital letter \
                 or one of the 4 symbols: ',', '.', ';' and '/'",
                cap as char
            )));
        }
        self.claim(cap as usize, path)?;
        Ok(cap)
    }

    fn claim_pos(&mut self, pos: i64, path: &str) -> LpResult<Pos> {
        if pos < 0 || pos >= KEY_COUNT as i64 {
            return Err(LayoptError::Config(format!(
                "{path}: position {pos} out of range, should be in [0, {}]",
                KEY_COUNT - 1
            )));
        }
        self.claim(pos as usize, path)?;
        Ok(pos as Pos)
    }

    fn claim(&mut self, code: usize, path: &str) -> LpResult<()> {
        if let Some(first) = &self.claimed_by[code] {
            return Err(LayoptError::Config(format!(
                "duplicate key: {path} claims a key already taken by {first}"
            )));
        }
        self.claimed_by[code] = Some(path.to_string());
        Ok(())
    }
}
