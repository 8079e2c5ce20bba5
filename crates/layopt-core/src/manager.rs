use crate::core_types::Key;
use crate::layout::Layout;
use crate::partition::{Area, Partition};
use fastrand::Rng;

/// Creates, re-randomizes and mutates layouts against one partition.
///
/// Each manager owns its own copies of the partition's areas (their
/// amortized draw state is mutable) and its own PRNG, so one instance must
/// be constructed per worker and never shared.
pub struct Manager {
    areas: Vec<Area>,
    pinned_keys: Vec<Key>,
    area_ids: Vec<usize>,
    rng: Rng,
    multi_area: bool,
    ths: usize,
    idx: usize,
}

impl Manager {
    pub fn new(partition: &Partition, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };
        let ths = partition.num_mutable_keys();
        Self {
            areas: partition.areas().to_vec(),
            pinned_keys: partition.pinned_keys().to_vec(),
            area_ids: partition.area_ids().to_vec(),
            rng,
            multi_area: partition.areas().len() > 1,
            ths,
            idx: ths + 1,
        }
    }

    /// Builds a fresh random layout: pinned keys first, then a random
    /// assignment of every area.
    pub fn create(&mut self) -> Layout {
        let mut layout = Layout::unassigned();
        self.assign_pinned_keys(&mut layout);
        self.assign_mutable_keys(&mut layout);
        debug_assert!(layout.is_valid());
        layout
    }

    /// Re-randomizes every mutable area in place; pinned keys stay put.
    pub fn reinit(&mut self, layout: &mut Layout) {
        debug_assert!(self.can_manage(layout));
        self.assign_mutable_keys(layout);
        debug_assert!(layout.is_valid());
    }

    /// Copies `parent` into `child`, then applies exactly one area-local
    /// swap. The area is drawn with probability proportional to its size.
    pub fn mutate(&mut self, child: &mut Layout, parent: &Layout) {
        debug_assert!(parent.is_valid());
        debug_assert!(self.can_manage(parent));
        child.copy_from(parent);
        let area_id = self.select_area_id();
        self.areas[area_id].mutate(child, &mut self.rng);
        debug_assert!(child.is_valid());
    }

    /// True iff every area can safely operate on `layout`.
    pub fn can_manage(&self, layout: &Layout) -> bool {
        self.areas.iter().all(|area| area.is_safe_for(layout))
    }

    fn assign_pinned_keys(&mut self, layout: &mut Layout) {
        for key in &self.pinned_keys {
            layout.set_key(key.cap, key.pos);
        }
    }

    fn assign_mutable_keys(&mut self, layout: &mut Layout) {
        for area in &mut self.areas {
            area.assign(layout, &mut self.rng);
        }
    }

    /// Size-weighted random area selection, amortized the same way as
    /// [`Area::mutate`]: area ids are drawn sequentially from the shuffled
    /// id list (one entry per mutable key) and the list is reshuffled only
    /// once it has been consumed.
    fn select_area_id(&mut self) -> usize {
        if !self.multi_area {
            return 0;
        }
        if self.idx >= self.ths {
            self.rng.shuffle(&mut self.area_ids);
            self.idx = 0;
        }
        let area_id = self.area_ids[self.idx];
        self.idx += 1;
        area_id
    }
}
