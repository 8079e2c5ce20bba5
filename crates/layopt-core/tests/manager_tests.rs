use layopt_core::consts::KEY_COUNT;
use layopt_core::manager::Manager;
use layopt_core::partition::{AreaSpec, Partition, PartitionSpec, PinnedKeySpec};
use std::collections::HashSet;

fn pinned_punctuation() -> Vec<PinnedKeySpec> {
    [(";", 9), (",", 27), (".", 28), ("/", 29)]
        .iter()
        .map(|&(cap, pos)| PinnedKeySpec {
            cap: cap.to_string(),
            pos,
        })
        .collect()
}

fn letters_partition() -> Partition {
    // One mutable area covering all 26 letters, 4 pinned punctuation keys.
    Partition::from_spec(&PartitionSpec {
        pinned_keys: pinned_punctuation(),
        mutable_areas: vec![],
    })
    .unwrap()
}

#[test]
fn create_yields_valid_layouts_with_pinned_keys_in_place() {
    let partition = letters_partition();
    let mut mgr = Manager::new(&partition, Some(1));
    for _ in 0..50 {
        let layout = mgr.create();
        assert!(layout.is_valid());
        assert_eq!(layout.get_cap(9), b';');
        assert_eq!(layout.get_cap(27), b',');
        assert_eq!(layout.get_cap(28), b'.');
        assert_eq!(layout.get_cap(29), b'/');
        assert!(mgr.can_manage(&layout));
    }
}

#[test]
fn reinit_rerandomizes_but_keeps_pinned_keys() {
    let partition = letters_partition();
    let mut mgr = Manager::new(&partition, Some(2));
    let mut layout = mgr.create();
    for _ in 0..20 {
        mgr.reinit(&mut layout);
        assert!(layout.is_valid());
        assert_eq!(layout.get_cap(9), b';');
        assert_eq!(layout.get_cap(27), b',');
    }
}

#[test]
fn mutate_copies_parent_and_changes_exactly_two_keys() {
    let partition = letters_partition();
    let mut mgr = Manager::new(&partition, Some(3));
    let parent = mgr.create();
    let mut child = mgr.create();

    for _ in 0..100 {
        mgr.mutate(&mut child, &parent);
        assert!(child.is_valid());
        let changed = (0..KEY_COUNT as u8)
            .filter(|&pos| child.get_cap(pos) != parent.get_cap(pos))
            .count();
        assert_eq!(changed, 2);
    }
}

#[test]
fn can_manage_rejects_layouts_from_another_partition() {
    let letters = letters_partition();
    // A different split: 'A' is pinned where the letters partition expects
    // a mutable key.
    let other = Partition::from_spec(&PartitionSpec {
        pinned_keys: vec![PinnedKeySpec {
            cap: "A".to_string(),
            pos: 9,
        }],
        mutable_areas: vec![],
    })
    .unwrap();

    let mut letters_mgr = Manager::new(&letters, Some(4));
    let mut other_mgr = Manager::new(&other, Some(5));

    let ours = letters_mgr.create();
    let theirs = other_mgr.create();

    assert!(letters_mgr.can_manage(&ours));
    assert!(!letters_mgr.can_manage(&theirs));
    assert!(!other_mgr.can_manage(&ours));
}

#[test]
fn mutation_visits_declared_and_implicit_areas() {
    let partition = Partition::from_spec(&PartitionSpec {
        pinned_keys: pinned_punctuation(),
        mutable_areas: vec![AreaSpec {
            cap_list: ["Z", "X", "C", "V"].iter().map(|s| s.to_string()).collect(),
            pos_list: vec![20, 21, 22, 23],
        }],
    })
    .unwrap();
    let mut mgr = Manager::new(&partition, Some(6));
    let parent = mgr.create();
    let mut child = mgr.create();

    let mut declared_hits = 0;
    let mut implicit_hits = 0;
    const ROUNDS: usize = 1000;
    for _ in 0..ROUNDS {
        mgr.mutate(&mut child, &parent);
        let touched_declared =
            (20u8..=23).any(|pos| child.get_cap(pos) != parent.get_cap(pos));
        if touched_declared {
            declared_hits += 1;
        } else {
            implicit_hits += 1;
        }
    }
    // Selection is size-weighted: 4 of 26 keys belong to the declared
    // area, so roughly 15% of mutations should land there.
    assert!(declared_hits > ROUNDS / 20, "declared area starved: {declared_hits}");
    assert!(implicit_hits > ROUNDS / 2, "implicit area starved: {implicit_hits}");
}

#[test]
fn a_thousand_fresh_layouts_barely_collide() {
    let partition = letters_partition();
    let mut mgr = Manager::new(&partition, Some(7));
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for _ in 0..1000 {
        let layout = mgr.create();
        if !seen.insert(layout.cap_seq()) {
            duplicates += 1;
        }
    }
    assert!(duplicates < 10, "got {duplicates} duplicate layouts");
}
