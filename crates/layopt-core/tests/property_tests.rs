use layopt_core::consts::{CAP_SET, KEY_COUNT};
use layopt_core::layout::Layout;
use layopt_core::manager::Manager;
use layopt_core::partition::{Partition, PartitionSpec};
use proptest::prelude::*;

fn arb_permutation() -> impl Strategy<Value = String> {
    Just(CAP_SET.to_vec()).prop_shuffle().prop_map(|caps| {
        caps.into_iter().map(|c| c as char).collect()
    })
}

proptest! {
    #[test]
    fn any_permutation_builds_a_valid_bijection(seq in arb_permutation()) {
        let layout = Layout::from_seq(&seq).unwrap();
        prop_assert!(layout.is_valid());
        prop_assert_eq!(layout.cap_seq(), seq);
        for &cap in CAP_SET.iter() {
            prop_assert_eq!(layout.get_cap(layout.get_pos(cap)), cap);
        }
        for pos in 0..KEY_COUNT as u8 {
            prop_assert_eq!(layout.get_pos(layout.get_cap(pos)), pos);
        }
    }

    #[test]
    fn sequences_with_repeats_are_rejected(
        seq in proptest::collection::vec(proptest::sample::select(CAP_SET.to_vec()), 30)
    ) {
        let unique = {
            let mut sorted = seq.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() == KEY_COUNT
        };
        let string: String = seq.into_iter().map(|c| c as char).collect();
        let result = Layout::from_seq(&string);
        if unique {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn chains_of_mutations_preserve_the_bijection(seed in any::<u64>(), steps in 1usize..100) {
        let partition = Partition::from_spec(&PartitionSpec::default()).unwrap();
        let mut mgr = Manager::new(&partition, Some(seed));
        let mut parent = mgr.create();
        let mut child = mgr.create();
        for _ in 0..steps {
            mgr.mutate(&mut child, &parent);
            prop_assert!(child.is_valid());
            let changed = (0..KEY_COUNT as u8)
                .filter(|&pos| child.get_cap(pos) != parent.get_cap(pos))
                .count();
            prop_assert_eq!(changed, 2);
            std::mem::swap(&mut parent, &mut child);
        }
    }
}
