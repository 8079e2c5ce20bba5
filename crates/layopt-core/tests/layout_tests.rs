use layopt_core::consts::{CAP_SET, KEY_COUNT};
use layopt_core::layout::{baselines, Layout};

#[test]
fn every_baseline_is_a_valid_bijection() {
    for baseline in &baselines::ALL {
        let layout = baseline.layout().unwrap();
        assert!(layout.is_valid(), "{} is not valid", baseline.name);
        for &cap in CAP_SET.iter() {
            assert_eq!(layout.get_cap(layout.get_pos(cap)), cap);
        }
        for pos in 0..KEY_COUNT as u8 {
            assert_eq!(layout.get_pos(layout.get_cap(pos)), pos);
        }
    }
}

#[test]
fn display_round_trips_the_sequence() {
    let seq = "QWERTYUIOPASDFGHJKL;ZXCVBNM,./";
    let layout = Layout::from_seq(seq).unwrap();
    assert_eq!(layout.to_string(), seq);
    assert_eq!(layout.cap_seq(), seq);
}

#[test]
fn wrong_length_is_rejected_with_length_in_message() {
    let err = Layout::from_seq("QWERTY").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("length"), "unexpected message: {msg}");
    assert!(msg.contains("QWERTY"), "should carry the sequence: {msg}");
}

#[test]
fn illegal_character_is_rejected_and_named() {
    let seq = "QWERTYUIOPASDFGHJKL@ZXCVBNM,./";
    let err = Layout::from_seq(seq).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains('@'), "should name the offender: {msg}");
}

#[test]
fn duplicate_character_is_rejected_and_named() {
    let seq = "QQERTYUIOPASDFGHJKL;ZXCVBNM,./";
    let err = Layout::from_seq(seq).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("duplicate"), "unexpected message: {msg}");
    assert!(msg.contains('Q'), "should name the offender: {msg}");
}

#[test]
fn layouts_order_lexicographically_and_dedup() {
    let qwerty = baselines::QWERTY.layout().unwrap();
    let dvorak = baselines::DVORAK.layout().unwrap();
    let qwerty_again = Layout::from_seq(baselines::QWERTY.seq).unwrap();

    assert_eq!(qwerty, qwerty_again);
    assert_ne!(qwerty, dvorak);

    let mut layouts = vec![qwerty.clone(), dvorak.clone(), qwerty_again];
    layouts.sort();
    layouts.dedup();
    assert_eq!(layouts.len(), 2);

    // ';' (59) sorts before 'Q' (81), so Dvorak's seq comes first.
    assert_eq!(layouts[0], dvorak);
    assert_eq!(layouts[1], qwerty);
}
