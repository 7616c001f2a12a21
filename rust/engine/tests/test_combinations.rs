use yam_engine::combination::{evaluate, Combination, CombinationEvaluator};
use yam_engine::dice_set::DiceSet;

fn ev(values: [u8; 5]) -> CombinationEvaluator {
    CombinationEvaluator::from(&DiceSet::with_values(values))
}

fn all_rolled_states() -> impl Iterator<Item = [u8; 5]> {
    (0..7776u32).map(|mut n| {
        let mut v = [0u8; 5];
        for slot in v.iter_mut() {
            *slot = (n % 6) as u8 + 1;
            n /= 6;
        }
        v
    })
}

#[test]
fn low_street_scenario() {
    let e = ev([1, 2, 3, 4, 5]);
    assert!(e.is_street());
    assert!(!e.is_full_house());
    assert!(!e.is_yam());
}

#[test]
fn yam_scenario() {
    let e = ev([6, 6, 6, 6, 6]);
    assert!(e.is_yam());
    assert!(e.is_four_of_a_kind());
    assert!(e.is_full_house());
    assert_eq!(
        e.combinations(),
        vec![
            Combination::ThreeOfAKind,
            Combination::FourOfAKind,
            Combination::FullHouse,
            Combination::Yam
        ]
    );
}

#[test]
fn full_house_scenario() {
    let e = ev([2, 2, 2, 5, 5]);
    assert!(e.is_three_of_a_kind());
    assert!(e.is_full_house());
    assert!(!e.is_four_of_a_kind());
}

#[test]
fn nothing_scenario() {
    let e = ev([1, 1, 2, 2, 6]);
    assert!(!e.is_three_of_a_kind());
    assert!(!e.is_four_of_a_kind());
    assert!(!e.is_full_house());
    assert!(!e.is_street());
    assert!(!e.is_yam());
    assert!(e.combinations().is_empty());
    assert_eq!(e.total(), 12);
}

#[test]
fn counts_always_sum_to_five() {
    for values in all_rolled_states() {
        assert_eq!(ev(values).counts().sum(), 5, "{:?}", values);
    }
}

#[test]
fn kind_thresholds_are_monotonic() {
    for values in all_rolled_states() {
        let e = ev(values);
        if e.is_yam() {
            assert!(e.is_four_of_a_kind(), "{:?}", values);
            assert!(e.is_full_house(), "{:?}", values);
        }
        if e.is_four_of_a_kind() {
            assert!(e.is_three_of_a_kind(), "{:?}", values);
        }
    }
}

#[test]
fn street_only_for_the_two_runs() {
    for values in all_rolled_states() {
        let mut sorted = values;
        sorted.sort_unstable();
        let expected = sorted == [1, 2, 3, 4, 5] || sorted == [2, 3, 4, 5, 6];
        assert_eq!(ev(values).is_street(), expected, "{:?}", values);
    }
}

#[test]
fn getters_match_dice_set() {
    let dice = DiceSet::with_values([4, 0, 6, 1, 3]);
    let e = CombinationEvaluator::from(&dice);
    assert_eq!(e.all_values(), dice.values());
    for i in 0..5 {
        assert_eq!(e.value_at(i), dice.value_at(i));
    }
    assert_eq!(e.count_of(6), 1);
    assert_eq!(e.total(), 14);
}

#[test]
fn evaluation_serializes_snake_case() {
    let e = evaluate(&DiceSet::with_values([5, 5, 5, 5, 1]));
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(
        json["combinations"],
        serde_json::json!(["three_of_a_kind", "four_of_a_kind"])
    );
    assert_eq!(json["total"], 21);
}
