use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use proptest::prelude::*;
use zskiplist::{ScoreRange, SkipList, SkipListError};

type Key = (OrderedFloat<f64>, String);

fn key(score: i8, value: u8) -> Key {
    (OrderedFloat(score as f64), format!("v{value}"))
}

/// Стратегия: случайная последовательность операций над маленьким
/// пространством ключей, чтобы чаще попадать в совпадения score.
fn ops() -> impl Strategy<Value = Vec<(u8, i8, u8)>> {
    prop::collection::vec((0u8..3, -10i8..10, 0u8..5), 0..200)
}

proptest! {
    #[test]
    fn prop_behaves_like_btreeset(ops in ops()) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (op, score, value) in ops {
            let (fscore, svalue) = key(score, value);

            match op {
                0 => { // insert — только если ключа ещё нет (контракт уникальности)
                    if model.insert((fscore, svalue.clone())) {
                        sl.insert(fscore.0, svalue);
                    }
                }
                1 => { // remove
                    let r1 = sl.remove(fscore.0, &svalue).is_ok();
                    let r2 = model.remove(&(fscore, svalue));
                    prop_assert_eq!(r1, r2);
                }
                2 => { // rank
                    let expected = model
                        .iter()
                        .position(|k| k == &(fscore, svalue.clone()))
                        .map(|p| p + 1);
                    let actual = sl.rank(fscore.0, &svalue).ok();
                    prop_assert_eq!(actual, expected);
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(sl.len(), model.len());
            prop_assert!(sl.validate_invariants().is_ok());
        }

        // финальная проверка порядка
        let sl_items: Vec<Key> = sl
            .iter()
            .map(|(s, v)| (OrderedFloat(s), v.to_string()))
            .collect();
        let model_items: Vec<Key> = model.into_iter().collect();
        prop_assert_eq!(sl_items, model_items);
    }
}

proptest! {
    #[test]
    fn prop_iteration_is_sorted(entries in prop::collection::vec((-100i8..100, 0u8..200), 0..150)) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        let mut prev: Option<Key> = None;
        for (score, value) in sl.iter() {
            let current = (OrderedFloat(score), value.to_string());
            if let Some(p) = prev {
                prop_assert!(p < current);
            }
            prev = Some(current);
        }

        prop_assert!(sl.validate_invariants().is_ok());
    }
}

proptest! {
    /// Для каждого i-го по порядку ключа: rank == i, value_by_rank(i)
    /// возвращает его value.
    #[test]
    fn prop_rank_roundtrip(entries in prop::collection::vec((-50i8..50, 0u8..20), 1..100)) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        for (i, (score, value)) in model.iter().enumerate() {
            let rank = i + 1;
            prop_assert_eq!(sl.rank(score.0, value), Ok(rank));
            prop_assert_eq!(sl.value_by_rank(rank), Ok(value.as_str()));
        }

        prop_assert_eq!(sl.value_by_rank(0), Err(SkipListError::NotFound));
        prop_assert_eq!(sl.value_by_rank(model.len() + 1), Err(SkipListError::NotFound));
    }
}

proptest! {
    /// `is_in_range` истинно тогда и только тогда, когда линейный
    /// перебор находит элемент со score из диапазона; first/last
    /// совпадают с линейным поиском.
    #[test]
    fn prop_range_soundness(
        entries in prop::collection::vec((-20i8..20, 0u8..5), 0..80),
        min in -25i8..25,
        max in -25i8..25,
    ) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        let r = ScoreRange::new(min as f64, max as f64);
        let matching: Vec<&Key> = model.iter().filter(|(s, _)| r.contains(s.0)).collect();

        prop_assert_eq!(sl.is_in_range(&r), !matching.is_empty());

        match matching.first() {
            Some((score, value)) => {
                prop_assert_eq!(sl.first_in_range(&r), Ok((score.0, value.as_str())));
            }
            None => {
                prop_assert_eq!(sl.first_in_range(&r), Err(SkipListError::NotFound));
            }
        }
        match matching.last() {
            Some((score, value)) => {
                prop_assert_eq!(sl.last_in_range(&r), Ok((score.0, value.as_str())));
            }
            None => {
                prop_assert_eq!(sl.last_in_range(&r), Err(SkipListError::NotFound));
            }
        }
    }
}

proptest! {
    /// Массовое удаление по score убирает ровно те элементы, которые
    /// определил бы линейный перебор.
    #[test]
    fn prop_remove_range_by_score_exactness(
        entries in prop::collection::vec((-20i8..20, 0u8..5), 0..80),
        min in -25i8..25,
        max in -25i8..25,
    ) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        let r = ScoreRange::new(min as f64, max as f64);
        let expected = model.iter().filter(|(s, _)| r.contains(s.0)).count();

        prop_assert_eq!(sl.remove_range_by_score(&r), expected);
        model.retain(|(s, _)| !r.contains(s.0));

        prop_assert_eq!(sl.len(), model.len());
        let sl_items: Vec<Key> = sl
            .iter()
            .map(|(s, v)| (OrderedFloat(s), v.to_string()))
            .collect();
        let model_items: Vec<Key> = model.into_iter().collect();
        prop_assert_eq!(sl_items, model_items);
        prop_assert!(sl.validate_invariants().is_ok());
    }
}

proptest! {
    /// Массовое удаление по рангу убирает ровно позиции из
    /// `[start, end]`, обрезаясь по длине списка.
    #[test]
    fn prop_remove_range_by_rank_exactness(
        entries in prop::collection::vec((-20i8..20, 0u8..5), 0..80),
        start in 1usize..90,
        span in 0usize..90,
    ) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        let end = start + span;
        let expected: Vec<Key> = model
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let rank = i + 1;
                rank < start || rank > end
            })
            .map(|(_, k)| k.clone())
            .collect();
        let removed = model.len() - expected.len();

        prop_assert_eq!(sl.remove_range_by_rank(start, end), removed);
        prop_assert_eq!(sl.len(), expected.len());

        let sl_items: Vec<Key> = sl
            .iter()
            .map(|(s, v)| (OrderedFloat(s), v.to_string()))
            .collect();
        prop_assert_eq!(sl_items, expected);
        prop_assert!(sl.validate_invariants().is_ok());
    }
}

proptest! {
    /// Обратная итерация — точное зеркало прямой.
    #[test]
    fn prop_reverse_iteration_mirrors_forward(
        entries in prop::collection::vec((-50i8..50, 0u8..10), 0..100),
    ) {
        let mut sl = SkipList::with_seed(0);
        let mut model: BTreeSet<Key> = BTreeSet::new();

        for (score, value) in entries {
            let (fscore, svalue) = key(score, value);
            if model.insert((fscore, svalue.clone())) {
                sl.insert(fscore.0, svalue);
            }
        }

        let forward: Vec<Key> = sl
            .iter()
            .map(|(s, v)| (OrderedFloat(s), v.to_string()))
            .collect();
        let mut backward: Vec<Key> = sl
            .iter_rev()
            .map(|(s, v)| (OrderedFloat(s), v.to_string()))
            .collect();
        backward.reverse();

        prop_assert_eq!(forward, backward);
    }
}
