use proptest::prelude::*;
use std::collections::BTreeMap;

use crate::avl::Avl;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u64),
    Remove(u16),
    Lookup(u16),
    Validate,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // narrow key space so that overwrites and removes hit existing keys.
    let key = 0u16..512;
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        24 => key.clone().prop_map(Op::Lookup),
        1 => Just(Op::Validate),
    ];
    prop::collection::vec(op, 0..=1000)
}

// worst-case height of an AVL tree holding n entries.
fn max_height(n: usize) -> usize {
    (1.44 * ((n + 2) as f64).log2() - 0.328).ceil() as usize
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: Avl<u16, u64> = Avl::new("prop-avl");
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let old_t = t.insert(key, value);
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Remove(key) => {
                    let old_t = t.remove(&key).ok();
                    let old_m = m.remove(&key);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Lookup(key) => {
                    let got_t = t.lookup(&key).ok();
                    let got_m = m.get(&key).copied();
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Validate => {
                    prop_assert!(t.validate().is_ok());
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        let stats = t.validate();
        prop_assert!(stats.is_ok());
        prop_assert!(t.height() <= max_height(t.len()));
        let expected: Vec<u16> = m.keys().copied().collect();
        prop_assert_eq!(t.keys(), expected);
    }

    #[test]
    fn prop_insert_lookup(key in any::<i64>(), v1 in any::<i64>(), v2 in any::<i64>()) {
        let mut t: Avl<i64, i64> = Avl::new("prop-avl");
        prop_assert!(t.insert(key, v1).is_none());
        prop_assert_eq!(t.lookup(&key), Ok(v1));
        prop_assert_eq!(t.insert(key, v2), Some(v1));
        prop_assert_eq!(t.lookup(&key), Ok(v2));
        prop_assert_eq!(t.len(), 1);
    }
}
