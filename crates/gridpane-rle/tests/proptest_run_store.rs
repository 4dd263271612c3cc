// ABOUTME: Property tests for RunStore checked against a plain Vec model.
// ABOUTME: Covers the run invariants, splice growth, substr, fill, resize and serde.

use gridpane_rle::{Run, RunStore};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Small alphabet so neighbouring runs collide often.
fn runs_strategy(max_runs: usize) -> impl Strategy<Value = Vec<Run<u8>>> {
    prop::collection::vec((0u8..4, 1usize..6), 0..max_runs)
        .prop_map(|pairs| pairs.into_iter().map(|(v, n)| Run::new(v, n)).collect())
}

fn incoming_strategy() -> impl Strategy<Value = Vec<Run<u8>>> {
    prop::collection::vec((0u8..4, 0usize..6), 0..5)
        .prop_map(|pairs| pairs.into_iter().map(|(v, n)| Run::new(v, n)).collect())
}

fn expand(runs: &[Run<u8>]) -> Vec<u8> {
    runs.iter()
        .flat_map(|run| std::iter::repeat(run.value).take(run.length))
        .collect()
}

fn assert_well_formed(store: &RunStore<u8>) -> Result<(), TestCaseError> {
    let total: usize = store.runs().iter().map(|run| run.length).sum();
    prop_assert_eq!(total, store.len());
    prop_assert!(store.runs().iter().all(|run| run.length > 0));
    for pair in store.runs().windows(2) {
        prop_assert_ne!(pair[0].value, pair[1].value, "adjacent equal runs in {}", store);
    }
    Ok(())
}

/// Build a store plus a valid `[pos, pos + cover)` window inside it.
fn store_and_window() -> impl Strategy<Value = (Vec<Run<u8>>, usize, usize)> {
    runs_strategy(8).prop_flat_map(|runs| {
        let size: usize = runs.iter().map(|run| run.length).sum();
        (Just(runs), 0..=size).prop_flat_map(move |(runs, pos)| {
            (Just(runs), Just(pos), 0..=size - pos)
        })
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Splice matches the Vec model and keeps runs canonical
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn splice_matches_vec_model(
        (runs, pos, cover) in store_and_window(),
        incoming in incoming_strategy(),
    ) {
        let mut store = RunStore::from_runs(runs.clone()).unwrap();
        let before = store.len();
        let coverage: usize = incoming.iter().map(|run| run.length).sum();

        let mut model = expand(&runs);
        model.splice(pos..pos + cover, expand(&incoming));

        store.splice_runs(pos, cover, incoming);

        prop_assert_eq!(store.len(), before - cover + coverage);
        prop_assert_eq!(store.iter().copied().collect::<Vec<_>>(), model);
        assert_well_formed(&store)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Replace then lookup returns the written value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replace_then_at(
        (runs, pos, length) in store_and_window(),
        value in 0u8..6,
    ) {
        let mut store = RunStore::from_runs(runs.clone()).unwrap();
        let before = store.len();
        store.replace(pos, length, value);

        prop_assert_eq!(store.len(), before);
        for position in pos..pos + length {
            prop_assert_eq!(*store.at(position), value);
        }
        let model = expand(&runs);
        for position in (0..pos).chain(pos + length..before) {
            prop_assert_eq!(*store.at(position), model[position]);
        }
        assert_well_formed(&store)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Single-cell writes match the Vec model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_cell_writes(
        runs in runs_strategy(8).prop_filter("non-empty", |runs| !runs.is_empty()),
        writes in prop::collection::vec((any::<prop::sample::Index>(), 0u8..4), 1..20),
    ) {
        let mut store = RunStore::from_runs(runs.clone()).unwrap();
        let mut model = expand(&runs);

        for (index, value) in writes {
            let position = index.index(model.len());
            store.replace(position, 1, value);
            model[position] = value;
            assert_well_formed(&store)?;
        }
        prop_assert_eq!(store.iter().copied().collect::<Vec<_>>(), model);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Span reported by at_with_span is exact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn span_counts_equal_values(runs in runs_strategy(8)) {
        let store = RunStore::from_runs(runs).unwrap();
        let values: Vec<u8> = store.iter().copied().collect();

        for position in 0..store.len() {
            let (value, span) = store.at_with_span(position);
            prop_assert!(span >= 1);
            prop_assert!(values[position..position + span].iter().all(|v| v == value));
            if position + span < values.len() {
                prop_assert_ne!(values[position + span], *value);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Substr copies exactly the requested window
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn substr_matches_slice((runs, offset, count) in store_and_window()) {
        let store = RunStore::from_runs(runs.clone()).unwrap();
        let sub = store.substr(offset, count);
        let model = expand(&runs);

        prop_assert_eq!(sub.len(), count);
        prop_assert_eq!(sub.iter().copied().collect::<Vec<_>>(), model[offset..offset + count].to_vec());
        assert_well_formed(&sub)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Splicing a substr back into place is the identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn splice_own_substr_is_identity((runs, offset, count) in store_and_window()) {
        let original = RunStore::from_runs(runs).unwrap();
        let mut store = original.clone();
        let piece = original.substr(offset, count);

        store.splice(offset, count, &piece);
        prop_assert_eq!(store, original);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Fill overwrites the whole suffix
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fill_overwrites_suffix((runs, start, _) in store_and_window(), value in 0u8..4) {
        let mut store = RunStore::from_runs(runs.clone()).unwrap();
        let mut model = expand(&runs);
        for slot in &mut model[start..] {
            *slot = value;
        }

        store.fill(value, start);
        prop_assert_eq!(store.iter().copied().collect::<Vec<_>>(), model);
        assert_well_formed(&store)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Resize extends the last value or truncates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_matches_vec_model(
        runs in runs_strategy(8).prop_filter("non-empty", |runs| !runs.is_empty()),
        new_size in 1usize..60,
    ) {
        let mut store = RunStore::from_runs(runs.clone()).unwrap();
        let mut model = expand(&runs);
        let last = *model.last().unwrap();
        model.resize(new_size, last);

        store.resize(new_size);
        prop_assert_eq!(store.len(), new_size);
        prop_assert_eq!(store.iter().copied().collect::<Vec<_>>(), model);
        assert_well_formed(&store)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Serde round trip preserves structure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn serde_json_roundtrip(runs in runs_strategy(8)) {
        let store = RunStore::from_runs(runs).unwrap();
        let json = serde_json::to_string(&store).unwrap();
        let restored: RunStore<u8> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, store);
    }
}
