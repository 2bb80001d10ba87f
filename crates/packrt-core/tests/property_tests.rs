//! Property-based tests for the loader
//!
//! Random module graphs, cyclic or not, must instantiate every reachable
//! module exactly once no matter how often or in which order they are loaded.

use packrt_core::{Loader, ModuleState};
use packrt_test_helpers::fixtures::{graph_registry, module_name};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for a graph of 1..12 modules with arbitrary edges, cycles included
fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|size| {
        prop::collection::vec(prop::collection::vec(0..size, 0..4), size)
    })
}

fn reachable(deps: &[Vec<usize>], root: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![root];
    while let Some(next) = pending.pop() {
        if seen.insert(next) {
            pending.extend(deps[next].iter().copied());
        }
    }
    seen
}

proptest! {
    #[test]
    fn prop_each_module_runs_at_most_once(
        deps in graph_strategy(),
        requests in prop::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        let (registry, counts) = graph_registry(&deps);
        let loader = Loader::new(registry);

        let mut expected = BTreeSet::new();
        for request in &requests {
            let root = request.index(deps.len());
            loader.load(&module_name(root)).unwrap();
            expected.extend(reachable(&deps, root));
        }

        for (index, count) in counts.iter().enumerate() {
            let want = u32::from(expected.contains(&index));
            prop_assert_eq!(count.get(), want, "module m{}", index);
        }
        prop_assert_eq!(loader.cached_count(), expected.len());
    }

    #[test]
    fn prop_every_cached_module_finishes_loading(deps in graph_strategy()) {
        let (registry, _counts) = graph_registry(&deps);
        let loader = Loader::new(registry);
        loader.load(&module_name(0)).unwrap();

        for id in loader.cached_ids() {
            prop_assert_eq!(loader.state(id.as_str()), ModuleState::Loaded);
        }
    }

    #[test]
    fn prop_containers_keep_identity(deps in graph_strategy()) {
        let (registry, _counts) = graph_registry(&deps);
        let loader = Loader::new(registry);
        let first = loader.load(&module_name(0)).unwrap();
        for other in 0..deps.len() {
            loader.load(&module_name(other)).unwrap();
        }
        let again = loader.load(&module_name(0)).unwrap();
        prop_assert!(first.ptr_eq(&again));
    }
}
