/// Property-based tests for service and parameter resolution
///
/// These tests verify that memoization and dotted-path lookup hold for
/// arbitrary graphs and trees rather than hand-picked ones.

use ferrous_container::{Argument, Arguments, Container, DiError, Parameters, ServiceDefinition, TypeRegistry, Value};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A chain of `len` services where service i depends on every j > i
/// selected by `edges`. Acyclic by construction.
fn dag(len: usize, edges: &[bool], constructed: Arc<AtomicUsize>) -> Container {
    let mut types = TypeRegistry::new();
    types.register("Node", move |args: Arguments| {
        constructed.fetch_add(1, Ordering::SeqCst);
        Ok(args.len())
    });

    let mut builder = Container::builder().host(types);
    let mut edge = edges.iter().cycle();
    for i in 0..len {
        let mut def = ServiceDefinition::new("Node");
        for j in (i + 1)..len {
            if *edge.next().unwrap_or(&false) {
                def = def.arg(Argument::service(format!("s{}", j)));
            }
        }
        builder = builder.service(format!("s{}", i), def);
    }
    builder.build()
}

proptest! {
    #[test]
    fn each_service_is_built_at_most_once(
        len in 1usize..12,
        edges in proptest::collection::vec(any::<bool>(), 1..64),
        order in proptest::collection::vec(0usize..12, 1..32),
    ) {
        let constructed = Arc::new(AtomicUsize::new(0));
        let container = dag(len, &edges, constructed.clone());

        let mut seen: Vec<Option<Arc<dyn std::any::Any + Send + Sync>>> = vec![None; len];
        for i in order.into_iter().map(|i| i % len) {
            let instance = container.get(&format!("s{}", i)).unwrap();
            if let Some(previous) = &seen[i] {
                prop_assert!(Arc::ptr_eq(previous, &instance));
            }
            seen[i] = Some(instance);
        }

        prop_assert_eq!(constructed.load(Ordering::SeqCst), container.resolved_count());
        prop_assert!(container.resolved_count() <= len);
    }
}

proptest! {
    #[test]
    fn dotted_paths_find_what_was_nested(
        segments in proptest::collection::vec("[a-z]{1,8}", 1..6),
        leaf in any::<i64>(),
    ) {
        let mut value = Value::from(leaf);
        for segment in segments.iter().skip(1).rev() {
            value = Value::map([(segment.clone(), value)]);
        }
        let params = Parameters::from_iter([(segments[0].clone(), value)]);
        let path = segments.join(".");

        prop_assert_eq!(params.get(&path).unwrap(), &Value::from(leaf));

        let missing = format!("{}.zz9", path);
        prop_assert_eq!(params.get(&missing), Err(DiError::ParameterNotFound(missing.clone())));
    }
}
