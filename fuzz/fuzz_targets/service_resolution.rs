#![no_main]

use ferrous_container::{
    Argument, Arguments, CallDefinition, Container, DiError, ServiceDefinition, TypeRegistry,
};
use libfuzzer_sys::fuzz_target;

const IDS: [&str; 8] = ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"];

// Each pair of bytes adds one edge or call to a small random graph, then every
// id is resolved. Resolution must terminate with Ok or an error, never panic
// or overflow, and must agree with static validation on cycles.
fuzz_target!(|data: &[u8]| {
    let mut types = TypeRegistry::new();
    types
        .register("Node", |_: Arguments| Ok(()))
        .method("touch", |_: &(), _| Ok(()));

    let mut defs: Vec<ServiceDefinition> = (0..IDS.len()).map(|_| ServiceDefinition::new("Node")).collect();
    for pair in data.chunks_exact(2) {
        let from = (pair[0] as usize) % IDS.len();
        let to = (pair[1] as usize) % IDS.len();
        match pair[0] >> 5 {
            0 => defs[from].calls.push(CallDefinition::new("touch").arg(Argument::service(IDS[to]))),
            1 => defs[from].arguments.push(Argument::parameter("missing")),
            2 => defs[from].calls.push(CallDefinition::new("nope")),
            _ => defs[from].arguments.push(Argument::service(IDS[to])),
        }
    }

    let container = Container::builder()
        .host(types)
        .services(IDS.iter().copied().zip(defs))
        .build();
    let report = container.validate();

    for id in IDS {
        match container.get(id) {
            Ok(_) => {}
            Err(DiError::Container { .. }) | Err(DiError::ParameterNotFound(_)) => {}
            Err(other) => panic!("unexpected error for {}: {}", id, other),
        }
    }

    if report.is_valid() {
        assert!(IDS.iter().all(|id| container.get(id).is_ok()));
    }
});
