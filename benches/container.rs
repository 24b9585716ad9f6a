use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_container::{Argument, Arguments, Container, ServiceDefinition, TypeRegistry, Value};

fn registry() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register("Node", |args: Arguments| Ok(args.len()));
    types
}

/// `len` services, each depending on the next one.
fn chain(len: usize) -> Container {
    let mut builder = Container::builder().host(registry());
    for i in 0..len {
        let mut def = ServiceDefinition::new("Node").arg(Argument::parameter("app.name"));
        if i + 1 < len {
            def = def.arg(Argument::service(format!("n{}", i + 1)));
        }
        builder = builder.service(format!("n{}", i), def);
    }
    builder
        .parameter("app", Value::map([("name", Value::from("bench"))]))
        .build()
}

fn bench_instance_store_hit(c: &mut Criterion) {
    let container = chain(1);
    container.get("n0").unwrap();

    c.bench_function("get_memoized", |b| {
        b.iter(|| black_box(container.get(black_box("n0")).unwrap()))
    });
}

fn bench_cold_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_cold_chain");
    for len in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter_batched(
                || chain(len),
                |container| black_box(container.get("n0").unwrap()),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_parameter_path(c: &mut Criterion) {
    let container = Container::builder()
        .parameter(
            "a",
            Value::map([("b", Value::map([("c", Value::map([("d", Value::from(1))]))]))]),
        )
        .build();

    c.bench_function("get_parameter_depth_4", |b| {
        b.iter(|| black_box(container.get_parameter(black_box("a.b.c.d")).unwrap()))
    });
}

fn bench_circular_detection(c: &mut Criterion) {
    let container = Container::builder()
        .host(registry())
        .service("a", ServiceDefinition::new("Node").arg(Argument::service("b")))
        .service("b", ServiceDefinition::new("Node").arg(Argument::service("a")))
        .build();

    // Poisoned after the first attempt; later attempts fail fast.
    c.bench_function("get_circular", |b| {
        b.iter(|| black_box(container.get("a").is_err()))
    });
}

criterion_group!(
    benches,
    bench_instance_store_hit,
    bench_cold_chain,
    bench_parameter_path,
    bench_circular_detection
);
criterion_main!(benches);
