//! Benchmarks for compiling and evaluating expressions.
//!
//! Compilation runs the whole pipeline; evaluation reuses one compiled
//! tree, which is the case hosts care about.

use std::hint::black_box;

use calx_core::api::{Engine, EngineOptions};
use calx_core::stdlib::register_stdlib;
use calx_core::{Float, Integer, Shared};
use criterion::{Criterion, criterion_group, criterion_main};

const ARITHMETIC: &str = "1 + 2 * 3 - 4 / 2";
const MIXED: &str = "x = (int)(sqrt((float)y) * 2.5) + y % 7 << 1";

fn engine() -> (Engine, Shared<Integer>, Shared<Integer>) {
    let mut engine = Engine::new(EngineOptions::default());
    register_stdlib(engine.registry_mut()).unwrap();
    let x = Shared::new(0 as Integer);
    let y = Shared::new(41 as Integer);
    engine.register_variable("x", &x).unwrap();
    engine.register_variable("y", &y).unwrap();
    (engine, x, y)
}

fn bench_compile(c: &mut Criterion) {
    let (engine, _x, _y) = engine();
    c.bench_function("compile_arithmetic", |b| {
        b.iter(|| black_box(engine.prepare(black_box(ARITHMETIC)).unwrap()))
    });
    c.bench_function("compile_mixed", |b| {
        b.iter(|| black_box(engine.prepare(black_box(MIXED)).unwrap()))
    });

    let nested = format!("{}1{}", "(".repeat(200), ")".repeat(200));
    c.bench_function("compile_nested_200", |b| {
        b.iter(|| black_box(engine.prepare(black_box(&nested)).unwrap()))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let (mut engine, _x, y) = engine();

    engine.compile(ARITHMETIC).unwrap();
    c.bench_function("eval_arithmetic", |b| {
        b.iter(|| black_box(engine.evaluate().unwrap()))
    });

    engine.compile(MIXED).unwrap();
    c.bench_function("eval_mixed", |b| {
        b.iter(|| {
            y.set(black_box(41));
            black_box(engine.evaluate().unwrap())
        })
    });

    let rate = Shared::new(0.5 as Float);
    engine.register_variable("rate", &rate).unwrap();
    engine.compile("rate * rate + 1.0").unwrap();
    c.bench_function("eval_float_variable", |b| {
        b.iter(|| black_box(engine.evaluate().unwrap()))
    });
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
