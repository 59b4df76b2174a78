// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use strand_runtime::coerce::{BinOp, add_assign, binary};
use strand_runtime::context::{CallFrame, Config, Context};
use strand_runtime::dispatch::{Arm, CaseLabel, Strategy, SwitchBlock};
use strand_runtime::format::ImageBuilder;
use strand_runtime::native::{HostBuffer, Natives};
use strand_runtime::{IntWidth, ScriptError, Value, access, array};

/// Entry point for `strand_runtime` wind-tunnel benchmarks.
///
/// Scenarios cover the hot paths an opcode loop leans on: case dispatch under each strategy,
/// string building, array churn, host-buffer aliasing and the call path itself.
fn bench_runtime(c: &mut Criterion) {
    bench_dispatch(c);
    bench_concat(c);
    bench_array_churn(c);
    bench_native_slice(c);
    bench_call(c);
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for n in [8_i64, 16, 64] {
        let dense_keys: Vec<Value> = (0..n).map(Value::Int).collect();
        let hashed_keys: Vec<Value> = (0..n).map(|i| Value::Int(i * 5_000_000_000)).collect();
        let scan_keys: Vec<Value> = (0..n).map(|i| Value::from(format!("k{i}"))).collect();
        let float_keys: Vec<Value> = (0..n)
            .map(|i| Value::Float(f64::from(i32::try_from(i).unwrap_or(0)) + 0.5))
            .collect();

        let cases = [
            ("dense", Strategy::Dense, &dense_keys),
            ("hashed", Strategy::Hashed, &hashed_keys),
            ("scan_mixed", Strategy::Scan, &scan_keys),
            ("scan_float", Strategy::Scan, &float_keys),
        ];
        for (name, strategy, keys) in cases {
            let mut arms: Vec<Arm<usize>> = keys
                .iter()
                .enumerate()
                .map(|(at, key)| Arm::case(CaseLabel::try_from(key).unwrap(), at))
                .collect();
            if name == "scan_mixed" {
                // A float label rules out hashing.
                arms.push(Arm::case(-0.5, usize::MAX));
            }
            let block = SwitchBlock::new(arms);
            assert_eq!(block.strategy(), strategy, "{name} at {n} labels");

            group.bench_with_input(BenchmarkId::new(name, n), keys, |b, keys| {
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % keys.len();
                    black_box(block.resolve(black_box(&keys[i])))
                });
            });
        }
    }
    group.finish();
}

fn bench_concat(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat");
    for n in [8_usize, 64, 512] {
        group.bench_with_input(BenchmarkId::new("add_assign", n), &n, |b, &n| {
            b.iter(|| {
                let mut s = Value::from("");
                for i in 0..n {
                    let part = Value::Int(i64::try_from(i).unwrap_or(0));
                    add_assign(&mut s, &part, IntWidth::W64).unwrap();
                }
                black_box(s)
            });
        });
        group.bench_with_input(BenchmarkId::new("binary_add", n), &n, |b, &n| {
            b.iter(|| {
                let mut s = Value::from("");
                for _ in 0..n {
                    s = binary(BinOp::Add, &s, &Value::from("x"), IntWidth::W64).unwrap();
                }
                black_box(s)
            });
        });
    }
    group.finish();
}

fn bench_array_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("array");
    for n in [16_usize, 256] {
        group.bench_with_input(BenchmarkId::new("push_pop_back", n), &n, |b, &n| {
            let mut seq = Value::array(Vec::with_capacity(n));
            b.iter(|| {
                for i in 0..n {
                    array::push(&mut seq, Value::Int(i64::try_from(i).unwrap_or(0))).unwrap();
                }
                while array::pop_back(&mut seq).is_ok() {}
            });
        });
        group.bench_with_input(BenchmarkId::new("shared_write", n), &n, |b, &n| {
            let base = Value::array(vec![Value::Null; n]);
            b.iter(|| {
                // Forces a copy-on-write clone of the backing storage each iteration.
                let mut copy = base.clone();
                access::index_set(&mut copy, &Value::Int(0), Value::Int(1)).unwrap();
                black_box(copy)
            });
        });
    }
    group.finish();
}

fn bench_native_slice(c: &mut Criterion) {
    let host = HostBuffer::<i32>::zeroed(1024);
    let mut view = host.to_value();
    c.bench_function("native/slice_write_read", |b| {
        let mut i = 0_i64;
        b.iter(|| {
            i = (i + 1) % 1024;
            access::index_set(&mut view, &Value::Int(i), Value::Int(i)).unwrap();
            black_box(access::index_get(&view, &Value::Int(i)).unwrap())
        });
    });
}

fn bench_call(c: &mut Criterion) {
    let mut image = ImageBuilder::new(1);
    image.unit("f", 4, &[0]);
    let bytes = image.finish();
    let mut ctx = Context::load(&bytes, &Config::default()).unwrap();
    let mut natives = Natives::new();
    let mut exec = |frame: CallFrame<'_>| -> Result<Value, ScriptError> {
        Ok(frame.args[0].clone())
    };
    c.bench_function("call/padded_args", |b| {
        b.iter(|| {
            black_box(
                ctx.call(&mut natives, &mut exec, "f", &[Value::Int(1)])
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_runtime);
criterion_main!(benches);
