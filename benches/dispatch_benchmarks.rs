//! Performance benchmarks for template-method dispatch.
//!
//! Measures the three costs that matter on the hot path:
//! - Fingerprinting an argument list
//! - A memoized (fast-path) dispatch
//! - A full resolution including one instantiation lookup

use criterion::{Criterion, criterion_group, criterion_main};
use std::collections::HashMap;
use std::hint::black_box;

use cxxdispatch::prelude::*;

const SCOPE: ScopeId = ScopeId(1);

/// Minimal scripted reflection service: one fixed lookup table, invocations
/// succeed whenever the argument count matches.
struct BenchTypeSystem {
    lookups: HashMap<(String, String), MethodId>,
    arities: Vec<usize>,
}

impl BenchTypeSystem {
    fn new(entries: &[(&str, &str, usize)]) -> Self {
        let mut lookups = HashMap::new();
        let mut arities = Vec::new();
        for (i, (name, proto, arity)) in entries.iter().enumerate() {
            lookups.insert((name.to_string(), proto.to_string()), MethodId(i as u64));
            arities.push(*arity);
        }
        Self { lookups, arities }
    }
}

impl TypeSystem for BenchTypeSystem {
    fn find_template_method(&self, _scope: ScopeId, name: &str, proto: &str) -> Option<MethodId> {
        self.lookups.get(&(name.to_string(), proto.to_string())).copied()
    }

    fn method_full_name(&self, method: MethodId) -> String {
        format!("sum<{}>", method.0)
    }

    fn method_signature(&self, method: MethodId) -> String {
        vec!["long"; self.arities[method.0 as usize]].join(", ")
    }

    fn is_namespace(&self, _scope: ScopeId) -> bool {
        false
    }

    fn is_static_method(&self, _method: MethodId) -> bool {
        true
    }

    fn is_constructor(&self, _method: MethodId) -> bool {
        false
    }

    fn is_const_method(&self, _method: MethodId) -> bool {
        false
    }

    fn invoke(
        &self,
        method: MethodId,
        _receiver: Option<&Value>,
        args: &[Value],
        _allow_implicit: bool,
    ) -> Result<Value, InvokeError> {
        if args.len() == self.arities[method.0 as usize] {
            Ok(Value::Int(args.len() as i64))
        } else {
            Err(InvokeError::Execution("arity mismatch".to_string()))
        }
    }
}

fn signature_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/fingerprint");

    let small = vec![Value::Int(1), Value::Float(2.0)];
    group.bench_function("2_args", |b| {
        b.iter(|| black_box(hash_signature(black_box(&small))));
    });

    let large: Vec<Value> = (0..24)
        .map(|i| {
            if i % 2 == 0 {
                Value::Int(i)
            } else {
                Value::Str("arg".to_string())
            }
        })
        .collect();
    group.bench_function("24_args", |b| {
        b.iter(|| black_box(hash_signature(black_box(&large))));
    });

    group.finish();
}

fn dispatch_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/call");

    let sys = BenchTypeSystem::new(&[("sum", "long, long", 2)]);
    let args = [Value::Int(1), Value::Int(2)];

    // memoized: the first call resolves, the measured calls hit the cache
    let warm = TemplateProxy::standalone(SCOPE, "sum");
    warm.call(&sys, &args).expect("warmup call resolves");
    group.bench_function("cached", |b| {
        b.iter(|| black_box(warm.call(&sys, black_box(&args))));
    });

    // full resolution every iteration: fresh proxy, empty pools and cache
    group.bench_function("cold", |b| {
        b.iter(|| {
            let proxy = TemplateProxy::standalone(SCOPE, "sum");
            black_box(proxy.call(&sys, black_box(&args)))
        });
    });

    group.finish();
}

criterion_group!(benches, signature_benchmarks, dispatch_benchmarks);
criterion_main!(benches);
