use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use jtms::engine::propagate_from;
use jtms::schema::entail;
use jtms::{Graph, InMemoryTripleStore, Iri, JtmsSchema, PropagationConfig, Reasoner, Triple};
use jtms::vocab;

fn iri(s: &str) -> Iri {
    Iri::parse(s).unwrap()
}

/// `b0 -> j1 -> b1 -> ... -> jN -> bN`, with `b0` a premise.
fn chain(len: usize) -> Graph {
    let mut kb = Graph::new();
    kb.insert(Triple::new(iri("urn:kb#b0"), vocab::iri(vocab::RDF_TYPE), vocab::iri(vocab::PREMISE)));
    for i in 1..=len {
        let j = iri(&format!("urn:kb#j{i}"));
        kb.insert(Triple::new(j.clone(), vocab::iri(vocab::HAS_SUPPORT), iri(&format!("urn:kb#b{}", i - 1))));
        kb.insert(Triple::new(j, vocab::iri(vocab::JUSTIFIES), iri(&format!("urn:kb#b{i}"))));
    }
    kb
}

fn bench_propagate_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation/chain");
    for len in [16usize, 128, 512] {
        let kb = chain(len);
        let closed = kb.union(&entail(&kb));
        let origin = iri("urn:kb#b0");
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &closed, |b, closed| {
            b.iter_batched(
                || {
                    let mut g = closed.clone();
                    jtms::engine::set_state(&mut g, &origin, true);
                    g
                },
                |mut g| propagate_from(&mut g, &origin, usize::MAX).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let kb = chain(128);
    c.bench_function("reasoner/update_chain_128", |b| {
        b.iter_batched(
            || {
                Reasoner::open(
                    Arc::new(InMemoryTripleStore::new()),
                    Arc::new(JtmsSchema::default()),
                    iri("urn:graph:reasoner"),
                    PropagationConfig::default(),
                )
                .unwrap()
            },
            |mut reasoner| reasoner.update(&kb).unwrap(),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(propagation, bench_propagate_chain, bench_update);
criterion_main!(propagation);
