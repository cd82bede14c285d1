//! Performance benchmarks for Unibergers.
//!
//! Run with: cargo bench
//!
//! Target performance:
//! - Catalog scan per settled term: < 1ms
//! - Visible window resolution: < 10µs

use std::sync::Arc;
use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use unibergers::core::normalize;
use unibergers::core::{Matcher, ResultCache};
use unibergers::{ActiveList, Catalog, MatchMode, SearchSession, SessionOptions, ViewFeed, ViewLayout};

/// Benchmark parsing the bundled catalog.
fn bench_catalog_load(c: &mut Criterion) {
    let json = include_str!("../data/emoji.json");

    c.bench_function("catalog_from_json", |b| {
        b.iter(|| black_box(Catalog::from_json(black_box(json))))
    });
}

/// Benchmark exact-key normalization.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for (name, term) in [("glyph", "👋🏽"), ("word", "grin"), ("too_long", "grinning face with big eyes")] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &term, |b, term| {
            b.iter(|| black_box(normalize::exact_key(black_box(term))))
        });
    }

    group.finish();
}

/// Benchmark full catalog scans in both match modes.
fn bench_matcher(c: &mut Criterion) {
    let catalog = Catalog::embedded().expect("bundled catalog");
    let queries = ["face", "flag", "smileys & emotion", "zzz"];

    let mut group = c.benchmark_group("matcher");

    for mode in [MatchMode::Forward, MatchMode::Symmetric] {
        for query in queries {
            let id = format!("{:?}/{}", mode, query);
            group.bench_with_input(BenchmarkId::from_parameter(id), &query, |b, query| {
                b.iter(|| {
                    let matcher = Matcher::new(black_box(query), mode).expect("non-empty");
                    black_box(matcher.run(&catalog))
                })
            });
        }
    }

    group.finish();
}

/// Benchmark cache lookups against a large session cache.
fn bench_cache(c: &mut Criterion) {
    let mut cache = ResultCache::default();
    for i in 0..10_000 {
        cache.put(format!("term{}", i), vec![i].into());
    }

    c.bench_function("cache_hit", |b| b.iter(|| black_box(cache.get(black_box("term5000")))));
}

/// Benchmark resolving one visible window from the default list.
fn bench_window(c: &mut Criterion) {
    let catalog = Catalog::embedded().expect("bundled catalog");
    let feed = ViewFeed::new(
        catalog.clone(),
        &ActiveList::Default(catalog.default_indices()),
        ViewLayout::default(),
    );

    c.bench_function("window_rows", |b| {
        b.iter(|| {
            let range = feed.render_range(black_box(2_000));
            black_box(feed.rows(range))
        })
    });
}

/// Benchmark a typing burst through the session state machine.
fn bench_session(c: &mut Criterion) {
    let catalog: Arc<Catalog> = Catalog::embedded().expect("bundled catalog");

    c.bench_function("session_typing_burst", |b| {
        b.iter(|| {
            let start = Instant::now();
            let mut session = SearchSession::new(catalog.clone(), SessionOptions::default());
            for (i, term) in ["f", "fa", "fac", "face"].into_iter().enumerate() {
                session.set_search_term(term, start + Duration::from_millis(i as u64 * 50));
            }
            session.tick(start + Duration::from_secs(1));
            black_box(session.snapshot())
        })
    });
}

criterion_group!(
    benches,
    bench_catalog_load,
    bench_normalize,
    bench_matcher,
    bench_cache,
    bench_window,
    bench_session,
);

criterion_main!(benches);
