// Criterion benchmarks for the matching engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use company_match::core::normalize::{extract_domain, name_key, normalize_phone};
use company_match::core::scoring::{score_candidate, total_score};
use company_match::core::selector::select;
use company_match::core::similarity::name_score;
use company_match::models::{
    CompanyRecord, NormalizedAttributes, ScoredCandidate, ScoringWeights,
};

fn create_record(id: usize) -> CompanyRecord {
    CompanyRecord {
        company_id: id.to_string(),
        website: format!("https://company-{}.com", id),
        domain: format!("company-{}.com", id),
        company_commercial_name: format!("Company {} Holdings", id),
        company_legal_name: format!("Company {} Holdings LLC", id),
        company_all_names: format!("Company {} Holdings", id),
        phones: vec![format!("+1 555 000 {:04}", id % 10000)],
        phones_normalized: vec![format!("555000{:04}", id % 10000)],
        facebook_links: vec![format!("https://facebook.com/company{}", id)],
        facebook_links_normalized: vec![format!("company{}", id)],
    }
}

fn create_input() -> NormalizedAttributes {
    NormalizedAttributes {
        domain: "company-7.com".to_string(),
        phone_digits: "5550000007".to_string(),
        facebook_id: "company7".to_string(),
        name_key: "company 7 holdings".to_string(),
    }
}

fn bench_normalization(c: &mut Criterion) {
    c.bench_function("extract_domain", |b| {
        b.iter(|| extract_domain(black_box("https://www.acme-widgets.com/products?ref=home")));
    });

    c.bench_function("normalize_phone", |b| {
        b.iter(|| normalize_phone(black_box("+1 (234) 567-8901 ext. 42")));
    });

    c.bench_function("name_key", |b| {
        b.iter(|| name_key(black_box("  Açmé   Wïdgets   Corporation  ")));
    });
}

fn bench_name_score(c: &mut Criterion) {
    c.bench_function("name_score", |b| {
        b.iter(|| {
            name_score(
                black_box("acme widgets corporation"),
                black_box("acme widget corp"),
                black_box(5.0),
                black_box(1.0),
            )
        });
    });
}

fn bench_scoring(c: &mut Criterion) {
    let input = create_input();
    let record = create_record(7);
    let weights = ScoringWeights::default();

    c.bench_function("score_candidate", |b| {
        b.iter(|| score_candidate(black_box(&input), black_box(&record), &weights, 1.0));
    });
}

fn bench_selection(c: &mut Criterion) {
    let input = create_input();
    let weights = ScoringWeights::default();

    let mut group = c.benchmark_group("selection");

    for candidate_count in [5usize, 10, 50, 100].iter() {
        let scored: Vec<(ScoredCandidate, _)> = (0..*candidate_count)
            .map(|i| {
                let record = create_record(i);
                let scores = score_candidate(&input, &record, &weights, 1.0);
                (
                    ScoredCandidate {
                        record,
                        relevance: (i % 7) as f64,
                    },
                    scores,
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("select", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    select(
                        black_box(&input),
                        black_box(scored.clone()),
                        black_box(&weights),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_total_score(c: &mut Criterion) {
    let input = create_input();
    let record = create_record(7);
    let weights = ScoringWeights::default();
    let scores = score_candidate(&input, &record, &weights, 1.0);

    c.bench_function("total_score", |b| {
        b.iter(|| total_score(black_box(&scores)));
    });
}

criterion_group!(
    benches,
    bench_normalization,
    bench_name_score,
    bench_scoring,
    bench_selection,
    bench_total_score
);

criterion_main!(benches);
