use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use docrank::{
    DocumentDescriptor, EncoderConfig, Locale, RankerConfig, SemanticRanker, TranslationBundle,
};

fn synthetic_catalog(count: usize) -> Vec<DocumentDescriptor> {
    (0..count)
        .map(|i| DocumentDescriptor {
            id: format!("doc-{i}"),
            translations: BTreeMap::from([(
                Locale::En,
                TranslationBundle {
                    name: format!("Agreement Variant {i}"),
                    description: "a general purpose legal agreement".to_string(),
                    aliases: vec!["contract".to_string()],
                },
            )]),
            keywords: vec!["legal".to_string(), "agreement".to_string()],
            category: "Contracts".to_string(),
            ..Default::default()
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("build runtime");

    let config = RankerConfig {
        encoder: EncoderConfig::stub(),
        ..Default::default()
    };
    let ranker = SemanticRanker::new(config);
    let docs = synthetic_catalog(500);

    // Warm the index so the loop measures query embedding + scoring.
    rt.block_on(ranker.rank("agreement", Locale::En, &docs));

    c.bench_function("rank_500_docs_stub", |b| {
        b.iter(|| {
            rt.block_on(ranker.rank(
                black_box("vehicle purchase agreement"),
                Locale::En,
                black_box(&docs),
            ))
        })
    });
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
