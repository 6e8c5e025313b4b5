use super::*;
use std::collections::BTreeMap;

use crate::catalog::TranslationBundle;
use crate::config::RankerConfig;
use crate::embedding::MockEmbedder;

fn doc(id: &str, name: &str, description: &str) -> DocumentDescriptor {
    DocumentDescriptor {
        id: id.to_string(),
        translations: BTreeMap::from([(
            Locale::En,
            TranslationBundle {
                name: name.to_string(),
                description: description.to_string(),
                ..Default::default()
            },
        )]),
        ..Default::default()
    }
}

fn stub_config() -> RankerConfig {
    RankerConfig {
        encoder: crate::embedding::EncoderConfig::stub(),
        ..Default::default()
    }
}

/// Embedder that reads the trailing integer out of a descriptor text (the
/// id segment comes last) and maps document `i` to an angle `0.005 * i`
/// from the query direction, so scores decrease with `i`. Texts without a
/// digit (queries) map to the reference axis.
fn angled_embedder() -> MockEmbedder {
    MockEmbedder::new(2, |text| {
        let number = text
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .next_back()
            .and_then(|s| s.parse::<u32>().ok());
        match number {
            Some(i) => {
                let theta = i as f32 * 0.005;
                vec![theta.cos(), theta.sin()]
            }
            None => vec![1.0, 0.0],
        }
    })
}

fn numbered_catalog(count: usize) -> Vec<DocumentDescriptor> {
    (0..count)
        .map(|i| doc(&format!("doc-{i}"), "Agreement", "a legal agreement"))
        .collect()
}

#[tokio::test]
async fn test_blank_query_short_circuits() {
    let embedder = std::sync::Arc::new(angled_embedder());
    let ranker = SemanticRanker::with_embedder(embedder.clone(), stub_config());

    let hits = ranker.rank("   \t ", Locale::En, &numbered_catalog(3)).await;

    assert!(hits.is_empty());
    // No index build, no query embedding.
    assert_eq!(embedder.batch_calls(), 0);
}

#[tokio::test]
async fn test_unavailable_backend_returns_nothing() {
    let provider = Arc::new(EmbedderProvider::unavailable());
    let ranker = SemanticRanker::with_provider(provider, stub_config());

    let hits = ranker
        .rank("power of attorney", Locale::En, &numbered_catalog(5))
        .await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_results_sorted_thresholded_and_capped() {
    let ranker =
        SemanticRanker::with_embedder(std::sync::Arc::new(angled_embedder()), stub_config());
    let docs = numbered_catalog(20);

    let hits = ranker.rank_top("legal paperwork", Locale::En, &docs, 5).await;

    assert_eq!(hits.len(), 5);
    let ids: Vec<&str> = hits.iter().map(|hit| hit.doc_id.as_str()).collect();
    assert_eq!(ids, ["doc-0", "doc-1", "doc-2", "doc-3", "doc-4"]);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for hit in &hits {
        assert!(hit.score > 0.05 && hit.score <= 1.0);
    }
}

#[tokio::test]
async fn test_relevance_floor_is_strict() {
    // One document exactly at the floor, one orthogonal, one clearly above.
    let embedder = MockEmbedder::new(2, |text| {
        if text.contains("at floor") {
            vec![0.05, (1.0f32 - 0.05 * 0.05).sqrt()]
        } else if text.contains("orthogonal") {
            vec![0.0, 1.0]
        } else if text.contains("relevant") {
            vec![0.9, (1.0f32 - 0.81).sqrt()]
        } else {
            vec![1.0, 0.0]
        }
    });
    let ranker = SemanticRanker::with_embedder(std::sync::Arc::new(embedder), stub_config());
    let docs = vec![
        doc("a", "First", "at floor"),
        doc("b", "Second", "orthogonal"),
        doc("c", "Third", "relevant"),
    ];

    let hits = ranker.rank("query", Locale::En, &docs).await;

    let ids: Vec<&str> = hits.iter().map(|hit| hit.doc_id.as_str()).collect();
    assert_eq!(ids, ["c"], "score == floor must be discarded");
}

#[tokio::test]
async fn test_scores_clamped_to_unit_interval() {
    // Deliberately un-normalized document vector: dot product is 2.0.
    let embedder = MockEmbedder::new(2, |text| {
        if text.contains("oversized") {
            vec![2.0, 0.0]
        } else {
            vec![1.0, 0.0]
        }
    });
    let ranker = SemanticRanker::with_embedder(std::sync::Arc::new(embedder), stub_config());
    let docs = vec![doc("big", "Oversized", "oversized")];

    let hits = ranker.rank("query", Locale::En, &docs).await;

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 1.0);
}

#[tokio::test]
async fn test_non_finite_scores_become_zero_and_drop_out() {
    let embedder = MockEmbedder::new(2, |text| {
        if text.contains("broken") {
            vec![f32::NAN, 0.0]
        } else {
            vec![1.0, 0.0]
        }
    });
    let ranker = SemanticRanker::with_embedder(std::sync::Arc::new(embedder), stub_config());
    let docs = vec![doc("bad", "Broken", "broken"), doc("ok", "Fine", "fine")];

    let hits = ranker.rank("query", Locale::En, &docs).await;

    let ids: Vec<&str> = hits.iter().map(|hit| hit.doc_id.as_str()).collect();
    assert_eq!(ids, ["ok"]);
}

#[tokio::test]
async fn test_default_limit_comes_from_config() {
    let config = RankerConfig {
        encoder: crate::embedding::EncoderConfig::stub(),
        result_limit: 3,
        ..Default::default()
    };
    let ranker = SemanticRanker::with_embedder(std::sync::Arc::new(angled_embedder()), config);

    let hits = ranker
        .rank("legal paperwork", Locale::En, &numbered_catalog(10))
        .await;
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn test_query_embedding_failure_degrades_to_empty() {
    let ranker = SemanticRanker::with_embedder(
        std::sync::Arc::new(MockEmbedder::failing(4)),
        stub_config(),
    );
    let hits = ranker.rank("query", Locale::En, &numbered_catalog(2)).await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_bill_of_sale_outranks_power_of_attorney() {
    let embedder = MockEmbedder::keyed(4, vec![("car", 0), ("vehicle", 0), ("attorney", 1)]);
    let ranker = SemanticRanker::with_embedder(std::sync::Arc::new(embedder), stub_config());
    let docs = vec![
        doc("poa", "Power of Attorney", "authorize someone to act for you"),
        doc("bos", "Vehicle Bill of Sale", "transfer ownership of a vehicle"),
    ];

    let hits = ranker.rank("selling my car", Locale::En, &docs).await;

    assert_eq!(hits[0].doc_id, "bos");
    // "poa" scores zero against the query axis and falls at the floor.
    assert!(hits.iter().all(|hit| hit.doc_id != "poa"));
}

#[test]
fn test_similarity_dot_product() {
    assert_eq!(similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    assert_eq!(similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    assert_eq!(similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
}

#[test]
fn test_similarity_clamps_and_zeroes_non_finite() {
    assert_eq!(similarity(&[2.0, 0.0], &[2.0, 0.0]), 1.0);
    assert_eq!(similarity(&[f32::INFINITY], &[1.0]), 0.0);
    assert_eq!(similarity(&[f32::NAN], &[1.0]), 0.0);
}
