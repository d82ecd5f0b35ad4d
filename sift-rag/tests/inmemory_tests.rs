//! Tests for the in-memory vector store.

use std::collections::HashMap;

use proptest::prelude::*;
use sift_rag::document::{Chunk, Query};
use sift_rag::error::RagError;
use sift_rag::inmemory::InMemoryVectorStore;
use sift_rag::vectorstore::VectorStore;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim))
        .prop_map(|(id, text, embedding)| Chunk::new(id, text, embedding))
}

/// *For any* set of chunks stored in an InMemoryVectorStore, searching with a
/// query embedding returns results ordered by ascending cosine distance, with
/// at most `limit` results and ranks numbered from zero.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_ascending_and_bounded_by_limit(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            limit in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.create_collection("test", DIM).await.unwrap();

                // Upsert replaces by id, so count distinct ids.
                let unique: HashMap<&str, ()> = chunks.iter().map(|c| (c.id.as_str(), ())).collect();
                let count = unique.len();

                store.upsert("test", &chunks).await.unwrap();
                let results = store.search("test", &Query::new(query), limit).await.unwrap();
                (results, count)
            });

            prop_assert!(results.len() <= limit);
            prop_assert_eq!(results.len(), limit.min(unique_count));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "results not in ascending order: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
            }
            for (i, r) in results.iter().enumerate() {
                prop_assert_eq!(r.rank, i);
            }
        }
    }
}

async fn seeded_store() -> InMemoryVectorStore {
    let store = InMemoryVectorStore::new();
    store.create_collection("policies", 2).await.unwrap();
    store
        .upsert(
            "policies",
            &[
                Chunk::new("leave", "Annual leave policy", vec![1.0, 0.0])
                    .with_metadata("source", "hr.pdf"),
                Chunk::new("vpn", "VPN setup guide", vec![0.0, 1.0]).with_metadata("source", "it.pdf"),
                Chunk::new("sick", "Sick leave policy", vec![0.9, 0.1])
                    .with_metadata("source", "hr.pdf"),
            ],
        )
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn search_applies_metadata_filter() {
    let store = seeded_store().await;
    let query = Query::new(vec![1.0, 0.0]).with_filter("source", "it.pdf");
    let results = store.search("policies", &query, 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.id, "vpn");
    assert_eq!(results[0].rank, 0);
}

#[tokio::test]
async fn upsert_replaces_in_place_and_delete_removes() {
    let store = seeded_store().await;
    store
        .upsert("policies", &[Chunk::new("vpn", "VPN setup guide v2", vec![1.0, 0.0])])
        .await
        .unwrap();
    assert_eq!(store.count("policies").await.unwrap(), 3);

    // "leave" and "vpn" now tie at distance 0; insertion order decides.
    let results = store.search("policies", &Query::new(vec![1.0, 0.0]), 2).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["leave", "vpn"]);
    assert_eq!(results[1].chunk.text, "VPN setup guide v2");

    store.delete("policies", &["leave", "sick"]).await.unwrap();
    assert_eq!(store.count("policies").await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_rejects_wrong_dimensionality() {
    let store = seeded_store().await;
    let err = store
        .upsert("policies", &[Chunk::new("bad", "", vec![1.0, 0.0, 0.0])])
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    assert_eq!(store.count("policies").await.unwrap(), 3);
}

#[tokio::test]
async fn search_rejects_wrong_query_dimensionality() {
    let store = seeded_store().await;
    let err = store.search("policies", &Query::new(vec![1.0]), 3).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 1 }));
}

#[tokio::test]
async fn unknown_collection_is_a_store_error() {
    let store = InMemoryVectorStore::new();
    let err = store.count("missing").await.unwrap_err();
    assert!(matches!(err, RagError::VectorStoreError { .. }));

    store.create_collection("tmp", 2).await.unwrap();
    store.delete_collection("tmp").await.unwrap();
    assert!(store.search("tmp", &Query::new(vec![1.0, 0.0]), 1).await.is_err());
}
