//! End-to-end tests for the retriever with a deterministic embedder.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sift_rag::{
    Document, EmbeddingProvider, InMemoryVectorStore, KeywordBoostReranker, MetadataFilter,
    MetadataValue, RagError, RetrievalConfig, Retriever, SearchType,
};

const TOPICS: [&str; 3] = ["leave", "vpn", "expense"];

/// Embeds text as keyword counts over [`TOPICS`], plus a small constant so no
/// vector is ever zero.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> sift_rag::Result<Vec<f32>> {
        let text = text.to_lowercase();
        Ok(TOPICS.iter().map(|t| text.matches(t).count() as f32 + 0.1).collect())
    }

    fn dimensions(&self) -> usize {
        TOPICS.len()
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Always returns a vector of the wrong length.
struct BrokenEmbedder;

#[async_trait]
impl EmbeddingProvider for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> sift_rag::Result<Vec<f32>> {
        Ok(vec![1.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Fails every call.
struct OfflineEmbedder;

#[async_trait]
impl EmbeddingProvider for OfflineEmbedder {
    async fn embed(&self, _text: &str) -> sift_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError {
            provider: "offline".to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        3
    }
}

fn doc(id: &str, text: &str, source: &str) -> Document {
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), MetadataValue::from(source));
    Document { id: id.to_string(), text: text.to_string(), metadata }
}

fn corpus() -> Vec<Document> {
    vec![
        doc("leave-1", "Annual leave: staff accrue leave monthly", "hr.pdf"),
        doc("leave-2", "Leave requests: submit leave two weeks ahead", "hr.pdf"),
        doc("vpn-1", "Connect to the VPN before accessing internal tools", "it.pdf"),
        doc("expense-1", "Expense claims need receipts; leave travel expense separate", "finance.pdf"),
    ]
}

async fn retriever_with(config: RetrievalConfig) -> Retriever {
    let retriever = Retriever::builder()
        .config(config)
        .embedding_provider(Arc::new(KeywordEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    retriever.create_collection("policies").await.unwrap();
    retriever.ingest("policies", &corpus()).await.unwrap();
    retriever
}

fn ids(results: &[sift_rag::ScoredResult]) -> Vec<&str> {
    results.iter().map(|r| r.chunk.id.as_str()).collect()
}

#[tokio::test]
async fn ingest_stores_one_chunk_per_document() {
    let retriever = retriever_with(RetrievalConfig::default()).await;
    assert_eq!(retriever.count("policies").await.unwrap(), 4);
    assert!(retriever.ingest("policies", &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn similarity_retrieval_returns_closest_first() {
    let config = RetrievalConfig::builder().top_k(2).build().unwrap();
    let retriever = retriever_with(config).await;

    let results = retriever.retrieve("policies", "leave", &MetadataFilter::new()).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(ids(&results).iter().all(|id| id.starts_with("leave")));
    assert_eq!(results[0].rank, 0);
    assert_eq!(results[1].rank, 1);
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn filter_restricts_sources() {
    let retriever = retriever_with(RetrievalConfig::default()).await;
    let mut filter = MetadataFilter::new();
    filter.insert("source".to_string(), "it.pdf".into());

    let results = retriever.retrieve("policies", "leave", &filter).await.unwrap();
    assert_eq!(ids(&results), ["vpn-1"]);
}

#[tokio::test]
async fn mmr_retrieval_trades_relevance_for_diversity() {
    let config = RetrievalConfig::builder()
        .search_type(SearchType::Mmr)
        .top_k(2)
        .fetch_k(4)
        .lambda_mult(0.2)
        .build()
        .unwrap();
    let retriever = retriever_with(config).await;

    let results = retriever.retrieve("policies", "leave", &MetadataFilter::new()).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].chunk.id.starts_with("leave"));
    assert!(!results[1].chunk.id.starts_with("leave"), "second pick should differ: {:?}", ids(&results));
}

#[tokio::test]
async fn threshold_drops_distant_results() {
    let config = RetrievalConfig::builder().top_k(4).max_distance(0.2).build().unwrap();
    let retriever = retriever_with(config).await;

    let results = retriever.retrieve("policies", "vpn", &MetadataFilter::new()).await.unwrap();
    assert_eq!(ids(&results), ["vpn-1"]);
}

#[tokio::test]
async fn reranker_output_is_renumbered() {
    let retriever = Retriever::builder()
        .config(RetrievalConfig::builder().top_k(4).build().unwrap())
        .embedding_provider(Arc::new(KeywordEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .reranker(Arc::new(KeywordBoostReranker::new(2.0)))
        .build()
        .unwrap();
    retriever.create_collection("policies").await.unwrap();
    retriever.ingest("policies", &corpus()).await.unwrap();

    let results = retriever.retrieve("policies", "receipts", &MetadataFilter::new()).await.unwrap();
    assert_eq!(results[0].chunk.id, "expense-1");
    assert_eq!(results[0].distance, 0.0);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.rank, i);
    }
}

#[tokio::test]
async fn analyze_summarizes_each_k() {
    let retriever = retriever_with(RetrievalConfig::default()).await;
    let report = retriever.analyze("policies", "leave", &[1, 3, 10]).await.unwrap();

    assert_eq!(report.len(), 3);
    let counts: Vec<usize> = report.iter().map(|(_, s)| s.as_ref().unwrap().count).collect();
    assert_eq!(counts, [1, 3, 4]);
    let last = report[2].1.as_ref().unwrap();
    assert!(last.best_distance <= last.mean_distance);
    assert!(last.mean_distance <= last.worst_distance);

    assert!(matches!(
        retriever.analyze("policies", "leave", &[0]).await,
        Err(RagError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn wrong_embedding_length_is_a_dimension_mismatch() {
    let retriever = Retriever::builder()
        .embedding_provider(Arc::new(BrokenEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    retriever.create_collection("policies").await.unwrap();

    let err = retriever.retrieve("policies", "leave", &MetadataFilter::new()).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 1 }));
}

#[tokio::test]
async fn collaborator_failures_are_pipeline_errors() {
    let retriever = Retriever::builder()
        .embedding_provider(Arc::new(OfflineEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    let err = retriever.retrieve("policies", "leave", &MetadataFilter::new()).await.unwrap_err();
    assert!(matches!(err, RagError::PipelineError(_)));

    let retriever = retriever_with(RetrievalConfig::default()).await;
    let err = retriever.retrieve("missing", "leave", &MetadataFilter::new()).await.unwrap_err();
    assert!(matches!(err, RagError::PipelineError(_)));
}

#[test]
fn builder_requires_collaborators() {
    let err = Retriever::builder().build().err().unwrap();
    assert!(matches!(err, RagError::ConfigError(_)));

    let err = Retriever::builder()
        .embedding_provider(Arc::new(KeywordEmbedder))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RagError::ConfigError(_)));
}
