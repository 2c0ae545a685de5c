//! HTTP provider clients exercised against a mock server

use httpmock::prelude::*;
use serde_json::json;

use docubot::config::{OpenAiConfig, PineconeConfig};
use docubot::error::Error;
use docubot::providers::{
    Captioner, ChatModel, Embedder, OpenAiClient, PineconeIndex, VectorIndex,
};
use docubot::types::{RecordMetadata, VectorRecord};

fn openai_config(base_url: &str, dimensions: usize) -> OpenAiConfig {
    OpenAiConfig {
        api_key: "test-key".to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
        dimensions,
        ..OpenAiConfig::default()
    }
}

fn pinecone_config(host: &str) -> PineconeConfig {
    PineconeConfig {
        api_key: "pc-key".to_string(),
        host: host.to_string(),
        index_name: "docs".to_string(),
        timeout_secs: 5,
    }
}

fn record(id: &str, values: Vec<f32>) -> VectorRecord {
    VectorRecord {
        id: id.to_string(),
        values,
        metadata: RecordMetadata {
            source: "a.txt".to_string(),
            text: "chunk text".to_string(),
        },
    }
}

#[tokio::test]
async fn test_embed_batch_preserves_input_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/embeddings")
                .header("authorization", "Bearer test-key");
            // Deliberately out of order; the client must sort by index
            then.status(200).json_body(json!({
                "data": [
                    {"index": 1, "embedding": [0.0, 1.0]},
                    {"index": 0, "embedding": [1.0, 0.0]},
                ],
                "model": "text-embedding-ada-002",
            }));
        })
        .await;

    let client = OpenAiClient::new(&openai_config(&server.base_url(), 2)).unwrap();
    let embeddings = client
        .embed_batch(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn test_embed_dimension_mismatch_fails_fast() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200).json_body(json!({
                "data": [{"index": 0, "embedding": [1.0, 0.0]}],
            }));
        })
        .await;

    // Config expects 1536 dims; the model returned 2
    let client = OpenAiClient::new(&openai_config(&server.base_url(), 1536)).unwrap();
    let result = client.embed("text").await;
    assert!(matches!(result, Err(Error::Embedding(_))));
}

#[tokio::test]
async fn test_caption_sends_image_and_returns_description() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("Describe the image")
                .body_contains("data:image/png;base64,");
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "A red square."}}
                ],
            }));
        })
        .await;

    let client = OpenAiClient::new(&openai_config(&server.base_url(), 2)).unwrap();
    let caption = client.caption(&[1, 2, 3], "image/png").await.unwrap();

    mock.assert_async().await;
    assert_eq!(caption, "A red square.");
}

#[tokio::test]
async fn test_caption_failure_is_a_caption_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        })
        .await;

    let client = OpenAiClient::new(&openai_config(&server.base_url(), 2)).unwrap();
    let result = client.caption(&[1, 2, 3], "image/jpeg").await;
    assert!(matches!(result, Err(Error::Caption(_))));
}

#[tokio::test]
async fn test_chat_completion_returns_first_choice() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Grounded answer."}}
                ],
            }));
        })
        .await;

    let client = OpenAiClient::new(&openai_config(&server.base_url(), 2)).unwrap();
    let answer = client.complete("prompt").await.unwrap();
    assert_eq!(answer, "Grounded answer.");
}

#[tokio::test]
async fn test_pinecone_upsert_posts_vectors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/vectors/upsert")
                .header("api-key", "pc-key")
                .body_contains("doc_0")
                .body_contains("chunk text");
            then.status(200).json_body(json!({"upsertedCount": 1}));
        })
        .await;

    let index = PineconeIndex::new(&pinecone_config(&server.base_url())).unwrap();
    index
        .upsert(&[record("doc_0", vec![0.1, 0.2])])
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_pinecone_upsert_skips_network_for_empty_batch() {
    // No mock registered: any request would fail the test via the error path
    let index = PineconeIndex::new(&pinecone_config("https://unreachable.invalid")).unwrap();
    index.upsert(&[]).await.unwrap();
}

#[tokio::test]
async fn test_pinecone_query_maps_matches() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query").body_contains("\"topK\":2");
            then.status(200).json_body(json!({
                "matches": [
                    {
                        "id": "doc_1",
                        "score": 0.92,
                        "metadata": {"source": "a.txt", "text": "most similar"}
                    },
                    {
                        "id": "doc_4",
                        "score": 0.81,
                        "metadata": {"source": "b.pdf", "text": "second"}
                    }
                ],
            }));
        })
        .await;

    let index = PineconeIndex::new(&pinecone_config(&server.base_url())).unwrap();
    let matches = index.query(&[0.5, 0.5], 2).await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "doc_1");
    assert_eq!(matches[0].metadata.text, "most similar");
    assert!(matches[0].score > matches[1].score);
}

#[tokio::test]
async fn test_pinecone_query_empty_index_returns_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(200).json_body(json!({"matches": []}));
        })
        .await;

    let index = PineconeIndex::new(&pinecone_config(&server.base_url())).unwrap();
    let matches = index.query(&[0.5, 0.5], 5).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_pinecone_clear_all_sends_delete_all() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/vectors/delete")
                .body_contains("\"deleteAll\":true");
            then.status(200).json_body(json!({}));
        })
        .await;

    let index = PineconeIndex::new(&pinecone_config(&server.base_url())).unwrap();
    index.clear_all().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pinecone_remote_failure_is_an_index_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/vectors/upsert");
            then.status(401).body("unauthorized");
        })
        .await;

    let index = PineconeIndex::new(&pinecone_config(&server.base_url())).unwrap();
    let result = index.upsert(&[record("doc_0", vec![0.1])]).await;
    assert!(matches!(result, Err(Error::Index(_))));
}
