//! Embedding providers against mock embedding services

use promptforge_config::{EmbeddingConfig, EmbeddingProviderType};
use promptforge_core::{EmbeddingError, EmbeddingProvider};
use promptforge_llm::{create_provider, OllamaEmbeddings, OpenAIEmbeddings};
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_config(server: &MockServer) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: EmbeddingProviderType::OpenAI,
        model: "all-mpnet-base-v2".to_string(),
        endpoint: format!("{}/v1", server.uri()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_openai_compatible_embedding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_partial_json(json!({
            "model": "all-mpnet-base-v2",
            "input": "Translate hello to French",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3] }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAIEmbeddings::new(&openai_config(&server)).unwrap();
    let vector = provider.embed("Translate hello to French").await.unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_configured_dimension_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [1.0, 0.0] }],
        })))
        .mount(&server)
        .await;

    let config = EmbeddingConfig {
        dimensions: Some(768),
        ..openai_config(&server)
    };
    let err = OpenAIEmbeddings::new(&config)
        .unwrap()
        .embed("x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 768,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn test_http_failure_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = OpenAIEmbeddings::new(&openai_config(&server))
        .unwrap()
        .embed("x")
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::HttpError(_)));
}

#[tokio::test]
#[serial]
async fn test_api_key_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer emb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [1.0] }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("PROMPTFORGE_TEST_EMBED_KEY", "emb-key");
    let config = EmbeddingConfig {
        api_key_env: Some("PROMPTFORGE_TEST_EMBED_KEY".to_string()),
        ..openai_config(&server)
    };
    let provider = create_provider(&config);
    std::env::remove_var("PROMPTFORGE_TEST_EMBED_KEY");

    assert_eq!(provider.unwrap().embed("x").await.unwrap(), vec![1.0]);
}

#[test]
#[serial]
fn test_missing_embedding_key_is_config_error() {
    std::env::remove_var("PROMPTFORGE_TEST_EMBED_KEY");
    let config = EmbeddingConfig {
        api_key_env: Some("PROMPTFORGE_TEST_EMBED_KEY".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        create_provider(&config),
        Err(EmbeddingError::ConfigError(_))
    ));
}

#[tokio::test]
async fn test_ollama_embedding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .and(body_partial_json(json!({ "model": "nomic-embed-text", "input": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "nomic-embed-text",
            "embeddings": [[0.5, 0.5]],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        OllamaEmbeddings::new(&EmbeddingConfig::ollama(Some(server.uri()), None)).unwrap();
    assert_eq!(provider.embed("hi").await.unwrap(), vec![0.5, 0.5]);
    assert_eq!(provider.model_name(), "nomic-embed-text");
}
