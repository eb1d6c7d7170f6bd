//! Integration tests for the inference client and the hosted-model scorers
//! using wiremock HTTP mocks.

use std::time::Duration;

use vidbias_analysis::{
    BiasScorer, CommentaryClient, HfBiasScorer, HfSentimentScorer, InferenceClient,
    InferenceError, SentimentScorer, TranscriptChunk,
};
use vidbias_core::{SentimentLabel, DISTRIBUTION_EPSILON};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, max_retries: u32) -> InferenceClient {
    InferenceClient::new(base_url, Some("hf-test-token"), 5, max_retries, 1)
        .expect("client construction should not fail")
}

fn chunk(text: &str) -> TranscriptChunk {
    TranscriptChunk {
        index: 0,
        text: text.to_string(),
        token_count: text.split_whitespace().count(),
    }
}

#[tokio::test]
async fn classify_posts_inputs_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sentiment-model"))
        .and(header("authorization", "Bearer hf-test-token"))
        .and(body_partial_json(serde_json::json!({
            "inputs": "the vote passed",
            "options": { "wait_for_model": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            [{ "label": "POSITIVE", "score": 0.91 }, { "label": "NEGATIVE", "score": 0.09 }]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let labels = test_client(&server.uri(), 0)
        .classify("sentiment-model", "the vote passed")
        .await
        .expect("should classify");

    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].label, "POSITIVE");
}

#[tokio::test]
async fn non_success_status_is_not_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/m"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!([{ "label": "POSITIVE", "score": 1.0 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri(), 3)
        .classify("m", "text")
        .await
        .unwrap_err();

    assert!(
        matches!(err, InferenceError::Status { status: 400, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn model_loading_503_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/m"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/m"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "label": "NEUTRAL", "score": 0.7 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let labels = test_client(&server.uri(), 2)
        .classify("m", "text")
        .await
        .expect("second attempt should succeed");
    assert_eq!(labels[0].label, "NEUTRAL");
}

#[tokio::test]
async fn malformed_payload_is_an_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/m"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "unexpected" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri(), 2)
        .classify("m", "text")
        .await
        .unwrap_err();
    assert!(matches!(err, InferenceError::MalformedResponse { .. }));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/m"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(serde_json::json!([{ "label": "NEUTRAL", "score": 0.7 }])),
        )
        .mount(&server)
        .await;

    let client =
        InferenceClient::with_timeout(&server.uri(), None, Duration::from_millis(200), 0, 1)
            .expect("client construction should not fail");
    let err = client.classify("m", "text").await.unwrap_err();

    assert!(
        matches!(err, InferenceError::Timeout { timeout_ms: 200, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn sentiment_scorer_picks_top_label() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "NEGATIVE", "score": 0.8 },
            { "label": "POSITIVE", "score": 0.2 }
        ])))
        .mount(&server)
        .await;

    let scorer = HfSentimentScorer::new(test_client(&server.uri(), 0), "sst2");
    let result = scorer.score(&chunk("a grim forecast")).await.expect("should score");

    assert_eq!(result.label, SentimentLabel::Negative);
    assert!((result.confidence - 0.8).abs() < 1e-12);
}

#[tokio::test]
async fn bias_scorer_combines_both_models_and_normalizes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/org/ideology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[
            { "label": "LABEL_0", "score": 0.6 },
            { "label": "LABEL_1", "score": 0.3 },
            { "label": "LABEL_2", "score": 0.2 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/org/bias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "Biased", "score": 0.75 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let scorer = HfBiasScorer::new(test_client(&server.uri(), 0), "org/ideology", "org/bias");
    let v = scorer.score("some transcript").await.expect("should score");

    assert!((v.left - 0.545).abs() < 1e-3);
    assert!((v.center - 0.273).abs() < 1e-3);
    assert!((v.right - 0.182).abs() < 1e-3);
    assert!((v.biased - 0.75).abs() < 1e-9);
    assert!((v.neutral - 0.25).abs() < 1e-9);
    assert!(v.is_distribution(DISTRIBUTION_EPSILON));
}

#[tokio::test]
async fn bias_scorer_fails_if_either_model_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ideology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "LEFT", "score": 1.0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bias"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scorer = HfBiasScorer::new(test_client(&server.uri(), 0), "ideology", "bias");
    let err = scorer.score("text").await.unwrap_err();
    assert!(matches!(err, InferenceError::Status { status: 404, .. }));
}

#[tokio::test]
async fn commentary_returns_generated_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/google/flan-t5-small"))
        .and(body_partial_json(serde_json::json!({
            "parameters": { "temperature": 0.7 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "generated_text": "  A news report with a neutral tone.  " }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let commentary = CommentaryClient::new(test_client(&server.uri(), 0), "google/flan-t5-small");
    let text = commentary
        .summarize("the council approved the budget")
        .await
        .expect("should summarize");
    assert_eq!(text, "A news report with a neutral tone.");
}
