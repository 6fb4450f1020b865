//! Dispatcher behavior against stub providers: validation, routing,
//! normalization and failure classification.

mod support;

use serde_json::{Value, json};
use textgen::core::dispatcher::normalize;
use textgen::core::error::DispatchError;
use textgen::core::generation::{GenerationRequest, TokenUsage};
use textgen::providers::ProviderId;

use support::{StubProvider, deepseek_shape, dispatcher, gemini_shape};

// ---------- Helpers ----------

fn request(prompt: &str, provider: Option<&str>) -> GenerationRequest {
    GenerationRequest {
        prompt: prompt.to_string(),
        temperature: 0.7,
        max_tokens: 150,
        provider: provider.map(str::to_string),
    }
}

fn deepseek_fixture() -> Value {
    json!({
        "choices": [{"message": {"content": "Hi there"}}],
        "usage": {"prompt_tokens": 2, "completion_tokens": 3, "total_tokens": 5}
    })
}

fn gemini_fixture() -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Hello from "}, {"text": "Gemini"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 6, "totalTokenCount": 10}
    })
}

// ---------- Scenarios ----------

#[tokio::test]
async fn test_scenario_a_deepseek_success() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini.clone(), deepseek.clone());

    let result = dispatcher
        .dispatch(request("Hello", Some("deepseek")))
        .await
        .unwrap();

    assert_eq!(result.text, "Hi there");
    assert_eq!(
        result.usage,
        TokenUsage {
            prompt_tokens: 2,
            completion_tokens: 3,
            total_tokens: 5
        }
    );
    assert_eq!(result.provider_id, ProviderId::DeepSeek);
    assert_eq!(result.model_id, "deepseek-chat");
    assert_eq!(deepseek.calls(), 1);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn test_scenario_b_empty_prompt_invokes_nothing() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini.clone(), deepseek.clone());

    let err = dispatcher.dispatch(request("", None)).await.unwrap_err();

    assert!(matches!(err, DispatchError::Validation(_)));
    assert_eq!(gemini.calls(), 0);
    assert_eq!(deepseek.calls(), 0);
}

#[tokio::test]
async fn test_scenario_c_api_key_wins_over_rate_limit() {
    let gemini = StubProvider::failing(
        ProviderId::Gemini,
        gemini_shape(),
        "Rate limit exceeded for this API key",
    );
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini, deepseek);

    let err = dispatcher.dispatch(request("Hello", None)).await.unwrap_err();

    assert_eq!(
        err,
        DispatchError::Auth("Rate limit exceeded for this API key".to_string())
    );
    assert_eq!(err.user_message(), "Invalid API key");
}

// ---------- Properties ----------

#[tokio::test]
async fn test_blank_prompts_fail_validation_regardless_of_other_fields() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini.clone(), deepseek.clone());

    let prompts = ["", " ", "\t\n", "   \r\n  "];
    let providers = [None, Some("gemini"), Some("deepseek"), Some("nope")];
    let params = [(0.0, 1), (0.7, 150), (5.0, -3)];

    for prompt in prompts {
        for provider in providers {
            for (temperature, max_tokens) in params {
                let req = GenerationRequest {
                    prompt: prompt.to_string(),
                    temperature,
                    max_tokens,
                    provider: provider.map(str::to_string),
                };
                let err = dispatcher.dispatch(req).await.unwrap_err();
                assert!(
                    matches!(err, DispatchError::Validation(_)),
                    "prompt {:?} with provider {:?} should fail validation",
                    prompt,
                    provider
                );
            }
        }
    }

    assert_eq!(gemini.calls(), 0);
    assert_eq!(deepseek.calls(), 0);
}

#[tokio::test]
async fn test_unknown_or_absent_provider_falls_back_to_gemini() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini.clone(), deepseek.clone());

    for provider in [None, Some("openai"), Some("DEEPSEEK"), Some("")] {
        let result = dispatcher
            .dispatch(request("Hello", provider))
            .await
            .unwrap();
        assert_eq!(result.provider_id, ProviderId::Gemini);
        assert_eq!(result.model_id, "gemini-1.5-flash");
        assert_eq!(result.text, "Hello from Gemini");
    }

    assert_eq!(gemini.calls(), 4);
    assert_eq!(deepseek.calls(), 0);
}

#[tokio::test]
async fn test_parameters_forwarded_unchanged() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek =
        StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
    let dispatcher = dispatcher(gemini, deepseek.clone());

    let req = GenerationRequest {
        prompt: "  padded prompt  ".to_string(),
        temperature: 1.9,
        max_tokens: 0,
        provider: Some("deepseek".to_string()),
    };
    dispatcher.dispatch(req).await.unwrap();

    assert_eq!(
        deepseek.last_call(),
        Some(("  padded prompt  ".to_string(), 1.9, 0))
    );
}

#[tokio::test]
async fn test_missing_usage_reports_zeros() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), gemini_fixture());
    let deepseek = StubProvider::replying(
        ProviderId::DeepSeek,
        deepseek_shape(),
        json!({"choices": [{"message": {"content": "no usage here"}}]}),
    );
    let dispatcher = dispatcher(gemini, deepseek);

    let result = dispatcher
        .dispatch(request("Hello", Some("deepseek")))
        .await
        .unwrap();
    assert_eq!(result.text, "no usage here");
    assert_eq!(result.usage, TokenUsage::default());

    // Gemini never reports usage, even when the reply carries usageMetadata
    let result = dispatcher
        .dispatch(request("Hello", Some("gemini")))
        .await
        .unwrap();
    assert_eq!(result.usage, TokenUsage::default());
}

#[tokio::test]
async fn test_missing_text_is_empty_not_an_error() {
    let gemini = StubProvider::replying(ProviderId::Gemini, gemini_shape(), json!({}));
    let deepseek = StubProvider::replying(
        ProviderId::DeepSeek,
        deepseek_shape(),
        json!({"choices": [], "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}}),
    );
    let dispatcher = dispatcher(gemini, deepseek);

    let result = dispatcher.dispatch(request("Hello", None)).await.unwrap();
    assert_eq!(result.text, "");

    let result = dispatcher
        .dispatch(request("Hello", Some("deepseek")))
        .await
        .unwrap();
    assert_eq!(result.text, "");
    assert_eq!(result.usage.total_tokens, 1);
}

#[tokio::test]
async fn test_failure_categories() {
    let cases = [
        ("API key not valid. Please pass a valid API key.", "auth"),
        ("You exceeded your current QUOTA", "rate"),
        ("Rate limit reached", "rate"),
        ("quota and api key both mentioned", "auth"),
        ("Model is overloaded", "generation"),
    ];

    for (message, expected) in cases {
        let gemini = StubProvider::failing(ProviderId::Gemini, gemini_shape(), message);
        let deepseek =
            StubProvider::replying(ProviderId::DeepSeek, deepseek_shape(), deepseek_fixture());
        let err = dispatcher(gemini, deepseek)
            .dispatch(request("Hello", None))
            .await
            .unwrap_err();

        let category = match &err {
            DispatchError::Auth(_) => "auth",
            DispatchError::RateLimit(_) => "rate",
            DispatchError::Generation(m) => {
                assert_eq!(m, message, "generation errors keep the upstream text");
                "generation"
            }
            DispatchError::Validation(_) => "validation",
        };
        assert_eq!(category, expected, "message {:?}", message);
    }
}

#[test]
fn test_normalize_is_deterministic_per_provider_fixture() {
    let fixtures = [
        (ProviderId::DeepSeek, deepseek_shape(), "deepseek-chat", deepseek_fixture()),
        (ProviderId::Gemini, gemini_shape(), "gemini-1.5-flash", gemini_fixture()),
    ];

    for (id, shape, model, fixture) in fixtures {
        let first = normalize(&fixture, &shape, model, id);
        for _ in 0..5 {
            assert_eq!(normalize(&fixture, &shape, model, id), first);
        }
    }
}
