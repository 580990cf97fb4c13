/*!
 * Tests for the provider implementations
 */

use serde_json::json;
use std::sync::Arc;

use overlay_translator::ProviderError;
use overlay_translator::providers::google::parse_response;
use overlay_translator::providers::ollama::{GenerationRequest, build_prompt};
use overlay_translator::providers::{Google, MockProvider, Ollama, Provider, ProviderKind};

/// Every provider resolves canonical codes through its own table or names
#[test]
fn test_providerCode_withSupportedLanguages_shouldMapPerBackend() {
    let google = Google::new("https://translate.googleapis.com/translate_a/single", 5);
    let ollama = Ollama::new_with_config("localhost", "llama3", 5, 0, 100);
    let mock = MockProvider::working();

    assert_eq!(google.provider_code("zht").unwrap(), "zh-tw");
    assert_eq!(google.provider_code("kor").unwrap(), "ko");
    assert_eq!(ollama.provider_code("jpn").unwrap(), "Japanese");
    assert_eq!(mock.provider_code("ukr").unwrap(), "uk");
}

#[test]
fn test_providerCode_withUnsupportedLanguage_shouldFailClosed() {
    let mock = MockProvider::working();
    match mock.provider_code("kor") {
        Err(ProviderError::UnsupportedLanguage { provider, code }) => {
            assert_eq!(provider, "mock");
            assert_eq!(code, "kor");
        }
        other => panic!("expected UnsupportedLanguage, got {:?}", other),
    }

    let google = Google::new("https://translate.googleapis.com/translate_a/single", 5);
    assert!(google.provider_code("tlh").is_err());
}

#[test]
fn test_providers_behindTraitObject_shouldReportKind() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(Ollama::new_with_config("localhost", "llama3", 5, 0, 100)),
        Arc::new(Google::new("https://translate.googleapis.com/translate_a/single", 5)),
        Arc::new(MockProvider::echo()),
    ];

    let kinds: Vec<ProviderKind> = providers.iter().map(|p| p.kind()).collect();
    assert_eq!(kinds, vec![ProviderKind::Ollama, ProviderKind::Google, ProviderKind::Mock]);
}

#[test]
fn test_ollama_baseUrl_shouldGetSchemeAndPort() {
    assert_eq!(Ollama::new_with_config("localhost", "m", 5, 0, 0).base_url(), "http://localhost:11434");
    assert_eq!(
        Ollama::new_with_config("https://gpu-box:8080/", "m", 5, 0, 0).base_url(),
        "https://gpu-box:8080"
    );
}

#[test]
fn test_generationRequest_shouldSerializeOnlySetFields() {
    let request = GenerationRequest::new("llama3", build_prompt("Hello.", "English", "Russian"))
        .temperature(0.1)
        .no_stream();

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["model"], "llama3");
    assert_eq!(value["stream"], false);
    assert!(value.get("system").is_none());
    assert!(value["prompt"].as_str().unwrap().contains("English text to Russian"));
    assert!(value["prompt"].as_str().unwrap().ends_with("Hello."));
}

#[test]
fn test_parseResponse_withSegments_shouldConcatenate() {
    let body = json!([[["Привет. ", "Hello. ", null], ["Как дела?", "How are you?", null]], null, "en"]);
    assert_eq!(parse_response(&body).unwrap(), "Привет. Как дела?");
}

#[test]
fn test_parseResponse_withUnexpectedShape_shouldBeParseError() {
    assert!(matches!(parse_response(&json!({"error": 1})), Err(ProviderError::ParseError(_))));
    assert!(matches!(parse_response(&json!([[]])), Err(ProviderError::ParseError(_))));
}

#[test]
fn test_mockProvider_clones_shouldShareRequestCount() {
    let provider = MockProvider::working();
    let clone = provider.clone();

    tokio_test::block_on(async {
        clone.translate("One.", "en", "ru").await.unwrap();
        provider.translate("Two.", "en", "ru").await.unwrap();
    });

    assert_eq!(provider.request_count(), 2);
    assert_eq!(clone.request_count(), 2);
}

#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNthCall() {
    let provider = MockProvider::intermittent(3);
    let mut failures = Vec::new();
    for i in 0..6 {
        if provider.translate("Hi.", "en", "ru").await.is_err() {
            failures.push(i);
        }
    }
    assert_eq!(failures, vec![2, 5]);
}

#[tokio::test]
async fn test_ollama_withUnreachableServer_shouldReturnConnectionError() {
    // Port 9 (discard) is closed on test machines
    let ollama = Ollama::new_with_config("http://127.0.0.1:9", "llama3", 2, 0, 10);
    let result = ollama.translate("Hello.", "English", "Russian").await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

/// Requires a running Ollama server
#[tokio::test]
#[ignore]
async fn test_ollama_withLocalServer_shouldTranslate() {
    let ollama = Ollama::new_with_config("localhost", "llama3", 60, 1, 500);
    if ollama.test_connection().await.is_err() {
        return;
    }
    let text = ollama.translate("Good morning.", "English", "Russian").await.unwrap();
    assert!(!text.trim().is_empty());
}

/// Requires network access
#[tokio::test]
#[ignore]
async fn test_google_withNetwork_shouldTranslate() {
    let google = Google::new("https://translate.googleapis.com/translate_a/single", 10);
    let text = google.translate("Good morning.", "en", "ru").await.unwrap();
    assert!(!text.is_empty());
}
