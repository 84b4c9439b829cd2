/*!
 * Tests for the translation backends
 *
 * HTTP behavior is exercised against a throwaway local server that answers
 * each connection with the next canned response.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use ftbq_localizer::errors::ProviderError;
use ftbq_localizer::providers::deepl::{DeepL, DeepLResponse, DeepLTranslation};
use ftbq_localizer::providers::google::GoogleTranslate;
use ftbq_localizer::providers::{RetryPolicy, Translator};

/// Canned HTTP response
struct CannedResponse {
    status: &'static str,
    body: &'static str,
}

/// Start a local server; returns its base URL and a request counter
async fn serve(responses: Vec<CannedResponse>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = counter.clone();

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            seen.fetch_add(1, Ordering::SeqCst);

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", address), counter)
}

/// Read headers and body so the client never sees a reset
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let Ok(read) = socket.read(&mut chunk).await else {
            return;
        };
        if read == 0 {
            return;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, 1)
}

/// Test the query string sent to Google
#[test]
fn test_google_request_url_withText_shouldQuoteQuery() {
    let google = GoogleTranslate::new("", RetryPolicy::default(), 5);
    let url = google.request_url("Hello world", "ko").unwrap();

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(url.host_str(), Some("translate.googleapis.com"));
    assert!(pairs.contains(&("client".to_string(), "gtx".to_string())));
    assert!(pairs.contains(&("sl".to_string(), "auto".to_string())));
    assert!(pairs.contains(&("tl".to_string(), "ko".to_string())));
    assert!(pairs.contains(&("q".to_string(), "\"Hello world\"".to_string())));
}

/// Test joining Google response segments
#[test]
fn test_google_extract_text_withSegments_shouldJoinAndStripQuotes() {
    let data = serde_json::json!([
        [["\"Bonjour ", "\"Hello ", null, null], ["le monde\"", "world\"", null, null]],
        null,
        "en"
    ]);

    assert_eq!(GoogleTranslate::extract_text(&data).unwrap(), "Bonjour le monde");
    assert!(GoogleTranslate::extract_text(&serde_json::json!({})).is_err());
}

/// Test DeepL language code conversion
#[test]
fn test_deepl_target_code_withRegionalChinese_shouldMapToZh() {
    assert_eq!(DeepL::target_code("ko"), "KO");
    assert_eq!(DeepL::target_code("zh-TW"), "ZH");
    assert_eq!(DeepL::target_code("pt-BR"), "PT-BR");
}

/// Test DeepL endpoint selection from the key
#[test]
fn test_deepl_new_withFreeKey_shouldUseFreeEndpoint() {
    let free = DeepL::new("abc:fx", "", RetryPolicy::default(), 5);
    let pro = DeepL::new("abc", "", RetryPolicy::default(), 5);
    let custom = DeepL::new("abc", "http://localhost:9000/", RetryPolicy::default(), 5);

    assert_eq!(free.endpoint(), "https://api-free.deepl.com");
    assert_eq!(pro.endpoint(), "https://api.deepl.com");
    assert_eq!(custom.endpoint(), "http://localhost:9000");
}

/// Test DeepL response parsing
#[test]
fn test_deepl_extract_text_withEmptyResponse_shouldFail() {
    let empty = DeepLResponse { translations: Vec::new() };
    assert!(matches!(DeepL::extract_text(&empty), Err(ProviderError::ParseError(_))));

    let one = DeepLResponse {
        translations: vec![DeepLTranslation {
            detected_source_language: Some("EN".to_string()),
            text: "Hallo".to_string(),
        }],
    };
    assert_eq!(DeepL::extract_text(&one).unwrap(), "Hallo");
}

/// Test that DeepL without a key fails without any request
#[tokio::test]
async fn test_deepl_translate_withoutKey_shouldReturnAuthenticationError() {
    let deepl = DeepL::new("", "http://127.0.0.1:9", fast_retry(0), 5);
    let result = deepl.translate("Hello", "de").await;
    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
}

/// Test that a server error is retried until it succeeds
#[tokio::test]
async fn test_google_translate_withTransientServerError_shouldRetry() {
    let (base, requests) = serve(vec![
        CannedResponse { status: "503 Service Unavailable", body: "busy" },
        CannedResponse { status: "200 OK", body: r#"[[["\"안녕\"","\"Hello\"",null,null]],null,"en"]"# },
    ])
    .await;

    let google = GoogleTranslate::new(format!("{}/translate_a/single", base), fast_retry(3), 5);
    let translated = google.translate("Hello", "ko").await.unwrap();

    assert_eq!(translated, "안녕");
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

/// Test that a rejected key is not retried
#[tokio::test]
async fn test_deepl_translate_withForbidden_shouldNotRetry() {
    let (base, requests) = serve(vec![
        CannedResponse { status: "403 Forbidden", body: r#"{"message":"Wrong key"}"# },
        CannedResponse { status: "200 OK", body: r#"{"translations":[{"text":"unused"}]}"# },
    ])
    .await;

    let deepl = DeepL::new("bad-key", base, fast_retry(3), 5);
    let result = deepl.translate("Hello", "de").await;

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

/// Test a successful DeepL round trip
#[tokio::test]
async fn test_deepl_translate_withValidResponse_shouldReturnText() {
    let (base, _) = serve(vec![CannedResponse {
        status: "200 OK",
        body: r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#,
    }])
    .await;

    let deepl = DeepL::new("key", base, fast_retry(0), 5);
    assert_eq!(deepl.translate("Hello", "de").await.unwrap(), "Hallo");
}

/// Test that retries stop after the configured count
#[tokio::test]
async fn test_google_translate_withPersistentServerError_shouldGiveUp() {
    let (base, requests) = serve(vec![
        CannedResponse { status: "500 Internal Server Error", body: "a" },
        CannedResponse { status: "500 Internal Server Error", body: "b" },
        CannedResponse { status: "500 Internal Server Error", body: "c" },
    ])
    .await;

    let google = GoogleTranslate::new(format!("{}/translate_a/single", base), fast_retry(2), 5);
    let result = google.translate("Hello", "ko").await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
    assert_eq!(requests.load(Ordering::SeqCst), 3);
}
