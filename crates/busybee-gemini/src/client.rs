//! Generative Language API client.
//!
//! Sends one `generateContent` call per analysis with a JSON response schema
//! attached, and parses the first candidate's text into core records.

use anyhow::{Context, Result};
use async_trait::async_trait;
use busybee_core::analysis::{KeywordRecord, ProductRecord, ShopRecord};
use busybee_core::{AnalysisKind, AnalysisProvider, Config};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::prompts::prompt_for;
use crate::schema::response_schema;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: Option<&str>, model: &str) -> Self {
        Self::with_base_url(api_key, model, busybee_core::config::DEFAULT_API_URL)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(api_key: Option<&str>, model: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(str::to_string),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_base_url(config.api_key.as_deref(), &config.model, &config.api_base_url)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Run one analysis and return the raw JSON text of the answer.
    pub async fn generate(&self, kind: AnalysisKind, query: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("API key is not configured; set GEMINI_API_KEY"))?;

        let request = build_request(kind, query);

        debug!(model = %self.model, kind = %kind, "Calling Gemini API");
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let raw = response
            .text()
            .await
            .context("Failed to read Gemini API response body")?;
        let body: GenerateResponse =
            serde_json::from_str(&raw).context("Failed to parse Gemini API response JSON")?;

        let text = first_text(&body)
            .ok_or_else(|| anyhow::anyhow!("No text content in Gemini API response"))?;

        Ok(extract_json(text))
    }

    async fn analyze<T: DeserializeOwned>(&self, kind: AnalysisKind, query: &str) -> Result<Vec<T>> {
        let json = self.generate(kind, query).await?;
        let records: Vec<T> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {} analysis JSON from Gemini response", kind))?;
        info!(kind = %kind, records = records.len(), "Analysis received");
        Ok(records)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn analyze_product(&self, query: &str) -> Result<Vec<ProductRecord>> {
        self.analyze(AnalysisKind::Product, query).await
    }

    async fn analyze_shop(&self, query: &str) -> Result<Vec<ShopRecord>> {
        self.analyze(AnalysisKind::Shop, query).await
    }

    async fn analyze_keyword(&self, query: &str) -> Result<Vec<KeywordRecord>> {
        self.analyze(AnalysisKind::Keyword, query).await
    }
}

fn build_request(kind: AnalysisKind, query: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt_for(kind, query)),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(kind),
        },
    }
}

fn first_text(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.text.as_deref())
}

fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    let detail = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            anyhow::anyhow!("API key rejected by Gemini (HTTP {}): {}", status, detail)
        }
        _ => anyhow::anyhow!("Gemini API error (HTTP {}): {}", status, detail),
    }
}

/// Pull `error.message` out of an API error body.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Extract JSON from a string that might be wrapped in markdown code blocks.
fn extract_json(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_marker = &trimmed[start + 7..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_marker = &trimmed[start + 3..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim().to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use busybee_core::ErrorCategory;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn test_extract_json_fenced() {
        assert_eq!(extract_json("```json\n[{\"a\": 1}]\n```"), "[{\"a\": 1}]");
        assert_eq!(extract_json("Here:\n```\n[]\n```"), "[]");
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(build_request(AnalysisKind::Shop, "candles")).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
        let prompt = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"candles\""));
    }

    #[test]
    fn test_first_text_skips_empty_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{},{"text":"[]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(&body), Some("[]"));

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_text(&empty), None);
    }

    #[test]
    fn test_status_error_messages() {
        let body = r#"{"error":{"code":403,"message":"Permission denied"}}"#;
        let err = status_error(StatusCode::FORBIDDEN, body).to_string();
        assert!(err.contains("API key"), "{err}");
        assert!(err.contains("Permission denied"));

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream down").to_string();
        assert!(!err.contains("API key"));
        assert!(err.contains("upstream down"));
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let client = GeminiClient::new(Some("secret-key"), "gemini-2.5-flash");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let client = GeminiClient::new(Some("  "), "gemini-2.5-flash");
        let err = client.analyze_keyword("lamp").await.unwrap_err();
        assert!(format!("{:#}", err).contains("API key"));
    }

    /// Serve one canned HTTP response and hand back the request head.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        serve_raw(format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        ))
        .await
    }

    /// Write `response` verbatim to the first connection, then close it.
    async fn serve_raw(response: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= split + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn local_client(api_key: &str, url: &str) -> GeminiClient {
        GeminiClient {
            api_key: Some(api_key.to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: url.to_string(),
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
        }
    }

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_keyword_analysis_round_trip() {
        let records = r#"[{"keyword":"boho wall decor","competition":"Medium","demand":"High","opportunityScore":82,"topListings":[{"title":"Macrame Hanging","monthlySales":240}],"relatedKeywords":["macrame wall art"]}]"#;
        let (url, server) = serve_once("200 OK", candidate_body(records)).await;

        let client = local_client("test-key", &url);
        let result = client.analyze_keyword("boho wall decor").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].keyword, "boho wall decor");
        assert_eq!(result[0].opportunity_score, 82);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    }

    #[tokio::test]
    async fn test_cut_off_body_is_not_a_parse_failure() {
        let (url, server) = serve_raw(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\nconnection: close\r\n\r\n{\"candidates\":"
                .to_string(),
        )
        .await;

        let client = local_client("test-key", &url);
        let err = format!("{:#}", client.analyze_keyword("lamp").await.unwrap_err());

        assert!(err.contains("Failed to read Gemini API response body"), "{err}");
        assert_eq!(ErrorCategory::classify(&err), ErrorCategory::Generic);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_garbled_envelope_mentions_json() {
        let (url, server) = serve_once("200 OK", "<html>oops</html>".to_string()).await;

        let client = local_client("test-key", &url);
        let err = format!("{:#}", client.analyze_keyword("lamp").await.unwrap_err());

        assert!(err.contains("Failed to parse Gemini API response JSON"), "{err}");
        assert_eq!(ErrorCategory::classify(&err), ErrorCategory::MalformedResponse);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_answer_mentions_json() {
        let (url, server) = serve_once("200 OK", candidate_body("Sorry, I can't help with that.")).await;

        let client = local_client("test-key", &url);
        let err = client.analyze_shop("candles").await.unwrap_err();

        assert!(format!("{:#}", err).contains("JSON"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_key_mentions_api_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key."}}"#;
        let (url, server) = serve_once("400 Bad Request", body.to_string()).await;

        let client = local_client("bad", &url);
        let err = client.analyze_product("lamp").await.unwrap_err();

        assert!(format!("{:#}", err).to_lowercase().contains("api key"));
        server.await.unwrap();
    }
}
