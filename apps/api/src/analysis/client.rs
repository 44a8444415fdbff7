//! Remote analysis function client.
//!
//! All calls to the hosted analysis function go through `AnalysisFunction`.
//! Exactly one attempt is made per call: no retry, no timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::models::{AnalysisRequest, AnalysisResult};

/// Failure modes surfaced to the user after an analyze attempt.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure or non-2xx status from the function host.
    #[error("{0}")]
    Transport(String),

    /// The function answered but reported an error in its payload.
    #[error("{0}")]
    Remote(String),

    /// Anything else, e.g. a payload that is not a valid report.
    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisError::Transport(_) => "Could not reach the analysis service",
            AnalysisError::Remote(_) => "Analysis failed",
            AnalysisError::Unexpected(_) => "Something went wrong",
        }
    }
}

/// A named remote function that turns an `AnalysisRequest` into a raw JSON payload.
///
/// Carried in `AppState` as `Arc<dyn AnalysisFunction>`.
#[async_trait]
pub trait AnalysisFunction: Send + Sync {
    async fn invoke(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError>;
}

/// Calls the function and decodes its payload, honouring an embedded `error` field.
pub async fn run_analysis(
    function: &dyn AnalysisFunction,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AnalysisError> {
    let payload = function.invoke(request).await?;
    decode_payload(payload)
}

fn decode_payload(payload: Value) -> Result<AnalysisResult, AnalysisError> {
    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(AnalysisError::Remote(message));
    }

    serde_json::from_value(payload)
        .map_err(|e| AnalysisError::Unexpected(format!("Malformed analysis response: {e}")))
}

#[derive(Debug, Deserialize)]
struct FunctionErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client for a function hosted at `{base_url}/functions/v1/{name}`.
#[derive(Clone)]
pub struct HttpAnalysisFunction {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpAnalysisFunction {
    pub fn new(base_url: &str, function_name: &str, api_key: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!(
                "{}/functions/v1/{}",
                base_url.trim_end_matches('/'),
                function_name
            ),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisFunction for HttpAnalysisFunction {
    async fn invoke(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(format!("Request failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FunctionErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or(body);
            return Err(AnalysisError::Transport(format!(
                "Function returned {status}: {message}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Unexpected(format!("Response was not JSON: {e}")))?;

        debug!("Analysis function responded with status {}", status);
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted stand-in for the remote function.
    pub(crate) struct MockFunction {
        response: Mutex<Option<Result<Value, AnalysisError>>>,
        pub calls: AtomicUsize,
        pub last_request: Mutex<Option<AnalysisRequest>>,
    }

    impl MockFunction {
        pub(crate) fn returning(response: Result<Value, AnalysisError>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AnalysisFunction for MockFunction {
        async fn invoke(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(AnalysisError::Unexpected("no scripted response".into())))
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("Rust developer", "Looking for Rust", Some("Acme"))
    }

    #[test]
    fn test_endpoint_joins_base_and_name() {
        let f = HttpAnalysisFunction::new("https://proj.example.co/", "analyze-resume", "k".into())
            .unwrap();
        assert_eq!(f.endpoint(), "https://proj.example.co/functions/v1/analyze-resume");
    }

    #[test]
    fn test_embedded_error_is_remote_error() {
        let err = decode_payload(json!({"error": "quota exceeded"})).unwrap_err();
        assert!(matches!(err, AnalysisError::Remote(ref m) if m == "quota exceeded"));
    }

    #[test]
    fn test_null_error_field_is_ignored() {
        let result = decode_payload(json!({"error": null, "matchedSkills": ["SQL"]})).unwrap();
        assert_eq!(result.matched_skills, vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_http_function_posts_request_and_returns_payload() {
        let router = Router::new().route(
            "/functions/v1/analyze-resume",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["apikey"], "anon-key");
                assert_eq!(headers["authorization"], "Bearer anon-key");
                assert_eq!(body["companyName"], "Acme");
                Json(json!({"matchedSkills": ["Rust"], "missingSkills": []}))
            }),
        );
        let base = serve(router).await;
        let f = HttpAnalysisFunction::new(&base, "analyze-resume", "anon-key".into()).unwrap();

        let result = run_analysis(&f, &request()).await.unwrap();
        assert_eq!(result.matched_skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_http_function_non_success_is_transport_error() {
        let router = Router::new().route(
            "/functions/v1/analyze-resume",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "model unavailable"})),
                )
            }),
        );
        let base = serve(router).await;
        let f = HttpAnalysisFunction::new(&base, "analyze-resume", "k".into()).unwrap();

        let err = run_analysis(&f, &request()).await.unwrap_err();
        match err {
            AnalysisError::Transport(msg) => assert!(msg.contains("model unavailable")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let f = HttpAnalysisFunction::new(&format!("http://{addr}"), "analyze-resume", "k".into())
            .unwrap();
        let err = run_analysis(&f, &request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }
}
