use super::prompts::{checklist_system_prompt, checklist_user_prompt};
use super::Completer;
use crate::config::Config;
use crate::error::ChecklistError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Text used when the provider answers without any content.
pub const EMPTY_COMPLETION_FALLBACK: &str = "Could not generate checklist";

/// Maximum length for error content in error messages
const MAX_ERROR_CONTENT_LEN: usize = 200;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompleter {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompleter {
    pub fn from_config(config: &Config) -> Result<Self, ChecklistError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChecklistError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            model: config.model.clone(),
            endpoint: chat_completions_url(&config.api_base),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Completer for OpenAiCompleter {
    async fn complete(&self, topic: &str, count: usize) -> Result<String, ChecklistError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ChecklistError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: checklist_system_prompt(topic, count),
                },
                Message {
                    role: "user".to_string(),
                    content: checklist_user_prompt(topic),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(model = %self.model, endpoint = %self.endpoint, "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChecklistError::Completion(describe_transport_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChecklistError::Completion(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, "Completion request failed");
            return Err(ChecklistError::Completion(describe_status(status, &text)));
        }

        let content = parse_completion(&text)?;
        info!(chars = content.len(), "Checklist generated successfully");
        Ok(content)
    }
}

fn chat_completions_url(api_base: &str) -> String {
    format!("{}/chat/completions", api_base.trim_end_matches('/'))
}

/// Pull the first choice's text out of a chat-completions body.
fn parse_completion(body: &str) -> Result<String, ChecklistError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        ChecklistError::Completion(format!(
            "Failed to parse completion response: {}",
            e
        ))
    })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| EMPTY_COMPLETION_FALLBACK.to_string());
    Ok(content)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request to the completion provider timed out".to_string()
    } else if err.is_connect() {
        "Could not connect to the completion provider".to_string()
    } else {
        err.to_string()
    }
}

fn describe_status(status: reqwest::StatusCode, body: &str) -> String {
    match status.as_u16() {
        401 => "Invalid API key. Check OPENAI_API_KEY.".to_string(),
        429 => "Rate limited by the completion provider. Try again later.".to_string(),
        500..=599 => format!(
            "Completion provider error ({}). The service may be temporarily unavailable.",
            status
        ),
        _ => format!("API error {}: {}", status, sanitize_api_response(body)),
    }
}

/// Sanitize API response content for error messages to prevent credential leakage.
fn sanitize_api_response(content: &str) -> String {
    const SECRET_PATTERNS: &[&str] = &[
        "api_key",
        "apikey",
        "secret",
        "password",
        "credential",
        "bearer",
        "sk-",
    ];

    let truncated = truncate_str(content, MAX_ERROR_CONTENT_LEN);
    let lower = truncated.to_lowercase();
    if SECRET_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "(response details redacted - may contain sensitive data)".to_string();
    }
    truncated.to_string()
}

/// Truncate a string for display (Unicode-safe)
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_takes_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Create repo\nWrite tests"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Create repo\nWrite tests");
    }

    #[test]
    fn test_parse_completion_falls_back_when_empty() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
            r#"{}"#,
        ] {
            assert_eq!(parse_completion(body).unwrap(), EMPTY_COMPLETION_FALLBACK);
        }
    }

    #[test]
    fn test_parse_completion_rejects_garbage() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ChecklistError::Completion(_)));
    }

    #[test]
    fn test_chat_completions_url() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:8080/v1"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_describe_status_redacts_secrets() {
        let msg = describe_status(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":"bad api_key sk-123"}"#,
        );
        assert!(msg.contains("redacted"));
        assert!(!msg.contains("sk-123"));

        let msg = describe_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(msg.contains("Invalid API key"));
    }

    #[test]
    fn test_truncate_str_is_char_safe() {
        assert_eq!(truncate_str("héllo", 2), "hé");
        assert_eq!(truncate_str("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_blank_key_from_config_file_is_missing() {
        let config: Config =
            toml::from_str("api_key = \"  \"\napi_base = \"http://127.0.0.1:9\"\n").unwrap();
        assert!(!config.has_api_key());

        let completer = OpenAiCompleter::from_config(&config).unwrap();
        assert!(!completer.has_credential());
        let err = completer.complete("anything", 3).await.unwrap_err();
        assert!(matches!(err, ChecklistError::MissingCredential));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let config = Config {
            api_key: None,
            api_base: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let completer = OpenAiCompleter::from_config(&config).unwrap();
        assert!(!completer.has_credential());
        let err = completer.complete("anything", 3).await.unwrap_err();
        assert!(matches!(err, ChecklistError::MissingCredential));
    }
}
