//! The `create_checklist` operation: completion, normalization, persistence
//! and response shaping for one tool call.

use crate::checklist::{normalize, ChecklistRequest, RenderedDocument};
use crate::config::Config;
use crate::llm::Completer;
use crate::persist::Persister;
use crate::response::{
    checklist_filename, count_tasks, PersistOutcome, ProtocolResponse, ResponseShaper,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Argument names accepted for the topic, in priority order.
const TOPIC_KEYS: [&str; 3] = ["topic", "context", "random_string"];

/// Resolve a request from raw tool-call arguments.
pub fn request_from_args(args: Option<&Value>) -> ChecklistRequest {
    let topic = args.and_then(|args| {
        TOPIC_KEYS
            .iter()
            .filter_map(|key| args.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|t| !t.is_empty())
    });
    let item_count = args
        .and_then(|args| args.get("num_items"))
        .and_then(parse_count);
    ChecklistRequest::new(topic, item_count)
}

/// Accepts integers and numeric strings; anything else counts as absent.
fn parse_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))
            .and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

/// Parses the leading digits of a string, so "7 items" reads as 7.
fn leading_integer(s: &str) -> Option<usize> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub struct ChecklistService<C, P> {
    config: Config,
    completer: C,
    persister: P,
}

impl<C: Completer, P: Persister> ChecklistService<C, P> {
    pub fn new(config: Config, completer: C, persister: P) -> Self {
        Self {
            config,
            completer,
            persister,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle a `create_checklist` call from its JSON arguments.
    pub async fn create_checklist(&self, args: Option<&Value>) -> ProtocolResponse {
        info!(
            params = %args.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string()),
            "Creating checklist"
        );
        let request = request_from_args(args);
        self.handle(&request).await
    }

    /// Typed entry point for callers that already have a topic and count.
    pub async fn create(&self, topic: Option<&str>, item_count: Option<usize>) -> ProtocolResponse {
        self.handle(&ChecklistRequest::new(topic, item_count)).await
    }

    async fn handle(&self, request: &ChecklistRequest) -> ProtocolResponse {
        info!(
            topic = %request.topic,
            items = request.item_count,
            "Processing checklist request"
        );

        let raw = match self
            .completer
            .complete(&request.topic, request.item_count)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                error!("Checklist generation failed: {}", err);
                return ResponseShaper::error(err.to_string());
            }
        };

        let document = normalize(Some(raw.as_str()), request.item_count);
        let outcome = self.persist(&request.topic, &document);
        ResponseShaper::shape(&document.text, Some(&request.topic), outcome.as_ref(), false)
    }

    fn persist(&self, topic: &str, document: &RenderedDocument) -> Option<PersistOutcome> {
        let path: PathBuf = self.config.output_path(&checklist_filename(Some(topic)));
        match self.persister.persist(&path, &document.text) {
            Ok(()) => {
                let task_count = count_tasks(&document.text);
                info!(path = %path.display(), task_count, "Checklist saved");
                Some(PersistOutcome { path, task_count })
            }
            Err(err) => {
                warn!(
                    fatal = err.is_fatal(),
                    "Could not save checklist, returning it for manual creation: {}", err
                );
                None
            }
        }
    }
}
