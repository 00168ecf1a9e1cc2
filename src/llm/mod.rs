pub mod client;
pub mod prompts;

pub use client::OpenAiCompleter;

use crate::error::ChecklistError;
use std::future::Future;

/// Produces a free-text checklist draft for a topic.
pub trait Completer {
    fn complete(
        &self,
        topic: &str,
        count: usize,
    ) -> impl Future<Output = Result<String, ChecklistError>> + Send;
}
