//! Checklist MCP library crate
//!
//! Turns free-form model output into a fixed-size markdown checklist and
//! serves it to editor assistants as a single `create_checklist` tool.

pub mod checklist;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod persist;
pub mod response;
pub mod server;
pub mod service;

pub use checklist::{normalize, Checklist, ChecklistItem, ChecklistRequest, RenderedDocument};
pub use config::Config;
pub use error::ChecklistError;
pub use response::{slugify, PersistOutcome, ProtocolResponse, ResponseShaper};
pub use service::ChecklistService;
