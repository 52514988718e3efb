//! Conversational context inference.
//!
//! One user turn in, one `ConversationContext` out: temporal scope, tone,
//! topic, urgency, disclosure depth, implicit requests and the ten message
//! elements with their priorities.

pub mod types;
pub mod taggers;
pub mod names;
pub mod requests;
pub mod elements;
pub mod analyzer;

pub use analyzer::ContextAnalyzer;
pub use types::{ConversationContext, MessageElements, Priority, TaskMode};
