pub mod patterns;
pub mod safety;
pub mod context;
pub mod memory;
pub mod compose;
pub mod validate;
pub mod fallback;
pub mod completion;
pub mod orchestrator;

pub use orchestrator::{Companion, ResponseSource, TurnOutcome, TurnRequest};
