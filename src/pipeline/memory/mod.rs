//! Conversation memory: facts rebuilt from the caller-supplied history on
//! every turn. Nothing is stored between turns.

pub mod entities;
pub mod facts;
pub mod recall;

pub use entities::Entities;
pub use facts::{extract_facts, Facts};
pub use recall::{memory_answer, memory_summary};
