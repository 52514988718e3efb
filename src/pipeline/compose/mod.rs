//! Prompt composition.
//!
//! Style contract, name directive, time and memory blocks, element
//! instructions and the ordered situational blocks, joined into one system
//! prompt. Randomized choices take an injected `rand::Rng`.

pub mod style;
pub mod name_usage;
pub mod invitations;
pub mod disclaimer;
pub mod blocks;
pub mod composer;

pub use composer::{ComposeRequest, ComposedPrompt, ProfileUpdate, PromptComposer};
pub use name_usage::should_use_name;
