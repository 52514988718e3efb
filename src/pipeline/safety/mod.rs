pub mod types;
pub mod keywords;
pub mod frames;
pub mod classifier;
pub mod responses;
pub mod boundary;
pub mod sanitize;
pub mod output_sanitize;

pub use classifier::assess;
pub use types::{CrisisAssessment, SafetyTier};
