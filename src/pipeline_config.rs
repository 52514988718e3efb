//! Per-turn pipeline configuration.
//!
//! Input limits, validation attempt budget, and the sampling ladder used
//! when a candidate reply is rejected and the completion is re-invoked.

use serde::{Deserialize, Serialize};

use crate::pipeline::safety::sanitize::MAX_INPUT_CHARS;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Sampling parameters for one completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

/// Pipeline knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// User input is truncated to this many characters before analysis.
    pub max_input_chars: usize,
    /// Generate/validate cycles before falling back.
    pub validation_attempts: usize,
    /// Sampling per attempt; later attempts reuse the last entry.
    pub sampling_ladder: Vec<SamplingParams>,
    /// Most recent turns forwarded to the completion endpoint.
    pub history_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_chars: MAX_INPUT_CHARS,
            validation_attempts: 3,
            history_window: 20,
            sampling_ladder: vec![
                SamplingParams {
                    temperature: 0.8,
                    top_p: 0.9,
                    frequency_penalty: 0.5,
                    presence_penalty: 0.4,
                },
                SamplingParams {
                    temperature: 0.65,
                    top_p: 0.85,
                    frequency_penalty: 0.7,
                    presence_penalty: 0.5,
                },
                SamplingParams {
                    temperature: 0.5,
                    top_p: 0.8,
                    frequency_penalty: 0.9,
                    presence_penalty: 0.6,
                },
            ],
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Derivation
// ═══════════════════════════════════════════════════════════

impl PipelineConfig {
    /// Sampling for a zero-based attempt index. Tighter with each attempt.
    pub fn sampling_for(&self, attempt: usize) -> SamplingParams {
        self.sampling_ladder
            .get(attempt)
            .or_else(|| self.sampling_ladder.last())
            .copied()
            .unwrap_or(SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                frequency_penalty: 0.5,
                presence_penalty: 0.5,
            })
    }
}
