//! Token usage tracking for LLM operations.
//!
//! # OpenAI API Alignment
//!
//! The [`Usage`] struct aligns with OpenAI's usage object via serde aliases:
//! `prompt_tokens` / `completion_tokens` / `total_tokens`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token usage statistics from an LLM operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input/prompt.
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: u32,

    /// Number of tokens in the output/completion.
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: u32,

    /// Total tokens used (input + output).
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Creates a new usage record.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// Creates an empty usage record.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            input_tokens: 0,
            output_tokens: 0,
            total_tokens: 0,
        }
    }

    /// Returns the total token count.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total_tokens
    }
}

impl Add for Usage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_computes_total() {
        let usage = Usage::new(100, 50);
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn add_accumulates() {
        let mut usage = Usage::zero();
        usage += Usage::new(10, 5);
        usage += Usage::new(20, 15);

        assert_eq!(usage.input_tokens, 30);
        assert_eq!(usage.output_tokens, 20);
        assert_eq!(usage.total(), 50);
    }

    #[test]
    fn deserializes_openai_field_names() {
        let json = r#"{"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}"#;
        let usage: Usage = serde_json::from_str(json).unwrap();

        assert_eq!(usage.input_tokens, 12);
        assert_eq!(usage.output_tokens, 34);
        assert_eq!(usage.total_tokens, 46);
    }
}
