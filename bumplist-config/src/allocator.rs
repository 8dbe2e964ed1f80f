//! Allocation strategy selection.
//!
//! Picks which allocator backs the demo list and sizes the arena.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Allocation strategy for list nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pass-through heap allocator, untraced.
    #[default]
    System,
    /// Pass-through heap allocator logging every operation.
    Logging,
    /// Fixed-capacity bump allocator.
    Arena,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::System => "system",
            Strategy::Logging => "logging",
            Strategy::Arena => "arena",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(Strategy::System),
            "logging" => Ok(Strategy::Logging),
            "arena" => Ok(Strategy::Arena),
            other => Err(format!(
                "unknown strategy '{other}' (expected system, logging or arena)"
            )),
        }
    }
}

/// Allocator configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Strategy used for list nodes.
    #[serde(default)]
    pub strategy: Strategy,

    /// Arena capacity in elements. Fixed for the arena's lifetime.
    #[serde(default = "default_arena_capacity")]
    #[validate(range(min = 1, max = 1048576))]
    pub arena_capacity: usize,
}

fn default_arena_capacity() -> usize {
    10
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            arena_capacity: default_arena_capacity(),
        }
    }
}
