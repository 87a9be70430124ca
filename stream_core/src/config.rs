//! Reconciler configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings injected into a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Letter of the game this model belongs to.
    pub game_letter: char,
    /// Log every fragment at debug level.
    pub debug_fragments: bool,
    /// Answer the ANSI and timestamp prompts and request stats at the game
    /// menu without waiting for automation.
    pub auto_answer_prompts: bool,
    /// Rank titles beyond the built-in list.
    pub extra_ranks: Vec<String>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            game_letter: 'A',
            debug_fragments: false,
            auto_answer_prompts: true,
            extra_ranks: Vec::new(),
        }
    }
}

impl ReconcilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Whether `letter` names this model's game. Case is ignored.
    pub fn is_game(&self, letter: char) -> bool {
        letter.eq_ignore_ascii_case(&self.game_letter)
    }
}
