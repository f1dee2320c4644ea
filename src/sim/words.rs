//! Word/bounce synchronization
//!
//! Each qualifying bounce reveals the next word of the active message.

use serde::{Deserialize, Serialize};

use crate::config::WordPolicy;

/// A word revealed by a bounce, with the timing the renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealedWord {
    /// Zero-based position in the message
    pub index: usize,
    pub word: String,
    /// Simulation time of the reveal (ms)
    pub revealed_at: f64,
    /// Mascot vertical velocity at the moment of reveal (pixels/s)
    pub mascot_velocity_y: f32,
}

/// Ordered word list with a reveal pointer
#[derive(Debug, Clone, Default)]
pub struct WordSequence {
    words: Vec<String>,
    policy: WordPolicy,
    current: Option<RevealedWord>,
}

impl WordSequence {
    pub fn new(words: Vec<String>, policy: WordPolicy) -> Self {
        Self {
            words,
            policy,
            current: None,
        }
    }

    /// Split message text on whitespace, keeping every occurrence in order
    pub fn from_text(text: &str, policy: WordPolicy) -> Self {
        Self::new(text.split_whitespace().map(str::to_owned).collect(), policy)
    }

    pub fn empty(policy: WordPolicy) -> Self {
        Self::new(Vec::new(), policy)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn current(&self) -> Option<&RevealedWord> {
        self.current.as_ref()
    }

    /// Index the next bounce would reveal, if any
    pub fn next_index(&self) -> Option<usize> {
        if self.words.is_empty() {
            return None;
        }
        let next = self.current.as_ref().map_or(0, |c| c.index + 1);
        if next < self.words.len() {
            Some(next)
        } else {
            match self.policy {
                WordPolicy::Clamp => None,
                WordPolicy::Wrap => Some(0),
            }
        }
    }

    /// Advance the pointer by one. Returns the newly revealed word, or
    /// `None` when there is nothing left to reveal.
    pub fn advance(&mut self, now: f64, mascot_velocity_y: f32) -> Option<&RevealedWord> {
        let index = self.next_index()?;
        self.current = Some(RevealedWord {
            index,
            word: self.words[index].clone(),
            revealed_at: now,
            mascot_velocity_y,
        });
        self.current.as_ref()
    }

    /// Every word has been revealed and the policy does not wrap
    pub fn is_finished(&self) -> bool {
        self.next_index().is_none()
    }

    pub fn rewind(&mut self) {
        self.current = None;
    }
}
