//! Per-word speech audio readiness
//!
//! Audio for each word is generated outside the core. The catalog only
//! records which words have an audio locator and notifies listeners when new
//! words become playable.

use std::collections::BTreeMap;

use crate::error::SpeechError;

/// Speech generation collaborator
pub trait SpeechGenerator {
    /// Generate audio for `words`, returning `(word, locator)` pairs.
    /// Partial results are allowed; missing words stay pending.
    fn generate(&mut self, words: &[String]) -> Result<Vec<(String, String)>, SpeechError>;
}

/// Callback fired with the words that just became ready
pub type ReadyHook = Box<dyn FnMut(&[String])>;

/// Word → audio locator table
#[derive(Default)]
pub struct AudioCatalog {
    locators: BTreeMap<String, String>,
    hooks: Vec<ReadyHook>,
}

impl std::fmt::Debug for AudioCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCatalog")
            .field("locators", &self.locators)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Lowercase, strip surrounding punctuation ("Hello," and "hello" share audio)
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

impl AudioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for newly ready words
    pub fn on_ready(&mut self, hook: impl FnMut(&[String]) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn is_ready(&self, word: &str) -> bool {
        self.locators.contains_key(&normalize_word(word))
    }

    pub fn locator(&self, word: &str) -> Option<&str> {
        self.locators.get(&normalize_word(word)).map(String::as_str)
    }

    pub fn ready_count(&self) -> usize {
        self.locators.len()
    }

    /// Distinct normalized words from `words` that still lack audio
    pub fn missing(&self, words: &[String]) -> Vec<String> {
        let mut missing: Vec<String> = words
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty() && !self.locators.contains_key(w))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    /// Record finished audio and notify listeners of the newly ready words
    pub fn complete(&mut self, results: Vec<(String, String)>) -> Vec<String> {
        let mut fresh = Vec::new();
        for (word, locator) in results {
            let key = normalize_word(&word);
            if key.is_empty() {
                continue;
            }
            if self.locators.insert(key.clone(), locator).is_none() {
                fresh.push(key);
            }
        }

        if !fresh.is_empty() {
            log::debug!("{} words ready for playback", fresh.len());
            for hook in &mut self.hooks {
                hook(&fresh);
            }
        }
        fresh
    }

    /// Generate audio for every missing word in `words`
    pub fn preload<G: SpeechGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        words: &[String],
    ) -> Result<Vec<String>, SpeechError> {
        let missing = self.missing(words);
        if missing.is_empty() {
            return Ok(Vec::new());
        }
        let results = generator.generate(&missing)?;
        Ok(self.complete(results))
    }

    /// Whether every word of the message can be played
    pub fn covers(&self, words: &[String]) -> bool {
        self.missing(words).is_empty()
    }
}
