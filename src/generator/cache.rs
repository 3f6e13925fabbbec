use crate::error::GenerationError;
use crate::models::{Difficulty, Question};
use crate::utils::strings::normalize_source_text;
use log::debug;
use std::collections::HashMap;

pub type GenerationResult = Result<Vec<Question>, GenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    difficulty: Difficulty,
}

/// Process-lifetime memo of generation results, keyed by normalized text and
/// difficulty. Entries are never evicted.
#[derive(Debug, Default)]
pub struct QuestionCache {
    entries: HashMap<CacheKey, GenerationResult>,
    cache_failures: bool,
}

impl QuestionCache {
    pub fn new(cache_failures: bool) -> Self {
        Self {
            entries: HashMap::new(),
            cache_failures,
        }
    }

    /// Returns the stored result for `(text, difficulty)`, or runs `generate`
    /// with the text as given and stores what it returns. Failures are only
    /// stored when the cache was built with `cache_failures`.
    pub fn get_or_generate<F>(&mut self, text: &str, difficulty: Difficulty, generate: F) -> GenerationResult
    where
        F: FnOnce(&str, Difficulty) -> GenerationResult,
    {
        let key = CacheKey {
            text: normalize_source_text(text),
            difficulty,
        };

        if let Some(hit) = self.entries.get(&key) {
            debug!("question cache hit ({} {} chars)", difficulty, key.text.len());
            return hit.clone();
        }

        debug!("question cache miss ({} {} chars)", difficulty, key.text.len());
        let result = generate(text, difficulty);

        if result.is_ok() || self.cache_failures {
            self.entries.insert(key, result.clone());
        }
        result
    }

    pub fn contains(&self, text: &str, difficulty: Difficulty) -> bool {
        self.entries.contains_key(&CacheKey {
            text: normalize_source_text(text),
            difficulty,
        })
    }

    /// The cached question list for a key, if a successful generation is stored.
    #[cfg(test)]
    pub fn questions(&self, text: &str, difficulty: Difficulty) -> Option<&[Question]> {
        let key = CacheKey {
            text: normalize_source_text(text),
            difficulty,
        };
        match self.entries.get(&key) {
            Some(Ok(questions)) => Some(questions.as_slice()),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
