//! A spoken riddle quiz.
//!
//! Riddles come from a [`RiddleStore`]; [`RiddleGame`] asks them one at a time
//! and scores each recognized answer.

use echo_input::{Language, normalize_phrase};

pub use self::game::{RiddleGame, RiddleOutcome, RiddleSummary, Verdict};

mod game;

/// One riddle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Riddle {
    /// Store-assigned identifier.
    pub id: u32,
    /// Topic shown with the prompt.
    pub category: String,
    /// The question text.
    pub prompt: String,
    /// The expected spoken answer.
    pub answer: String,
    /// Language of the prompt and answer.
    pub language: Language,
}

impl Riddle {
    /// Returns whether `phrase` is the answer, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn is_answered_by(&self, phrase: &str) -> bool {
        normalize_phrase(phrase) == normalize_phrase(&self.answer)
    }
}

/// Read access to a riddle collection.
pub trait RiddleStore {
    /// Returns every riddle in `language`.
    fn riddles_for(&self, language: Language) -> Vec<Riddle>;
}

impl<S> RiddleStore for &S
where
    S: RiddleStore + ?Sized,
{
    fn riddles_for(&self, language: Language) -> Vec<Riddle> {
        (**self).riddles_for(language)
    }
}

/// Errors returned by [`InMemoryRiddleStore`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RiddleError {
    /// A riddle with the same prompt already exists.
    #[display("duplicate riddle prompt: {prompt:?}")]
    DuplicatePrompt {
        /// The rejected prompt.
        prompt: String,
    },
}

/// A riddle store held in memory. Prompts are unique.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRiddleStore {
    riddles: Vec<Riddle>,
    next_id: u32,
}

impl InMemoryRiddleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the sample riddles, one per language.
    #[must_use]
    pub fn seeded() -> Self {
        let mut store = Self::new();
        for (category, prompt, answer, language) in SAMPLE_RIDDLES {
            if let Err(err) = store.insert(*category, *prompt, *answer, *language) {
                log::warn!("skipping sample riddle: {err}");
            }
        }
        store
    }

    /// Adds a riddle and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`RiddleError::DuplicatePrompt`] if the prompt is already stored.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        language: Language,
    ) -> Result<u32, RiddleError> {
        let prompt = prompt.into();
        if self.riddles.iter().any(|riddle| riddle.prompt == prompt) {
            return Err(RiddleError::DuplicatePrompt { prompt });
        }
        self.next_id += 1;
        let id = self.next_id;
        self.riddles.push(Riddle {
            id,
            category: category.into(),
            prompt,
            answer: answer.into(),
            language,
        });
        Ok(id)
    }

    /// Returns the number of stored riddles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.riddles.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.riddles.is_empty()
    }
}

impl RiddleStore for InMemoryRiddleStore {
    fn riddles_for(&self, language: Language) -> Vec<Riddle> {
        self.riddles
            .iter()
            .filter(|riddle| riddle.language == language)
            .cloned()
            .collect()
    }
}

const SAMPLE_RIDDLES: &[(&str, &str, &str, Language)] = &[
    (
        "میوه",
        "میوه‌ای که سقوطش قوانین دنیا را آشکار کرد، طعمش بهشت را از آدم گرفت، و نامش در دست همه جاودانه شد.",
        "سیب",
        Language::Persian,
    ),
    (
        "fruit",
        "The fruit whose fall revealed the laws of the world, its taste took paradise from Adam, and its name became eternal in everyone's hands.",
        "apple",
        Language::English,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_has_one_riddle_per_language() {
        let store = InMemoryRiddleStore::seeded();
        assert_eq!(store.len(), SAMPLE_RIDDLES.len());
        assert_eq!(store.len(), 2);

        let english = store.riddles_for(Language::English);
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].answer, "apple");

        let persian = store.riddles_for(Language::Persian);
        assert_eq!(persian.len(), 1);
        assert_eq!(persian[0].answer, "سیب");
        assert_ne!(english[0].id, persian[0].id);
    }

    #[test]
    fn test_duplicate_prompt_is_rejected() {
        let mut store = InMemoryRiddleStore::new();
        let id = store
            .insert("animal", "What barks?", "dog", Language::English)
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(
            store.insert("pets", "What barks?", "a dog", Language::English),
            Err(RiddleError::DuplicatePrompt {
                prompt: "What barks?".to_owned()
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_answer_matching_is_normalised() {
        let store = InMemoryRiddleStore::seeded();
        let riddle = &store.riddles_for(Language::English)[0];
        assert!(riddle.is_answered_by("  Apple "));
        assert!(!riddle.is_answered_by("an apple"));
    }
}
