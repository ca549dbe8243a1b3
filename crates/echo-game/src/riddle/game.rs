use std::collections::HashSet;

use echo_input::{Command, Language, RecognitionFailure, VoiceEvent, normalize_phrase};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;

use super::{Riddle, RiddleStore};

const EXIT_WORDS: &[&str] = &["exit", "خروج"];
const SKIP_WORDS: &[&str] = &["i don't know", "نمی‌دونم", "نمیدونم"];

const CORRECT_POINTS: i32 = 2;
const SKIP_PENALTY: i32 = 1;

/// The result of feeding one voice event to a [`RiddleGame`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum RiddleOutcome {
    /// Recognition failed; nothing was scored.
    NotHeard(RecognitionFailure),
    /// The answer matched. A new riddle was drawn.
    Correct,
    /// The player gave up on the riddle. A new riddle was drawn.
    Skipped,
    /// The answer did not match; the same riddle stays up.
    Incorrect {
        /// What was heard.
        heard: String,
    },
    /// The player asked to stop.
    Exited,
    /// The session is already over.
    Ignored,
}

/// Whether the player won the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Verdict {
    /// More correct answers than skips.
    #[display("win")]
    Win,
    /// Otherwise.
    #[display("lose")]
    Lose,
}

/// Final tallies of a riddle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiddleSummary {
    /// Points: +2 per correct answer, -1 per skip.
    pub score: i32,
    /// Correct answers.
    pub correct: u32,
    /// Skipped riddles.
    pub wrong: u32,
    /// Outcome.
    pub verdict: Verdict,
}

impl RiddleSummary {
    /// Returns the number of riddles answered or skipped.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// A riddle session in one language.
///
/// Riddles are drawn at random without repetition. The session finishes when
/// the player says an exit word or no unused riddle remains.
#[derive(Debug)]
pub struct RiddleGame<S> {
    store: S,
    language: Language,
    rng: Pcg64,
    used: HashSet<u32>,
    current: Option<Riddle>,
    score: i32,
    correct: u32,
    wrong: u32,
    status: String,
    finished: bool,
}

impl<S> RiddleGame<S>
where
    S: RiddleStore,
{
    /// Starts a session and draws the first riddle.
    pub fn new(store: S, language: Language) -> Self {
        Self::with_rng(store, language, Pcg64::from_rng(&mut rand::rng()))
    }

    /// Starts a session with a reproducible draw order.
    pub fn with_seed(store: S, language: Language, seed: u64) -> Self {
        Self::with_rng(store, language, Pcg64::seed_from_u64(seed))
    }

    fn with_rng(store: S, language: Language, rng: Pcg64) -> Self {
        let mut game = Self {
            store,
            language,
            rng,
            used: HashSet::new(),
            current: None,
            score: 0,
            correct: 0,
            wrong: 0,
            status: String::new(),
            finished: false,
        };
        game.draw();
        game
    }

    /// Returns the session language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the riddle being asked, or `None` once finished.
    #[must_use]
    pub fn current(&self) -> Option<&Riddle> {
        self.current.as_ref()
    }

    /// Returns the running score.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Returns the status line for the last event. Empty when there is none.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns whether the session is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the tallies so far.
    #[must_use]
    pub fn summary(&self) -> RiddleSummary {
        RiddleSummary {
            score: self.score,
            correct: self.correct,
            wrong: self.wrong,
            verdict: if self.correct > self.wrong {
                Verdict::Win
            } else {
                Verdict::Lose
            },
        }
    }

    /// Handles a keyboard command. Only quit has an effect.
    pub fn handle_command(&mut self, command: Command) -> RiddleOutcome {
        match command {
            Command::Quit if !self.finished => self.exit(),
            _ => RiddleOutcome::Ignored,
        }
    }

    /// Scores one voice event against the current riddle.
    pub fn answer(&mut self, event: &VoiceEvent) -> RiddleOutcome {
        let Some(riddle) = self.current.as_ref().filter(|_| !self.finished) else {
            return RiddleOutcome::Ignored;
        };
        let phrase = match event {
            VoiceEvent::Failure(failure) => {
                failure.status_message().clone_into(&mut self.status);
                return RiddleOutcome::NotHeard(*failure);
            }
            VoiceEvent::Phrase(phrase) => normalize_phrase(phrase),
        };

        if EXIT_WORDS.contains(&phrase.as_str()) {
            return self.exit();
        }
        if SKIP_WORDS.contains(&phrase.as_str()) {
            log::debug!("riddle {} skipped", riddle.id);
            self.score -= SKIP_PENALTY;
            self.wrong += 1;
            self.draw();
            return RiddleOutcome::Skipped;
        }
        if riddle.is_answered_by(&phrase) {
            log::debug!("riddle {} answered", riddle.id);
            self.score += CORRECT_POINTS;
            self.correct += 1;
            "Correct!".clone_into(&mut self.status);
            self.draw();
            return RiddleOutcome::Correct;
        }

        self.status = format!("X Incorrect ,you said: {phrase}.");
        RiddleOutcome::Incorrect { heard: phrase }
    }

    fn exit(&mut self) -> RiddleOutcome {
        self.status.clear();
        self.finish();
        RiddleOutcome::Exited
    }

    fn finish(&mut self) {
        self.current = None;
        self.finished = true;
        let summary = self.summary();
        log::info!(
            "riddles over: score {}, {} correct, {} wrong ({})",
            summary.score,
            summary.correct,
            summary.wrong,
            summary.verdict
        );
    }

    fn draw(&mut self) {
        let mut available: Vec<Riddle> = self
            .store
            .riddles_for(self.language)
            .into_iter()
            .filter(|riddle| !self.used.contains(&riddle.id))
            .collect();
        if available.is_empty() {
            "All puzzles completed!".clone_into(&mut self.status);
            self.finish();
            return;
        }
        let index = self.rng.random_range(0..available.len());
        let riddle = available.swap_remove(index);
        self.used.insert(riddle.id);
        self.current = Some(riddle);
    }
}
