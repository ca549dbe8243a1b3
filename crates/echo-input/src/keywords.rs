//! Phrase normalisation and keyword matching.

use echo_core::Direction;

use crate::{Command, Language};

/// Normalises a recognized phrase: surrounding whitespace trimmed, lower-cased.
#[must_use]
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// Maps spoken phrases to commands by keyword containment.
///
/// Entries are checked in insertion order and the first entry with a keyword
/// contained in the normalised phrase wins. The default tables list the
/// directions first (`Up`, `Down`, `Left`, `Right`) followed by `Quit` and
/// `Reshuffle`.
///
/// # Examples
///
/// ```
/// use echo_core::Direction;
/// use echo_input::{Command, KeywordTable};
///
/// let table = KeywordTable::new()
///     .with(Command::Move(Direction::Up), ["north"])
///     .with(Command::Quit, ["stop"]);
/// assert_eq!(table.decode("  Go NORTH please "), Some(Command::Move(Direction::Up)));
/// assert_eq!(table.decode("stop"), Some(Command::Quit));
/// assert_eq!(table.decode("south"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(Command, Vec<String>)>,
}

impl KeywordTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the default table for `language`.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        let table = Self::new();
        match language {
            Language::English => table
                .with(Direction::Up.into(), ["up"])
                .with(Direction::Down.into(), ["down"])
                .with(Direction::Left.into(), ["left"])
                .with(Direction::Right.into(), ["right"])
                .with(Command::Quit, ["exit", "quit"])
                .with(Command::Reshuffle, ["shuffle", "restart"]),
            Language::Persian => table
                .with(Direction::Up.into(), ["بالا"])
                .with(Direction::Down.into(), ["پایین"])
                .with(Direction::Left.into(), ["چپ"])
                .with(Direction::Right.into(), ["راست"])
                .with(Command::Quit, ["خروج"])
                .with(Command::Reshuffle, ["دوباره"]),
        }
    }

    /// Appends an entry mapping `keywords` to `command`.
    ///
    /// Keywords are normalised; empty keywords are dropped since they would
    /// match every phrase.
    #[must_use]
    pub fn with<I, S>(mut self, command: Command, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| normalize_phrase(keyword.as_ref()))
            .filter(|keyword| !keyword.is_empty())
            .collect::<Vec<_>>();
        if !keywords.is_empty() {
            self.entries.push((command, keywords));
        }
        self
    }

    /// Returns the entries in match order.
    #[must_use]
    pub fn entries(&self) -> &[(Command, Vec<String>)] {
        &self.entries
    }

    /// Decodes a phrase, or returns `None` if no keyword occurs in it.
    #[must_use]
    pub fn decode(&self, phrase: &str) -> Option<Command> {
        let phrase = normalize_phrase(phrase);
        self.entries
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| phrase.contains(keyword)))
            .map(|(command, _)| *command)
    }
}
