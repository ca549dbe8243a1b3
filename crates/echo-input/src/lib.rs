//! Input routing for the Echo games.
//!
//! Two sources feed the games: a keyboard that is polled synchronously once per
//! tick, and a speech recognizer that runs on a background thread and hands
//! recognized phrases over through a channel. [`InputRouter`] merges both into
//! at most one [`Command`] per tick.
//!
//! # Overview
//!
//! - [`command`]: the decoded [`Command`] type
//! - [`language`]: supported recognition languages
//! - [`keywords`]: phrase normalisation and the injectable [`KeywordTable`]
//! - [`voice`]: the [`SpeechRecognizer`] contract and the [`VoiceListener`] worker
//! - [`keyboard`]: per-tick [`KeySnapshot`]s from a [`KeyboardSource`]
//! - [`router`]: the [`InputRouter`] itself
//!
//! # Examples
//!
//! ```
//! use echo_core::Direction;
//! use echo_input::{Command, KeywordTable, Language};
//!
//! let keywords = KeywordTable::for_language(Language::Persian);
//! assert_eq!(keywords.decode("راست"), Some(Command::Move(Direction::Right)));
//! assert_eq!(keywords.decode("سلام"), None);
//! ```

pub mod command;
pub mod keyboard;
pub mod keywords;
pub mod language;
pub mod router;
pub mod voice;

pub use self::{
    command::Command,
    keyboard::{KeySnapshot, KeyboardSource, NoKeyboard},
    keywords::{KeywordTable, normalize_phrase},
    language::{Language, LanguageParseError},
    router::{InputMode, InputRouter, RoutedInput},
    voice::{
        Heard, RecognitionFailure, ScriptedRecognizer, SpeechRecognizer, VoiceError, VoiceEvent,
        VoiceListener,
    },
};
