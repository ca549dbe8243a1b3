//! Run configuration.

use std::{path::PathBuf, time::Duration};

use echo_generator::{ShuffleSeed, ShuffleStrategy};
use echo_input::{InputMode, Language};

/// Which game to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, derive_more::Display)]
pub enum GameKind {
    /// The sliding tile puzzle.
    #[default]
    #[display("slide")]
    Slide,
    /// The tile maze.
    #[display("maze")]
    Maze,
    /// The spoken riddle quiz.
    #[display("riddle")]
    Riddle,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub game: GameKind,
    pub slide: SlideSettings,
    pub maze: MazeSettings,
    pub input: InputSettings,
    pub timing: TimingSettings,
}

#[derive(Debug, Clone)]
pub struct SlideSettings {
    pub side: usize,
    pub shuffle: ShuffleStrategy,
    /// Seed for the first round. Later rounds always draw a fresh seed.
    pub seed: Option<ShuffleSeed>,
}

impl Default for SlideSettings {
    fn default() -> Self {
        Self {
            side: 3,
            shuffle: ShuffleStrategy::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MazeSettings {
    /// Level file. The built-in levels are used when unset.
    pub levels: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InputSettings {
    pub mode: InputMode,
    pub language: Language,
    /// Longest a recognizer blocks before reporting silence.
    pub listen_window: Duration,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mode: InputMode::Keyboard,
            language: Language::English,
            listen_window: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimingSettings {
    pub tick: Duration,
    /// Pause after a round or level is won.
    pub win_pause: Duration,
    /// Stop after this many ticks. Runs until quit when unset.
    pub max_ticks: Option<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            win_pause: Duration::from_millis(500),
            max_ticks: None,
        }
    }
}
