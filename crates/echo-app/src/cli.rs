//! Command-line arguments.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use echo_generator::{DEFAULT_WALK_STEPS, ShuffleSeed, ShuffleStrategy};
use echo_input::{InputMode, Language};

use crate::settings::{
    GameKind, InputSettings, MazeSettings, Settings, SlideSettings, TimingSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShuffleKind {
    /// Random blank walk from the solved grid; always solvable.
    Walk,
    /// Uniform random permutation; may be unsolvable.
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeKind {
    Keyboard,
    Voice,
}

impl From<ModeKind> for InputMode {
    fn from(mode: ModeKind) -> Self {
        match mode {
            ModeKind::Keyboard => Self::Keyboard,
            ModeKind::Voice => Self::Voice,
        }
    }
}

/// Keyboard and voice controlled puzzle games in the terminal.
///
/// Lines made only of the letters w, a, s, d (moves), r (reshuffle),
/// m (switch input mode) and q (quit) act as key presses. Any other line is
/// treated as a recognized spoken phrase.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Game to play.
    #[arg(long, value_enum, default_value_t = GameKind::Slide)]
    pub game: GameKind,

    /// Side length of the sliding puzzle.
    #[arg(long, default_value_t = 3)]
    pub side: usize,

    /// Seed (64 hex characters) for the first sliding puzzle round.
    #[arg(long, value_name = "HEX")]
    pub seed: Option<ShuffleSeed>,

    /// How sliding puzzle rounds are shuffled.
    #[arg(long, value_enum, default_value_t = ShuffleKind::Walk)]
    pub shuffle: ShuffleKind,

    /// Number of blank moves in a walk shuffle.
    #[arg(long, default_value_t = DEFAULT_WALK_STEPS)]
    pub steps: usize,

    /// Recognition language (en, fa).
    #[arg(long, default_value = "en")]
    pub language: Language,

    /// Initial input mode.
    #[arg(long, value_enum, default_value_t = ModeKind::Keyboard)]
    pub input: ModeKind,

    /// Maze level file. Defaults to the built-in levels.
    #[arg(long, value_name = "FILE")]
    pub levels: Option<PathBuf>,

    /// Milliseconds per tick.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub tick_ms: u64,

    /// Stop after this many ticks.
    #[arg(long, value_name = "N")]
    pub max_ticks: Option<u64>,
}

impl Args {
    #[must_use]
    pub fn settings(&self) -> Settings {
        let shuffle = match self.shuffle {
            ShuffleKind::Walk => ShuffleStrategy::RandomWalk { steps: self.steps },
            ShuffleKind::Uniform => ShuffleStrategy::UniformPermutation,
        };
        Settings {
            game: self.game,
            slide: SlideSettings {
                side: self.side,
                shuffle,
                seed: self.seed,
            },
            maze: MazeSettings {
                levels: self.levels.clone(),
            },
            input: InputSettings {
                mode: self.input.into(),
                language: self.language,
                ..InputSettings::default()
            },
            timing: TimingSettings {
                tick: Duration::from_millis(self.tick_ms),
                max_ticks: self.max_ticks,
                ..TimingSettings::default()
            },
        }
    }
}
