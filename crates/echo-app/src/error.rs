//! Application errors.

use std::{io, path::PathBuf};

use echo_core::GridError;
use echo_game::maze::MazeError;
use echo_input::VoiceError;

/// Errors that end an Echo run.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AppError {
    /// Writing the view failed.
    #[display("output error: {_0}")]
    Io(#[from] io::Error),
    /// The slide puzzle could not be set up.
    #[display("{_0}")]
    Grid(#[from] GridError),
    /// The maze levels are malformed.
    #[display("{_0}")]
    Maze(#[from] MazeError),
    /// The voice worker could not be started.
    #[display("{_0}")]
    Voice(#[from] VoiceError),
    /// The maze level file could not be read.
    #[display("failed to read maze levels from {}: {source}", path.display())]
    ReadLevels {
        /// The level file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}
