use echo_core::{Direction, Position};
use echo_input::Command;

use super::{Maze, MazeError, Tile};

/// What a single [`MazeRun`] step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MazeEvent {
    /// The player moved to `to`.
    Moved {
        /// New player position.
        to: Position,
    },
    /// The step hit a wall, the start tile, or the edge.
    Blocked,
    /// The player reached the goal of `level` (0-based); the next level has
    /// been loaded.
    LevelComplete {
        /// Index of the completed level.
        level: usize,
    },
    /// The player reached the goal of the last level.
    Finished,
    /// The caller should end the session.
    Quit,
    /// The command has no effect in the current state.
    Ignored,
}

/// A playthrough of a sequence of maze levels.
#[derive(Debug, Clone)]
pub struct MazeRun {
    levels: Vec<Maze>,
    level: usize,
    player: Position,
    finished: bool,
}

impl MazeRun {
    /// Starts at the first level's start tile.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::NoLevels`] if `levels` is empty.
    pub fn new(levels: Vec<Maze>) -> Result<Self, MazeError> {
        let player = levels.first().ok_or(MazeError::NoLevels)?.start();
        Ok(Self {
            levels,
            level: 0,
            player,
            finished: false,
        })
    }

    /// Returns the level being played, or the last level once finished.
    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.levels[self.level]
    }

    /// Returns the 0-based index of the current level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Returns the player's position.
    #[must_use]
    pub fn player(&self) -> Position {
        self.player
    }

    /// Returns whether the last goal has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Applies one command. Only moves and quit have an effect.
    pub fn handle(&mut self, command: Command) -> MazeEvent {
        match command {
            Command::Move(direction) => self.step(direction),
            Command::Quit => MazeEvent::Quit,
            Command::Reshuffle | Command::ToggleInputMode => MazeEvent::Ignored,
        }
    }

    /// Moves the player one tile if the target can be entered.
    pub fn step(&mut self, direction: Direction) -> MazeEvent {
        if self.finished {
            return MazeEvent::Ignored;
        }
        let maze = self.maze();
        let Some(target) = self
            .player
            .step(direction, maze.width(), maze.height())
            .filter(|&pos| maze.is_enterable(pos))
        else {
            return MazeEvent::Blocked;
        };
        let reached_goal = maze.tile(target) == Some(Tile::Goal);

        self.player = target;
        if !reached_goal {
            return MazeEvent::Moved { to: target };
        }

        let completed = self.level;
        log::info!("maze level {} done", completed + 1);
        if completed + 1 < self.levels.len() {
            self.level += 1;
            self.player = self.maze().start();
            MazeEvent::LevelComplete { level: completed }
        } else {
            self.finished = true;
            MazeEvent::Finished
        }
    }
}
