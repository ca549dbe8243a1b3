//! Tile mazes walked level by level.
//!
//! A level file holds one or more rectangular grids of tile digits:
//!
//! ```text
//! # level 1
//! 2 1 0
//! 0 1 3
//! # level 2
//! 2 1 1 3
//! ```
//!
//! `0` is a wall, `1` a path, `2` the start, and `3` the goal. Lines starting
//! with `#` separate levels and blank lines are ignored.

use std::{fmt, str::FromStr};

use echo_core::Position;

pub use self::run::{MazeEvent, MazeRun};

mod run;

/// Levels used when no level file is given.
pub const BUILTIN_LEVELS: &str = "\
# 1
2 1 0 0 0 0
0 1 1 1 1 0
0 0 0 0 1 0
0 1 1 1 1 0
0 1 0 0 0 0
0 1 1 1 1 3
# 2
2 0 1 1 1 0
1 0 1 0 1 0
1 1 1 0 1 0
0 0 0 0 1 0
1 1 1 1 1 0
1 0 0 0 1 3
";

/// One maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Tile {
    /// Impassable.
    Wall,
    /// Open floor.
    Path,
    /// Where the player enters the level.
    Start,
    /// Reaching this tile completes the level.
    Goal,
}

impl Tile {
    /// Returns the tile for a level-file digit.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Self::Wall),
            1 => Some(Self::Path),
            2 => Some(Self::Start),
            3 => Some(Self::Goal),
            _ => None,
        }
    }

    /// Returns the level-file digit for this tile.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Path => 1,
            Self::Start => 2,
            Self::Goal => 3,
        }
    }

    /// Returns whether the player may step onto this tile.
    ///
    /// The start tile cannot be re-entered once left.
    #[must_use]
    pub const fn is_enterable(self) -> bool {
        matches!(self, Self::Path | Self::Goal)
    }
}

/// Errors returned when building or parsing mazes.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MazeError {
    /// A token is not one of the tile digits.
    #[display("line {line}: invalid tile {token:?}")]
    InvalidTile {
        /// 1-based line number in the level file.
        line: usize,
        /// The rejected token.
        token: String,
    },
    /// A row's width differs from the first row of its level.
    #[display("level {level}, row {row}: expected {expected} tiles, found {actual}")]
    RaggedRow {
        /// 1-based level number.
        level: usize,
        /// 1-based row number within the level.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// The level has no tiles.
    #[display("level {level} is empty")]
    EmptyLevel {
        /// 1-based level number.
        level: usize,
    },
    /// The level has no start tile.
    #[display("level {level} has no start tile")]
    MissingStart {
        /// 1-based level number.
        level: usize,
    },
    /// The level has more than one start tile.
    #[display("level {level} has {count} start tiles")]
    MultipleStarts {
        /// 1-based level number.
        level: usize,
        /// Number of start tiles found.
        count: usize,
    },
    /// A single level was expected.
    #[display("expected one level, found {count}")]
    MultipleLevels {
        /// Number of levels found.
        count: usize,
    },
    /// The file contains no levels.
    #[display("no maze levels found")]
    NoLevels,
}

/// A rectangular maze level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: Position,
}

impl Maze {
    /// Builds a level from rows of tiles.
    ///
    /// `level` is the 1-based level number reported in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty or ragged, or if the level does
    /// not contain exactly one start tile.
    pub fn from_rows(level: usize, rows: Vec<Vec<Tile>>) -> Result<Self, MazeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(MazeError::EmptyLevel { level });
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(MazeError::RaggedRow {
                level,
                row: index + 1,
                expected: width,
                actual: row.len(),
            });
        }

        let tiles: Vec<Tile> = rows.into_iter().flatten().collect();
        let starts: Vec<usize> = tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_start())
            .map(|(index, _)| index)
            .collect();
        let start = match starts.as_slice() {
            [] => return Err(MazeError::MissingStart { level }),
            [index] => Position::from_index(*index, width),
            _ => {
                return Err(MazeError::MultipleStarts {
                    level,
                    count: starts.len(),
                });
            }
        };

        Ok(Self {
            width,
            height,
            tiles,
            start,
        })
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the start position.
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the tile at `pos`, or `None` if it is out of bounds.
    #[must_use]
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        if pos.row < self.height && pos.col < self.width {
            self.tiles.get(pos.to_index(self.width)).copied()
        } else {
            None
        }
    }

    /// Returns whether the player may step onto `pos`.
    #[must_use]
    pub fn is_enterable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(Tile::is_enterable)
    }

    /// Returns the rows of the level.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, tile) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", tile.digit())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut levels = parse_levels(s)?;
        match levels.len() {
            1 => Ok(levels.remove(0)),
            count => Err(MazeError::MultipleLevels { count }),
        }
    }
}

/// Parses every level in a level file.
///
/// # Errors
///
/// Returns the first malformed token or level, or [`MazeError::NoLevels`] if
/// the text holds no tiles at all.
pub fn parse_levels(text: &str) -> Result<Vec<Maze>, MazeError> {
    let mut levels = Vec::new();
    let mut rows: Vec<Vec<Tile>> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if !rows.is_empty() {
                levels.push(Maze::from_rows(levels.len() + 1, std::mem::take(&mut rows))?);
            }
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<u8>()
                    .ok()
                    .and_then(Tile::from_digit)
                    .ok_or_else(|| MazeError::InvalidTile {
                        line: index + 1,
                        token: token.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if !rows.is_empty() {
        levels.push(Maze::from_rows(levels.len() + 1, rows)?);
    }

    if levels.is_empty() {
        return Err(MazeError::NoLevels);
    }
    log::debug!("parsed {} maze levels", levels.len());
    Ok(levels)
}
