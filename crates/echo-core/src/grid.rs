//! Sliding puzzle grid state, move engine, and win detection.

use std::{fmt, str::FromStr};

use crate::{Direction, Position};

/// Errors raised when building a [`GridState`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// The side is outside [`GridState::MIN_SIDE`]..=[`GridState::MAX_SIDE`].
    #[display("grid side must be between 2 and 16, got {side}")]
    InvalidSide {
        /// The rejected side.
        side: usize,
    },
    /// The number of cells does not equal `side²`.
    #[display("expected {expected} cells, got {actual}")]
    LengthMismatch {
        /// `side²`.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A label is not in `0..side²`.
    #[display("label {label} is out of range (max {max})")]
    LabelOutOfRange {
        /// The rejected label.
        label: usize,
        /// Largest valid label.
        max: usize,
    },
    /// A label occurs more than once.
    #[display("label {label} occurs more than once")]
    DuplicateLabel {
        /// The repeated label.
        label: usize,
    },
    /// A token of the text form is neither a number nor `_`.
    #[display("invalid cell token: {token:?}")]
    InvalidToken {
        /// The rejected token.
        token: String,
    },
    /// The text form does not contain a square number of cells.
    #[display("{count} cells do not form a square grid")]
    NotSquare {
        /// Number of tokens found.
        count: usize,
    },
}

/// The result of applying a [`Direction`] to a [`GridState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The blank moved; the displaced tile now sits at `from`.
    Moved {
        /// Blank index before the move.
        from: usize,
        /// Blank index after the move.
        to: usize,
    },
    /// The move would take the blank off the grid. Nothing changed.
    Blocked,
}

/// A sliding puzzle board.
///
/// `cells` is a row-major permutation of `0..side²`. The largest label,
/// `side² - 1`, is the blank. Every operation that mutates the grid swaps two
/// cells, so the permutation property always holds.
///
/// # Examples
///
/// ```
/// use echo_core::{Direction, GridState};
///
/// let mut grid: GridState = "0 1 2\n3 4 5\n6 _ 7".parse()?;
/// assert_eq!(grid.blank_index(), 7);
///
/// grid.apply(Direction::Right);
/// assert!(grid.is_solved());
/// # Ok::<(), echo_core::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridState {
    side: usize,
    cells: Vec<usize>,
    blank_index: usize,
}

impl GridState {
    /// Smallest supported side.
    pub const MIN_SIDE: usize = 2;
    /// Largest supported side.
    pub const MAX_SIDE: usize = 16;

    fn check_side(side: usize) -> Result<(), GridError> {
        if (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&side) {
            Ok(())
        } else {
            Err(GridError::InvalidSide { side })
        }
    }

    /// Creates the solved (identity) grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSide`] if `side` is not supported.
    pub fn solved(side: usize) -> Result<Self, GridError> {
        Self::check_side(side)?;
        let count = side * side;
        Ok(Self {
            side,
            cells: (0..count).collect(),
            blank_index: count - 1,
        })
    }

    /// Creates a grid from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is unsupported, the length is not `side²`, or
    /// `cells` is not a permutation of `0..side²`.
    pub fn from_cells(side: usize, cells: Vec<usize>) -> Result<Self, GridError> {
        Self::check_side(side)?;
        let count = side * side;
        if cells.len() != count {
            return Err(GridError::LengthMismatch {
                expected: count,
                actual: cells.len(),
            });
        }

        let mut seen = vec![false; count];
        for &label in &cells {
            if label >= count {
                return Err(GridError::LabelOutOfRange {
                    label,
                    max: count - 1,
                });
            }
            if seen[label] {
                return Err(GridError::DuplicateLabel { label });
            }
            seen[label] = true;
        }

        // A full permutation always contains the blank.
        let blank_index = cells
            .iter()
            .position(|&label| label == count - 1)
            .unwrap_or_default();

        Ok(Self {
            side,
            cells,
            blank_index,
        })
    }

    /// Returns the grid dimension.
    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns the number of cells, `side²`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Returns the label at `pos`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<usize> {
        if pos.row < self.side && pos.col < self.side {
            Some(self.cells[pos.to_index(self.side)])
        } else {
            None
        }
    }

    /// Returns the label used for the blank.
    #[must_use]
    pub fn blank_label(&self) -> usize {
        self.cells.len() - 1
    }

    /// Returns the index of the blank.
    #[must_use]
    pub fn blank_index(&self) -> usize {
        self.blank_index
    }

    /// Returns the position of the blank.
    #[must_use]
    pub fn blank_position(&self) -> Position {
        Position::from_index(self.blank_index, self.side)
    }

    /// Returns the index the blank would swap with, or `None` if the move is
    /// illegal from the current state.
    #[must_use]
    pub fn move_target(&self, direction: Direction) -> Option<usize> {
        let Position { row, col } = self.blank_position();
        let e = self.blank_index;
        match direction {
            Direction::Up => (row > 0).then(|| e - self.side),
            Direction::Down => (row < self.side - 1).then(|| e + self.side),
            Direction::Left => (col > 0).then(|| e - 1),
            Direction::Right => (col < self.side - 1).then(|| e + 1),
        }
    }

    /// Returns whether moving the blank in `direction` is legal.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        self.move_target(direction).is_some()
    }

    /// Returns the legal directions, in [`Direction::ALL`] order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.can_move(direction))
    }

    /// Moves the blank one cell in `direction`.
    ///
    /// Illegal moves are absorbed: the grid is left untouched and
    /// [`MoveOutcome::Blocked`] is returned.
    pub fn apply(&mut self, direction: Direction) -> MoveOutcome {
        let Some(target) = self.move_target(direction) else {
            log::trace!("blocked move {direction} (blank at {})", self.blank_index);
            return MoveOutcome::Blocked;
        };
        let from = self.blank_index;
        self.cells.swap(from, target);
        self.blank_index = target;
        MoveOutcome::Moved { from, to: target }
    }

    /// Returns a copy of the grid with `direction` applied.
    #[must_use]
    pub fn applied(&self, direction: Direction) -> Self {
        let mut next = self.clone();
        next.apply(direction);
        next
    }

    /// Returns `true` iff every cell holds its own index.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().enumerate().all(|(i, &label)| i == label)
    }

    /// Returns whether the solved grid is reachable by legal moves.
    ///
    /// Uses the inversion parity of the non-blank labels. On even sides the
    /// blank's distance from the bottom row is added, since every vertical move
    /// flips the inversion parity there.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        let blank = self.blank_label();
        let tiles: Vec<usize> = self
            .cells
            .iter()
            .copied()
            .filter(|&label| label != blank)
            .collect();
        let mut inversions = 0;
        for (i, &a) in tiles.iter().enumerate() {
            inversions += tiles[i + 1..].iter().filter(|&&b| b < a).count();
        }

        if self.side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let rows_from_bottom = self.side - 1 - self.blank_position().row;
            (inversions + rows_from_bottom) % 2 == 0
        }
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.blank_label().saturating_sub(1).to_string().len();
        for (row, chunk) in self.cells.chunks(self.side).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, &label) in chunk.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if label == self.blank_label() {
                    write!(f, "{:>width$}", "_")?;
                } else {
                    write!(f, "{label:>width$}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for GridState {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let count = tokens.len();
        let side = count.isqrt();
        if side * side != count {
            return Err(GridError::NotSquare { count });
        }
        Self::check_side(side)?;

        let blank = count - 1;
        let cells = tokens
            .into_iter()
            .map(|token| {
                if token == "_" {
                    Ok(blank)
                } else {
                    token.parse().map_err(|_| GridError::InvalidToken {
                        token: token.to_owned(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(side, cells)
    }
}
