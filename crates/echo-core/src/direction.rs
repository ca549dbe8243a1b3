//! Cardinal move directions.

/// A direction the blank moves in.
///
/// Moving the blank `Up` slides the tile above it down into the hole, and so on.
///
/// # Examples
///
/// ```
/// use echo_core::Direction;
///
/// assert_eq!(Direction::Up.opposite(), Direction::Down);
/// for dir in Direction::ALL {
///     assert_eq!(dir.opposite().opposite(), dir);
/// }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum Direction {
    /// Towards row 0.
    #[display("up")]
    Up,
    /// Towards the last row.
    #[display("down")]
    Down,
    /// Towards column 0.
    #[display("left")]
    Left,
    /// Towards the last column.
    #[display("right")]
    Right,
}

impl Direction {
    /// All directions, in the priority order used for tie-breaking.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the direction that undoes this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(row, col)` delta of one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}
