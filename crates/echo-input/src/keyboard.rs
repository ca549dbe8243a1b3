//! Synchronous keyboard polling.

use echo_core::Direction;

use crate::Command;

/// The keys held down during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools)]
pub struct KeySnapshot {
    /// Up arrow.
    pub up: bool,
    /// Down arrow.
    pub down: bool,
    /// Left arrow.
    pub left: bool,
    /// Right arrow.
    pub right: bool,
    /// The reshuffle key.
    pub reshuffle: bool,
    /// The input mode toggle key.
    pub toggle_mode: bool,
    /// The quit key.
    pub quit: bool,
}

impl KeySnapshot {
    /// A snapshot with only the arrow for `direction` held.
    #[must_use]
    pub fn arrow(direction: Direction) -> Self {
        let mut keys = Self::default();
        match direction {
            Direction::Up => keys.up = true,
            Direction::Down => keys.down = true,
            Direction::Left => keys.left = true,
            Direction::Right => keys.right = true,
        }
        keys
    }

    /// Returns whether the arrow for `direction` is held.
    #[must_use]
    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Picks the single command for this tick.
    ///
    /// Priority is `Quit`, `ToggleInputMode`, `Reshuffle`, then the arrows in
    /// [`Direction::ALL`] order. Arrows are skipped when `arrows_enabled` is
    /// false.
    #[must_use]
    pub fn command(&self, arrows_enabled: bool) -> Option<Command> {
        if self.quit {
            return Some(Command::Quit);
        }
        if self.toggle_mode {
            return Some(Command::ToggleInputMode);
        }
        if self.reshuffle {
            return Some(Command::Reshuffle);
        }
        if !arrows_enabled {
            return None;
        }
        Direction::ALL
            .into_iter()
            .find(|&direction| self.is_held(direction))
            .map(Command::Move)
    }
}

/// A keyboard polled once per tick.
pub trait KeyboardSource {
    /// Returns the keys held right now.
    fn poll(&mut self) -> KeySnapshot;

    /// Returns whether the keyboard is gone for good.
    ///
    /// A closed keyboard only ever polls empty snapshots.
    fn is_closed(&self) -> bool {
        false
    }
}

/// A keyboard with no keys, for headless or voice-only setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyboard;

impl KeyboardSource for NoKeyboard {
    fn poll(&mut self) -> KeySnapshot {
        KeySnapshot::default()
    }

    fn is_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_priority() {
        let keys = KeySnapshot {
            down: true,
            left: true,
            right: true,
            ..KeySnapshot::default()
        };
        assert_eq!(keys.command(true), Some(Command::Move(Direction::Down)));

        let keys = KeySnapshot {
            up: true,
            right: true,
            ..KeySnapshot::default()
        };
        assert_eq!(keys.command(true), Some(Command::Move(Direction::Up)));
    }

    #[test]
    fn test_controls_beat_arrows() {
        let keys = KeySnapshot {
            up: true,
            reshuffle: true,
            ..KeySnapshot::default()
        };
        assert_eq!(keys.command(true), Some(Command::Reshuffle));

        let keys = KeySnapshot {
            quit: true,
            toggle_mode: true,
            ..KeySnapshot::default()
        };
        assert_eq!(keys.command(true), Some(Command::Quit));
    }

    #[test]
    fn test_disabled_arrows() {
        let keys = KeySnapshot::arrow(Direction::Left);
        assert_eq!(keys.command(false), None);
        assert_eq!(keys.command(true), Some(Command::Move(Direction::Left)));

        let keys = KeySnapshot {
            toggle_mode: true,
            ..KeySnapshot::arrow(Direction::Left)
        };
        assert_eq!(keys.command(false), Some(Command::ToggleInputMode));
    }

    #[test]
    fn test_no_keyboard() {
        assert_eq!(NoKeyboard.poll(), KeySnapshot::default());
        assert!(NoKeyboard.is_closed());
        assert_eq!(KeySnapshot::default().command(true), None);
    }
}
