use echo_core::{Direction, GridError, GridState, MoveOutcome};
use echo_generator::{GeneratedShuffle, ShuffleGenerator, ShuffleSeed};
use echo_input::Command;

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum RoundState {
    /// Moves are accepted.
    #[default]
    Playing,
    /// The grid reached the solved arrangement. Moves are ignored until the
    /// next reshuffle.
    Solved,
}

/// What a single [`SlideGame::handle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEvent {
    /// The blank moved from `from` to `to`.
    Moved {
        /// Blank index before the move.
        from: usize,
        /// Blank index after the move.
        to: usize,
    },
    /// The move would leave the grid.
    Blocked,
    /// The move solved the grid.
    Solved {
        /// Successful moves taken this round, including the winning one.
        moves: usize,
    },
    /// A new round started from a fresh shuffle.
    Reshuffled,
    /// The caller should switch input modes.
    ModeToggled,
    /// The caller should end the session.
    Quit,
    /// The command has no effect in the current state.
    Ignored,
}

/// A sliding puzzle session.
///
/// Owns the grid, the round state, and the generator used to start new
/// rounds. Every state change goes through [`handle`](Self::handle).
///
/// # Example
///
/// ```
/// use echo_core::Direction;
/// use echo_game::{SessionEvent, SlideGame};
/// use echo_generator::ShuffleGenerator;
/// use echo_input::Command;
///
/// let mut game = SlideGame::new(3, ShuffleGenerator::default())?;
/// assert!(!game.is_solved());
///
/// let event = game.handle(Command::Move(Direction::Up));
/// assert!(!event.is_ignored());
/// # Ok::<(), echo_core::GridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SlideGame {
    generator: ShuffleGenerator,
    grid: GridState,
    seed: Option<ShuffleSeed>,
    state: RoundState,
    moves: usize,
    round: usize,
}

impl SlideGame {
    /// Starts a session on a freshly shuffled grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSide`] if `side` is unsupported.
    pub fn new(side: usize, generator: ShuffleGenerator) -> Result<Self, GridError> {
        let shuffle = generator.shuffle(side)?;
        Ok(Self::from_shuffle(shuffle, generator))
    }

    /// Starts a session whose first round is reproduced from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSide`] if `side` is unsupported.
    pub fn with_seed(
        side: usize,
        generator: ShuffleGenerator,
        seed: ShuffleSeed,
    ) -> Result<Self, GridError> {
        let shuffle = generator.shuffle_with_seed(side, seed)?;
        Ok(Self::from_shuffle(shuffle, generator))
    }

    /// Starts a session on an explicit grid.
    ///
    /// A grid that is already solved starts in [`RoundState::Solved`].
    #[must_use]
    pub fn from_grid(grid: GridState, generator: ShuffleGenerator) -> Self {
        let state = if grid.is_solved() {
            RoundState::Solved
        } else {
            RoundState::Playing
        };
        Self {
            generator,
            grid,
            seed: None,
            state,
            moves: 0,
            round: 1,
        }
    }

    fn from_shuffle(shuffle: GeneratedShuffle, generator: ShuffleGenerator) -> Self {
        let GeneratedShuffle { grid, seed, .. } = shuffle;
        log::info!("round 1 (seed {seed})");
        Self {
            generator,
            grid,
            seed: Some(seed),
            state: RoundState::Playing,
            moves: 0,
            round: 1,
        }
    }

    /// Returns the current grid.
    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Returns the phase of the current round.
    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Returns whether the current grid is solved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Returns the number of successful moves this round.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Returns the 1-based round number.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns the seed of the current round, if it came from the generator.
    #[must_use]
    pub fn seed(&self) -> Option<ShuffleSeed> {
        self.seed
    }

    /// Applies one command.
    ///
    /// Quit, mode toggles, and reshuffles are accepted in every state. Moves
    /// are accepted only while [`RoundState::Playing`].
    pub fn handle(&mut self, command: Command) -> SessionEvent {
        match (self.state, command) {
            (_, Command::Quit) => SessionEvent::Quit,
            (_, Command::ToggleInputMode) => SessionEvent::ModeToggled,
            (_, Command::Reshuffle) => self.reshuffle(),
            (RoundState::Solved, Command::Move(_)) => SessionEvent::Ignored,
            (RoundState::Playing, Command::Move(direction)) => self.apply_move(direction),
        }
    }

    fn apply_move(&mut self, direction: Direction) -> SessionEvent {
        match self.grid.apply(direction) {
            MoveOutcome::Blocked => SessionEvent::Blocked,
            MoveOutcome::Moved { from, to } => {
                self.moves += 1;
                if self.grid.is_solved() {
                    self.state = RoundState::Solved;
                    log::info!("round {} solved in {} moves", self.round, self.moves);
                    SessionEvent::Solved { moves: self.moves }
                } else {
                    SessionEvent::Moved { from, to }
                }
            }
        }
    }

    fn reshuffle(&mut self) -> SessionEvent {
        let side = self.grid.side();
        let shuffle = match self.generator.shuffle(side) {
            Ok(shuffle) => shuffle,
            Err(err) => {
                log::error!("reshuffle failed: {err}");
                return SessionEvent::Ignored;
            }
        };
        self.grid = shuffle.grid;
        self.seed = Some(shuffle.seed);
        self.state = RoundState::Playing;
        self.moves = 0;
        self.round += 1;
        log::info!("round {} (seed {})", self.round, shuffle.seed);
        SessionEvent::Reshuffled
    }
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use echo_input::{
        InputMode, InputRouter, KeywordTable, Language, NoKeyboard, RecognitionFailure,
        RoutedInput, ScriptedRecognizer,
    };
    use proptest::prelude::*;

    use super::*;

    fn game(grid: &str) -> SlideGame {
        SlideGame::from_grid(grid.parse().unwrap(), ShuffleGenerator::default())
    }

    fn next_voice_input(router: &mut InputRouter<NoKeyboard>) -> RoutedInput {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let input = router.poll();
            if input.voice.is_some() {
                return input;
            }
            assert!(Instant::now() < deadline, "no voice event arrived");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_move_left_swaps_with_blank() {
        let mut game = game("0 1 _\n3 4 5\n6 7 2");
        assert_eq!(
            game.handle(Command::Move(Direction::Left)),
            SessionEvent::Moved { from: 2, to: 1 }
        );
        assert_eq!(game.grid().cells(), &[0, 8, 1, 3, 4, 5, 6, 7, 2]);
        assert_eq!(game.moves(), 1);
        assert!(game.state().is_playing());
    }

    #[test]
    fn test_winning_move_solves_round() {
        let mut game = game("0 1 2\n3 4 5\n6 _ 7");
        assert_eq!(
            game.handle(Command::Move(Direction::Right)),
            SessionEvent::Solved { moves: 1 }
        );
        assert!(game.is_solved());
        assert!(game.state().is_solved());

        // Moves are ignored until the next round.
        assert_eq!(
            game.handle(Command::Move(Direction::Left)),
            SessionEvent::Ignored
        );
        assert!(game.is_solved());
    }

    #[test]
    fn test_blocked_move_does_not_count() {
        let mut game = game("0 1 _\n3 4 5\n6 7 2");
        let before = game.grid().clone();
        assert_eq!(
            game.handle(Command::Move(Direction::Right)),
            SessionEvent::Blocked
        );
        assert_eq!(game.grid(), &before);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_reshuffle_starts_new_round() {
        let mut game = game("0 1 2\n3 4 5\n6 7 _");
        assert!(game.state().is_solved());
        assert_eq!(game.handle(Command::Reshuffle), SessionEvent::Reshuffled);
        assert!(game.state().is_playing());
        assert!(!game.is_solved());
        assert_eq!(game.round(), 2);
        assert_eq!(game.moves(), 0);
        assert!(game.seed().is_some());
        assert_eq!(game.grid().side(), 3);
    }

    #[test]
    fn test_control_commands_pass_through() {
        let mut game = game("0 1 2\n3 4 5\n6 _ 7");
        let before = game.grid().clone();
        assert_eq!(
            game.handle(Command::ToggleInputMode),
            SessionEvent::ModeToggled
        );
        assert_eq!(game.handle(Command::Quit), SessionEvent::Quit);
        assert_eq!(game.grid(), &before);
    }

    #[test]
    fn test_seeded_session_is_reproducible() {
        let seed: ShuffleSeed = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff"
            .parse()
            .unwrap();
        let a = SlideGame::with_seed(4, ShuffleGenerator::default(), seed).unwrap();
        let b = SlideGame::with_seed(4, ShuffleGenerator::default(), seed).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.seed(), Some(seed));
    }

    #[test]
    fn test_persian_voice_moves_blank_right() {
        let mut game = game("0 1 2\n3 _ 5\n6 7 4");
        assert_eq!(game.grid().blank_index(), 4);

        let mut router = InputRouter::new(
            NoKeyboard,
            KeywordTable::for_language(Language::Persian),
            InputMode::Voice,
        );
        router
            .start_voice(ScriptedRecognizer::from_phrases(["راست"]))
            .unwrap();

        let command = next_voice_input(&mut router).command.unwrap();
        game.handle(command);
        assert_eq!(game.grid().blank_index(), 5);
        router.stop_voice();
    }

    #[test]
    fn test_recognition_failure_leaves_grid_unchanged() {
        let mut game = game("0 1 2\n3 _ 5\n6 7 4");
        let before = game.grid().clone();

        let mut router = InputRouter::new(
            NoKeyboard,
            KeywordTable::for_language(Language::English),
            InputMode::Voice,
        );
        router
            .start_voice(ScriptedRecognizer::from_phrases([
                "__speech_not_understood__",
            ]))
            .unwrap();

        let input = next_voice_input(&mut router);
        assert_eq!(input.failure(), Some(RecognitionFailure::NotUnderstood));
        if let Some(command) = input.command {
            game.handle(command);
        }
        assert_eq!(game.grid(), &before);
        assert_eq!(game.moves(), 0);
        router.stop_voice();
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_moves_count_only_successful_moves(
            directions in prop::collection::vec(any_direction(), 0..64),
        ) {
            let mut game = SlideGame::new(3, ShuffleGenerator::default()).unwrap();
            let mut expected = 0;
            for direction in directions {
                match game.handle(Command::Move(direction)) {
                    SessionEvent::Moved { .. } | SessionEvent::Solved { .. } => expected += 1,
                    SessionEvent::Blocked | SessionEvent::Ignored => {}
                    event => prop_assert!(false, "unexpected event {event:?}"),
                }
                prop_assert_eq!(game.state().is_solved(), game.is_solved());
            }
            prop_assert_eq!(game.moves(), expected);

            let mut cells = game.grid().cells().to_vec();
            cells.sort_unstable();
            prop_assert_eq!(cells, (0..9).collect::<Vec<_>>());
        }
    }
}
