//! The tick loop.
//!
//! Each tick polls the [`InputRouter`] once, feeds the result to the active
//! game, and redraws the view if anything changed. The loop never waits on
//! voice input; it only sleeps for the tick length and after a win.

use std::{fs, io::Write, thread};

use echo_game::{
    SessionEvent, SlideGame,
    maze::{BUILTIN_LEVELS, Maze, MazeEvent, MazeRun, parse_levels},
    riddle::{InMemoryRiddleStore, RiddleGame, RiddleOutcome, RiddleStore},
};
use echo_generator::ShuffleGenerator;
use echo_input::{
    InputMode, InputRouter, KeyboardSource, KeywordTable, Language, RoutedInput, SpeechRecognizer,
};

use crate::{
    AppError, Settings,
    settings::{GameKind, MazeSettings, SlideSettings, TimingSettings},
    view,
};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RunEnd {
    /// The player quit.
    Quit,
    /// The game reached its natural end.
    Completed,
    /// Input ended before the game did.
    InputClosed,
    /// The configured tick limit was reached.
    TickLimit,
}

/// Runs the configured game to completion.
///
/// The riddle game always listens; the other games start in the configured
/// input mode. The voice worker is stopped before returning.
pub fn run<K, R, W>(
    settings: &Settings,
    keyboard: K,
    recognizer: R,
    out: W,
) -> Result<RunEnd, AppError>
where
    K: KeyboardSource,
    R: SpeechRecognizer + Send + 'static,
    W: Write,
{
    let mode = match settings.game {
        GameKind::Riddle => InputMode::Voice,
        GameKind::Slide | GameKind::Maze => settings.input.mode,
    };
    let keywords = KeywordTable::for_language(settings.input.language);
    let mut router = InputRouter::new(keyboard, keywords, mode);
    router.start_voice(recognizer)?;
    log::info!(
        "starting {} ({}, input {mode})",
        settings.game,
        settings.input.language.locale()
    );

    let mut ticker = Ticker {
        router,
        out,
        timing: settings.timing.clone(),
        ticks: 0,
        status: String::new(),
    };
    let end = match settings.game {
        GameKind::Slide => ticker.slide(&settings.slide),
        GameKind::Maze => load_levels(&settings.maze).and_then(|levels| ticker.maze(levels)),
        GameKind::Riddle => ticker.riddle(InMemoryRiddleStore::seeded(), settings.input.language),
    };
    ticker.router.stop_voice();
    ticker.out.flush()?;
    log::info!("run ended after {} ticks: {end:?}", ticker.ticks);
    end
}

fn load_levels(settings: &MazeSettings) -> Result<Vec<Maze>, AppError> {
    let Some(path) = &settings.levels else {
        return Ok(parse_levels(BUILTIN_LEVELS)?);
    };
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadLevels {
        path: path.clone(),
        source,
    })?;
    Ok(parse_levels(&text)?)
}

struct Ticker<K, W> {
    router: InputRouter<K>,
    out: W,
    timing: TimingSettings,
    ticks: u64,
    status: String,
}

impl<K, W> Ticker<K, W>
where
    K: KeyboardSource,
    W: Write,
{
    fn next_input(&mut self) -> Result<RoutedInput, RunEnd> {
        if self.router.is_closed() {
            return Err(RunEnd::InputClosed);
        }
        if self.timing.max_ticks.is_some_and(|max| self.ticks >= max) {
            return Err(RunEnd::TickLimit);
        }
        if self.ticks > 0 {
            thread::sleep(self.timing.tick);
        }
        self.ticks += 1;
        Ok(self.router.poll())
    }

    /// Updates the status line from a tick's input. Returns whether it changed.
    fn update_status(&mut self, input: &RoutedInput) -> bool {
        if let Some(failure) = input.failure() {
            failure.status_message().clone_into(&mut self.status);
            true
        } else if input.command.is_some() && !self.status.is_empty() {
            self.status.clear();
            true
        } else {
            false
        }
    }

    fn win_pause(&self) {
        thread::sleep(self.timing.win_pause);
    }

    fn slide(&mut self, settings: &SlideSettings) -> Result<RunEnd, AppError> {
        let generator = ShuffleGenerator::new(settings.shuffle);
        let mut game = match settings.seed {
            Some(seed) => SlideGame::with_seed(settings.side, generator, seed)?,
            None => SlideGame::new(settings.side, generator)?,
        };
        view::slide(&mut self.out, &game, self.router.mode(), &self.status)?;

        loop {
            let input = match self.next_input() {
                Ok(input) => input,
                Err(end) => return Ok(end),
            };
            let mut changed = self.update_status(&input);
            if let Some(command) = input.command {
                match game.handle(command) {
                    SessionEvent::Quit => return Ok(RunEnd::Quit),
                    SessionEvent::ModeToggled => {
                        self.router.toggle_mode();
                        changed = true;
                    }
                    SessionEvent::Solved { .. } => {
                        view::slide(&mut self.out, &game, self.router.mode(), &self.status)?;
                        self.win_pause();
                        continue;
                    }
                    SessionEvent::Moved { .. } | SessionEvent::Reshuffled => changed = true,
                    SessionEvent::Blocked | SessionEvent::Ignored => {}
                }
            }
            if changed {
                view::slide(&mut self.out, &game, self.router.mode(), &self.status)?;
            }
        }
    }

    fn maze(&mut self, levels: Vec<Maze>) -> Result<RunEnd, AppError> {
        let mut run = MazeRun::new(levels)?;
        view::maze(&mut self.out, &run, self.router.mode(), &self.status)?;

        loop {
            let input = match self.next_input() {
                Ok(input) => input,
                Err(end) => return Ok(end),
            };
            let mut changed = self.update_status(&input);
            if let Some(command) = input.command {
                if command.is_toggle_input_mode() {
                    self.router.toggle_mode();
                    changed = true;
                }
                match run.handle(command) {
                    MazeEvent::Quit => return Ok(RunEnd::Quit),
                    MazeEvent::Finished => {
                        writeln!(self.out, "All levels done!")?;
                        return Ok(RunEnd::Completed);
                    }
                    MazeEvent::LevelComplete { level } => {
                        writeln!(self.out, "Level {} done!", level + 1)?;
                        self.win_pause();
                        changed = true;
                    }
                    MazeEvent::Moved { .. } => changed = true,
                    MazeEvent::Blocked | MazeEvent::Ignored => {}
                }
            }
            if changed {
                view::maze(&mut self.out, &run, self.router.mode(), &self.status)?;
            }
        }
    }

    fn riddle<S>(&mut self, store: S, language: Language) -> Result<RunEnd, AppError>
    where
        S: RiddleStore,
    {
        let mut game = RiddleGame::new(store, language);
        view::riddle(&mut self.out, &game)?;

        let mut end = RunEnd::Completed;
        while !game.is_finished() {
            if !self.router.is_listening() {
                end = RunEnd::InputClosed;
                break;
            }
            let input = match self.next_input() {
                Ok(input) => input,
                Err(reason) => {
                    end = reason;
                    break;
                }
            };
            let outcome = match (&input.voice, input.command) {
                (Some(event), _) => game.answer(event),
                (None, Some(command)) => game.handle_command(command),
                (None, None) => continue,
            };
            match outcome {
                RiddleOutcome::Ignored => continue,
                RiddleOutcome::Exited => end = RunEnd::Quit,
                _ => {}
            }
            view::riddle(&mut self.out, &game)?;
        }

        view::riddle_summary(&mut self.out, &game.summary())?;
        Ok(end)
    }
}
