//! Merging keyboard and voice input into one command per tick.

use crate::{
    Command, KeyboardSource, KeywordTable, RecognitionFailure, SpeechRecognizer, VoiceError,
    VoiceEvent, VoiceListener,
};

/// Which source drives movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display, derive_more::IsVariant)]
pub enum InputMode {
    /// Arrow keys move; voice is not drained.
    #[default]
    #[display("keyboard")]
    Keyboard,
    /// Recognized phrases move; arrow keys are ignored.
    #[display("voice")]
    Voice,
}

impl InputMode {
    /// Switches to the other mode.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Keyboard => Self::Voice,
            Self::Voice => Self::Keyboard,
        };
    }
}

/// What the router produced for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutedInput {
    /// The decoded command, if any.
    pub command: Option<Command>,
    /// The voice event consumed this tick, if any.
    pub voice: Option<VoiceEvent>,
}

impl RoutedInput {
    /// Returns the recognition failure consumed this tick, if any.
    #[must_use]
    pub fn failure(&self) -> Option<RecognitionFailure> {
        match self.voice {
            Some(VoiceEvent::Failure(failure)) => Some(failure),
            _ => None,
        }
    }
}

/// Merges a polled keyboard and a background voice listener.
///
/// Each [`poll`](Self::poll) reads the keyboard once. If the keys yield a
/// command it is returned and the voice queue is left untouched. Otherwise, in
/// [`InputMode::Voice`], at most one queued voice event is taken and decoded
/// with the keyword table. Events that are not taken wait for later ticks in
/// arrival order.
#[derive(Debug)]
pub struct InputRouter<K> {
    keyboard: K,
    keywords: KeywordTable,
    mode: InputMode,
    voice: Option<VoiceListener>,
}

impl<K> InputRouter<K>
where
    K: KeyboardSource,
{
    /// Creates a router without an active voice session.
    #[must_use]
    pub fn new(keyboard: K, keywords: KeywordTable, mode: InputMode) -> Self {
        Self {
            keyboard,
            keywords,
            mode,
            voice: None,
        }
    }

    /// Returns the current input mode.
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Sets the input mode.
    pub fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            log::info!("input mode: {mode}");
        }
        self.mode = mode;
    }

    /// Switches the input mode and returns the new one.
    pub fn toggle_mode(&mut self) -> InputMode {
        let mut mode = self.mode;
        mode.toggle();
        self.set_mode(mode);
        mode
    }

    /// Returns the keyword table.
    #[must_use]
    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Replaces the keyword table, e.g. after a language change.
    pub fn set_keywords(&mut self, keywords: KeywordTable) {
        self.keywords = keywords;
    }

    /// Starts a voice session, stopping any previous one first.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Spawn`] if the worker thread cannot be created.
    pub fn start_voice<R>(&mut self, recognizer: R) -> Result<(), VoiceError>
    where
        R: SpeechRecognizer + Send + 'static,
    {
        self.stop_voice();
        self.voice = Some(VoiceListener::spawn(recognizer)?);
        Ok(())
    }

    /// Stops the voice session, if any. Safe to call repeatedly.
    pub fn stop_voice(&mut self) {
        if let Some(mut listener) = self.voice.take() {
            listener.stop();
        }
    }

    /// Returns whether a voice session is attached.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.voice.is_some()
    }

    /// Returns whether no further input can arrive.
    ///
    /// This holds once the keyboard is closed and voice cannot deliver
    /// anything more: either no session is attached, or the router is in
    /// keyboard mode and the voice queue would never be drained. In voice mode
    /// a finished session still counts as open until its queue has been drained
    /// and it is detached.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.keyboard.is_closed() && (self.voice.is_none() || self.mode.is_keyboard())
    }

    /// Produces the input for one tick. Never blocks.
    pub fn poll(&mut self) -> RoutedInput {
        let keys = self.keyboard.poll();
        if let Some(command) = keys.command(self.mode.is_keyboard()) {
            return RoutedInput {
                command: Some(command),
                voice: None,
            };
        }

        if !self.mode.is_voice() {
            return RoutedInput::default();
        }
        let Some(listener) = &self.voice else {
            return RoutedInput::default();
        };

        match listener.try_next() {
            Ok(Some(event)) => {
                let command = match &event {
                    VoiceEvent::Phrase(phrase) => self.keywords.decode(phrase),
                    VoiceEvent::Failure(_) => None,
                };
                log::debug!("voice {event:?} -> {command:?}");
                RoutedInput {
                    command,
                    voice: Some(event),
                }
            }
            Ok(None) => RoutedInput::default(),
            Err(err) => {
                log::warn!("{err}");
                self.stop_voice();
                RoutedInput::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
        time::{Duration, Instant},
    };

    use echo_core::Direction;

    use super::*;
    use crate::{Heard, KeySnapshot, Language, NoKeyboard, ScriptedRecognizer};

    #[derive(Debug, Default)]
    struct ScriptedKeyboard {
        ticks: VecDeque<KeySnapshot>,
    }

    impl KeyboardSource for ScriptedKeyboard {
        fn poll(&mut self) -> KeySnapshot {
            self.ticks.pop_front().unwrap_or_default()
        }
    }

    /// Closes once its scripted ticks run out.
    #[derive(Debug, Default)]
    struct ClosingKeyboard {
        ticks: VecDeque<KeySnapshot>,
    }

    impl KeyboardSource for ClosingKeyboard {
        fn poll(&mut self) -> KeySnapshot {
            self.ticks.pop_front().unwrap_or_default()
        }

        fn is_closed(&self) -> bool {
            self.ticks.is_empty()
        }
    }

    /// Hears silence until stopped and flags its own drop.
    struct Microphone {
        released: Arc<AtomicBool>,
    }

    impl SpeechRecognizer for Microphone {
        fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
            thread::sleep(Duration::from_millis(1));
            Ok(Heard::Silence)
        }
    }

    impl Drop for Microphone {
        fn drop(&mut self) {
            self.released.store(true, Ordering::Release);
        }
    }

    fn poll_until_voice<K: KeyboardSource>(router: &mut InputRouter<K>) -> RoutedInput {
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

    fn voice_router(phrases: &[&str], language: Language) -> InputRouter<NoKeyboard> {
        let mut router = InputRouter::new(
            NoKeyboard,
            KeywordTable::for_language(language),
            InputMode::Voice,
        );
        router
            .start_voice(ScriptedRecognizer::from_phrases(phrases.iter().copied()))
            .unwrap();
        router
    }

    #[test]
    fn test_persian_right_phrase_becomes_move() {
        let mut router = voice_router(&["راست"], Language::Persian);
        let input = poll_until_voice(&mut router);
        assert_eq!(input.command, Some(Command::Move(Direction::Right)));
    }

    #[test]
    fn test_not_understood_yields_no_command() {
        let mut router = voice_router(&["__speech_not_understood__"], Language::English);
        let input = poll_until_voice(&mut router);
        assert_eq!(input.command, None);
        assert_eq!(input.failure(), Some(RecognitionFailure::NotUnderstood));
    }

    #[test]
    fn test_voice_events_arrive_one_per_tick_in_order() {
        let mut router = voice_router(&["up", "hello", "left", "exit"], Language::English);
        let commands: Vec<_> = (0..4)
            .map(|_| poll_until_voice(&mut router).command)
            .collect();
        assert_eq!(
            commands,
            vec![
                Some(Command::Move(Direction::Up)),
                None,
                Some(Command::Move(Direction::Left)),
                Some(Command::Quit),
            ]
        );
    }

    #[test]
    fn test_keyboard_mode_ignores_voice_queue() {
        let mut router = voice_router(&["up"], Language::English);
        router.set_mode(InputMode::Keyboard);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(router.poll(), RoutedInput::default());

        router.set_mode(InputMode::Voice);
        let input = poll_until_voice(&mut router);
        assert_eq!(input.command, Some(Command::Move(Direction::Up)));
    }

    #[test]
    fn test_keyboard_command_defers_voice_event() {
        let keyboard = ScriptedKeyboard {
            ticks: VecDeque::from([KeySnapshot {
                toggle_mode: true,
                ..KeySnapshot::default()
            }]),
        };
        let mut router = InputRouter::new(
            keyboard,
            KeywordTable::for_language(Language::English),
            InputMode::Voice,
        );
        router
            .start_voice(ScriptedRecognizer::from_phrases(["down"]))
            .unwrap();
        thread::sleep(Duration::from_millis(20));

        let first = router.poll();
        assert_eq!(first.command, Some(Command::ToggleInputMode));
        assert_eq!(first.voice, None);

        let second = poll_until_voice(&mut router);
        assert_eq!(second.command, Some(Command::Move(Direction::Down)));
    }

    #[test]
    fn test_arrows_only_in_keyboard_mode() {
        let keyboard = ScriptedKeyboard {
            ticks: VecDeque::from([
                KeySnapshot::arrow(Direction::Right),
                KeySnapshot::arrow(Direction::Right),
            ]),
        };
        let mut router = InputRouter::new(keyboard, KeywordTable::new(), InputMode::Keyboard);
        assert_eq!(
            router.poll().command,
            Some(Command::Move(Direction::Right))
        );
        assert_eq!(router.toggle_mode(), InputMode::Voice);
        assert_eq!(router.poll().command, None);
    }

    #[test]
    fn test_stop_voice_without_session_is_harmless() {
        let mut router = InputRouter::new(NoKeyboard, KeywordTable::new(), InputMode::Voice);
        router.stop_voice();
        router.stop_voice();
        assert!(!router.is_listening());
        assert!(router.is_closed());
        assert_eq!(router.poll(), RoutedInput::default());
    }

    #[test]
    fn test_finished_recognizer_detaches() {
        let mut router = voice_router(&["up"], Language::English);
        poll_until_voice(&mut router);

        let deadline = Instant::now() + Duration::from_secs(5);
        while router.is_listening() {
            assert!(Instant::now() < deadline, "listener never detached");
            router.poll();
            thread::sleep(Duration::from_millis(1));
        }
        router.stop_voice();
    }

    #[test]
    fn test_keyword_table_can_be_swapped() {
        let mut router = voice_router(&["راست"], Language::English);
        assert_eq!(router.keywords().decode("right"), Some(Command::Move(Direction::Right)));
        assert_eq!(router.keywords().decode("راست"), None);

        router.set_keywords(KeywordTable::for_language(Language::Persian));
        assert_eq!(router.keywords().decode("راست"), Some(Command::Move(Direction::Right)));
        let input = poll_until_voice(&mut router);
        assert_eq!(input.command, Some(Command::Move(Direction::Right)));
    }

    #[test]
    fn test_stop_voice_releases_recognizer() {
        let released = Arc::new(AtomicBool::new(false));
        let mut router = InputRouter::new(NoKeyboard, KeywordTable::new(), InputMode::Voice);
        router
            .start_voice(Microphone {
                released: Arc::clone(&released),
            })
            .unwrap();
        assert!(router.is_listening());
        assert!(!released.load(Ordering::Acquire));

        router.stop_voice();
        assert!(released.load(Ordering::Acquire));
        assert!(!router.is_listening());

        router.stop_voice();
        assert!(!router.is_listening());
        assert_eq!(router.poll(), RoutedInput::default());
    }

    #[test]
    fn test_restarting_voice_releases_previous_recognizer() {
        let first = Arc::new(AtomicBool::new(false));
        let mut router = InputRouter::new(NoKeyboard, KeywordTable::new(), InputMode::Voice);
        router
            .start_voice(Microphone {
                released: Arc::clone(&first),
            })
            .unwrap();
        router.start_voice(ScriptedRecognizer::default()).unwrap();
        assert!(first.load(Ordering::Acquire));
        assert!(router.is_listening());
        router.stop_voice();
    }

    #[test]
    fn test_closed_keyboard_in_keyboard_mode_closes_router() {
        let keyboard = ClosingKeyboard {
            ticks: VecDeque::from([KeySnapshot::arrow(Direction::Up)]),
        };
        let mut router = InputRouter::new(keyboard, KeywordTable::new(), InputMode::Keyboard);
        router
            .start_voice(Microphone {
                released: Arc::new(AtomicBool::new(false)),
            })
            .unwrap();
        assert!(!router.is_closed());

        assert_eq!(router.poll().command, Some(Command::Move(Direction::Up)));
        assert!(router.is_closed());
        router.stop_voice();
    }

    #[test]
    fn test_voice_mode_stays_open_until_queue_is_drained() {
        let mut router = InputRouter::new(
            ClosingKeyboard::default(),
            KeywordTable::for_language(Language::English),
            InputMode::Voice,
        );
        router
            .start_voice(ScriptedRecognizer::from_phrases(["down"]))
            .unwrap();
        assert!(!router.is_closed());

        let input = poll_until_voice(&mut router);
        assert_eq!(input.command, Some(Command::Move(Direction::Down)));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !router.is_closed() {
            assert!(Instant::now() < deadline, "router never closed");
            router.poll();
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!router.is_listening());
    }
}
