//! Background speech recognition.
//!
//! A [`VoiceListener`] owns one worker thread that repeatedly calls
//! [`SpeechRecognizer::listen`] and forwards each result as a [`VoiceEvent`]
//! through an mpsc channel. The worker is the only producer and the tick loop
//! the only consumer; nothing else is shared between the two threads.

use std::{
    collections::VecDeque,
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, TryRecvError},
    },
    thread::{self, JoinHandle},
};

use crate::normalize_phrase;

/// A recognition attempt that produced no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
pub enum RecognitionFailure {
    /// Audio was captured but could not be transcribed.
    #[display("speech not understood")]
    NotUnderstood,
    /// The recognition service could not be reached.
    #[display("speech service error")]
    ServiceError,
    /// Anything else went wrong.
    #[display("unknown recognition error")]
    Unknown,
}

impl RecognitionFailure {
    /// All failure kinds.
    pub const ALL: [Self; 3] = [Self::NotUnderstood, Self::ServiceError, Self::Unknown];

    /// Returns the sentinel token recognizers use for this failure in text form.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::NotUnderstood => "__speech_not_understood__",
            Self::ServiceError => "__speech_service_error__",
            Self::Unknown => "__unknown_error__",
        }
    }

    /// Parses a sentinel token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|failure| failure.token() == token)
    }

    /// Returns the transient status line shown to the player.
    #[must_use]
    pub const fn status_message(self) -> &'static str {
        match self {
            Self::NotUnderstood => "Didn't catch that.",
            Self::ServiceError => "Connection problem.",
            Self::Unknown => "An unknown error occurred.",
        }
    }
}

/// One item delivered by the voice worker.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum VoiceEvent {
    /// A normalised recognized phrase.
    Phrase(String),
    /// Recognition failed for this utterance.
    Failure(RecognitionFailure),
}

impl VoiceEvent {
    /// Builds an event from raw recognizer text, decoding failure sentinels.
    #[must_use]
    pub fn from_raw(text: &str) -> Self {
        match RecognitionFailure::from_token(text) {
            Some(failure) => Self::Failure(failure),
            None => Self::Phrase(normalize_phrase(text)),
        }
    }

    /// Returns the phrase, if any.
    #[must_use]
    pub fn phrase(&self) -> Option<&str> {
        match self {
            Self::Phrase(phrase) => Some(phrase),
            Self::Failure(_) => None,
        }
    }
}

/// The non-failure results of a single [`SpeechRecognizer::listen`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// Recognized text.
    Phrase(String),
    /// Nothing was said in this listening window.
    Silence,
    /// The input device is gone; the worker shuts down.
    Closed,
}

/// A speech-to-text service.
///
/// `listen` blocks for at most one listening window and must return
/// regularly, with [`Heard::Silence`] if nothing was said, so the worker can
/// notice a stop request. The recognizer is dropped on the worker thread when
/// the listener stops, which releases whatever device it holds.
pub trait SpeechRecognizer {
    /// Listens for one utterance.
    ///
    /// # Errors
    ///
    /// Returns a [`RecognitionFailure`] when audio was captured but produced no
    /// usable text.
    fn listen(&mut self) -> Result<Heard, RecognitionFailure>;
}

impl<R> SpeechRecognizer for Box<R>
where
    R: SpeechRecognizer + ?Sized,
{
    fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
        (**self).listen()
    }
}

/// A recognizer that replays a fixed sequence of results, then reports
/// [`Heard::Closed`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecognizer {
    script: VecDeque<Result<Heard, RecognitionFailure>>,
}

impl ScriptedRecognizer {
    /// Creates a recognizer from explicit results.
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<Heard, RecognitionFailure>>,
    {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Creates a recognizer that hears each phrase once, decoding failure
    /// sentinels the same way [`VoiceEvent::from_raw`] does.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phrases.into_iter().map(|phrase| {
            let phrase = phrase.into();
            match RecognitionFailure::from_token(&phrase) {
                Some(failure) => Err(failure),
                None => Ok(Heard::Phrase(phrase)),
            }
        }))
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
        self.script.pop_front().unwrap_or(Ok(Heard::Closed))
    }
}

/// Errors reported by a [`VoiceListener`].
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum VoiceError {
    /// The worker thread could not be spawned.
    #[display("failed to start voice worker: {_0}")]
    Spawn(#[from] io::Error),
    /// The worker has exited and every queued event has been delivered.
    #[display("voice worker disconnected")]
    Disconnected,
}

/// Handle to a running voice recognition worker.
///
/// Dropping the handle stops the worker.
#[derive(Debug)]
pub struct VoiceListener {
    receiver: mpsc::Receiver<VoiceEvent>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl VoiceListener {
    /// Starts a worker thread driving `recognizer`.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Spawn`] if the thread cannot be created.
    pub fn spawn<R>(recognizer: R) -> Result<Self, VoiceError>
    where
        R: SpeechRecognizer + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("echo-voice".to_owned())
            .spawn(move || run_worker(recognizer, &sender, &worker_stop))?;
        log::info!("voice listener started");
        Ok(Self {
            receiver,
            stop,
            handle: Some(handle),
        })
    }

    /// Takes the oldest pending event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Disconnected`] once the worker has exited and the
    /// queue is drained.
    pub fn try_next(&self) -> Result<Option<VoiceEvent>, VoiceError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(VoiceError::Disconnected),
        }
    }

    /// Returns whether the worker thread is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Calling this more than once is harmless.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("voice worker panicked");
            }
            log::info!("voice listener stopped");
        }
    }
}

impl Drop for VoiceListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<R>(mut recognizer: R, sender: &mpsc::Sender<VoiceEvent>, stop: &AtomicBool)
where
    R: SpeechRecognizer,
{
    while !stop.load(Ordering::Acquire) {
        let event = match recognizer.listen() {
            Ok(Heard::Phrase(text)) => VoiceEvent::from_raw(&text),
            Ok(Heard::Silence) => continue,
            Ok(Heard::Closed) => {
                log::debug!("speech recognizer closed");
                break;
            }
            Err(failure) => {
                log::warn!("recognition failed: {failure}");
                VoiceEvent::Failure(failure)
            }
        };
        log::debug!("voice event: {event:?}");
        if sender.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn drain(listener: &VoiceListener) -> Vec<VoiceEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        loop {
            match listener.try_next() {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {
                    assert!(Instant::now() < deadline, "voice worker did not finish");
                    thread::sleep(Duration::from_millis(1));
                }
                Err(VoiceError::Disconnected) => return events,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn test_sentinel_tokens() {
        for failure in RecognitionFailure::ALL {
            assert_eq!(RecognitionFailure::from_token(failure.token()), Some(failure));
        }
        assert_eq!(RecognitionFailure::from_token("left"), None);
        assert_eq!(
            VoiceEvent::from_raw("__speech_not_understood__"),
            VoiceEvent::Failure(RecognitionFailure::NotUnderstood)
        );
        assert_eq!(
            VoiceEvent::from_raw("  Up "),
            VoiceEvent::Phrase("up".to_owned())
        );
    }

    #[test]
    fn test_event_phrase() {
        assert_eq!(VoiceEvent::from_raw(" Go LEFT ").phrase(), Some("go left"));
        assert_eq!(
            VoiceEvent::Failure(RecognitionFailure::ServiceError).phrase(),
            None
        );
    }

    #[test]
    fn test_listener_delivers_events_in_order() {
        let recognizer = ScriptedRecognizer::new([
            Ok(Heard::Phrase("One".to_owned())),
            Ok(Heard::Silence),
            Err(RecognitionFailure::ServiceError),
            Ok(Heard::Phrase("two".to_owned())),
        ]);
        let mut listener = VoiceListener::spawn(recognizer).unwrap();

        assert_eq!(
            drain(&listener),
            vec![
                VoiceEvent::Phrase("one".to_owned()),
                VoiceEvent::Failure(RecognitionFailure::ServiceError),
                VoiceEvent::Phrase("two".to_owned()),
            ]
        );
        listener.stop();
        assert!(!listener.is_running());
    }

    #[test]
    fn test_from_phrases_decodes_sentinels() {
        let mut recognizer = ScriptedRecognizer::from_phrases(["left", "__unknown_error__"]);
        assert_eq!(recognizer.listen(), Ok(Heard::Phrase("left".to_owned())));
        assert_eq!(recognizer.listen(), Err(RecognitionFailure::Unknown));
        assert_eq!(recognizer.listen(), Ok(Heard::Closed));
    }

    struct EndlessSilence;

    impl SpeechRecognizer for EndlessSilence {
        fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
            thread::sleep(Duration::from_millis(1));
            Ok(Heard::Silence)
        }
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut listener = VoiceListener::spawn(EndlessSilence).unwrap();
        assert!(listener.is_running());

        listener.stop();
        assert!(!listener.is_running());
        listener.stop();

        assert!(matches!(listener.try_next(), Err(VoiceError::Disconnected)));
    }

    struct DeviceHandle {
        released: Arc<AtomicBool>,
    }

    impl SpeechRecognizer for DeviceHandle {
        fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
            thread::sleep(Duration::from_millis(1));
            Ok(Heard::Silence)
        }
    }

    impl Drop for DeviceHandle {
        fn drop(&mut self) {
            self.released.store(true, Ordering::Release);
        }
    }

    #[test]
    fn test_stop_releases_recognizer() {
        let released = Arc::new(AtomicBool::new(false));
        let mut listener = VoiceListener::spawn(DeviceHandle {
            released: Arc::clone(&released),
        })
        .unwrap();
        assert!(!released.load(Ordering::Acquire));

        listener.stop();
        assert!(released.load(Ordering::Acquire));
    }

    #[test]
    fn test_drop_releases_recognizer() {
        let released = Arc::new(AtomicBool::new(false));
        let listener = VoiceListener::spawn(DeviceHandle {
            released: Arc::clone(&released),
        })
        .unwrap();
        drop(listener);
        assert!(released.load(Ordering::Acquire));
    }
}
