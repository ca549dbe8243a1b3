//! Line-based terminal input.
//!
//! One reader thread splits input lines between a [`LineKeyboard`] and a
//! [`LineRecognizer`]. A line made only of key letters is one tick's
//! [`KeySnapshot`]; every other non-empty line stands in for a recognized
//! phrase, failure sentinels included.

use std::{
    io::{self, BufRead},
    sync::mpsc::{self, RecvTimeoutError, TryRecvError},
    thread,
    time::Duration,
};

use echo_input::{Heard, KeySnapshot, KeyboardSource, RecognitionFailure, SpeechRecognizer};

/// Parses a key line such as `"w"` or `"wd"`.
///
/// `w`, `s`, `a`, and `d` are the arrows; `r` reshuffles, `m` switches the
/// input mode, and `q` quits. Returns `None` unless every character is one of
/// these.
#[must_use]
pub fn parse_key_line(line: &str) -> Option<KeySnapshot> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut keys = KeySnapshot::default();
    for ch in line.chars() {
        match ch.to_ascii_lowercase() {
            'w' => keys.up = true,
            's' => keys.down = true,
            'a' => keys.left = true,
            'd' => keys.right = true,
            'r' => keys.reshuffle = true,
            'm' => keys.toggle_mode = true,
            'q' => keys.quit = true,
            _ => return None,
        }
    }
    Some(keys)
}

/// Key presses read from the terminal, one line per tick.
///
/// Closes once the input has ended and every key line has been polled.
#[derive(Debug)]
pub struct LineKeyboard {
    keys: mpsc::Receiver<KeySnapshot>,
    closed: bool,
}

impl KeyboardSource for LineKeyboard {
    fn poll(&mut self) -> KeySnapshot {
        match self.keys.try_recv() {
            Ok(keys) => keys,
            Err(TryRecvError::Empty) => KeySnapshot::default(),
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    log::debug!("keyboard closed");
                    self.closed = true;
                }
                KeySnapshot::default()
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Phrases read from the terminal.
#[derive(Debug)]
pub struct LineRecognizer {
    lines: mpsc::Receiver<String>,
    window: Duration,
}

impl SpeechRecognizer for LineRecognizer {
    fn listen(&mut self) -> Result<Heard, RecognitionFailure> {
        match self.lines.recv_timeout(self.window) {
            Ok(line) => Ok(Heard::Phrase(line)),
            Err(RecvTimeoutError::Timeout) => Ok(Heard::Silence),
            Err(RecvTimeoutError::Disconnected) => Ok(Heard::Closed),
        }
    }
}

/// Starts a thread splitting `reader`'s lines between keys and phrases.
///
/// The recognizer reports silence after `window` without a phrase and closes
/// at end of input.
///
/// # Errors
///
/// Returns an error if the reader thread cannot be spawned.
pub fn spawn_reader<R>(reader: R, window: Duration) -> io::Result<(LineKeyboard, LineRecognizer)>
where
    R: BufRead + Send + 'static,
{
    let (key_tx, keys) = mpsc::channel();
    let (line_tx, lines) = mpsc::channel();
    thread::Builder::new()
        .name("echo-stdin".to_owned())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log::warn!("stdin: {err}");
                        break;
                    }
                };
                if let Some(snapshot) = parse_key_line(&line) {
                    let _ = key_tx.send(snapshot);
                } else if !line.trim().is_empty() {
                    let _ = line_tx.send(line);
                }
            }
            log::debug!("stdin closed");
            // Keys close first so a closed recognizer implies a closed keyboard.
            drop(key_tx);
            drop(line_tx);
        })?;
    let keyboard = LineKeyboard {
        keys,
        closed: false,
    };
    Ok((keyboard, LineRecognizer { lines, window }))
}
