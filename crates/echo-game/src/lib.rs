//! Game sessions for Echo.
//!
//! Each session owns its state and advances only when the caller hands it a
//! command or a voice event, so it can be driven by any tick loop and tested
//! without a window, a microphone, or a clock.
//!
//! - [`SlideGame`]: the sliding puzzle (shuffle, move, win, reshuffle)
//! - [`maze`]: tile mazes walked level by level
//! - [`riddle`]: a spoken riddle quiz over a [`riddle::RiddleStore`]

pub mod maze;
pub mod riddle;
mod slide;

pub use self::slide::{RoundState, SessionEvent, SlideGame};
