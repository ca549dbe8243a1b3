//! The Echo terminal front end.
//!
//! Settings come from the command line, input comes from stdin lines, and each
//! game is driven by a fixed-rate tick loop that prints a text view whenever
//! the state changes.
#![allow(missing_docs, clippy::missing_errors_doc)]

pub mod cli;
pub mod error;
pub mod runner;
pub mod settings;
pub mod terminal;
mod view;

pub use self::{
    error::AppError,
    runner::{RunEnd, run},
    settings::Settings,
};
