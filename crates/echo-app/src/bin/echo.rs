//! Echo terminal entry point.

use std::{
    io::{self, BufReader},
    process::ExitCode,
};

use clap::Parser as _;
use echo_app::{cli::Args, terminal};

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let settings = Args::parse().settings();
    let (keyboard, recognizer) = match terminal::spawn_reader(
        BufReader::new(io::stdin()),
        settings.input.listen_window,
    ) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("echo: failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    match echo_app::run(&settings, keyboard, recognizer, io::stdout().lock()) {
        Ok(end) => {
            log::debug!("exit: {end:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("echo: {err}");
            ExitCode::FAILURE
        }
    }
}
