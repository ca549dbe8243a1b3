use std::io::{self, Write};

use echo_core::Position;
use echo_game::{
    RoundState, SlideGame,
    maze::{MazeRun, Tile},
    riddle::{RiddleGame, RiddleStore, RiddleSummary, Verdict},
};
use echo_input::InputMode;

pub(crate) fn slide<W: Write>(
    out: &mut W,
    game: &SlideGame,
    mode: InputMode,
    status: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", game.grid())?;
    match game.state() {
        RoundState::Playing => writeln!(
            out,
            "round {}  moves {}  input {mode}",
            game.round(),
            game.moves()
        )?,
        RoundState::Solved => writeln!(
            out,
            "Solved in {} moves! Press r or say shuffle to play again.",
            game.moves()
        )?,
    }
    status_line(out, status)
}

pub(crate) fn maze<W: Write>(
    out: &mut W,
    run: &MazeRun,
    mode: InputMode,
    status: &str,
) -> io::Result<()> {
    let maze = run.maze();
    writeln!(out)?;
    for (row, tiles) in maze.rows().enumerate() {
        let line: String = tiles
            .iter()
            .enumerate()
            .map(|(col, tile)| {
                if Position::new(row, col) == run.player() {
                    '@'
                } else {
                    match tile {
                        Tile::Wall => '#',
                        Tile::Path => '.',
                        Tile::Start => 'S',
                        Tile::Goal => 'G',
                    }
                }
            })
            .collect();
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "level {}/{}  input {mode}",
        run.level() + 1,
        run.level_count()
    )?;
    status_line(out, status)
}

pub(crate) fn riddle<W, S>(out: &mut W, game: &RiddleGame<S>) -> io::Result<()>
where
    W: Write,
    S: RiddleStore,
{
    writeln!(out)?;
    if let Some(riddle) = game.current() {
        writeln!(out, "Score: {}", game.score())?;
        writeln!(out, "Category: {}", riddle.category)?;
        writeln!(out, "Puzzle:")?;
        writeln!(out, "{}", riddle.prompt)?;
    }
    status_line(out, game.status())
}

pub(crate) fn riddle_summary<W: Write>(out: &mut W, summary: &RiddleSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Your final score: {}", summary.score)?;
    writeln!(out, "Total puzzles: {}", summary.total())?;
    writeln!(out, "Correct answers: {}", summary.correct)?;
    writeln!(out, "Wrong answers: {}", summary.wrong)?;
    match summary.verdict {
        Verdict::Win => writeln!(out, "You win!"),
        Verdict::Lose => writeln!(out, "You lose."),
    }
}

fn status_line<W: Write>(out: &mut W, status: &str) -> io::Result<()> {
    if status.is_empty() {
        Ok(())
    } else {
        writeln!(out, "{status}")
    }
}
