//! Samples many shuffles and reports how many can actually be solved.
//!
//! Uniform permutations ignore move parity, so roughly half of them have no
//! solution. Random walks always stay solvable.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example shuffle_stats
//! cargo run --example shuffle_stats -- --strategy walk --side 4 --samples 50000
//! ```

use std::process;

use clap::{Parser, ValueEnum};
use echo_generator::{DEFAULT_WALK_STEPS, ShuffleGenerator, ShuffleStrategy};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyKind {
    Uniform,
    Walk,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Shuffle strategy to sample.
    #[arg(long, value_name = "KIND", default_value = "uniform")]
    strategy: StrategyKind,

    /// Grid side.
    #[arg(long, default_value_t = 3)]
    side: usize,

    /// Moves per random walk.
    #[arg(long, default_value_t = DEFAULT_WALK_STEPS)]
    steps: usize,

    /// Number of shuffles to draw.
    #[arg(long, value_name = "COUNT", default_value_t = 10_000)]
    samples: usize,
}

fn main() {
    let args = Args::parse();
    if args.samples == 0 {
        eprintln!("--samples must be at least 1.");
        process::exit(1);
    }

    let strategy = match args.strategy {
        StrategyKind::Uniform => ShuffleStrategy::UniformPermutation,
        StrategyKind::Walk => ShuffleStrategy::RandomWalk { steps: args.steps },
    };
    let generator = ShuffleGenerator::new(strategy);

    let solvable = (0..args.samples)
        .into_par_iter()
        .map(|_| generator.shuffle(args.side))
        .try_fold(
            || 0_usize,
            |count, shuffle| shuffle.map(|s| count + usize::from(s.is_solvable())),
        )
        .try_reduce(|| 0, |a, b| Ok(a + b));

    match solvable {
        Ok(solvable) => {
            println!("Strategy: {strategy:?}");
            println!("Side:     {}", args.side);
            println!("Samples:  {}", args.samples);
            println!("Solvable: {solvable}");
            #[expect(clippy::cast_precision_loss)]
            let ratio = solvable as f64 / args.samples as f64;
            println!("Ratio:    {ratio:.3}");
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    }
}
