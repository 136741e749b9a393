//! CLI for maze generation

use clap::Parser;
use maze_captcha::maze_generator::MazeGenerator;

/// Generate a challenge board and report its start-to-goal distance
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board height in cells (odd, at least 5)
    #[arg(long, default_value_t = 7)]
    rows: usize,

    /// Board width in cells (odd, at least 5)
    #[arg(long, default_value_t = 7)]
    cols: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let grid = MazeGenerator::new(args.seed).generate(args.rows, args.cols)?;
    println!("{grid}");
    match grid.shortest_path_len(grid.start(), grid.goal()) {
        Some(steps) => println!("Solvable in {steps} steps."),
        None => println!("No path from start to goal."),
    }
    Ok(())
}
