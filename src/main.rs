//! CLI for the interactive maze CAPTCHA

use clap::Parser;
use maze_captcha::app::App;
use maze_captcha::maze_generator::MazeGenerator;
use maze_captcha::MazeChallenge;

/// Prove you are human: walk the maze to the goal before time runs out,
/// or type the magic word
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board height in cells (odd, at least 5)
    #[arg(long, default_value_t = 7)]
    rows: usize,

    /// Board width in cells (odd, at least 5)
    #[arg(long, default_value_t = 7)]
    cols: usize,

    /// Seconds before the challenge is failed
    #[arg(short, long, default_value_t = 30)]
    time_limit: u32,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Generate a board, run the challenge, report the verdict
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let grid = MazeGenerator::new(args.seed).generate(args.rows, args.cols)?;
    let mut app = App::new(MazeChallenge::new(grid, args.time_limit));

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result?;

    if app.passed() {
        println!("✅ CAPTCHA passed: you appear to be human.");
    } else {
        println!("❌ CAPTCHA failed.");
        std::process::exit(1);
    }
    Ok(())
}
