use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use seabattle::init_logging;
use seabattle::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play computer against computer and report the results as JSON.
    Simulate {
        #[arg(long, value_enum, default_value_t = Level::Medium)]
        first: Level,
        #[arg(long, value_enum, default_value_t = Level::Medium)]
        second: Level,
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Print both final grids to stderr")]
        show_boards: bool,
    },
}

#[derive(Serialize)]
struct GameReport {
    winner: String,
    winning_side: Side,
    shots: usize,
    hits: usize,
}

#[derive(Serialize)]
struct Summary {
    first: Difficulty,
    second: Difficulty,
    games: Vec<GameReport>,
    leaderboard: Leaderboard,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            first,
            second,
            games,
            seed,
            show_boards,
        } => {
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            let (first, second) = (Difficulty::from(first), Difficulty::from(second));
            let mut leaderboard = Leaderboard::new();
            let mut reports = Vec::new();

            for game in 0..games {
                let mut contest = Match::new(
                    Contender {
                        name: format!("{} (first)", first),
                        ..Contender::ai(first)
                    },
                    Contender {
                        name: format!("{} (second)", second),
                        ..Contender::ai(second)
                    },
                );
                let events = contest.apply(Command::ConfirmPlacement, &mut rng)?;
                let outcome = contest
                    .outcome()
                    .ok_or_else(|| anyhow::anyhow!("game {} ended without a winner", game))?;
                leaderboard.record(&outcome);

                let shots: Vec<AttackResult> = events
                    .iter()
                    .filter_map(|e| match e {
                        MatchEvent::Shot { result, .. } => Some(*result),
                        _ => None,
                    })
                    .collect();
                let winning_side = contest
                    .winner()
                    .ok_or_else(|| anyhow::anyhow!("game {} has no winning side", game))?;
                reports.push(GameReport {
                    winner: outcome.winner,
                    winning_side,
                    shots: shots.len(),
                    hits: shots.iter().filter(|r| r.is_hit()).count(),
                });

                if show_boards {
                    for side in [Side::First, Side::Second] {
                        eprintln!("{} grid after game {}:", contest.side(side).name(), game + 1);
                        eprintln!("{}\n", contest.side(side).grid());
                    }
                }
            }

            let summary = Summary {
                first,
                second,
                games: reports,
                leaderboard,
            };
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}
