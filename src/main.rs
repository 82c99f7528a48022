//! Command-line simulator for Americano tournaments
//!
//! Runs a full session against a JSON file store with randomly generated
//! scores, logging every round, and prints the final standings.

use americano::config::AppConfig;
use americano::rating::tier;
use americano::store::{JsonFileStore, PlayerStore};
use americano::tournament::Tournament;
use americano::types::Player;
use americano::utils::generate_player_id;
use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{info, warn};

/// Americano Tournament Simulator - rotating partners with ELO ratings
#[derive(Parser)]
#[command(
    name = "americano",
    version,
    about = "Simulate an Americano doubles tournament with ELO rating updates",
    long_about = "Generates Americano rounds with fair sit-out rotation and varied \
                 partnerships, plays them with random scores, and rates every match \
                 with a margin-weighted ELO. Players and rated matches are stored as JSON."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Number of players to register when the store is empty
    #[arg(short, long, default_value_t = 5)]
    players: usize,

    /// Number of rounds to play
    #[arg(short, long, default_value_t = 5)]
    rounds: usize,

    /// Games needed to win a match
    #[arg(long, default_value_t = 6)]
    games: u32,

    /// Seed override for scheduling and simulated scores
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Data directory override
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without simulating")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(config_path) => AppConfig::from_file(config_path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(seed) = args.seed {
        config.scheduler.seed = Some(seed);
    }
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    americano::config::validate_config(&config)?;
    Ok(config)
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig, args: &Args) {
    info!("🎾 Americano Tournament Simulator v{}", americano::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Data dir: {}", config.storage.data_dir.display());
    info!("   Seed: {:?}", config.scheduler.seed);
    info!("   Rounds: {}", args.rounds);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load stored players, registering new ones when there are too few
fn ensure_players(store: &dyn PlayerStore, wanted: usize) -> Result<Vec<Player>> {
    let mut players = store.load_players()?;
    if players.len() < wanted {
        for n in players.len()..wanted {
            players.push(Player::new(generate_player_id(), format!("Player {}", n + 1)));
        }
        store.save_players(&players)?;
        info!("Registered players up to {}", wanted);
    }
    players.truncate(wanted);
    Ok(players)
}

/// Random final score where one side reaches `games` (or a draw at `games - 1` each)
fn simulate_score(rng: &mut impl Rng, games: u32) -> [u32; 2] {
    let loser = rng.random_range(0..games);
    if rng.random_bool(0.05) {
        return [loser, loser];
    }
    if rng.random_bool(0.5) {
        [games, loser]
    } else {
        [loser, games]
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let store = JsonFileStore::new(&config.storage.data_dir);
    let players = ensure_players(&store, args.players)?;

    let mut tournament = Tournament::from_config(players, config)?;
    let mut score_rng = match config.scheduler.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    for _ in 0..args.rounds {
        let round = tournament.next_round()?.clone();
        let sitting: Vec<&str> = round.sit_outs.iter().map(|p| p.name.as_str()).collect();
        info!("Round {} - sitting out: {:?}", round.round_number, sitting);

        for game in &round.matches {
            let score = simulate_score(&mut score_rng, args.games);
            tournament.update_score(game.id, 0, score[0])?;
            tournament.update_score(game.id, 1, score[1])?;
            let outcome = tournament.finish_match(game.id, &store)?;

            info!(
                "  {} + {} vs {} + {}: {}-{} (multiplier {:.2})",
                game.teams[0][0],
                game.teams[0][1],
                game.teams[1][0],
                game.teams[1][1],
                score[0],
                score[1],
                outcome.deltas.score_multiplier
            );
            for change in &outcome.tier_changes {
                info!(
                    "  {} moved from {} to {}",
                    change.player_name, change.old_tier, change.new_tier
                );
            }
        }
    }

    let summary = tournament.end(&store)?;
    println!(
        "{:<12} {:>8} {:>8} {:>7} {:>6}  {}",
        "Player", "Start", "Final", "Change", "Trend", "Tier"
    );
    for row in &summary.standings {
        println!(
            "{:<12} {:>8} {:>8} {:>+7} {:>+6}  {}",
            row.name,
            row.starting_rating,
            row.final_rating,
            row.change,
            row.trend,
            tier(row.final_rating)
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.service.log_level)?;

    if args.dry_run {
        info!("✅ Configuration is valid");
        return Ok(());
    }

    if args.players < 4 {
        warn!("At least 4 players are needed, got {}", args.players);
        return Err(anyhow::anyhow!("Not enough players: {}", args.players));
    }

    display_startup_banner(&config, &args);
    run(&args, &config)
}
