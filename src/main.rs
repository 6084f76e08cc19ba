// Draft helper entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse CLI arguments and load config
// 3. Load the rankings CSV into the player pool
// 4. Initialize DraftState
// 5. Run the interactive prompt

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use draft_helper::app::AppState;
use draft_helper::config::{self, ConfigOverrides, ScoringFormat};
use draft_helper::draft::state::DraftState;
use draft_helper::shell;
use draft_helper::valuation::rankings;

/// Live snake-draft helper: multi-source ranks and SAFE/RISKY suggestions.
#[derive(Parser, Debug)]
#[command(name = "draft-helper", version, about)]
struct Args {
    /// Config file (default: config/draft.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of teams (default 10)
    #[arg(long)]
    teams: Option<usize>,

    /// Your draft slot (1-indexed), e.g. 3
    #[arg(long)]
    pick: Option<usize>,

    /// Total rounds (default 14)
    #[arg(long)]
    rounds: Option<usize>,

    /// Rankings CSV path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Scoring format (informational)
    #[arg(long, value_enum)]
    format: Option<ScoringFormat>,

    /// Override starting slots, e.g. QB:1,RB:2,WR:2,TE:1,FLEX:1,K:1,DST:1
    #[arg(long)]
    roster: Option<String>,

    /// Where `save` writes the draft snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            teams: self.teams,
            my_slot: self.pick,
            rounds: self.rounds,
            scoring: self.format,
            roster: self.roster.clone(),
            rankings: self.csv.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing()?;
    info!("Draft helper starting up");

    let config = config::load_config(args.config.as_deref(), &args.overrides())
        .context("failed to load configuration")?;
    let league = &config.league;
    info!(
        "Config loaded: {} teams, slot {}, {} rounds, {}",
        league.teams, league.my_slot, league.rounds, league.scoring
    );

    let rankings_path = &config.data_paths.rankings;
    let players = match rankings::load_rankings(rankings_path) {
        Ok(players) => players,
        Err(e) => {
            error!("Failed to load rankings: {}", e);
            eprintln!("{e}");
            eprintln!("No players loaded from CSV. Please check --csv path.");
            std::process::exit(1);
        }
    };
    let player_count = players.len();

    let draft = DraftState::new(
        league.teams,
        league.my_slot,
        league.rounds,
        players,
        league.roster.clone(),
    )
    .context("failed to initialize draft")?;

    println!("Loaded {} players from {}.", player_count, rankings_path.display());
    println!(
        "Teams: {}, Your slot: {}, Rounds: {}, Scoring: {}",
        league.teams,
        league.my_slot,
        league.rounds,
        league.scoring.to_string().to_uppercase()
    );
    println!("Roster: {}", league.roster);
    if let Some((round, _, overall)) = draft.round_and_pick() {
        println!("You're at Round {round}, Overall #{overall}. Type 'suggest' to start.");
    }

    let mut app = AppState::new(draft, config.data_paths.snapshot.clone());
    shell::run(&mut app)?;

    info!("Draft helper shut down");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draft-helper.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_helper=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
