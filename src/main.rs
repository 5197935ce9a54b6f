use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use handicap_index::handicap::{HandicapEngine, HandicapError, HandicapResult, Round};
use handicap_index::output::PlayerSummary;
use handicap_index::scorecard::{self, ScorecardFile};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_INSUFFICIENT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show one player's Handicap Index (default if no subcommand)
    Show {
        /// Player name (case-insensitive, partial match)
        #[arg(short, long)]
        player: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List every player's Handicap Index, best first
    List,
}

#[derive(Parser, Debug)]
#[command(name = "handicap-index")]
#[command(about = "Golf Handicap Index calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and show calculation details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/handicap-index/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Scorecard file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Number of most recent rounds to consider
    #[arg(short = 'n', long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "handicap_index=debug"
    } else {
        "handicap_index=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Show {
        player: None,
        format: Format::Table,
    });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match handicap_index::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = handicap_index::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let tiers = match config.tier_table() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let engine = HandicapEngine::new(tiers);

    let limit = cli.limit.unwrap_or_else(|| config.recent_rounds());
    if limit == 0 {
        eprintln!("--limit must be at least 1");
        std::process::exit(EXIT_CONFIG);
    }

    let scorecards_path = match cli.file.map(Ok).unwrap_or_else(|| config.scorecards_path()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Scorecard error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let file = match scorecard::load_scorecards(&scorecards_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Scorecard error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    info!(
        "Loaded {} courses and {} rounds from {}",
        file.courses.len(),
        file.rounds.len(),
        scorecards_path.display()
    );

    let use_colors = handicap_index::output::should_use_colors();

    match command {
        Commands::Show { player, format } => {
            let (name, rounds) = match select_player_rounds(&file, player.as_deref()) {
                Ok(selected) => selected,
                Err(e) => {
                    eprintln!("Scorecard error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let rounds = scorecard::most_recent(rounds, limit);
            debug!("Considering {} most recent rounds", rounds.len());

            let result = match engine.compute_handicap_index(&rounds) {
                Ok(r) => r,
                Err(e) => exit_with_engine_error(name.as_deref(), &e),
            };

            print_result(name.as_deref(), &result, format, cli.verbose, use_colors);
        }
        Commands::List => {
            let all_rounds = match file.rounds_for(None) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Scorecard error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let summaries = match summarize_players(&engine, &file.players(), &all_rounds, limit) {
                Ok(s) => s,
                Err(e) => exit_with_engine_error(None, &e),
            };
            println!(
                "{}",
                handicap_index::output::format_player_table(&summaries, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Rounds of the single player a `show` targets. Fails when the file (or the
/// filter) covers more than one player.
fn select_player_rounds(
    file: &ScorecardFile,
    player: Option<&str>,
) -> anyhow::Result<(Option<String>, Vec<Round>)> {
    let rounds = file.rounds_for(player)?;

    let mut names: Vec<&str> = Vec::new();
    for name in rounds.iter().filter_map(|r| r.player.as_deref()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    if names.len() > 1 {
        anyhow::bail!(
            "Rounds for several players found ({}); pick one with --player",
            names.join(", ")
        );
    }
    if rounds.is_empty() {
        if let Some(p) = player {
            anyhow::bail!("No rounds found for player matching '{}'", p);
        }
    }

    let name = names.first().map(|n| n.to_string());
    Ok((name, rounds))
}

/// Compute every player's index independently. Players without enough rounds
/// are kept with no index; malformed rounds fail the whole listing.
fn summarize_players(
    engine: &HandicapEngine,
    players: &[String],
    all_rounds: &[Round],
    limit: usize,
) -> Result<Vec<PlayerSummary>, HandicapError> {
    let mut names: Vec<Option<String>> = players.iter().cloned().map(Some).collect();
    if all_rounds.iter().any(|r| r.player.is_none()) {
        names.push(None);
    }

    let mut summaries = Vec::with_capacity(names.len());
    for name in names {
        let rounds: Vec<Round> = all_rounds
            .iter()
            .filter(|r| r.player == name)
            .cloned()
            .collect();
        let rounds = scorecard::most_recent(rounds, limit);
        let total_rounds = rounds.len();
        let last_played = rounds.last().map(|r| r.date);

        let handicap_index = match engine.compute_handicap_index(&rounds) {
            Ok(result) => Some(result.handicap_index),
            Err(HandicapError::InsufficientData { .. }) => None,
            Err(e) => return Err(e),
        };

        summaries.push(PlayerSummary {
            player: name.unwrap_or_else(|| "(unnamed)".to_string()),
            total_rounds,
            handicap_index,
            last_played,
        });
    }

    Ok(summaries)
}

fn print_result(
    name: Option<&str>,
    result: &HandicapResult,
    format: Format,
    verbose: bool,
    use_colors: bool,
) {
    match format {
        Format::Table => {
            println!(
                "{}",
                handicap_index::output::format_summary(name, result, use_colors)
            );
            if verbose {
                println!("{}", handicap_index::output::format_calculation(result));
                println!();
                println!("Rounds used:");
                println!(
                    "{}",
                    handicap_index::output::format_rounds_table(&result.rounds_used, use_colors)
                );
                println!();
                println!("All rounds:");
                println!(
                    "{}",
                    handicap_index::output::format_rounds_table(
                        &result.all_rounds_ranked,
                        use_colors
                    )
                );
            }
        }
        Format::Tsv => {
            println!(
                "{}",
                handicap_index::output::format_tsv(&result.all_rounds_ranked)
            );
        }
        Format::Json => match handicap_index::output::format_json(result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
    }
}

fn exit_with_engine_error(name: Option<&str>, error: &HandicapError) -> ! {
    match error {
        HandicapError::InsufficientData { rounds, required } => {
            eprintln!(
                "{}: not yet eligible for a Handicap Index ({} of {} rounds)",
                name.unwrap_or("Player"),
                rounds,
                required
            );
            std::process::exit(EXIT_INSUFFICIENT);
        }
        HandicapError::InvalidInput { .. } => {
            eprintln!("Invalid round data: {}", error);
            std::process::exit(EXIT_INPUT);
        }
    }
}
