use anyhow::{Context, Result};
use clap::Parser;
use courtside_sentiment::analytics::timeline::{SeasonTimeline, TrackerMetric};
use courtside_sentiment::config::Config;
use courtside_sentiment::dashboard::{DataSource, Dataset, GameView, PlayerView, SeasonDashboard};
use courtside_sentiment::model::MetricKey;
use courtside_sentiment::{output, tracker};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

const DEFAULT_PLAYER_LIMIT: u32 = 82;

#[derive(Parser)]
#[command(
    name = "courtside",
    about = "Fan sentiment vs. box-score analytics for post-game discussion threads"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where to read records from. Either file switches the command to offline mode.
#[derive(clap::Args)]
struct DataArgs {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON array of game records (skips the store)
    #[arg(long)]
    games: Option<PathBuf>,

    /// JSON array of player game records (skips the store)
    #[arg(long)]
    stats: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Season dashboard: sentiment trend, ladder, correlations and one tracker frame
    Season {
        #[command(flatten)]
        data: DataArgs,

        /// Tracker frame (game index, clamped)
        #[arg(long, default_value_t = 0)]
        frame: usize,

        /// Tracker metric: ts, efg, points, plusminus, minutes
        #[arg(long)]
        metric: Option<String>,

        /// Include every season record joined with its game
        #[arg(long)]
        records: bool,

        /// Render an HTML summary here instead of printing JSON
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Players, sentiment and shooting for one game
    Game {
        /// Game key (PK)
        pk: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Season summary and game-by-game trend for one player
    Player {
        /// Player name as stored, e.g. "Nikola Jokic"
        name: String,

        /// Maximum number of games to load
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        data: DataArgs,

        /// Render an HTML summary here instead of printing JSON
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Play the season tracker, one JSON frame per line (Ctrl-C stops)
    Tracker {
        #[command(flatten)]
        data: DataArgs,

        /// Tracker metric: ts, efg, points, plusminus, minutes
        #[arg(long)]
        metric: Option<String>,

        /// Milliseconds between frames
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Frame to start from
        #[arg(long, default_value_t = 0)]
        from: usize,
    },

    /// Print the configured roster
    Roster {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("courtside_sentiment=info,courtside=info")
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Season {
            data,
            frame,
            metric,
            records,
            html,
        } => {
            let cfg = load_config(&data.config)?;
            let metric = resolve_metric(&cfg, metric.as_deref())?;
            let source = open_source(&cfg, &data)?;
            let dataset = source.season().await;
            let dashboard = SeasonDashboard::build(&dataset, &cfg.team.name, frame, &metric, records);
            match html {
                Some(path) => write_report(&path, &output::render_season_report(&dashboard)?),
                None => print_json(&dashboard),
            }
        }
        Command::Game { pk, data } => {
            let cfg = load_config(&data.config)?;
            let source = open_source(&cfg, &data)?;
            let (game, players) = source.game(&pk).await;
            print_json(&GameView::build(&pk, game.as_ref(), &players))
        }
        Command::Player {
            name,
            limit,
            data,
            html,
        } => {
            let cfg = load_config(&data.config)?;
            let source = open_source(&cfg, &data)?;
            let limit = limit
                .or(source.history_limit())
                .unwrap_or(DEFAULT_PLAYER_LIMIT);
            let (history, games) = source.player(&name, limit).await;
            let view = PlayerView::build(&name, &history, &games);
            match html {
                Some(path) => write_report(&path, &output::render_player_report(&view)?),
                None => print_json(&view),
            }
        }
        Command::Tracker {
            data,
            metric,
            interval_ms,
            from,
        } => {
            let cfg = load_config(&data.config)?;
            let metric = resolve_metric(&cfg, metric.as_deref())?;
            let interval_ms = interval_ms.unwrap_or(cfg.tracker.interval_ms);
            anyhow::ensure!(interval_ms > 0, "--interval-ms must be greater than 0");
            let source = open_source(&cfg, &data)?;
            let dataset = source.season().await;
            run_tracker(&dataset, &metric, from, Duration::from_millis(interval_ms)).await
        }
        Command::Roster { config } => {
            let cfg = load_config(&config)?;
            for name in &cfg.team.roster {
                println!("{name}");
            }
            Ok(())
        }
    }
}

/// A missing config file falls back to defaults; a broken one is an error.
fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }
    Ok(Config::load(path)?)
}

fn resolve_metric(cfg: &Config, cli_metric: Option<&str>) -> Result<TrackerMetric> {
    match cli_metric {
        Some(raw) => {
            let key: MetricKey = raw.parse()?;
            TrackerMetric::for_key(key)
                .with_context(|| format!("{key} cannot drive the tracker (try ts, efg, points, plusminus, minutes)"))
        }
        None => Ok(cfg.tracker.tracker_metric()?),
    }
}

fn open_source(cfg: &Config, data: &DataArgs) -> Result<DataSource> {
    if data.games.is_some() || data.stats.is_some() {
        let dataset = Dataset::from_files(data.games.as_deref(), data.stats.as_deref())?;
        info!(
            games = dataset.games.len(),
            records = dataset.records.len(),
            "Loaded offline data"
        );
        return Ok(DataSource::Offline(dataset));
    }
    cfg.validate()?;
    Ok(DataSource::store(&cfg.store)?)
}

async fn run_tracker(
    dataset: &Dataset,
    metric: &TrackerMetric,
    from: usize,
    every: Duration,
) -> Result<()> {
    let timeline = SeasonTimeline::new(&dataset.games, &dataset.records);
    anyhow::ensure!(!timeline.is_empty(), "no games to play");

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_tx.send(true).ok();
        }
    });

    let mut write_error = None;
    tracker::run_playback(&timeline, metric, from, every, stop_rx, |frame| {
        if write_error.is_some() {
            return;
        }
        match serde_json::to_string(&frame) {
            Ok(line) => println!("{line}"),
            Err(e) => write_error = Some(e),
        }
    })
    .await;

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    println!("Report rendered: {}", path.display());
    Ok(())
}
