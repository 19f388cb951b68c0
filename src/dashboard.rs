//! View models for the season dashboard, a single game and a single player,
//! plus loading the records behind them.

use crate::analytics::color::{StatTone, stat_tone};
use crate::analytics::correlation::{CorrelationResult, correlate_with_sentiment};
use crate::analytics::leaderboard::{LeaderboardEntry, build_leaderboard};
use crate::analytics::season::{SeasonAggregate, TrendPoint, player_trend, season_aggregate};
use crate::analytics::sentiment::{
    SentimentPoint, game_weighted_sentiment, sentiment_over_time, total_mentions,
    weighted_sentiment,
};
use crate::analytics::timeline::{
    AnnotatedRecord, Frame, SeasonTimeline, TrackerMetric, annotate_records, chronological_records,
};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::model::{GameRecord, MetricKey, PlayerGameRecord};
use crate::store::StoreClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{info, warn};

const NAME_SUFFIXES: [&str; 5] = ["Jr.", "Sr.", "II", "III", "IV"];

/// Games plus the season's player records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub games: Vec<GameRecord>,
    pub records: Vec<PlayerGameRecord>,
}

impl Dataset {
    /// Read JSON arrays of records. A path that is not given means no records of that kind.
    pub fn from_files(games: Option<&Path>, stats: Option<&Path>) -> Result<Self> {
        Ok(Self {
            games: read_json_array(games)?,
            records: read_json_array(stats)?,
        })
    }
}

fn read_json_array<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("{}: {e}", path.display())))
}

/// Logs a failed fetch and continues with nothing.
fn or_empty<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        if let Some(wait) = e.retry_after() {
            warn!(source = what, retry_after_secs = wait.as_secs(), "Store asked to back off");
        }
        warn!(source = what, error = %e, "Fetch failed, continuing without it");
        T::default()
    })
}

/// Where records come from: the live store or files on disk.
pub enum DataSource {
    Store {
        client: StoreClient,
        season_limit: u32,
        history_limit: u32,
    },
    Offline(Dataset),
}

impl DataSource {
    pub fn store(config: &StoreConfig) -> Result<Self> {
        Ok(Self::Store {
            client: StoreClient::from_config(config)?,
            season_limit: config.season_limit,
            history_limit: config.history_limit,
        })
    }

    pub fn history_limit(&self) -> Option<u32> {
        match self {
            Self::Store { history_limit, .. } => Some(*history_limit),
            Self::Offline(_) => None,
        }
    }

    pub async fn season(&self) -> Dataset {
        match self {
            Self::Store {
                client,
                season_limit,
                ..
            } => {
                let (games, records) =
                    tokio::join!(client.list_games(), client.list_season_stats(*season_limit));
                let dataset = Dataset {
                    games: or_empty("listGames", games),
                    records: or_empty("listSeasonStats", records),
                };
                info!(
                    games = dataset.games.len(),
                    records = dataset.records.len(),
                    "Season data loaded"
                );
                dataset
            }
            Self::Offline(dataset) => dataset.clone(),
        }
    }

    pub async fn game(&self, pk: &str) -> (Option<GameRecord>, Vec<PlayerGameRecord>) {
        match self {
            Self::Store { client, .. } => {
                let (meta, players) =
                    tokio::join!(client.get_game_metadata(pk), client.get_game_players(pk));
                (or_empty("getGameMetadata", meta), or_empty("getGamePlayers", players))
            }
            Self::Offline(dataset) => (
                dataset.games.iter().find(|g| g.pk == pk).cloned(),
                dataset.records.iter().filter(|r| r.pk == pk).cloned().collect(),
            ),
        }
    }

    /// A player's history (most recent `limit` games when reading files) and the game list.
    pub async fn player(&self, name: &str, limit: u32) -> (Vec<PlayerGameRecord>, Vec<GameRecord>) {
        match self {
            Self::Store { client, .. } => {
                let (history, games) =
                    tokio::join!(client.get_player_history(name, limit), client.list_games());
                (or_empty("getPlayerHistory", history), or_empty("listGames", games))
            }
            Self::Offline(dataset) => {
                let mine: Vec<PlayerGameRecord> = dataset
                    .records
                    .iter()
                    .filter(|r| r.name() == Some(name))
                    .cloned()
                    .collect();
                let ordered = chronological_records(&mine);
                let skip = ordered.len().saturating_sub(limit as usize);
                let history = ordered.into_iter().skip(skip).cloned().collect();
                (history, dataset.games.clone())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonDashboard {
    pub team: String,
    pub game_count: usize,
    pub record_count: usize,
    pub season_sentiment: f64,
    pub total_mentions: u64,
    pub trend: Vec<SentimentPoint>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub correlations: Vec<CorrelationResult>,
    pub players: Vec<String>,
    pub frame: Option<Frame>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<AnnotatedRecord>,
}

impl SeasonDashboard {
    pub fn build(
        dataset: &Dataset,
        team: &str,
        frame_index: usize,
        metric: &TrackerMetric,
        include_records: bool,
    ) -> Self {
        let timeline = SeasonTimeline::new(&dataset.games, &dataset.records);
        Self {
            team: team.to_string(),
            game_count: dataset.games.len(),
            record_count: dataset.records.len(),
            season_sentiment: weighted_sentiment(&dataset.records),
            total_mentions: total_mentions(&dataset.records),
            trend: sentiment_over_time(&dataset.games, &dataset.records, team),
            leaderboard: build_leaderboard(&dataset.records),
            correlations: correlate_with_sentiment(&dataset.records),
            players: timeline.players().to_vec(),
            frame: timeline.frame(frame_index, metric),
            records: if include_records {
                annotate_records(&dataset.records, &dataset.games)
            } else {
                Vec::new()
            },
        }
    }
}

/// One player in the game view. Missing metrics show as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRow {
    pub name: String,
    pub sentiment: f64,
    pub mentions: u32,
    pub ts: f64,
    pub efg: f64,
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub plus_minus: f64,
    pub minutes: f64,
}

impl GameRow {
    fn from_record(name: &str, r: &PlayerGameRecord) -> Self {
        let m = |key: MetricKey| r.metric(key).unwrap_or(0.0);
        Self {
            name: name.to_string(),
            sentiment: r.sentiment_or_zero(),
            mentions: r.mentions_or_zero(),
            ts: m(MetricKey::Ts),
            efg: m(MetricKey::Efg),
            points: m(MetricKey::Points),
            assists: m(MetricKey::Assists),
            rebounds: m(MetricKey::Rebounds),
            plus_minus: m(MetricKey::PlusMinus),
            minutes: m(MetricKey::Minutes),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub game_pk: String,
    pub date_label: String,
    pub matchup: String,
    pub score_line: String,
    pub thread_url: Option<String>,
    pub avg_sentiment: f64,
    pub total_mentions: u64,
    pub players: Vec<GameRow>,
}

impl GameView {
    pub fn build(pk: &str, game: Option<&GameRecord>, players: &[PlayerGameRecord]) -> Self {
        let mut rows: Vec<GameRow> = players
            .iter()
            .filter(|r| r.pk == pk)
            .filter_map(|r| Some(GameRow::from_record(r.name()?, r)))
            .collect();
        rows.sort_by(|a, b| compare_last_names(&a.name, &b.name));

        Self {
            game_pk: pk.to_string(),
            date_label: game.map(GameRecord::date_label).unwrap_or_default(),
            matchup: game.map(GameRecord::matchup).unwrap_or_default(),
            score_line: game.map(GameRecord::score_line).unwrap_or_default(),
            thread_url: game.and_then(GameRecord::thread_url),
            avg_sentiment: game_weighted_sentiment(players, pk),
            total_mentions: total_mentions(players.iter().filter(|r| r.pk == pk)),
            players: rows,
        }
    }
}

/// Last word of a name, ignoring generational suffixes.
pub fn last_name(full: &str) -> &str {
    full.split_whitespace()
        .filter(|part| !NAME_SUFFIXES.contains(part))
        .next_back()
        .unwrap_or("")
}

fn compare_last_names(a: &str, b: &str) -> Ordering {
    let (la, lb) = (last_name(a), last_name(b));
    la.to_lowercase()
        .cmp(&lb.to_lowercase())
        .then_with(|| la.cmp(lb))
}

/// One headline number in the player summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStat {
    pub metric: MetricKey,
    pub label: String,
    pub value: f64,
    pub tone: StatTone,
}

impl SummaryStat {
    fn new(metric: MetricKey, value: f64) -> Self {
        Self {
            metric,
            label: metric.label().to_string(),
            value,
            tone: stat_tone(metric, value),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub aggregate: SeasonAggregate,
    pub summary: Vec<SummaryStat>,
    pub trend: Vec<TrendPoint>,
}

impl PlayerView {
    pub fn build(name: &str, history: &[PlayerGameRecord], games: &[GameRecord]) -> Self {
        let aggregate = season_aggregate(history);
        let summary = vec![
            SummaryStat::new(MetricKey::Ts, aggregate.shooting.ts),
            SummaryStat::new(MetricKey::Efg, aggregate.shooting.efg),
            SummaryStat::new(MetricKey::FgPct, aggregate.shooting.fg_pct),
            SummaryStat::new(MetricKey::Fg3Pct, aggregate.shooting.fg3_pct),
            SummaryStat::new(MetricKey::FtPct, aggregate.shooting.ft_pct),
            SummaryStat::new(MetricKey::Points, aggregate.averages.points),
            SummaryStat::new(MetricKey::PlusMinus, aggregate.averages.plus_minus),
        ];
        Self {
            name: name.to_string(),
            trend: player_trend(history, games),
            aggregate,
            summary,
        }
    }
}
