use courtside_sentiment::analytics::correlation::{CORRELATION_METRICS, CorrelationStrength};
use courtside_sentiment::analytics::timeline::TrackerMetric;
use courtside_sentiment::analytics::{
    build_leaderboard, correlate_with_sentiment, season_aggregate, sentiment_over_time,
};
use courtside_sentiment::dashboard::{Dataset, GameView, PlayerView, SeasonDashboard};
use courtside_sentiment::model::{MetricKey, PlayerGameRecord};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn season() -> Dataset {
    let games = fixture("games.json");
    let stats = fixture("season_stats.json");
    Dataset::from_files(Some(games.as_path()), Some(stats.as_path())).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fixtures_load() {
    let data = season();
    assert_eq!(data.games.len(), 3);
    assert_eq!(data.records.len(), 9);
    // "36:40" keeps the leading number.
    let murray = data
        .records
        .iter()
        .find(|r| r.pk == "game#0022500001" && r.name() == Some("Jamal Murray"))
        .unwrap();
    assert_eq!(murray.minutes, Some(36.0));
}

#[test]
fn missing_file_is_an_error_and_absent_path_is_empty() {
    let missing = fixture("nope.json");
    assert!(Dataset::from_files(Some(missing.as_path()), None).is_err());
    let empty = Dataset::from_files(None, None).unwrap();
    assert!(empty.games.is_empty() && empty.records.is_empty());
}

#[test]
fn season_trend_is_weighted_per_game_in_date_order() {
    let data = season();
    let trend = sentiment_over_time(&data.games, &data.records, "Nuggets");
    let pks: Vec<&str> = trend.iter().map(|p| p.game_pk.as_str()).collect();
    assert_eq!(
        pks,
        vec!["game#0022500001", "game#0022500057", "game#0022500112"]
    );

    assert!(close(trend[0].avg_sentiment, 306.0 / 67.0));
    assert!(close(trend[1].avg_sentiment, 3972.0 / 84.0));
    // Null sentiment still carries its mentions; the nameless record counts too.
    assert!(close(trend[2].avg_sentiment, 3650.0 / 63.0));

    assert_eq!(trend[0].opponent, "@ Golden State Warriors");
    assert_eq!(trend[1].opponent, "vs Phoenix Suns");
    assert_eq!(trend[0].date_label, "Oct 22, 2025");
}

#[test]
fn leaderboard_ranks_named_players() {
    let data = season();
    let board = build_leaderboard(&data.records);
    let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Nikola Jokic", "Peyton Watson", "Jamal Murray"]);
    assert!(close(board[0].avg_sentiment, 137.5 / 3.0));
    assert!(close(board[2].avg_sentiment, 32.0 / 3.0));
    assert_eq!(board.iter().map(|e| e.games).sum::<usize>(), 8);
}

#[test]
fn correlations_cover_every_metric() {
    let data = season();
    let results = correlate_with_sentiment(&data.records);
    assert_eq!(results.len(), CORRELATION_METRICS.len());
    assert!(results.windows(2).all(|w| w[0].coefficient >= w[1].coefficient));
    for r in &results {
        assert!((-1.0..=1.0).contains(&r.coefficient));
        assert_eq!(r.strength, CorrelationStrength::from_coefficient(r.coefficient));
    }
    let mentions = results
        .iter()
        .find(|r| r.metric == MetricKey::Mentions)
        .unwrap();
    assert_eq!(mentions.strength, CorrelationStrength::StrongPositive);
}

#[test]
fn player_season_uses_summed_attempts() {
    let data = season();
    let history: Vec<PlayerGameRecord> = data
        .records
        .iter()
        .filter(|r| r.name() == Some("Nikola Jokic"))
        .cloned()
        .collect();
    let agg = season_aggregate(&history);
    assert_eq!(agg.games_played, 3);
    assert_eq!(agg.totals.points, 60);
    assert!(close(agg.averages.points, 20.0));
    assert!(close(agg.shooting.fg_pct, 24.0 / 38.0 * 100.0));
    assert_eq!(agg.total_mentions, 140);

    let view = PlayerView::build("Nikola Jokic", &history, &data.games);
    assert_eq!(view.trend.len(), 3);
    assert_eq!(view.trend[0].away, "Denver Nuggets");
    assert_eq!(view.trend[2].home, "Denver Nuggets");
}

#[test]
fn dnp_player_counts_games_played_correctly() {
    let data = season();
    let watson: Vec<PlayerGameRecord> = data
        .records
        .iter()
        .filter(|r| r.name() == Some("Peyton Watson"))
        .cloned()
        .collect();
    let agg = season_aggregate(&watson);
    assert_eq!(agg.games_played, 1);
    assert_eq!(agg.games_listed, 2);
    assert_eq!(agg.total_mentions, 8);
}

#[test]
fn game_view_from_fixture() {
    let data = season();
    let pk = "game#0022500057";
    let game = data.games.iter().find(|g| g.pk == pk);
    let view = GameView::build(pk, game, &data.records);
    assert_eq!(view.matchup, "Phoenix Suns @ Denver Nuggets");
    assert_eq!(view.score_line, "111 - 133");
    assert_eq!(view.thread_url, None);
    let names: Vec<&str> = view.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Nikola Jokic", "Jamal Murray", "Peyton Watson"]);
    assert!(close(view.avg_sentiment, 3972.0 / 84.0));
}

#[test]
fn season_dashboard_bundles_everything() {
    let data = season();
    let points = TrackerMetric::for_key(MetricKey::Points).unwrap();
    let dash = SeasonDashboard::build(&data, "Nuggets", 0, &points, false);
    assert_eq!(dash.trend.len(), 3);
    assert_eq!(dash.players, ["Jamal Murray", "Nikola Jokic", "Peyton Watson"]);
    assert!(dash.records.is_empty());

    let frame = dash.frame.unwrap();
    assert_eq!(frame.game_pk, "game#0022500001");
    let rows: Vec<&str> = frame.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rows, vec!["Jamal Murray", "Nikola Jokic"]);
    assert_eq!(
        frame.thread_url.as_deref(),
        Some("https://www.reddit.com/r/denvernuggets/comments/1od8x1a/post_game_thread/")
    );

    let with_records = SeasonDashboard::build(&data, "Nuggets", 0, &points, true);
    assert_eq!(with_records.records.len(), 9);
    assert_eq!(
        with_records.records[0].home.as_deref(),
        Some("Golden State Warriors")
    );
}

#[test]
fn empty_inputs_degrade_to_empty_views() {
    let data = Dataset::default();
    let dash = SeasonDashboard::build(&data, "Nuggets", 5, &TrackerMetric::default(), true);
    assert!(dash.trend.is_empty());
    assert!(dash.leaderboard.is_empty());
    assert!(dash.correlations.is_empty());
    assert!(dash.frame.is_none());
    assert_eq!(dash.season_sentiment, 0.0);
}
