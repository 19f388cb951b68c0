use super::sentiment::{total_mentions, weighted_sentiment};
use super::shooting::{ShootingCounters, ShootingSplits};
use super::timeline::chronological_records;
use crate::model::{GameRecord, PlayerGameRecord, short_date_label};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counting stats summed over games with minutes > 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub minutes: f64,
    pub points: u32,
    pub assists: u32,
    pub rebounds: u32,
    pub steals: u32,
    pub blocks: u32,
    pub plus_minus: i64,
    pub shooting: ShootingCounters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonAverages {
    pub minutes: f64,
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub steals: f64,
    pub blocks: f64,
    pub plus_minus: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonAggregate {
    /// Games with minutes > 0.
    pub games_played: u32,
    /// Every record in the history, played or not.
    pub games_listed: usize,
    pub total_mentions: u64,
    /// Simple mean of the per-game sentiment values that are present.
    pub avg_sentiment: f64,
    /// Mention-weighted sentiment over the whole history.
    pub weighted_sentiment: f64,
    pub totals: SeasonTotals,
    pub averages: SeasonAverages,
    /// Computed from summed makes/attempts, not averaged per game.
    pub shooting: ShootingSplits,
}

/// Fold one player's history into season totals and per-game averages.
///
/// Mentions and sentiment are taken from every record; box-score counters
/// and `games_played` only from records with minutes > 0. Averages divide by
/// `max(games_played, 1)`.
pub fn season_aggregate(history: &[PlayerGameRecord]) -> SeasonAggregate {
    let ordered = chronological_records(history);

    let mut totals = SeasonTotals::default();
    let mut games_played = 0_u32;
    let mut sentiments: Vec<f64> = Vec::new();

    for game in &ordered {
        if let Some(s) = game.sentiment.filter(|s| s.is_finite()) {
            sentiments.push(s);
        }

        if !game.played() {
            continue;
        }
        games_played += 1;
        totals.minutes += game.minutes_played();
        totals.points = totals.points.saturating_add(game.points.unwrap_or(0));
        totals.assists = totals.assists.saturating_add(game.assists.unwrap_or(0));
        totals.rebounds = totals.rebounds.saturating_add(game.rebounds.unwrap_or(0));
        totals.steals = totals.steals.saturating_add(game.steals.unwrap_or(0));
        totals.blocks = totals.blocks.saturating_add(game.blocks.unwrap_or(0));
        totals.plus_minus += i64::from(game.plusminus.unwrap_or(0));
        totals.shooting.accumulate(&game.counters());
    }

    let gp = f64::from(games_played.max(1));
    let averages = SeasonAverages {
        minutes: totals.minutes / gp,
        points: f64::from(totals.points) / gp,
        assists: f64::from(totals.assists) / gp,
        rebounds: f64::from(totals.rebounds) / gp,
        steals: f64::from(totals.steals) / gp,
        blocks: f64::from(totals.blocks) / gp,
        plus_minus: totals.plus_minus as f64 / gp,
    };

    let avg_sentiment = if sentiments.is_empty() {
        0.0
    } else {
        sentiments.iter().sum::<f64>() / sentiments.len() as f64
    };

    SeasonAggregate {
        games_played,
        games_listed: ordered.len(),
        total_mentions: total_mentions(ordered.iter().copied()),
        avg_sentiment,
        weighted_sentiment: weighted_sentiment(ordered.iter().copied()),
        shooting: totals.shooting.splits(),
        totals,
        averages,
    }
}

/// One game on a player's career-trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub game_pk: String,
    pub date: String,
    pub date_label: String,
    /// Blank when the game is not in the game list.
    pub home: String,
    pub away: String,
    pub sentiment: Option<f64>,
    pub mentions: u32,
    pub minutes: f64,
    pub points: u32,
    pub assists: u32,
    pub rebounds: u32,
    pub steals: u32,
    pub blocks: u32,
    pub plus_minus: i32,
    pub shooting: ShootingCounters,
    pub splits: ShootingSplits,
}

/// A player's history, oldest first, with shooting splits recomputed per game
/// and the matchup joined in from `games`.
pub fn player_trend(history: &[PlayerGameRecord], games: &[GameRecord]) -> Vec<TrendPoint> {
    let by_pk: HashMap<&str, &GameRecord> = games.iter().map(|g| (g.pk.as_str(), g)).collect();

    chronological_records(history)
        .into_iter()
        .map(|r| {
            let meta = by_pk.get(r.pk.as_str());
            let date = r.date.clone().unwrap_or_default();
            TrendPoint {
                game_pk: r.pk.clone(),
                date_label: short_date_label(&date),
                date,
                home: meta.map(|g| g.home.clone()).unwrap_or_default(),
                away: meta.map(|g| g.away.clone()).unwrap_or_default(),
                sentiment: r.sentiment,
                mentions: r.mentions_or_zero(),
                minutes: r.minutes_played(),
                points: r.points.unwrap_or(0),
                assists: r.assists.unwrap_or(0),
                rebounds: r.rebounds.unwrap_or(0),
                steals: r.steals.unwrap_or(0),
                blocks: r.blocks.unwrap_or(0),
                plus_minus: r.plusminus.unwrap_or(0),
                shooting: r.counters(),
                splits: r.splits(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(date: &str, minutes: f64, fgm: u32, fga: u32) -> PlayerGameRecord {
        PlayerGameRecord {
            pk: format!("g-{date}"),
            player_name: Some("Jamal Murray".into()),
            date: Some(date.into()),
            minutes: Some(minutes),
            fgm: Some(fgm),
            fga: Some(fga),
            points: Some(fgm * 2),
            ..Default::default()
        }
    }

    #[test]
    fn season_percentages_use_summed_attempts() {
        let history = vec![game("2025-10-22", 30.0, 1, 1), game("2025-10-24", 28.0, 0, 2)];
        let agg = season_aggregate(&history);
        assert_eq!(agg.games_played, 2);
        assert!((agg.shooting.fg_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn dnp_games_skip_counters_but_keep_sentiment_and_mentions() {
        let mut dnp = game("2025-10-26", 0.0, 5, 5);
        dnp.sentiment = Some(-30.0);
        dnp.mentions = Some(4);
        let mut played = game("2025-10-22", 32.0, 4, 10);
        played.sentiment = Some(50.0);
        played.mentions = Some(6);

        let agg = season_aggregate(&[dnp, played]);
        assert_eq!(agg.games_played, 1);
        assert_eq!(agg.games_listed, 2);
        assert_eq!(agg.totals.shooting.fga, 10);
        assert_eq!(agg.totals.points, 8);
        assert_eq!(agg.total_mentions, 10);
        assert_eq!(agg.avg_sentiment, 10.0);
        assert_eq!(agg.weighted_sentiment, (50.0 * 6.0 - 30.0 * 4.0) / 10.0);
    }

    #[test]
    fn unweighted_mean_skips_missing_sentiment() {
        let mut a = game("2025-10-22", 20.0, 1, 2);
        a.sentiment = Some(12.0);
        let b = game("2025-10-23", 20.0, 1, 2);
        let agg = season_aggregate(&[a, b]);
        assert_eq!(agg.avg_sentiment, 12.0);
    }

    #[test]
    fn no_played_games_does_not_divide_by_zero() {
        let agg = season_aggregate(&[game("2025-10-22", 0.0, 3, 3)]);
        assert_eq!(agg.games_played, 0);
        assert_eq!(agg.averages.points, 0.0);
        assert_eq!(agg.shooting, ShootingSplits::default());

        let empty = season_aggregate(&[]);
        assert_eq!(empty.games_played, 0);
        assert_eq!(empty.avg_sentiment, 0.0);
    }

    #[test]
    fn averages_divide_by_games_played() {
        let mut a = game("2025-10-22", 30.0, 5, 10);
        a.rebounds = Some(10);
        a.plusminus = Some(7);
        let mut b = game("2025-10-24", 34.0, 7, 12);
        b.rebounds = Some(4);
        b.plusminus = Some(-3);
        let agg = season_aggregate(&[a, b]);
        assert_eq!(agg.averages.rebounds, 7.0);
        assert_eq!(agg.averages.plus_minus, 2.0);
        assert_eq!(agg.averages.minutes, 32.0);
        assert_eq!(agg.totals.minutes, 64.0);
    }

    #[test]
    fn trend_sorts_by_date_and_joins_games() {
        let history = vec![game("2025-11-01", 30.0, 3, 6), game("2025-10-22", 30.0, 2, 4)];
        let games = vec![GameRecord {
            pk: "g-2025-10-22".into(),
            home: "Nuggets".into(),
            away: "Warriors".into(),
            ..Default::default()
        }];
        let trend = player_trend(&history, &games);
        assert_eq!(trend[0].game_pk, "g-2025-10-22");
        assert_eq!(trend[0].away, "Warriors");
        assert_eq!(trend[0].date_label, "Oct 22");
        assert_eq!(trend[1].home, "");
        assert_eq!(trend[1].splits.fg_pct, 50.0);
    }
}
