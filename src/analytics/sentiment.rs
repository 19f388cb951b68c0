use super::timeline::chronological_games;
use crate::model::{GameRecord, PlayerGameRecord};
use serde::{Deserialize, Serialize};

/// Mention-weighted mean sentiment.
///
/// Missing sentiment counts as 0 and missing mentions as 0, so a record
/// without mentions carries no weight. Returns 0 when there is no weight at all.
pub fn weighted_sentiment<'a>(records: impl IntoIterator<Item = &'a PlayerGameRecord>) -> f64 {
    let (weighted_sum, total_mentions) =
        records
            .into_iter()
            .fold((0.0_f64, 0_u64), |(sum, mentions), r| {
                let weight = r.mentions_or_zero();
                (
                    sum + r.sentiment_or_zero() * f64::from(weight),
                    mentions + u64::from(weight),
                )
            });

    if total_mentions == 0 {
        return 0.0;
    }
    let avg = weighted_sum / total_mentions as f64;
    if avg.is_finite() { avg } else { 0.0 }
}

/// Weighted sentiment restricted to one game.
pub fn game_weighted_sentiment(records: &[PlayerGameRecord], game_pk: &str) -> f64 {
    weighted_sentiment(records.iter().filter(|r| r.pk == game_pk))
}

pub fn total_mentions<'a>(records: impl IntoIterator<Item = &'a PlayerGameRecord>) -> u64 {
    records
        .into_iter()
        .map(|r| u64::from(r.mentions_or_zero()))
        .sum()
}

/// One point of the season sentiment trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub game_pk: String,
    pub date: String,
    pub date_label: String,
    pub opponent: String,
    pub avg_sentiment: f64,
    pub mentions: u64,
}

/// Weighted sentiment per game, oldest first. Games without any records are skipped.
pub fn sentiment_over_time(
    games: &[GameRecord],
    records: &[PlayerGameRecord],
    focus_team: &str,
) -> Vec<SentimentPoint> {
    if games.is_empty() || records.is_empty() {
        return Vec::new();
    }

    chronological_games(games)
        .into_iter()
        .filter_map(|game| {
            let game_records: Vec<&PlayerGameRecord> =
                records.iter().filter(|r| r.pk == game.pk).collect();
            if game_records.is_empty() {
                return None;
            }
            Some(SentimentPoint {
                game_pk: game.pk.clone(),
                date: game.date.clone(),
                date_label: game.date_label(),
                opponent: game.opponent_label(focus_team),
                avg_sentiment: weighted_sentiment(game_records.iter().copied()),
                mentions: total_mentions(game_records.iter().copied()),
            })
        })
        .collect()
}
