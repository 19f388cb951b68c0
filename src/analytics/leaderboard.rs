use crate::model::PlayerGameRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Unweighted mean of per-game sentiment; a missing value counts as 0.
    pub avg_sentiment: f64,
    pub games: usize,
}

/// Players ranked by average sentiment, highest first.
///
/// Records without a player name are skipped. Ties keep first-seen order.
pub fn build_leaderboard(records: &[PlayerGameRecord]) -> Vec<LeaderboardEntry> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(&str, f64, usize)> = Vec::new();

    for r in records {
        let Some(name) = r.name() else { continue };
        let slot = *slots.entry(name).or_insert_with(|| {
            sums.push((name, 0.0, 0));
            sums.len() - 1
        });
        let entry = &mut sums[slot];
        entry.1 += r.sentiment_or_zero();
        entry.2 += 1;
    }

    let mut board: Vec<LeaderboardEntry> = sums
        .into_iter()
        .map(|(name, total, games)| LeaderboardEntry {
            name: name.to_string(),
            avg_sentiment: total / games as f64,
            games,
        })
        .collect();

    board.sort_by(|a, b| b.avg_sentiment.total_cmp(&a.avg_sentiment));
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: Option<&str>, sentiment: Option<f64>) -> PlayerGameRecord {
        PlayerGameRecord {
            pk: "g".into(),
            player_name: name.map(str::to_string),
            sentiment,
            ..Default::default()
        }
    }

    #[test]
    fn averages_and_ranks() {
        let records = vec![
            rec(Some("A"), Some(10.0)),
            rec(Some("A"), Some(20.0)),
            rec(Some("B"), Some(30.0)),
        ];
        let board = build_leaderboard(&records);
        assert_eq!(board[0].name, "B");
        assert_eq!(board[0].avg_sentiment, 30.0);
        assert_eq!(board[1].name, "A");
        assert_eq!(board[1].avg_sentiment, 15.0);
        assert_eq!(board[1].games, 2);
    }

    #[test]
    fn null_sentiment_counts_as_zero_and_nameless_are_skipped() {
        let records = vec![
            rec(Some("C"), Some(12.0)),
            rec(Some("C"), None),
            rec(None, Some(99.0)),
            rec(Some(""), Some(99.0)),
        ];
        let board = build_leaderboard(&records);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].avg_sentiment, 6.0);
        assert_eq!(board[0].games, 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let records = vec![
            rec(Some("Zeke Nnaji"), Some(5.0)),
            rec(Some("Aaron Gordon"), Some(5.0)),
        ];
        let names: Vec<String> = build_leaderboard(&records).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Zeke Nnaji", "Aaron Gordon"]);
        assert!(build_leaderboard(&[]).is_empty());
    }
}
