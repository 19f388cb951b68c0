use courtside_sentiment::analytics::timeline::{SeasonTimeline, TrackerMetric};
use courtside_sentiment::analytics::{
    build_leaderboard, fg_pct, gradient, pearson, true_shooting_pct, weighted_sentiment,
};
use courtside_sentiment::model::{GameRecord, PlayerGameRecord};
use proptest::prelude::*;

fn record(name: Option<String>, sentiment: Option<f64>, mentions: Option<u32>) -> PlayerGameRecord {
    PlayerGameRecord {
        pk: "g".into(),
        player_name: name,
        sentiment,
        mentions,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn correlation_is_bounded(
        pairs in proptest::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..60)
    ) {
        let r = pearson(pairs);
        prop_assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn series_correlates_perfectly_with_itself(
        xs in proptest::collection::vec(-1e3f64..1e3, 2..60)
    ) {
        let max = xs.iter().cloned().fold(f64::MIN, f64::max);
        let min = xs.iter().cloned().fold(f64::MAX, f64::min);
        prop_assume!(max - min > 1.0);
        let r = pearson(xs.iter().map(|&x| (x, x)));
        prop_assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_sentiment_ignores_order(
        rows in proptest::collection::vec(
            (proptest::option::of(-100f64..100.0), proptest::option::of(0u32..200)),
            0..40,
        )
    ) {
        let forward: Vec<PlayerGameRecord> =
            rows.iter().map(|&(s, m)| record(None, s, m)).collect();
        let mut backward = forward.clone();
        backward.reverse();
        let a = weighted_sentiment(&forward);
        let b = weighted_sentiment(&backward);
        prop_assert!((a - b).abs() < 1e-9);
        prop_assert!(a.is_finite());
    }

    #[test]
    fn leaderboard_accounts_for_every_named_record(
        rows in proptest::collection::vec(
            (proptest::option::of(0usize..5), proptest::option::of(-100f64..100.0)),
            0..40,
        )
    ) {
        let records: Vec<PlayerGameRecord> = rows
            .iter()
            .map(|&(n, s)| record(n.map(|i| format!("Player {i}")), s, Some(1)))
            .collect();
        let board = build_leaderboard(&records);
        let named = rows.iter().filter(|(n, _)| n.is_some()).count();
        prop_assert_eq!(board.iter().map(|e| e.games).sum::<usize>(), named);
        prop_assert!(board.windows(2).all(|w| w[0].avg_sentiment >= w[1].avg_sentiment));
    }

    #[test]
    fn frame_index_is_clamped(games in 1usize..12, index in 0usize..100) {
        let games: Vec<GameRecord> = (0..games)
            .map(|i| GameRecord {
                pk: format!("g{i}"),
                date: format!("2025-11-{:02}", i + 1),
                ..Default::default()
            })
            .collect();
        let timeline = SeasonTimeline::new(&games, &[]);
        let frame = timeline.frame(index, &TrackerMetric::default()).unwrap();
        prop_assert_eq!(frame.index, index.min(games.len() - 1));
        prop_assert_eq!(frame.game_count, games.len());
    }

    #[test]
    fn percentages_stay_in_range(attempted in 0u32..500, made_seed in 0u32..500) {
        let made = if attempted == 0 { 0 } else { made_seed % (attempted + 1) };
        let pct = fg_pct(made, attempted);
        prop_assert!((0.0..=100.0).contains(&pct));
        let ts = true_shooting_pct(made * 2, attempted, 0);
        prop_assert!(ts.is_finite() && ts >= 0.0);
    }

    #[test]
    fn gradient_keeps_blue_fixed(n in -1.0f64..2.0) {
        prop_assert_eq!(gradient(n).b, 50);
    }
}
