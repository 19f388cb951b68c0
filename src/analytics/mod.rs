//! Pure calculations over game and player records. Nothing in here does I/O.

pub mod color;
pub mod correlation;
pub mod leaderboard;
pub mod season;
pub mod sentiment;
pub mod shooting;
pub mod timeline;

pub use color::{MetricScale, Rgb, StatTone, gradient, metric_color, stat_tone};
pub use correlation::{
    CorrelationResult, CorrelationStrength, correlate_with_sentiment, metric_sentiment_correlation,
    pearson,
};
pub use leaderboard::{LeaderboardEntry, build_leaderboard};
pub use season::{SeasonAggregate, TrendPoint, player_trend, season_aggregate};
pub use sentiment::{SentimentPoint, game_weighted_sentiment, sentiment_over_time, weighted_sentiment};
pub use shooting::{ShootingCounters, ShootingSplits, effective_fg_pct, fg_pct, true_shooting_pct};
pub use timeline::{Frame, FrameRow, Playback, SeasonTimeline, TrackerMetric};
