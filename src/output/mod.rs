use crate::analytics::color::StatTone;
use crate::dashboard::{PlayerView, SeasonDashboard};
use crate::error::{Error, Result};
use crate::model::MetricKey;
use askama::Template;
use chrono::Utc;

#[derive(Template)]
#[template(path = "season_report.html")]
struct SeasonReport {
    generated_at: String,
    team: String,
    game_count: usize,
    record_count: usize,
    season_sentiment_fmt: String,
    season_sentiment_class: String,
    total_mentions: u64,
    trend: Vec<TrendRow>,
    leaderboard: Vec<LeaderRow>,
    correlations: Vec<CorrelationRow>,
    has_frame: bool,
    frame_title: String,
    frame_position: String,
    frame_metric: String,
    thread_url: String,
    frame_rows: Vec<BarRow>,
}

#[allow(dead_code)] // fields used by Askama template
struct TrendRow {
    date_label: String,
    opponent: String,
    sentiment_fmt: String,
    sentiment_class: String,
    mentions: u64,
}

#[allow(dead_code)] // fields used by Askama template
struct LeaderRow {
    rank: usize,
    name: String,
    sentiment_fmt: String,
    sentiment_class: String,
    games: usize,
}

#[allow(dead_code)] // fields used by Askama template
struct CorrelationRow {
    label: String,
    coefficient_fmt: String,
    strength: String,
    bar_pct: u32,
}

#[allow(dead_code)] // fields used by Askama template
struct BarRow {
    name: String,
    sentiment_fmt: String,
    metric_fmt: String,
    mentions: u32,
    color: String,
}

#[derive(Template)]
#[template(path = "player_report.html")]
struct PlayerReport {
    generated_at: String,
    name: String,
    games_played: u32,
    games_listed: usize,
    total_mentions: u64,
    avg_sentiment_fmt: String,
    weighted_sentiment_fmt: String,
    summary: Vec<SummaryCell>,
    averages: Vec<SummaryCell>,
    trend: Vec<GameLine>,
}

#[allow(dead_code)] // fields used by Askama template
struct SummaryCell {
    label: String,
    value_fmt: String,
    tone_class: String,
}

#[allow(dead_code)] // fields used by Askama template
struct GameLine {
    date_label: String,
    matchup: String,
    minutes_fmt: String,
    points: u32,
    rebounds: u32,
    assists: u32,
    plus_minus_fmt: String,
    ts_fmt: String,
    efg_fmt: String,
    sentiment_fmt: String,
    mentions: u32,
}

fn sentiment_class(value: f64) -> String {
    if value > 0.0 {
        "text-emerald-400".into()
    } else if value < 0.0 {
        "text-rose-400".into()
    } else {
        "text-slate-400".into()
    }
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

/// Display form of a metric value: `61.2%`, `+3.0`, `27.0`.
pub fn format_metric(key: MetricKey, value: f64) -> String {
    if key.is_percent() {
        format!("{value:.1}%")
    } else if key == MetricKey::PlusMinus {
        signed(value)
    } else {
        format!("{value:.1}")
    }
}

fn generated_at() -> String {
    Utc::now().format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn render_season_report(dashboard: &SeasonDashboard) -> Result<String> {
    let trend = dashboard
        .trend
        .iter()
        .map(|p| TrendRow {
            date_label: p.date_label.clone(),
            opponent: p.opponent.clone(),
            sentiment_fmt: format!("{:.2}", p.avg_sentiment),
            sentiment_class: sentiment_class(p.avg_sentiment),
            mentions: p.mentions,
        })
        .collect();

    let leaderboard = dashboard
        .leaderboard
        .iter()
        .enumerate()
        .map(|(i, e)| LeaderRow {
            rank: i + 1,
            name: e.name.clone(),
            sentiment_fmt: format!("{:.1}", e.avg_sentiment),
            sentiment_class: sentiment_class(e.avg_sentiment),
            games: e.games,
        })
        .collect();

    let correlations = dashboard
        .correlations
        .iter()
        .map(|c| CorrelationRow {
            label: c.label.clone(),
            coefficient_fmt: format!("{:.2}", c.coefficient),
            strength: c.strength.to_string(),
            bar_pct: (c.coefficient.abs() * 100.0).round() as u32,
        })
        .collect();

    let frame = dashboard.frame.as_ref();
    let frame_rows = frame
        .map(|f| {
            f.rows
                .iter()
                .map(|r| BarRow {
                    name: r.name.clone(),
                    sentiment_fmt: format!("{:.1}", r.sentiment),
                    metric_fmt: r
                        .metric_value
                        .map(|v| format_metric(f.metric, v))
                        .unwrap_or_else(|| "-".into()),
                    mentions: r.mentions,
                    color: r.color.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let report = SeasonReport {
        generated_at: generated_at(),
        team: dashboard.team.clone(),
        game_count: dashboard.game_count,
        record_count: dashboard.record_count,
        season_sentiment_fmt: format!("{:.2}", dashboard.season_sentiment),
        season_sentiment_class: sentiment_class(dashboard.season_sentiment),
        total_mentions: dashboard.total_mentions,
        trend,
        leaderboard,
        correlations,
        has_frame: frame.is_some(),
        frame_title: frame
            .map(|f| format!("{} @ {} · {}", f.away, f.home, f.date_label))
            .unwrap_or_default(),
        frame_position: frame
            .map(|f| format!("{} / {}", f.index + 1, f.game_count))
            .unwrap_or_default(),
        frame_metric: frame.map(|f| f.metric_label.clone()).unwrap_or_default(),
        thread_url: frame.and_then(|f| f.thread_url.clone()).unwrap_or_default(),
        frame_rows,
    };

    report
        .render()
        .map_err(|e| Error::template(format!("season report: {e}")))
}

fn tone_class(tone: StatTone) -> String {
    tone.css_class().to_string()
}

pub fn render_player_report(view: &PlayerView) -> Result<String> {
    let agg = &view.aggregate;

    let summary = view
        .summary
        .iter()
        .map(|s| SummaryCell {
            label: s.label.clone(),
            value_fmt: format_metric(s.metric, s.value),
            tone_class: tone_class(s.tone),
        })
        .collect();

    let neutral = tone_class(StatTone::Neutral);
    let averages = [
        ("MPG", agg.averages.minutes),
        ("PPG", agg.averages.points),
        ("RPG", agg.averages.rebounds),
        ("APG", agg.averages.assists),
        ("SPG", agg.averages.steals),
        ("BPG", agg.averages.blocks),
    ]
    .into_iter()
    .map(|(label, value)| SummaryCell {
        label: label.into(),
        value_fmt: format!("{value:.1}"),
        tone_class: neutral.clone(),
    })
    .collect();

    let trend = view
        .trend
        .iter()
        .map(|t| GameLine {
            date_label: t.date_label.clone(),
            matchup: if t.home.is_empty() && t.away.is_empty() {
                String::new()
            } else {
                format!("{} @ {}", t.away, t.home)
            },
            minutes_fmt: format!("{:.0}", t.minutes),
            points: t.points,
            rebounds: t.rebounds,
            assists: t.assists,
            plus_minus_fmt: signed(f64::from(t.plus_minus)),
            ts_fmt: format_metric(MetricKey::Ts, t.splits.ts),
            efg_fmt: format_metric(MetricKey::Efg, t.splits.efg),
            sentiment_fmt: t
                .sentiment
                .map(|s| format!("{s:.1}"))
                .unwrap_or_else(|| "-".into()),
            mentions: t.mentions,
        })
        .collect();

    let report = PlayerReport {
        generated_at: generated_at(),
        name: view.name.clone(),
        games_played: agg.games_played,
        games_listed: agg.games_listed,
        total_mentions: agg.total_mentions,
        avg_sentiment_fmt: format!("{:.2}", agg.avg_sentiment),
        weighted_sentiment_fmt: format!("{:.2}", agg.weighted_sentiment),
        summary,
        averages,
        trend,
    };

    report
        .render()
        .map_err(|e| Error::template(format!("player report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_formatting() {
        assert_eq!(format_metric(MetricKey::Ts, 61.234), "61.2%");
        assert_eq!(format_metric(MetricKey::PlusMinus, 3.0), "+3.0");
        assert_eq!(format_metric(MetricKey::PlusMinus, -2.5), "-2.5");
        assert_eq!(format_metric(MetricKey::Points, 27.0), "27.0");
    }
}
