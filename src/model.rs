use crate::analytics::shooting::{ShootingCounters, ShootingSplits};
use crate::error::Error;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Post-game discussion threads live under this host.
const THREAD_HOST: &str = "https://www.reddit.com";

/// One contest, as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK", default, skip_serializing_if = "Option::is_none")]
    pub sk: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub date: String,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub home: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub away: String,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub home_pts: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub away_pts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<serde_json::Value>,
}

impl GameRecord {
    pub fn game_date(&self) -> Option<DateTime<Utc>> {
        parse_game_date(&self.date)
    }

    pub fn date_label(&self) -> String {
        date_label(&self.date)
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away, self.home)
    }

    /// `away - home`, or empty when either score is missing.
    pub fn score_line(&self) -> String {
        match (self.away_pts, self.home_pts) {
            (Some(a), Some(h)) => format!("{a} - {h}"),
            _ => String::new(),
        }
    }

    /// Opponent from the focus team's point of view: `@ Home` on the road, `vs Away` otherwise.
    pub fn opponent_label(&self, focus_team: &str) -> String {
        if team_matches(&self.away, focus_team) {
            format!("@ {}", self.home)
        } else {
            format!("vs {}", self.away)
        }
    }

    pub fn thread_url(&self) -> Option<String> {
        self.permalink
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{THREAD_HOST}{p}"))
    }
}

/// One player's box score and fan sentiment for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameRecord {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK", default, skip_serializing_if = "Option::is_none")]
    pub sk: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub minutes: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub points: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub plusminus: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub assists: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub rebounds: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub steals: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub blocks: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub fga: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub fgm: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub fta: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub ftm: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub fg3a: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub fg3m: Option<u32>,
    /// Upstream fraction; only used when raw counters are absent.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub efg: Option<f64>,
    /// Upstream fraction; only used when raw counters are absent.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub ts: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub sentiment: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub mentions: Option<u32>,
}

impl PlayerGameRecord {
    pub fn name(&self) -> Option<&str> {
        self.player_name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn minutes_played(&self) -> f64 {
        self.minutes.filter(|m| m.is_finite()).unwrap_or(0.0)
    }

    /// A player "played" iff minutes > 0.
    pub fn played(&self) -> bool {
        self.minutes_played() > 0.0
    }

    pub fn sentiment_or_zero(&self) -> f64 {
        self.sentiment.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    pub fn mentions_or_zero(&self) -> u32 {
        self.mentions.unwrap_or(0)
    }

    pub fn game_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_game_date)
    }

    pub fn counters(&self) -> ShootingCounters {
        ShootingCounters {
            fgm: self.fgm.unwrap_or(0),
            fga: self.fga.unwrap_or(0),
            fg3m: self.fg3m.unwrap_or(0),
            fg3a: self.fg3a.unwrap_or(0),
            ftm: self.ftm.unwrap_or(0),
            fta: self.fta.unwrap_or(0),
            points: self.points.unwrap_or(0),
        }
    }

    pub fn splits(&self) -> ShootingSplits {
        self.counters().splits()
    }

    fn has_shooting_inputs(&self) -> bool {
        self.fga.is_some() || self.fta.is_some()
    }

    /// Value of `key` for this record, `None` when the inputs are missing.
    ///
    /// Shooting metrics are recomputed from raw counters whenever those are
    /// present; the upstream `ts`/`efg` fractions are a fallback only.
    pub fn metric(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::Ts => {
                if self.has_shooting_inputs() {
                    Some(self.splits().ts)
                } else {
                    self.ts.map(as_percent)
                }
            }
            MetricKey::Efg => {
                if self.fga.is_some() {
                    Some(self.splits().efg)
                } else {
                    self.efg.map(as_percent)
                }
            }
            MetricKey::FgPct => self.fga.map(|_| self.splits().fg_pct),
            MetricKey::Fg3Pct => self.fg3a.map(|_| self.splits().fg3_pct),
            MetricKey::FtPct => self.fta.map(|_| self.splits().ft_pct),
            MetricKey::PlusMinus => self.plusminus.map(f64::from),
            MetricKey::Points => self.points.map(f64::from),
            MetricKey::Assists => self.assists.map(f64::from),
            MetricKey::Rebounds => self.rebounds.map(f64::from),
            MetricKey::Steals => self.steals.map(f64::from),
            MetricKey::Blocks => self.blocks.map(f64::from),
            MetricKey::Minutes => self.minutes.filter(|m| m.is_finite()),
            MetricKey::Mentions => self.mentions.map(f64::from),
        }
        .filter(|v| v.is_finite())
    }
}

/// Fractions (<= 1) are scaled to 0-100; anything larger is taken as a percentage already.
fn as_percent(v: f64) -> f64 {
    if v.abs() <= 1.0 { v * 100.0 } else { v }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    #[serde(rename = "ts")]
    Ts,
    #[serde(rename = "efg")]
    Efg,
    #[serde(rename = "fg_pct")]
    FgPct,
    #[serde(rename = "fg3_pct")]
    Fg3Pct,
    #[serde(rename = "ft_pct")]
    FtPct,
    #[serde(rename = "plusminus")]
    PlusMinus,
    #[serde(rename = "points")]
    Points,
    #[serde(rename = "assists")]
    Assists,
    #[serde(rename = "rebounds")]
    Rebounds,
    #[serde(rename = "steals")]
    Steals,
    #[serde(rename = "blocks")]
    Blocks,
    #[serde(rename = "minutes")]
    Minutes,
    #[serde(rename = "mentions")]
    Mentions,
}

impl MetricKey {
    pub const ALL: [MetricKey; 13] = [
        Self::Ts,
        Self::Efg,
        Self::FgPct,
        Self::Fg3Pct,
        Self::FtPct,
        Self::PlusMinus,
        Self::Points,
        Self::Assists,
        Self::Rebounds,
        Self::Steals,
        Self::Blocks,
        Self::Minutes,
        Self::Mentions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Efg => "efg",
            Self::FgPct => "fg_pct",
            Self::Fg3Pct => "fg3_pct",
            Self::FtPct => "ft_pct",
            Self::PlusMinus => "plusminus",
            Self::Points => "points",
            Self::Assists => "assists",
            Self::Rebounds => "rebounds",
            Self::Steals => "steals",
            Self::Blocks => "blocks",
            Self::Minutes => "minutes",
            Self::Mentions => "mentions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ts => "True Shooting %",
            Self::Efg => "eFG %",
            Self::FgPct => "FG %",
            Self::Fg3Pct => "3-Point %",
            Self::FtPct => "Free Throw %",
            Self::PlusMinus => "Plus/Minus (+/-)",
            Self::Points => "Points",
            Self::Assists => "Assists",
            Self::Rebounds => "Rebounds",
            Self::Steals => "Steals",
            Self::Blocks => "Blocks",
            Self::Minutes => "Minutes Played",
            Self::Mentions => "Total Mentions",
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            Self::Ts | Self::Efg | Self::FgPct | Self::Fg3Pct | Self::FtPct
        )
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.key() == wanted)
            .ok_or_else(|| Error::parse(format!("unknown metric key: {s}")))
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` (taken as UTC midnight).
pub fn parse_game_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn mountain_standard() -> FixedOffset {
    FixedOffset::west_opt(7 * 3600).unwrap_or_else(|| Utc.fix())
}

/// `Oct 22, 2025`. Timestamps are shown in Mountain Standard Time, bare dates as written.
pub fn date_label(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt
            .with_timezone(&mountain_standard())
            .format("%b %-d, %Y")
            .to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `Oct 22`, the compact form used on player trend axes.
pub fn short_date_label(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt
            .with_timezone(&mountain_standard())
            .format("%b %-d")
            .to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%b %-d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn team_matches(name: &str, focus_team: &str) -> bool {
    let focus = focus_team.trim();
    !focus.is_empty() && (name.eq_ignore_ascii_case(focus) || name.contains(focus))
}

mod de {
    use serde::{Deserialize, Deserializer};

    pub fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    /// Accepts `32.5`, `"32.5"` and `"32:15"` (leading number only).
    pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(
            match Option::<NumberOrText>::deserialize(deserializer)? {
                None => None,
                Some(NumberOrText::Number(n)) => Some(n),
                Some(NumberOrText::Text(s)) => leading_number(&s),
                Some(NumberOrText::Other(_)) => None,
            }
            .filter(|n| n.is_finite()),
        )
    }

    /// Counters: whole numbers in any of the `lenient_f64` shapes, else `None`.
    pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(whole(lenient_f64(deserializer)?)
            .filter(|&n| (0.0..=f64::from(u32::MAX)).contains(&n))
            .map(|n| n as u32))
    }

    pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(whole(lenient_f64(deserializer)?)
            .filter(|&n| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&n))
            .map(|n| n as i32))
    }

    fn whole(n: Option<f64>) -> Option<f64> {
        n.filter(|n| n.fract() == 0.0)
    }

    fn leading_number(s: &str) -> Option<f64> {
        let s = s.trim();
        let end = s
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        s[..end].parse().ok()
    }
}
