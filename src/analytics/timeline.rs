//! Aligns per-player sentiment records with the game schedule and slices
//! them into one frame per game for the season tracker.

use super::color::{MetricScale, Rgb, metric_color};
use crate::model::{GameRecord, MetricKey, PlayerGameRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Undated entries sort after dated ones; ties keep input order.
fn by_date(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Games oldest first (stable).
pub fn chronological_games(games: &[GameRecord]) -> Vec<&GameRecord> {
    let mut sorted: Vec<&GameRecord> = games.iter().collect();
    sorted.sort_by(|a, b| by_date(a.game_date(), b.game_date()));
    sorted
}

/// Records oldest first (stable).
pub fn chronological_records(records: &[PlayerGameRecord]) -> Vec<&PlayerGameRecord> {
    let mut sorted: Vec<&PlayerGameRecord> = records.iter().collect();
    sorted.sort_by(|a, b| by_date(a.game_date(), b.game_date()));
    sorted
}

/// A season record with its game's metadata joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: PlayerGameRecord,
    pub home: Option<String>,
    pub away: Option<String>,
    pub game_date: Option<String>,
}

/// Join records to games by PK and sort by record date. Misses leave the metadata empty.
pub fn annotate_records(records: &[PlayerGameRecord], games: &[GameRecord]) -> Vec<AnnotatedRecord> {
    let by_pk: HashMap<&str, &GameRecord> = games.iter().map(|g| (g.pk.as_str(), g)).collect();
    chronological_records(records)
        .into_iter()
        .map(|r| {
            let meta = by_pk.get(r.pk.as_str());
            AnnotatedRecord {
                record: r.clone(),
                home: meta.map(|g| g.home.clone()),
                away: meta.map(|g| g.away.clone()),
                game_date: meta.map(|g| g.date.clone()),
            }
        })
        .collect()
}

/// A metric the tracker can color bars by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackerMetric {
    pub key: MetricKey,
    pub label: &'static str,
    pub scale: MetricScale,
}

impl TrackerMetric {
    pub const PRESETS: [TrackerMetric; 5] = [
        TrackerMetric {
            key: MetricKey::Ts,
            label: "True Shooting %",
            scale: MetricScale::percent(0.40, 0.75),
        },
        TrackerMetric {
            key: MetricKey::Efg,
            label: "eFG %",
            scale: MetricScale::percent(0.40, 0.75),
        },
        TrackerMetric {
            key: MetricKey::Points,
            label: "Points",
            scale: MetricScale::new(0.0, 35.0),
        },
        TrackerMetric {
            key: MetricKey::PlusMinus,
            label: "Plus/Minus",
            scale: MetricScale::new(-15.0, 15.0),
        },
        TrackerMetric {
            key: MetricKey::Minutes,
            label: "Minutes",
            scale: MetricScale::new(5.0, 40.0),
        },
    ];

    pub fn for_key(key: MetricKey) -> Option<TrackerMetric> {
        Self::PRESETS.into_iter().find(|m| m.key == key)
    }
}

impl Default for TrackerMetric {
    fn default() -> Self {
        Self::PRESETS[0]
    }
}

/// One bar in a tracker frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub name: String,
    pub sentiment: f64,
    pub metric_value: Option<f64>,
    pub mentions: u32,
    pub minutes: f64,
    pub color: Rgb,
}

/// Snapshot of one game for the season tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    pub game_count: usize,
    pub game_pk: String,
    pub date: String,
    pub date_label: String,
    pub home: String,
    pub away: String,
    pub thread_url: Option<String>,
    pub metric: MetricKey,
    pub metric_label: String,
    pub rows: Vec<FrameRow>,
}

/// Games in date order plus the fixed, alphabetical set of player rows.
pub struct SeasonTimeline<'a> {
    games: Vec<&'a GameRecord>,
    records: &'a [PlayerGameRecord],
    players: Vec<String>,
}

impl<'a> SeasonTimeline<'a> {
    pub fn new(games: &'a [GameRecord], records: &'a [PlayerGameRecord]) -> Self {
        let players: BTreeSet<String> = records
            .iter()
            .filter_map(|r| r.name().map(str::to_string))
            .collect();

        Self {
            games: chronological_games(games),
            records,
            players: players.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Clamp into `[0, len - 1]` (0 when empty).
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }

    /// Frame for the game at `index` (clamped). Players who did not play are left out.
    pub fn frame(&self, index: usize, metric: &TrackerMetric) -> Option<Frame> {
        let index = self.clamp_index(index);
        let game = *self.games.get(index)?;

        let game_records: Vec<&PlayerGameRecord> =
            self.records.iter().filter(|r| r.pk == game.pk).collect();

        let rows = self
            .players
            .iter()
            .filter_map(|name| {
                let record = game_records
                    .iter()
                    .find(|r| r.name() == Some(name.as_str()))?;
                if !record.played() {
                    return None;
                }
                let metric_value = record.metric(metric.key);
                Some(FrameRow {
                    name: name.clone(),
                    sentiment: record.sentiment_or_zero(),
                    metric_value,
                    mentions: record.mentions_or_zero(),
                    minutes: record.minutes_played(),
                    color: metric_color(metric_value, &metric.scale),
                })
            })
            .collect();

        Some(Frame {
            index,
            game_count: self.len(),
            game_pk: game.pk.clone(),
            date: game.date.clone(),
            date_label: game.date_label(),
            home: game.home.clone(),
            away: game.away.clone(),
            thread_url: game.thread_url(),
            metric: metric.key,
            metric_label: metric.label.to_string(),
            rows,
        })
    }
}

/// Play/pause/scrub state for the season tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playback {
    index: usize,
    frame_count: usize,
    playing: bool,
}

impl Playback {
    pub fn new(frame_count: usize) -> Self {
        Self {
            index: 0,
            frame_count,
            playing: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn at_end(&self) -> bool {
        self.index + 1 >= self.frame_count
    }

    /// Start playing; from the last frame this rewinds to the first.
    pub fn play(&mut self) {
        if self.frame_count < 2 {
            self.playing = false;
            return;
        }
        if self.at_end() {
            self.index = 0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.playing = false;
    }

    /// Manual scrub: clamps and stops playback.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.frame_count.saturating_sub(1));
        self.playing = false;
    }

    /// Advance one frame while playing. Stops on reaching the last frame.
    /// Returns whether the index moved.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        if self.at_end() {
            self.playing = false;
            return false;
        }
        self.index += 1;
        if self.at_end() {
            self.playing = false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(pk: &str, date: &str) -> GameRecord {
        GameRecord {
            pk: pk.into(),
            date: date.into(),
            home: "Nuggets".into(),
            away: "Jazz".into(),
            ..Default::default()
        }
    }

    fn rec(pk: &str, name: &str, minutes: f64, points: u32, sentiment: f64) -> PlayerGameRecord {
        PlayerGameRecord {
            pk: pk.into(),
            player_name: Some(name.into()),
            minutes: Some(minutes),
            points: Some(points),
            sentiment: Some(sentiment),
            mentions: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn games_sort_stably_with_undated_last() {
        let games = vec![
            game("c", "2025-11-01"),
            game("x", "tbd"),
            game("a", "2025-10-22"),
            game("b", "2025-10-22"),
        ];
        let order: Vec<&str> = chronological_games(&games)
            .iter()
            .map(|g| g.pk.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c", "x"]);
    }

    #[test]
    fn player_rows_are_fixed_and_alphabetical() {
        let games = vec![game("g1", "2025-10-22")];
        let records = vec![
            rec("g1", "Nikola Jokic", 35.0, 30, 60.0),
            rec("g1", "Aaron Gordon", 28.0, 12, 10.0),
            rec("g2", "Christian Braun", 20.0, 8, 5.0),
            PlayerGameRecord {
                pk: "g1".into(),
                ..Default::default()
            },
        ];
        let tl = SeasonTimeline::new(&games, &records);
        assert_eq!(tl.players(), ["Aaron Gordon", "Christian Braun", "Nikola Jokic"]);
    }

    #[test]
    fn frame_hides_players_who_did_not_play() {
        let games = vec![game("g2", "2025-10-24"), game("g1", "2025-10-22")];
        let records = vec![
            rec("g1", "Nikola Jokic", 35.0, 35, 60.0),
            rec("g1", "Peyton Watson", 0.0, 0, 15.0),
            rec("g2", "Peyton Watson", 22.0, 14, 35.0),
        ];
        let tl = SeasonTimeline::new(&games, &records);
        let points = TrackerMetric::for_key(MetricKey::Points).unwrap();

        let first = tl.frame(0, &points).unwrap();
        assert_eq!(first.game_pk, "g1");
        let names: Vec<&str> = first.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Nikola Jokic"]);
        assert_eq!(first.rows[0].metric_value, Some(35.0));
        assert_eq!(first.rows[0].color, Rgb { r: 0, g: 255, b: 50 });

        let second = tl.frame(1, &points).unwrap();
        let names: Vec<&str> = second.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Peyton Watson"]);
    }

    #[test]
    fn frame_index_is_clamped() {
        let games = vec![game("g1", "2025-10-22"), game("g2", "2025-10-24")];
        let tl = SeasonTimeline::new(&games, &[]);
        let frame = tl.frame(99, &TrackerMetric::default()).unwrap();
        assert_eq!(frame.index, 1);
        assert!(frame.rows.is_empty());

        let empty = SeasonTimeline::new(&[], &[]);
        assert!(empty.frame(0, &TrackerMetric::default()).is_none());
    }

    #[test]
    fn annotate_joins_metadata_and_leaves_misses_blank() {
        let games = vec![game("g1", "2025-10-22")];
        let records = vec![rec("g1", "Jamal Murray", 34.0, 21, 12.0), rec("zz", "Jamal Murray", 30.0, 9, -3.0)];
        let annotated = annotate_records(&records, &games);
        assert_eq!(annotated[0].home.as_deref(), Some("Nuggets"));
        assert_eq!(annotated[1].home, None);
    }

    #[test]
    fn playback_stops_at_last_frame() {
        let mut pb = Playback::new(3);
        assert!(!pb.tick());
        pb.play();
        assert!(pb.tick());
        assert!(pb.is_playing());
        assert!(pb.tick());
        assert_eq!(pb.index(), 2);
        assert!(!pb.is_playing());
        assert!(!pb.tick());
        assert_eq!(pb.index(), 2);
    }

    #[test]
    fn play_from_end_rewinds() {
        let mut pb = Playback::new(4);
        pb.seek(10);
        assert_eq!(pb.index(), 3);
        pb.play();
        assert_eq!(pb.index(), 0);
        assert!(pb.is_playing());
    }

    #[test]
    fn seek_and_reset_stop_playback() {
        let mut pb = Playback::new(5);
        pb.play();
        pb.seek(2);
        assert!(!pb.is_playing());
        assert_eq!(pb.index(), 2);
        pb.toggle();
        assert!(pb.is_playing());
        pb.reset();
        assert_eq!((pb.index(), pb.is_playing()), (0, false));
    }

    #[test]
    fn single_or_empty_timeline_never_plays() {
        for n in [0, 1] {
            let mut pb = Playback::new(n);
            pb.play();
            assert!(!pb.is_playing());
            assert!(!pb.tick());
            assert_eq!(pb.index(), 0);
        }
    }
}
