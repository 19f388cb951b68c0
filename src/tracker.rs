//! Timed playback of the season tracker.

use crate::analytics::timeline::{Frame, Playback, SeasonTimeline, TrackerMetric};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Shortest period between frames; `interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Play the timeline from `start`, handing each frame to `emit`.
///
/// The current frame is emitted straight away, then one frame per `every`
/// until the last game is reached or `stop` turns `true` (or its sender is
/// dropped). Starting on the last frame rewinds to the first, like the play
/// button. Returns the final playback state.
pub async fn run_playback<F>(
    timeline: &SeasonTimeline<'_>,
    metric: &TrackerMetric,
    start: usize,
    every: Duration,
    mut stop: watch::Receiver<bool>,
    mut emit: F,
) -> Playback
where
    F: FnMut(Frame),
{
    let mut playback = Playback::new(timeline.len());
    if timeline.is_empty() {
        return playback;
    }

    playback.seek(start);
    playback.play();
    if let Some(frame) = timeline.frame(playback.index(), metric) {
        emit(frame);
    }

    if every < MIN_PERIOD {
        warn!(?every, "Tracker period too short, using 1ms");
    }
    let mut ticker = interval(every.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    while playback.is_playing() {
        if *stop.borrow() {
            playback.pause();
            break;
        }
        // Stop wins over a tick that is ready in the same poll.
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    info!(index = playback.index(), "Playback stopped");
                    playback.pause();
                }
            }
            _ = ticker.tick() => {
                if !playback.tick() {
                    break;
                }
                debug!(index = playback.index(), "tracker tick");
                if let Some(frame) = timeline.frame(playback.index(), metric) {
                    emit(frame);
                }
            }
        }
    }

    info!(
        index = playback.index(),
        frames = playback.frame_count(),
        "Playback finished"
    );
    playback
}
