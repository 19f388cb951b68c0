use serde::{Deserialize, Serialize};

/// Raw made/attempted counters; absent inputs are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootingCounters {
    pub fgm: u32,
    pub fga: u32,
    pub fg3m: u32,
    pub fg3a: u32,
    pub ftm: u32,
    pub fta: u32,
    pub points: u32,
}

/// Shooting efficiency, every value on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShootingSplits {
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub ts: f64,
    pub efg: f64,
}

impl ShootingCounters {
    pub fn splits(&self) -> ShootingSplits {
        ShootingSplits {
            fg_pct: fg_pct(self.fgm, self.fga),
            fg3_pct: fg_pct(self.fg3m, self.fg3a),
            ft_pct: fg_pct(self.ftm, self.fta),
            ts: true_shooting_pct(self.points, self.fga, self.fta),
            efg: effective_fg_pct(self.fgm, self.fg3m, self.fga),
        }
    }

    /// Field-wise sum, saturating.
    pub fn accumulate(&mut self, other: &ShootingCounters) {
        self.fgm = self.fgm.saturating_add(other.fgm);
        self.fga = self.fga.saturating_add(other.fga);
        self.fg3m = self.fg3m.saturating_add(other.fg3m);
        self.fg3a = self.fg3a.saturating_add(other.fg3a);
        self.ftm = self.ftm.saturating_add(other.ftm);
        self.fta = self.fta.saturating_add(other.fta);
        self.points = self.points.saturating_add(other.points);
    }
}

/// Made over attempted, as a percentage. Used for FG, 3P and FT alike.
pub fn fg_pct(made: u32, attempted: u32) -> f64 {
    if attempted > 0 {
        f64::from(made) / f64::from(attempted) * 100.0
    } else {
        0.0
    }
}

/// eFG% = (FGM + 0.5 * 3PM) / FGA
pub fn effective_fg_pct(fgm: u32, fg3m: u32, fga: u32) -> f64 {
    if fga > 0 {
        (f64::from(fgm) + 0.5 * f64::from(fg3m)) / f64::from(fga) * 100.0
    } else {
        0.0
    }
}

/// TS% = PTS / (2 * (FGA + 0.44 * FTA))
pub fn true_shooting_pct(points: u32, fga: u32, fta: u32) -> f64 {
    let attempts = f64::from(fga) + 0.44 * f64::from(fta);
    if attempts > 0.0 {
        f64::from(points) / (2.0 * attempts) * 100.0
    } else {
        0.0
    }
}
