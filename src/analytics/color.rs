use crate::model::MetricKey;
use serde::{Deserialize, Serialize};

/// Range a metric is judged against when coloring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScale {
    pub min: f64,
    pub max: f64,
    /// Range is expressed as a fraction (0.40, not 40).
    #[serde(default)]
    pub is_percent: bool,
    /// Lower is better.
    #[serde(default)]
    pub invert_color: bool,
}

impl MetricScale {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            is_percent: false,
            invert_color: false,
        }
    }

    pub const fn percent(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            is_percent: true,
            invert_color: false,
        }
    }

    pub const fn inverted(self) -> Self {
        Self {
            invert_color: true,
            ..self
        }
    }

    /// Position of `value` within the range, clamped to [0, 1] and flipped when inverted.
    pub fn normalize(&self, value: f64) -> f64 {
        let mut v = value;
        if self.is_percent && v > 1.0 {
            v /= 100.0;
        }

        let span = self.max - self.min;
        let normalized = if span > 0.0 {
            ((v - self.min) / span).clamp(0.0, 1.0)
        } else if v >= self.max {
            1.0
        } else {
            0.0
        };

        if self.invert_color {
            1.0 - normalized
        } else {
            normalized
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Slate fill for "no value".
    pub const NEUTRAL: Rgb = Rgb {
        r: 0x33,
        g: 0x41,
        b: 0x55,
    };

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Red at 0, yellow at 0.5, green at 1. Blue stays fixed at 50.
pub fn gradient(normalized: f64) -> Rgb {
    let n = if normalized.is_finite() {
        normalized.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let r = if n < 0.5 {
        255
    } else {
        (255.0 * (1.0 - (n - 0.5) * 2.0)).round() as u8
    };
    let g = if n > 0.5 {
        255
    } else {
        (255.0 * (n * 2.0)).round() as u8
    };
    Rgb { r, g, b: 50 }
}

pub fn metric_color(value: Option<f64>, scale: &MetricScale) -> Rgb {
    match value.filter(|v| v.is_finite()) {
        Some(v) => gradient(scale.normalize(v)),
        None => Rgb::NEUTRAL,
    }
}

/// Good/bad call-out for season summary figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatTone {
    Good,
    Bad,
    Neutral,
}

impl StatTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Good => "text-emerald-400",
            Self::Bad => "text-rose-400",
            Self::Neutral => "text-slate-400",
        }
    }
}

/// `value` is on the 0-100 scale for percentages.
pub fn stat_tone(key: MetricKey, value: f64) -> StatTone {
    if !value.is_finite() {
        return StatTone::Neutral;
    }
    let (good_at, bad_below) = match key {
        MetricKey::Ts => (60.0, 54.0),
        MetricKey::Efg => (56.0, 50.0),
        MetricKey::FgPct => (50.0, 40.0),
        MetricKey::Fg3Pct => (38.0, 33.0),
        MetricKey::PlusMinus => {
            return if value > 0.0 {
                StatTone::Good
            } else if value < 0.0 {
                StatTone::Bad
            } else {
                StatTone::Neutral
            };
        }
        _ => return StatTone::Neutral,
    };
    if value >= good_at {
        StatTone::Good
    } else if value < bad_below {
        StatTone::Bad
    } else {
        StatTone::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: MetricScale = MetricScale::new(0.0, 35.0);

    #[test]
    fn ends_of_the_range() {
        assert_eq!(metric_color(Some(0.0), &POINTS), Rgb { r: 255, g: 0, b: 50 });
        assert_eq!(metric_color(Some(35.0), &POINTS), Rgb { r: 0, g: 255, b: 50 });
        assert_eq!(metric_color(Some(17.5), &POINTS), Rgb { r: 255, g: 255, b: 50 });
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(metric_color(Some(-10.0), &POINTS), gradient(0.0));
        assert_eq!(metric_color(Some(60.0), &POINTS), gradient(1.0));
    }

    #[test]
    fn missing_value_is_neutral() {
        assert_eq!(metric_color(None, &POINTS), Rgb::NEUTRAL);
        assert_eq!(metric_color(None, &POINTS.inverted()), Rgb::NEUTRAL);
        assert_eq!(metric_color(Some(f64::NAN), &POINTS), Rgb::NEUTRAL);
        assert_eq!(Rgb::NEUTRAL.to_string(), "#334155");
    }

    #[test]
    fn inversion_swaps_ends() {
        let inv = POINTS.inverted();
        assert_eq!(metric_color(Some(0.0), &inv), gradient(1.0));
        assert_eq!(metric_color(Some(35.0), &inv), gradient(0.0));
    }

    #[test]
    fn percentages_are_coerced_to_fractions() {
        let ts = MetricScale::percent(0.40, 0.75);
        assert_eq!(ts.normalize(75.0), 1.0);
        assert_eq!(ts.normalize(0.75), 1.0);
        assert!((ts.normalize(57.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn gradient_interpolates_channels() {
        assert_eq!(gradient(0.25), Rgb { r: 255, g: 128, b: 50 });
        assert_eq!(gradient(0.75), Rgb { r: 128, g: 255, b: 50 });
        assert_eq!(gradient(0.5).css(), "rgb(255, 255, 50)");
    }

    #[test]
    fn degenerate_range_does_not_produce_nan() {
        let flat = MetricScale::new(10.0, 10.0);
        assert_eq!(flat.normalize(10.0), 1.0);
        assert_eq!(flat.normalize(9.0), 0.0);
    }

    #[test]
    fn tones_follow_thresholds() {
        assert_eq!(stat_tone(MetricKey::Ts, 61.0), StatTone::Good);
        assert_eq!(stat_tone(MetricKey::Ts, 57.0), StatTone::Neutral);
        assert_eq!(stat_tone(MetricKey::Ts, 53.9), StatTone::Bad);
        assert_eq!(stat_tone(MetricKey::Fg3Pct, 38.0), StatTone::Good);
        assert_eq!(stat_tone(MetricKey::PlusMinus, -0.4), StatTone::Bad);
        assert_eq!(stat_tone(MetricKey::Points, 40.0), StatTone::Neutral);
    }
}
