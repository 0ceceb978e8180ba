//! Composite account health score.
//!
//! Reduces win rate, risk utilization, ROI, and today's P&L into a single
//! 0-100 rating with a derived heartbeat-waveform payload for presentation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Presentation tier selected by the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthBucket {
    Strong,
    Stable,
    Weak,
    Critical,
}

impl HealthBucket {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Strong
        } else if score >= 60.0 {
            Self::Stable
        } else if score >= 40.0 {
            Self::Weak
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "STRONG",
            Self::Stable => "STABLE",
            Self::Weak => "WEAK",
            Self::Critical => "CRITICAL",
        }
    }

    /// Color tier reused by the waveform renderer.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Strong => "green",
            Self::Stable => "teal",
            Self::Weak => "amber",
            Self::Critical => "red",
        }
    }
}

/// Health score with its four named contributions and waveform payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthScore {
    /// Composite score in [0, 100]
    pub score: f64,

    /// Win-rate contribution (0 to 30 points)
    pub win_rate_points: f64,

    /// Risk-utilization contribution (0 to 25 points)
    pub risk_points: f64,

    /// ROI contribution (0 to 25 points)
    pub roi_points: f64,

    /// Today's P&L contribution (-20 to 20 points, the only signed term)
    pub today_points: f64,

    /// Presentation bucket
    pub bucket: HealthBucket,

    /// Waveform amplitude for the heartbeat renderer
    pub amplitude: f64,

    /// Waveform beats per minute
    pub bpm: u32,
}

/// Score the account from its current aggregates.
///
/// Each term is clamped independently, summed, then the total is clamped to
/// [0, 100] again. Out-of-range inputs (a 150% win rate, negative ROI) pass
/// through the arithmetic without ever producing an out-of-range score.
pub fn health_score(
    win_rate_percent: f64,
    risk_used_percent: f64,
    roi_percent: f64,
    today_pl: Decimal,
) -> HealthScore {
    // Up to 30 points, saturating at a 100% win rate
    let win_rate_points = (win_rate_percent * 0.3).min(30.0);

    // Up to 25 points at 0% utilization, 0 points at 100%, never negative
    let risk_points = (25.0 - risk_used_percent * 0.25).max(0.0);

    // Only positive ROI contributes, saturating at 50% ROI
    let roi_points = (roi_percent.max(0.0) * 0.5).min(25.0);

    // The only term that can be negative, capped at +/-20
    let today = today_pl.to_f64().unwrap_or(0.0);
    let today_points = if today >= 0.0 {
        (today / 10.0).min(20.0)
    } else {
        -((today.abs() / 10.0).min(20.0))
    };

    let score = (win_rate_points + risk_points + roi_points + today_points).clamp(0.0, 100.0);

    HealthScore {
        score,
        win_rate_points,
        risk_points,
        roi_points,
        today_points,
        bucket: HealthBucket::from_score(score),
        amplitude: (score * 0.3).max(5.0),
        bpm: (60.0 + score * 0.8).round() as u32,
    }
}

impl std::fmt::Display for HealthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{:=^50}", " ACCOUNT HEALTH ")?;
        writeln!(f)?;
        writeln!(f, "Score:        {:.1}/100 [{}]", self.score, self.bucket.as_str())?;
        writeln!(f)?;
        writeln!(f, "--- Contributions ---")?;
        writeln!(f, "Win Rate:     {:>6.1} / 30", self.win_rate_points)?;
        writeln!(f, "Risk Usage:   {:>6.1} / 25", self.risk_points)?;
        writeln!(f, "ROI:          {:>6.1} / 25", self.roi_points)?;
        writeln!(f, "Today:        {:>+6.1} (max +/-20)", self.today_points)?;
        writeln!(f)?;
        writeln!(f, "--- Waveform ---")?;
        writeln!(f, "Amplitude:    {:.1}", self.amplitude)?;
        writeln!(f, "BPM:          {}", self.bpm)?;
        writeln!(f, "Color:        {}", self.bucket.color())?;
        write!(f, "{:=^50}", "")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_51_points() {
        // winRate=70, riskUsed=20, roi=10, todayPL=50 -> 21 + 20 + 5 + 5 = 51
        let health = health_score(70.0, 20.0, 10.0, dec!(50));

        assert!((health.win_rate_points - 21.0).abs() < 1e-9);
        assert!((health.risk_points - 20.0).abs() < 1e-9);
        assert!((health.roi_points - 5.0).abs() < 1e-9);
        assert!((health.today_points - 5.0).abs() < 1e-9);
        assert!((health.score - 51.0).abs() < 1e-9);
        assert_eq!(health.bucket, HealthBucket::Weak);
    }

    #[test]
    fn test_buckets_at_thresholds() {
        assert_eq!(HealthBucket::from_score(80.0), HealthBucket::Strong);
        assert_eq!(HealthBucket::from_score(79.9), HealthBucket::Stable);
        assert_eq!(HealthBucket::from_score(60.0), HealthBucket::Stable);
        assert_eq!(HealthBucket::from_score(40.0), HealthBucket::Weak);
        assert_eq!(HealthBucket::from_score(39.9), HealthBucket::Critical);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        let cases = [
            (150.0, 0.0, 500.0, dec!(100000)),
            (-50.0, 400.0, -90.0, dec!(-100000)),
            (0.0, 0.0, 0.0, dec!(0)),
            (f64::MAX, f64::MAX, f64::MIN, dec!(0)),
        ];
        for (wr, risk, roi, today) in cases {
            let health = health_score(wr, risk, roi, today);
            assert!(health.score >= 0.0 && health.score <= 100.0);
            assert!(health.score.is_finite());
        }
    }

    #[test]
    fn test_negative_roi_contributes_zero_not_negative() {
        let health = health_score(50.0, 0.0, -30.0, dec!(0));
        assert_eq!(health.roi_points, 0.0);
    }

    #[test]
    fn test_today_term_is_signed_and_capped() {
        let up = health_score(0.0, 100.0, 0.0, dec!(500));
        assert!((up.today_points - 20.0).abs() < 1e-9);

        let down = health_score(0.0, 100.0, 0.0, dec!(-500));
        assert!((down.today_points + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_waveform_floor_and_bpm() {
        let dead = health_score(0.0, 100.0, 0.0, dec!(-500));
        assert_eq!(dead.score, 0.0);
        assert_eq!(dead.amplitude, 5.0);
        assert_eq!(dead.bpm, 60);

        let perfect = health_score(100.0, 0.0, 100.0, dec!(200));
        assert_eq!(perfect.score, 100.0);
        assert!((perfect.amplitude - 30.0).abs() < 1e-9);
        assert_eq!(perfect.bpm, 140);
    }
}
