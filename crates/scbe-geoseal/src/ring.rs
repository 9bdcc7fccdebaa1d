//! Ring Policy (C6): classifies a scalar `r in [0, 1]` into an ordered trust
//! band with fixed per-band attributes. Bands are total and disjoint;
//! thresholds are system constants, not caller-tunable.

use crate::error::GeosealError;

/// Ordered trust bands, innermost (most trusted) to outermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Core,
    Inner,
    Middle,
    Outer,
    Edge,
    Beyond,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Core => "core",
            Band::Inner => "inner",
            Band::Middle => "middle",
            Band::Outer => "outer",
            Band::Edge => "edge",
            Band::Beyond => "beyond",
        }
    }
}

/// What crossing into a band means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Allow,
    Reject,
}

/// Per-band policy attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPolicy {
    pub band: Band,
    pub action: Action,
    pub max_latency_ms: u32,
    pub required_signatures: u8,
    pub pow_bits: u8,
    pub trust_decay_rate: f64,
}

/// Band boundaries as half-open `[lo, hi)` intervals over `[0, 1)`; `r >= 1`
/// always maps to `Beyond`/`Reject`.
const BOUNDARIES: [(f64, f64, Band); 5] = [
    (0.0, 0.1, Band::Core),
    (0.1, 0.3, Band::Inner),
    (0.3, 0.6, Band::Middle),
    (0.6, 0.85, Band::Outer),
    (0.85, 1.0, Band::Edge),
];

fn policy_for(band: Band) -> BandPolicy {
    match band {
        Band::Core => BandPolicy {
            band,
            action: Action::Allow,
            max_latency_ms: 5,
            required_signatures: 1,
            pow_bits: 0,
            trust_decay_rate: 0.01,
        },
        Band::Inner => BandPolicy {
            band,
            action: Action::Allow,
            max_latency_ms: 20,
            required_signatures: 1,
            pow_bits: 4,
            trust_decay_rate: 0.03,
        },
        Band::Middle => BandPolicy {
            band,
            action: Action::Allow,
            max_latency_ms: 75,
            required_signatures: 2,
            pow_bits: 8,
            trust_decay_rate: 0.08,
        },
        Band::Outer => BandPolicy {
            band,
            action: Action::Allow,
            max_latency_ms: 250,
            required_signatures: 3,
            pow_bits: 16,
            trust_decay_rate: 0.2,
        },
        Band::Edge => BandPolicy {
            band,
            action: Action::Allow,
            max_latency_ms: 1000,
            required_signatures: 5,
            pow_bits: 24,
            trust_decay_rate: 0.5,
        },
        Band::Beyond => BandPolicy {
            band,
            action: Action::Reject,
            max_latency_ms: 0,
            required_signatures: u8::MAX,
            pow_bits: u8::MAX,
            trust_decay_rate: 1.0,
        },
    }
}

/// Classify `r` into a band. Negative `r` is rejected as out of range; `r`
/// at or above 1 is classified `Beyond` (never an error — that band is the
/// system's own "deny" outcome, not a caller mistake).
pub fn classify(r: f64) -> Result<BandPolicy, GeosealError> {
    if !r.is_finite() || r < 0.0 {
        return Err(GeosealError::RingOutOfRange(r));
    }
    if r >= 1.0 {
        return Ok(policy_for(Band::Beyond));
    }
    for (lo, hi, band) in BOUNDARIES {
        if r >= lo && r < hi {
            return Ok(policy_for(band));
        }
    }
    unreachable!("boundaries cover [0, 1)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_total_over_unit_interval() {
        let samples = [0.0, 0.05, 0.1, 0.2, 0.3, 0.45, 0.6, 0.7, 0.85, 0.95, 0.999_999];
        for r in samples {
            assert!(classify(r).is_ok(), "r={r} should classify");
        }
    }

    #[test]
    fn beyond_rejects() {
        let p = classify(1.0).unwrap();
        assert_eq!(p.band, Band::Beyond);
        assert_eq!(p.action, Action::Reject);

        let p2 = classify(50.0).unwrap();
        assert_eq!(p2.band, Band::Beyond);
    }

    #[test]
    fn negative_is_rejected() {
        assert!(classify(-0.1).is_err());
    }

    #[test]
    fn boundary_values_pick_upper_band() {
        assert_eq!(classify(0.1).unwrap().band, Band::Inner);
        assert_eq!(classify(0.3).unwrap().band, Band::Middle);
        assert_eq!(classify(0.6).unwrap().band, Band::Outer);
        assert_eq!(classify(0.85).unwrap().band, Band::Edge);
    }
}
