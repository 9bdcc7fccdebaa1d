//! The six named channels of the tokenizer.
//!
//! Each tongue carries a fixed phase (a multiple of pi/3) and a fixed weight
//! (a power of the golden ratio). Both are declared here as compile-time
//! constants and MUST never be recomputed at runtime from anything other
//! than a tongue's declaration index, or cross-tongue attestations produced
//! on different builds will disagree.

use std::fmt;

/// Golden ratio, phi = (1 + sqrt(5)) / 2, to full f64 precision.
pub const PHI: f64 = 1.618_033_988_749_895_f64;

/// One of the six disjoint token vocabularies.
///
/// Declaration order is significant: it fixes both the phase progression
/// (multiples of pi/3) and the weight progression (powers of phi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tongue {
    Ko,
    Av,
    Ru,
    Ca,
    Um,
    Dr,
}

/// All tongues in declaration order.
pub const ALL_TONGUES: [Tongue; 6] = [
    Tongue::Ko,
    Tongue::Av,
    Tongue::Ru,
    Tongue::Ca,
    Tongue::Um,
    Tongue::Dr,
];

impl Tongue {
    /// Zero-based declaration index, the only legitimate input to the
    /// phase and weight formulas.
    pub const fn index(self) -> u32 {
        match self {
            Tongue::Ko => 0,
            Tongue::Av => 1,
            Tongue::Ru => 2,
            Tongue::Ca => 3,
            Tongue::Um => 4,
            Tongue::Dr => 5,
        }
    }

    /// Phase angle in radians: index * pi/3.
    pub fn phase(self) -> f64 {
        self.index() as f64 * (std::f64::consts::PI / 3.0)
    }

    /// Weight: phi ^ index.
    pub fn weight(self) -> f64 {
        PHI.powi(self.index() as i32)
    }

    /// Uppercase four-letter-or-shorter wire code, e.g. "KO".
    pub const fn code(self) -> &'static str {
        match self {
            Tongue::Ko => "KO",
            Tongue::Av => "AV",
            Tongue::Ru => "RU",
            Tongue::Ca => "CA",
            Tongue::Um => "UM",
            Tongue::Dr => "DR",
        }
    }

    /// Lowercased token-prefix form, e.g. "ko".
    pub fn prefix(self) -> &'static str {
        match self {
            Tongue::Ko => "ko",
            Tongue::Av => "av",
            Tongue::Ru => "ru",
            Tongue::Ca => "ca",
            Tongue::Um => "um",
            Tongue::Dr => "dr",
        }
    }

    /// Parse a wire code such as "KO" or "ko", case-insensitively.
    pub fn parse(code: &str) -> Option<Tongue> {
        match code.to_ascii_uppercase().as_str() {
            "KO" => Some(Tongue::Ko),
            "AV" => Some(Tongue::Av),
            "RU" => Some(Tongue::Ru),
            "CA" => Some(Tongue::Ca),
            "UM" => Some(Tongue::Um),
            "DR" => Some(Tongue::Dr),
            _ => None,
        }
    }
}

impl fmt::Display for Tongue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_multiples_of_pi_over_3() {
        for t in ALL_TONGUES {
            let expected = t.index() as f64 * std::f64::consts::FRAC_PI_3;
            assert_eq!(t.phase(), expected);
        }
    }

    #[test]
    fn weights_are_powers_of_phi() {
        assert_eq!(Tongue::Ko.weight(), 1.0);
        assert!((Tongue::Av.weight() - PHI).abs() < 1e-12);
        assert!((Tongue::Dr.weight() - PHI.powi(5)).abs() < 1e-9);
    }

    #[test]
    fn parse_round_trips_code() {
        for t in ALL_TONGUES {
            assert_eq!(Tongue::parse(t.code()), Some(t));
            assert_eq!(Tongue::parse(&t.code().to_lowercase()), Some(t));
        }
    }
}
