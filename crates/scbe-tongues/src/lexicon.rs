//! C1: Tongue Lexicons.
//!
//! A lexicon is a total, injective mapping `{0..255} <-> token` per tongue.
//! The default generator builds it from a 16x16 product of syllable tables so
//! that decoding is branch-free (nibble -> syllable) and every tongue "looks
//! different" under visual inspection.

use std::collections::HashMap;

use crate::error::TonguesError;
use crate::tongue::{Tongue, ALL_TONGUES};

/// High-nibble syllable table, indexed 0..15.
pub const HI: [&str; 16] = [
    "ka", "ve", "lo", "sha", "dra", "mor", "thu", "ely", "bra", "xan", "quo", "fel", "nyx", "orin",
    "syl", "wrath",
];

/// Low-nibble syllable table, indexed 0..15.
pub const LO: [&str; 16] = [
    "an", "is", "ur", "eth", "om", "ae", "ik", "ost", "un", "ira", "oth", "ven", "al", "yx", "ent",
    "owe",
];

fn default_token(tongue: Tongue, byte: u8) -> String {
    let hi = HI[(byte >> 4) as usize];
    let lo = LO[(byte & 0x0F) as usize];
    format!("{}:{}'{}", tongue.prefix(), hi, lo)
}

/// An externally-supplied lexicon table, keyed by tongue wire code (e.g.
/// "KO"), each value a 256-entry index-to-token table ordered by byte value.
#[derive(Debug, Clone, Default)]
pub struct CustomTable(pub HashMap<String, Vec<String>>);

/// The byte <-> token bijection for a single tongue.
#[derive(Debug, Clone)]
pub struct TongueLexicon {
    tongue: Tongue,
    forward: Vec<String>,
    inverse: HashMap<String, u8>,
}

impl TongueLexicon {
    fn from_table(tongue: Tongue, forward: Vec<String>) -> Result<Self, TonguesError> {
        if forward.len() != 256 {
            return Err(TonguesError::LexiconIncomplete {
                tongue: tongue.code(),
                byte: forward.len() as u16,
            });
        }
        let mut inverse = HashMap::with_capacity(256);
        for (byte, token) in forward.iter().enumerate() {
            if inverse.insert(token.clone(), byte as u8).is_some() {
                return Err(TonguesError::LexiconDuplicateToken {
                    tongue: tongue.code(),
                    token: token.clone(),
                });
            }
        }
        Ok(Self {
            tongue,
            forward,
            inverse,
        })
    }

    fn default_for(tongue: Tongue) -> Self {
        let forward: Vec<String> = (0u16..256).map(|b| default_token(tongue, b as u8)).collect();
        Self::from_table(tongue, forward).expect("default generator is total and injective")
    }

    pub fn tongue(&self) -> Tongue {
        self.tongue
    }

    /// Map a byte to its token (total: every byte has a token).
    pub fn encode_byte(&self, byte: u8) -> &str {
        &self.forward[byte as usize]
    }

    /// Map a token back to its byte. `index` is the token's position in the
    /// caller's stream, carried into `UnknownToken` so callers can triage
    /// exactly which token failed.
    pub fn decode_token(&self, token: &str, index: usize) -> Result<u8, TonguesError> {
        self.inverse
            .get(token)
            .copied()
            .ok_or_else(|| TonguesError::UnknownToken {
                token: token.to_string(),
                index,
            })
    }
}

/// All six tongues' lexicons, built together so callers can hold one value.
#[derive(Debug, Clone)]
pub struct Lexicons {
    by_tongue: [TongueLexicon; 6],
}

impl Lexicons {
    /// Build lexicons from an optional custom table. `None` produces the
    /// deterministic default demo lexicon.
    pub fn build(table: Option<&CustomTable>) -> Result<Self, TonguesError> {
        let table = match table {
            None => {
                return Ok(Self {
                    by_tongue: ALL_TONGUES.map(TongueLexicon::default_for),
                });
            }
            Some(t) => t,
        };

        // Every key in the table must name one of the six known tongues.
        for key in table.0.keys() {
            if Tongue::parse(key).is_none() {
                return Err(TonguesError::LexiconUnknownTongue(key.clone()));
            }
        }

        let mut lexicons: Vec<TongueLexicon> = Vec::with_capacity(6);
        for tongue in ALL_TONGUES {
            let forward = table
                .0
                .get(tongue.code())
                .cloned()
                .ok_or(TonguesError::LexiconIncomplete {
                    tongue: tongue.code(),
                    byte: 0,
                })?;
            lexicons.push(TongueLexicon::from_table(tongue, forward)?);
        }

        Ok(Self {
            by_tongue: lexicons
                .try_into()
                .unwrap_or_else(|_| unreachable!("exactly six tongues were pushed")),
        })
    }

    /// The always-available deterministic default lexicon set.
    pub fn default_demo() -> Self {
        Self::build(None).expect("default generator never fails")
    }

    pub fn get(&self, tongue: Tongue) -> &TongueLexicon {
        &self.by_tongue[tongue.index() as usize]
    }
}
