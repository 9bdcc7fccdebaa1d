//! C4: Blender. Byte-level interleave across tongues by a periodic pattern.
//!
//! The pattern is part of the wire format; it is never inferred from the
//! data, so `unblend` can and does verify every observed tongue matches what
//! the pattern predicted.

use crate::error::TonguesError;
use crate::lexicon::Lexicons;
use crate::tongue::Tongue;

/// One `(tongue, token)` pair produced by `blend`.
pub type BlendedPair = (Tongue, String);

/// Interleave `bytes` across `pattern`: byte `i` is encoded under
/// `pattern[i % pattern.len()]`.
///
/// # Panics
/// If `pattern` is empty.
pub fn blend(lexicons: &Lexicons, pattern: &[Tongue], bytes: &[u8]) -> Vec<BlendedPair> {
    assert!(!pattern.is_empty(), "blend pattern must not be empty");
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            let tongue = pattern[i % pattern.len()];
            let token = lexicons.get(tongue).encode_byte(b).to_string();
            (tongue, token)
        })
        .collect()
}

/// Inverse of `blend`. Fails with `BlendPatternMismatch` the moment an
/// observed tongue disagrees with the pattern.
pub fn unblend(
    lexicons: &Lexicons,
    pattern: &[Tongue],
    pairs: &[BlendedPair],
) -> Result<Vec<u8>, TonguesError> {
    assert!(!pattern.is_empty(), "blend pattern must not be empty");
    let mut bytes = Vec::with_capacity(pairs.len());
    for (i, (tongue, token)) in pairs.iter().enumerate() {
        let expected = pattern[i % pattern.len()];
        if *tongue != expected {
            return Err(TonguesError::BlendPatternMismatch {
                index: i,
                expected: expected.code(),
                found: tongue.code().to_string(),
            });
        }
        bytes.push(lexicons.get(*tongue).decode_token(token, i)?);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tongue::Tongue::*;

    #[test]
    fn blend_unblend_round_trips() {
        let lex = Lexicons::default_demo();
        let pattern = [Ko, Ko, Av, Ru, Ca, Um, Dr];
        let bytes: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        let pairs = blend(&lex, &pattern, &bytes);
        let back = unblend(&lex, &pattern, &pairs).unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn unblend_rejects_tongue_mismatch() {
        let lex = Lexicons::default_demo();
        let pattern = [Ko, Av];
        let mut pairs = blend(&lex, &pattern, &[1, 2, 3, 4]);
        pairs[1].0 = Ru;
        let err = unblend(&lex, &pattern, &pairs).unwrap_err();
        match err {
            TonguesError::BlendPatternMismatch { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_pattern_and_bytes_round_trip(
            bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..1024),
        ) {
            let lex = Lexicons::default_demo();
            let pattern = [Ko, Ko, Av, Ru, Ca, Um, Dr];
            let pairs = blend(&lex, &pattern, &bytes);
            let back = unblend(&lex, &pattern, &pairs).unwrap();
            proptest::prop_assert_eq!(back, bytes);
        }
    }
}
