//! C2: Tokenizer. Byte-stream <-> token-stream for a single tongue.

use crate::error::TonguesError;
use crate::lexicon::Lexicons;
use crate::tongue::Tongue;

/// Map each byte through the tongue's forward table.
pub fn encode(lexicons: &Lexicons, tongue: Tongue, bytes: &[u8]) -> Vec<String> {
    let lex = lexicons.get(tongue);
    bytes.iter().map(|&b| lex.encode_byte(b).to_string()).collect()
}

/// Map each token through the tongue's inverse table.
///
/// Fails on the first unknown token, reporting its exact string and position.
pub fn decode(lexicons: &Lexicons, tongue: Tongue, tokens: &[String]) -> Result<Vec<u8>, TonguesError> {
    let lex = lexicons.get(tongue);
    tokens.iter().enumerate().map(|(i, t)| lex.decode_token(t, i)).collect()
}

/// Split wire text into tokens on whitespace and commas, dropping empties.
///
/// No case folding, no Unicode normalization: tokens compare as opaque
/// strings.
pub fn normalize(stream_text: &str) -> Vec<String> {
    stream_text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Render a token stream back to its wire form (space-separated).
pub fn render(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tongue::ALL_TONGUES;

    #[test]
    fn byte_round_trip_for_every_tongue_and_byte() {
        let lex = Lexicons::default_demo();
        for tongue in ALL_TONGUES {
            for b in 0u16..256 {
                let toks = encode(&lex, tongue, &[b as u8]);
                let back = decode(&lex, tongue, &toks).unwrap();
                assert_eq!(back, vec![b as u8]);
            }
        }
    }

    #[test]
    fn payload_round_trip() {
        let lex = Lexicons::default_demo();
        let payload = b"hello aethermoore";
        let toks = encode(&lex, Tongue::Ko, payload);
        let back = decode(&lex, Tongue::Ko, &toks).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn normalize_splits_on_whitespace_and_commas() {
        let toks = normalize("  ko:ka'an,  ko:ve'is\tko:lo'ur\n");
        assert_eq!(toks, vec!["ko:ka'an", "ko:ve'is", "ko:lo'ur"]);
    }

    #[test]
    fn decode_reports_first_unknown_token_and_position() {
        let lex = Lexicons::default_demo();
        let mut toks = encode(&lex, Tongue::Ko, &[0, 1]);
        toks[1].push('x');
        let corrupted = toks[1].clone();
        let err = decode(&lex, Tongue::Ko, &toks).unwrap_err();
        match err {
            crate::error::TonguesError::UnknownToken { token, index } => {
                assert_eq!(token, corrupted);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_payload_round_trips(bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..512)) {
            let lex = Lexicons::default_demo();
            for tongue in ALL_TONGUES {
                let toks = encode(&lex, tongue, &bytes);
                let back = decode(&lex, tongue, &toks).unwrap();
                proptest::prop_assert_eq!(back, bytes.clone());
            }
        }
    }
}
