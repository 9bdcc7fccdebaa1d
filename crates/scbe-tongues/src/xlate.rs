//! C3: Cross-Tokenizer. Byte-preserving re-encoding from one tongue to
//! another, accompanied by a signed attestation of the operation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TonguesError;
use crate::lexicon::Lexicons;
use crate::tokenizer::{decode, encode, normalize, render};
use crate::tongue::Tongue;

type HmacSha256 = Hmac<Sha256>;

/// Whether a retokenization is declared byte-preserving presentation, or
/// content-preserving with downstream semantic intent. Both modes behave
/// identically at this layer; the distinction is carried only into the
/// attestation for governance consumers above the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Byte,
    Semantic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Byte => "byte",
            Mode::Semantic => "semantic",
        }
    }
}

/// Default attestation key used when the caller supplies none. Never use
/// this in a deployment where attestations must resist forgery by anyone
/// who has read this source file.
pub const DEFAULT_ATTEST_KEY: &[u8] = b"SCBE-AETHERMOORE-DEFAULT-ATTEST-KEY";

/// Signed record binding a cross-tongue retokenization to its byte content.
#[derive(Debug, Clone, PartialEq)]
pub struct Attestation {
    pub src: Tongue,
    pub dst: Tongue,
    pub mode: Mode,
    pub ts: f64,
    pub phase_delta: f64,
    pub weight_ratio: f64,
    pub sha256_bytes: String,
    pub hmac_attest: String,
}

impl Attestation {
    /// JSON form matching the wire record in the external interface.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "src": self.src.code(),
            "dst": self.dst.code(),
            "mode": self.mode.as_str(),
            "ts": self.ts,
            "phase_delta": self.phase_delta,
            "weight_ratio": self.weight_ratio,
            "sha256_bytes": self.sha256_bytes,
            "hmac_attest": self.hmac_attest,
        })
    }
}

fn unix_seconds_f64(now: Option<f64>) -> f64 {
    now.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    })
}

/// Decode `token_text` under `src`, re-encode the recovered bytes under
/// `dst`, and produce the byte-binding attestation.
///
/// `now` overrides the wall clock; pass `Some(ts)` for reproducible
/// attestations in tests, `None` for normal operation.
pub fn retokenize(
    lexicons: &Lexicons,
    src: Tongue,
    dst: Tongue,
    token_text: &str,
    mode: Mode,
    attest_key: Option<&[u8]>,
    now: Option<f64>,
) -> Result<(Vec<String>, Attestation), TonguesError> {
    let src_tokens = normalize(token_text);
    let bytes = decode(lexicons, src, &src_tokens)?;
    let out_tokens = encode(lexicons, dst, &bytes);

    let ts = unix_seconds_f64(now);
    let unix_ts = ts.floor() as i64;

    let phase_delta = {
        let two_pi = 2.0 * std::f64::consts::PI;
        let raw = dst.phase() - src.phase();
        ((raw % two_pi) + two_pi) % two_pi
    };
    let weight_ratio = dst.weight() / src.weight();

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256_bytes = hex_encode(&hasher.finalize());

    let key = attest_key.unwrap_or(DEFAULT_ATTEST_KEY);
    let msg = format!(
        "{}->{}|{}|{}|phase:{:.6}|weight:{:.6}|{}",
        src.code(),
        dst.code(),
        mode.as_str(),
        sha256_bytes,
        phase_delta,
        weight_ratio,
        unix_ts
    );
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(msg.as_bytes());
    let hmac_attest = BASE64.encode(mac.finalize().into_bytes());

    let attestation = Attestation {
        src,
        dst,
        mode,
        ts,
        phase_delta,
        weight_ratio,
        sha256_bytes,
        hmac_attest,
    };

    Ok((out_tokens, attestation))
}

/// Convenience wrapper returning the re-encoded stream as wire text.
pub fn retokenize_text(
    lexicons: &Lexicons,
    src: Tongue,
    dst: Tongue,
    token_text: &str,
    mode: Mode,
    attest_key: Option<&[u8]>,
    now: Option<f64>,
) -> Result<(String, Attestation), TonguesError> {
    let (tokens, attest) = retokenize(lexicons, src, dst, token_text, mode, attest_key, now)?;
    Ok((render(&tokens), attest))
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::encode;

    #[test]
    fn cross_tongue_preserves_bytes_and_records_sha() {
        let lex = Lexicons::default_demo();
        let payload = b"hello aethermoore";
        let t1 = render(&encode(&lex, Tongue::Ko, payload));
        let (t2, attest) = retokenize_text(
            &lex,
            Tongue::Ko,
            Tongue::Dr,
            &t1,
            Mode::Byte,
            Some(b"k"),
            Some(1_700_000_000.0),
        )
        .unwrap();

        let back = decode(&lex, Tongue::Dr, &crate::tokenizer::normalize(&t2)).unwrap();
        assert_eq!(back, payload);

        let mut hasher = Sha256::new();
        hasher.update(payload);
        assert_eq!(attest.sha256_bytes, hex_encode(&hasher.finalize()));

        let expected_phase_delta = (5.0 * std::f64::consts::PI / 3.0) % (2.0 * std::f64::consts::PI);
        assert!((attest.phase_delta - expected_phase_delta).abs() < 1e-9);

        let expected_weight_ratio = crate::tongue::PHI.powi(5);
        assert!((attest.weight_ratio - expected_weight_ratio).abs() < 1e-6);
    }

    #[test]
    fn attestation_is_deterministic_for_fixed_inputs() {
        let lex = Lexicons::default_demo();
        let payload = b"determinism matters";
        let t1 = render(&encode(&lex, Tongue::Av, payload));
        let (_, a1) = retokenize_text(
            &lex,
            Tongue::Av,
            Tongue::Ca,
            &t1,
            Mode::Semantic,
            Some(b"fixed-key"),
            Some(42.0),
        )
        .unwrap();
        let (_, a2) = retokenize_text(
            &lex,
            Tongue::Av,
            Tongue::Ca,
            &t1,
            Mode::Semantic,
            Some(b"fixed-key"),
            Some(42.0),
        )
        .unwrap();
        assert_eq!(a1.hmac_attest, a2.hmac_attest);
        assert_eq!(a1.sha256_bytes, a2.sha256_bytes);
    }

    #[test]
    fn one_second_apart_changes_hmac_but_not_sha() {
        let lex = Lexicons::default_demo();
        let payload = b"tick";
        let t1 = render(&encode(&lex, Tongue::Um, payload));
        let (_, a1) =
            retokenize_text(&lex, Tongue::Um, Tongue::Dr, &t1, Mode::Byte, None, Some(10.0)).unwrap();
        let (_, a2) =
            retokenize_text(&lex, Tongue::Um, Tongue::Dr, &t1, Mode::Byte, None, Some(11.0)).unwrap();
        assert_eq!(a1.sha256_bytes, a2.sha256_bytes);
        assert_ne!(a1.hmac_attest, a2.hmac_attest);
    }
}
