//! Envelope wire types and the canonical JSON encoding that the sealer
//! signs and the opener re-derives. Canonical JSON here means: ASCII
//! key-sorted, no extra whitespace, floats at fixed 6-decimal precision —
//! deliberately hand-built rather than routed through `serde_json`'s
//! generic `Serialize`, because float formatting and key order are
//! load-bearing for signature stability.

use serde::{Deserialize, Serialize};

/// The non-secret attestation bound into a sealed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub h: String,
    pub z: String,
    #[serde(rename = "L_s")]
    pub l_s: u32,
    #[serde(rename = "L_c")]
    pub l_c: u32,
    #[serde(rename = "P")]
    pub p: f64,
    pub margin: f64,
    pub ts: i64,
    pub path: String,
}

/// Escape the handful of characters canonical JSON needs escaped. The `h`
/// and `z` ids only ever contain `[A-Za-z0-9:(),-]`, but this stays correct
/// if that ever changes.
fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

impl Attestation {
    /// Render this attestation as the exact byte sequence the sealer signs
    /// and the opener re-derives: keys in ASCII-sorted order
    /// (`L_c, L_s, P, h, margin, path, ts, z`), no whitespace, `P` and
    /// `margin` at fixed 6-decimal precision.
    pub fn canonical_json(&self) -> String {
        format!(
            "{{\"L_c\":{},\"L_s\":{},\"P\":{:.6},\"h\":\"{}\",\"margin\":{:.6},\"path\":\"{}\",\"ts\":{},\"z\":\"{}\"}}",
            self.l_c,
            self.l_s,
            self.p,
            escape_json_string(&self.h),
            self.margin,
            escape_json_string(&self.path),
            self.ts,
            escape_json_string(&self.z),
        )
    }
}

/// `{ ct_k, ct_spec, attest, sig }` — a post-quantum-KEM-wrapped,
/// context-bound, signed payload. Binary fields are base64 on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub ct_k: String,
    pub ct_spec: String,
    pub attest: Attestation,
    pub sig: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_pins_exact_bytes() {
        let a = Attestation {
            h: "S0:(1000,1000,1000)".to_string(),
            z: "C0:(5,5,5,5,5,5)".to_string(),
            l_s: 0,
            l_c: 0,
            p: 0.35,
            margin: 0.123_456_7,
            ts: 1_700_000_000,
            path: "interior".to_string(),
        };
        assert_eq!(
            a.canonical_json(),
            "{\"L_c\":0,\"L_s\":0,\"P\":0.350000,\"h\":\"S0:(1000,1000,1000)\",\"margin\":0.123457,\"path\":\"interior\",\"ts\":1700000000,\"z\":\"C0:(5,5,5,5,5,5)\"}"
        );
    }

    #[test]
    fn keys_are_ascii_sorted() {
        let a = Attestation {
            h: "S0:(0,0,0)".to_string(),
            z: "C0:(0,0,0,0,0,0)".to_string(),
            l_s: 1,
            l_c: 2,
            p: 0.0,
            margin: 0.0,
            ts: 0,
            path: "exterior".to_string(),
        };
        let json = a.canonical_json();
        let positions = ["L_c", "L_s", "P", "h", "margin", "path", "ts", "z"]
            .map(|k| json.find(&format!("\"{k}\"")).unwrap());
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
