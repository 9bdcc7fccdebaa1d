//! Digital signature capability interface.
//!
//! GeoSeal signs the canonical attestation bytes with a `DsaProvider` and
//! verifies them the same way on open. As with the KEM, the concrete scheme
//! is the provider's concern, not GeoSeal's.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle_compare::ct_eq;

use crate::error::PqcError;

type HmacSha256 = Hmac<Sha256>;

/// A digital-signature provider.
pub trait DsaProvider {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Vec<u8>), PqcError>;
    fn sign(&self, secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, PqcError>;
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, PqcError>;
}

/// Secret/public key length this demo provider uses (symmetric key).
pub const DEMO_KEY_LEN: usize = 32;
/// Signature length this demo provider emits (HMAC-SHA256 tag).
pub const DEMO_SIGNATURE_LEN: usize = 32;

/// An "HMAC-as-signature" DSA placeholder.
///
/// There is no real public/secret key split: `generate_keypair` returns the
/// same 32-byte symmetric key twice, `sign` is `HMAC-SHA256(key, message)`,
/// and `verify` recomputes the tag and compares in constant time. This is
/// not a real signature scheme — anyone holding the "public" key can forge
/// signatures — and MUST be replaced with a vetted ML-DSA (or equivalent)
/// provider before any real deployment.
pub struct DemoDsa;

impl DemoDsa {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoDsa {
    fn default() -> Self {
        Self::new()
    }
}

impl DsaProvider for DemoDsa {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Vec<u8>), PqcError> {
        let mut key = vec![0u8; DEMO_KEY_LEN];
        scbe_crypto_rng::generate_random(&mut key).map_err(|e| PqcError::RngFailed(e.to_string()))?;
        Ok((key.clone(), key))
    }

    fn sign(&self, secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, PqcError> {
        if secret_key.len() != DEMO_KEY_LEN {
            return Err(PqcError::InvalidKeySize);
        }
        let mut mac =
            HmacSha256::new_from_slice(secret_key).map_err(|_| PqcError::SigningFailed)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, PqcError> {
        if public_key.len() != DEMO_KEY_LEN {
            return Err(PqcError::InvalidKeySize);
        }
        if signature.len() != DEMO_SIGNATURE_LEN {
            return Ok(false);
        }
        let mut mac =
            HmacSha256::new_from_slice(public_key).map_err(|_| PqcError::VerificationFailed)?;
        mac.update(message);
        let expected = mac.finalize().into_bytes();
        Ok(ct_eq(&expected, signature))
    }
}

/// Minimal constant-time byte comparison, kept local so this crate does not
/// need to pull in `subtle` for one comparison.
mod subtle_compare {
    pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let mut diff: u8 = 0;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let dsa = DemoDsa::new();
        let (pk, sk) = dsa.generate_keypair().unwrap();
        let sig = dsa.sign(&sk, b"attestation bytes").unwrap();
        assert!(dsa.verify(&pk, b"attestation bytes", &sig).unwrap());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let dsa = DemoDsa::new();
        let (pk, sk) = dsa.generate_keypair().unwrap();
        let sig = dsa.sign(&sk, b"attestation bytes").unwrap();
        assert!(!dsa.verify(&pk, b"different bytes", &sig).unwrap());
    }

    #[test]
    fn malformed_signature_length_fails_closed() {
        let dsa = DemoDsa::new();
        let (pk, _sk) = dsa.generate_keypair().unwrap();
        assert!(!dsa.verify(&pk, b"msg", &[0u8; 4]).unwrap());
    }
}
