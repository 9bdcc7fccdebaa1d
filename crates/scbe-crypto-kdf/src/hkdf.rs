//! HKDF-SHA256 key derivation (RFC 5869).
//!
//! Extract-then-Expand over HMAC-SHA256. This is the only key derivation
//! primitive GeoSeal uses: the sealer derives `K_s`, `K_c`, and `K_msg`
//! entirely through this module so the derivation is reproducible bit for
//! bit across implementations that hold the same shared secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 output length in bytes.
pub const HASH_LENGTH: usize = 32;

/// Maximum output key material length (255 * HASH_LENGTH per RFC 5869).
pub const MAX_OUTPUT_LENGTH: usize = 255 * HASH_LENGTH;

#[derive(Debug, Error)]
pub enum HkdfError {
    #[error("requested output length exceeds 255 * HashLen")]
    OutputTooLong,
    #[error("PRK must be exactly {HASH_LENGTH} bytes")]
    InvalidLength,
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Pseudorandom key produced by `extract`, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Prk {
    data: [u8; HASH_LENGTH],
}

impl Prk {
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.data
    }
}

/// An HKDF-SHA256 instance bound to a single extracted PRK.
#[derive(Clone)]
pub struct Hkdf {
    prk: [u8; HASH_LENGTH],
}

impl Hkdf {
    /// HKDF-Extract: PRK = HMAC-SHA256(salt, IKM). `salt` defaults to
    /// `HASH_LENGTH` zero bytes per RFC 5869 when `None`.
    pub fn extract(salt: Option<&[u8]>, ikm: &[u8]) -> Self {
        let zero_salt = [0u8; HASH_LENGTH];
        let salt = salt.unwrap_or(&zero_salt);
        Self {
            prk: hmac_sha256(salt, ikm),
        }
    }

    pub fn extract_prk(salt: Option<&[u8]>, ikm: &[u8]) -> Prk {
        Prk {
            data: Self::extract(salt, ikm).prk,
        }
    }

    pub fn from_prk(prk: &[u8]) -> Result<Self, HkdfError> {
        if prk.len() != HASH_LENGTH {
            return Err(HkdfError::InvalidLength);
        }
        let mut arr = [0u8; HASH_LENGTH];
        arr.copy_from_slice(prk);
        Ok(Self { prk: arr })
    }

    /// HKDF-Expand: derive `length` bytes of output keying material bound to
    /// `info`.
    pub fn expand(&self, info: &[u8], length: usize) -> Result<Vec<u8>, HkdfError> {
        if length > MAX_OUTPUT_LENGTH {
            return Err(HkdfError::OutputTooLong);
        }
        if length == 0 {
            return Ok(Vec::new());
        }

        let n = length.div_ceil(HASH_LENGTH);
        let mut okm = Vec::with_capacity(n * HASH_LENGTH);
        let mut t_prev: Vec<u8> = Vec::new();

        for i in 1..=n {
            let mut data = Vec::with_capacity(t_prev.len() + info.len() + 1);
            data.extend_from_slice(&t_prev);
            data.extend_from_slice(info);
            data.push(i as u8);

            let t_i = hmac_sha256(&self.prk, &data);
            okm.extend_from_slice(&t_i);
            t_prev = t_i.to_vec();
            data.zeroize();
        }

        t_prev.zeroize();
        okm.truncate(length);
        Ok(okm)
    }

    pub fn expand_fixed<const N: usize>(&self, info: &[u8]) -> Result<[u8; N], HkdfError> {
        if N > MAX_OUTPUT_LENGTH {
            return Err(HkdfError::OutputTooLong);
        }
        let okm = self.expand(info, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&okm);
        Ok(out)
    }
}

impl Drop for Hkdf {
    fn drop(&mut self) {
        self.prk.zeroize();
    }
}

/// One-shot derive: Extract then Expand.
pub fn derive(salt: Option<&[u8]>, ikm: &[u8], info: &[u8], length: usize) -> Result<Vec<u8>, HkdfError> {
    Hkdf::extract(salt, ikm).expand(info, length)
}

/// One-shot derive into a fixed-size array.
pub fn derive_fixed<const N: usize>(
    salt: Option<&[u8]>,
    ikm: &[u8],
    info: &[u8],
) -> Result<[u8; N], HkdfError> {
    Hkdf::extract(salt, ikm).expand_fixed(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_then_expand_is_deterministic() {
        let ikm = b"input keying material";
        let salt = b"random salt";
        let hkdf = Hkdf::extract(Some(salt), ikm);
        let a = hkdf.expand(b"ctx", 32).unwrap();
        let b = hkdf.expand(b"ctx", 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn different_info_different_output() {
        let ikm = b"master secret";
        let a = derive(None, ikm, b"key1", 32).unwrap();
        let b = derive(None, ikm, b"key2", 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn output_too_long_is_rejected() {
        let ikm = b"master secret";
        let err = derive(None, ikm, b"info", MAX_OUTPUT_LENGTH + 1).unwrap_err();
        assert!(matches!(err, HkdfError::OutputTooLong));
    }

    #[test]
    fn prk_round_trips_through_from_prk() {
        let ikm = b"input keying material";
        let prk = Hkdf::extract_prk(Some(b"salt"), ikm);
        let hkdf = Hkdf::from_prk(prk.as_bytes()).unwrap();
        let okm = hkdf.expand(b"info", 32).unwrap();
        assert_eq!(okm.len(), 32);
    }
}
