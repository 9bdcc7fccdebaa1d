//! Key Encapsulation Mechanism capability interface.
//!
//! GeoSeal treats the KEM as an abstract provider: it calls `encapsulate`
//! against a public key to get a shared secret plus a ciphertext, and
//! `decapsulate` against a secret key plus that ciphertext to recover the
//! same shared secret. Which lattice, code, or isogeny problem backs the
//! provider is none of GeoSeal's business.

use sha2::{Digest, Sha256};

use crate::error::PqcError;

/// A key-encapsulation provider.
pub trait KemProvider {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Vec<u8>), PqcError>;
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), PqcError>;
    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, PqcError>;
}

/// Shared-secret length this demo provider emits.
pub const DEMO_SHARED_SECRET_LEN: usize = 32;
/// Ciphertext length this demo provider emits (a fresh nonce).
pub const DEMO_CIPHERTEXT_LEN: usize = 32;
/// Secret-key length this demo provider expects.
pub const DEMO_SECRET_KEY_LEN: usize = 32;

/// A hash-of-key KEM placeholder.
///
/// `pk = SHA256(sk)`. `encapsulate` draws a fresh random nonce `r` and
/// returns `(SHA256(pk || r), r)`; `decapsulate` recomputes `pk` from `sk`
/// and re-hashes with the received `r`. This is adequate only for the
/// built-in self-test: it leaks nothing, but it is not IND-CCA2 secure and
/// MUST be replaced with a vetted ML-KEM (or equivalent) provider before any
/// real deployment.
pub struct DemoKem;

impl DemoKem {
    pub fn new() -> Self {
        Self
    }

    fn derive_public_key(secret_key: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret_key);
        hasher.finalize().to_vec()
    }
}

impl Default for DemoKem {
    fn default() -> Self {
        Self::new()
    }
}

impl KemProvider for DemoKem {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Vec<u8>), PqcError> {
        let mut sk = vec![0u8; DEMO_SECRET_KEY_LEN];
        scbe_crypto_rng::generate_random(&mut sk).map_err(|e| PqcError::RngFailed(e.to_string()))?;
        let pk = Self::derive_public_key(&sk);
        Ok((pk, sk))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), PqcError> {
        if public_key.is_empty() {
            return Err(PqcError::InvalidKeySize);
        }
        let mut nonce = vec![0u8; DEMO_CIPHERTEXT_LEN];
        scbe_crypto_rng::generate_random(&mut nonce).map_err(|e| PqcError::RngFailed(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(public_key);
        hasher.update(&nonce);
        let shared_secret = hasher.finalize().to_vec();

        Ok((shared_secret, nonce))
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, PqcError> {
        if secret_key.len() != DEMO_SECRET_KEY_LEN {
            return Err(PqcError::InvalidKeySize);
        }
        if ciphertext.len() != DEMO_CIPHERTEXT_LEN {
            return Err(PqcError::InvalidCiphertext);
        }
        let pk = Self::derive_public_key(secret_key);
        let mut hasher = Sha256::new();
        hasher.update(&pk);
        hasher.update(ciphertext);
        Ok(hasher.finalize().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encapsulate_decapsulate_agree() {
        let kem = DemoKem::new();
        let (pk, sk) = kem.generate_keypair().unwrap();
        let (ss1, ct) = kem.encapsulate(&pk).unwrap();
        let ss2 = kem.decapsulate(&sk, &ct).unwrap();
        assert_eq!(ss1, ss2);
    }

    #[test]
    fn wrong_secret_key_yields_different_secret() {
        let kem = DemoKem::new();
        let (pk, _sk) = kem.generate_keypair().unwrap();
        let (_, other_sk) = kem.generate_keypair().unwrap();
        let (ss1, ct) = kem.encapsulate(&pk).unwrap();
        let ss2 = kem.decapsulate(&other_sk, &ct).unwrap();
        assert_ne!(ss1, ss2);
    }

    #[test]
    fn rejects_malformed_ciphertext() {
        let kem = DemoKem::new();
        let (_, sk) = kem.generate_keypair().unwrap();
        let err = kem.decapsulate(&sk, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, PqcError::InvalidCiphertext));
    }
}
