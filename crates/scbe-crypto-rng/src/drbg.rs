//! HMAC-DRBG (NIST SP 800-90A) over HMAC-SHA256.
//!
//! The envelope sealer needs randomness only for the KEM encapsulation step;
//! everything else in GeoSeal is a pure function of its inputs. This DRBG is
//! that one source of randomness, kept small and zeroized on drop.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output length, also this DRBG's seed length.
pub const SEED_LENGTH: usize = 32;
/// Security strength in bits.
pub const SECURITY_STRENGTH: usize = 256;
/// Per NIST SP 800-90A, maximum bytes servable by a single `generate` call.
pub const MAX_BYTES_PER_REQUEST: usize = 65536;
/// Requests before a mandatory reseed.
pub const RESEED_INTERVAL: u64 = 1 << 48;
/// Minimum entropy bytes `instantiate`/`reseed` will accept.
pub const MIN_ENTROPY: usize = 32;

#[derive(Debug, Error)]
pub enum DrbgError {
    #[error("insufficient entropy provided")]
    InsufficientEntropy,
    #[error("DRBG reseed required before further output")]
    ReseedRequired,
    #[error("request exceeds max bytes per request")]
    RequestTooLarge,
    #[error("DRBG was not instantiated before use")]
    NotInstantiated,
    #[error("entropy source failed: {0}")]
    EntropySourceFailed(String),
}

/// Pluggable entropy collection, so tests can inject fixed bytes.
pub trait EntropySource {
    fn collect(&self, output: &mut [u8]) -> Result<usize, DrbgError>;
    fn source_id(&self) -> &str;
}

/// Operating-system entropy via `getrandom`.
pub struct SystemEntropySource;

impl EntropySource for SystemEntropySource {
    fn collect(&self, output: &mut [u8]) -> Result<usize, DrbgError> {
        getrandom::getrandom(output).map_err(|e| DrbgError::EntropySourceFailed(e.to_string()))?;
        Ok(output.len())
    }

    fn source_id(&self) -> &str {
        "system-rng"
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; SEED_LENGTH] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// HMAC-DRBG internal state (Key `K`, Value `V`), zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HmacDrbg {
    key: [u8; SEED_LENGTH],
    value: [u8; SEED_LENGTH],
    #[zeroize(skip)]
    reseed_counter: u64,
    #[zeroize(skip)]
    instantiated: bool,
}

impl HmacDrbg {
    pub fn new() -> Self {
        Self {
            key: [0u8; SEED_LENGTH],
            value: [1u8; SEED_LENGTH],
            reseed_counter: 0,
            instantiated: false,
        }
    }

    fn update(&mut self, provided_data: &[u8]) {
        let mut data = Vec::with_capacity(self.value.len() + 1 + provided_data.len());
        data.extend_from_slice(&self.value);
        data.push(0x00);
        data.extend_from_slice(provided_data);
        self.key = hmac_sha256(&self.key, &data);
        self.value = hmac_sha256(&self.key, &self.value);

        if !provided_data.is_empty() {
            data.clear();
            data.extend_from_slice(&self.value);
            data.push(0x01);
            data.extend_from_slice(provided_data);
            self.key = hmac_sha256(&self.key, &data);
            self.value = hmac_sha256(&self.key, &self.value);
        }
        data.zeroize();
    }

    /// Instantiate per NIST SP 800-90A Section 10.1.2.3.
    pub fn instantiate(
        &mut self,
        entropy: &[u8],
        nonce: &[u8],
        personalization: Option<&[u8]>,
    ) -> Result<(), DrbgError> {
        if entropy.len() < MIN_ENTROPY {
            return Err(DrbgError::InsufficientEntropy);
        }
        let mut seed_material =
            Vec::with_capacity(entropy.len() + nonce.len() + personalization.map_or(0, |p| p.len()));
        seed_material.extend_from_slice(entropy);
        seed_material.extend_from_slice(nonce);
        if let Some(p) = personalization {
            seed_material.extend_from_slice(p);
        }

        self.key = [0u8; SEED_LENGTH];
        self.value = [1u8; SEED_LENGTH];
        self.update(&seed_material);
        self.reseed_counter = 1;
        self.instantiated = true;
        seed_material.zeroize();
        Ok(())
    }

    /// Reseed per NIST SP 800-90A Section 10.1.2.4.
    pub fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), DrbgError> {
        if entropy.len() < MIN_ENTROPY {
            return Err(DrbgError::InsufficientEntropy);
        }
        let mut seed_material = Vec::with_capacity(entropy.len() + additional_input.map_or(0, |a| a.len()));
        seed_material.extend_from_slice(entropy);
        if let Some(a) = additional_input {
            seed_material.extend_from_slice(a);
        }
        self.update(&seed_material);
        self.reseed_counter = 1;
        seed_material.zeroize();
        Ok(())
    }

    /// Generate per NIST SP 800-90A Section 10.1.2.5.
    pub fn generate(&mut self, output: &mut [u8]) -> Result<(), DrbgError> {
        if !self.instantiated {
            return Err(DrbgError::NotInstantiated);
        }
        if output.len() > MAX_BYTES_PER_REQUEST {
            return Err(DrbgError::RequestTooLarge);
        }
        if self.reseed_counter > RESEED_INTERVAL {
            return Err(DrbgError::ReseedRequired);
        }

        let mut filled = 0;
        while filled < output.len() {
            self.value = hmac_sha256(&self.key, &self.value);
            let take = (output.len() - filled).min(SEED_LENGTH);
            output[filled..filled + take].copy_from_slice(&self.value[..take]);
            filled += take;
        }

        self.update(&[]);
        self.reseed_counter += 1;
        Ok(())
    }
}

impl Default for HmacDrbg {
    fn default() -> Self {
        Self::new()
    }
}

/// A ready-to-use DRBG seeded from system entropy plus a caller label.
pub struct SecureDrbg {
    inner: HmacDrbg,
}

impl SecureDrbg {
    pub fn new(personalization: Option<&[u8]>) -> Result<Self, DrbgError> {
        let source = SystemEntropySource;
        let mut entropy = [0u8; SEED_LENGTH];
        source.collect(&mut entropy)?;
        let mut nonce = [0u8; SEED_LENGTH / 2];
        source.collect(&mut nonce)?;

        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&entropy, &nonce, personalization)?;
        entropy.zeroize();
        Ok(Self { inner: drbg })
    }

    pub fn generate(&mut self, output: &mut [u8]) -> Result<(), DrbgError> {
        self.inner.generate(output)
    }
}

/// Convenience: fill `output` with cryptographically secure random bytes.
pub fn generate_random(output: &mut [u8]) -> Result<(), DrbgError> {
    let mut drbg = SecureDrbg::new(Some(b"SCBE-AETHERMOORE-GLOBAL"))?;
    drbg.generate(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_then_generate_produces_nonzero_output() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[7u8; 32], &[9u8; 16], Some(b"test")).unwrap();
        let mut out = [0u8; 48];
        drbg.generate(&mut out).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn same_seed_material_is_deterministic() {
        let mut a = HmacDrbg::new();
        a.instantiate(&[1u8; 32], &[2u8; 16], None).unwrap();
        let mut b = HmacDrbg::new();
        b.instantiate(&[1u8; 32], &[2u8; 16], None).unwrap();

        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.generate(&mut out_a).unwrap();
        b.generate(&mut out_b).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn generate_before_instantiate_fails() {
        let mut drbg = HmacDrbg::new();
        let mut out = [0u8; 16];
        assert!(matches!(drbg.generate(&mut out), Err(DrbgError::NotInstantiated)));
    }

    #[test]
    fn insufficient_entropy_is_rejected() {
        let mut drbg = HmacDrbg::new();
        let err = drbg.instantiate(&[0u8; 8], &[0u8; 8], None).unwrap_err();
        assert!(matches!(err, DrbgError::InsufficientEntropy));
    }

    #[test]
    fn global_generate_random_fills_buffer() {
        let mut out = [0u8; 32];
        generate_random(&mut out).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }
}
