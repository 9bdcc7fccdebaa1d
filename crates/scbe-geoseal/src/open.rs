//! Envelope Opener (C8): verifies the signature, decapsulates the shared
//! secret, and re-derives keys from the envelope's *declared* projection
//! ids — never from a fresh context projection. The caller's context
//! argument, if given, is for out-of-band policy checks only.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use scbe_crypto_pqc::{DsaProvider, KemProvider};

use crate::envelope::Envelope;
use crate::error::GeosealError;
use crate::keys::{derive_key_schedule, xor_keystream};

/// Result of opening an envelope: either the recovered plaintext, or a
/// negative result that carries no plaintext at all.
pub struct OpenResult {
    pub ok: bool,
    pub plaintext: Option<Vec<u8>>,
}

fn decode_base64(field: &str) -> Result<Vec<u8>, GeosealError> {
    BASE64
        .decode(field)
        .map_err(|e| GeosealError::EncodingError(e.to_string()))
}

/// Open `envelope` using the given KEM secret key and DSA public key.
/// `_context` is accepted for caller-side policy only; binding is to the
/// envelope's declared `(h, z, L_s, L_c)`, not a fresh projection of it.
pub fn open(
    envelope: &Envelope,
    _context: Option<&[f64]>,
    kem: &dyn KemProvider,
    dsa: &dyn DsaProvider,
    kem_secret_key: &[u8],
    dsa_public_key: &[u8],
) -> Result<OpenResult, GeosealError> {
    let ct_k = decode_base64(&envelope.ct_k)?;
    let ct_spec = decode_base64(&envelope.ct_spec)?;
    let sig = decode_base64(&envelope.sig)?;

    let mut digest_input = envelope.attest.canonical_json().into_bytes();
    digest_input.extend_from_slice(&ct_spec);
    let digest = Sha256::digest(&digest_input);

    let verified = dsa.verify(dsa_public_key, &digest, &sig)?;
    if !verified {
        return Err(GeosealError::SignatureInvalid);
    }

    let shared_secret = kem.decapsulate(kem_secret_key, &ct_k)?;

    let schedule = derive_key_schedule(
        &shared_secret,
        &envelope.attest.h,
        envelope.attest.l_s,
        &envelope.attest.z,
        envelope.attest.l_c,
    )?;

    let plaintext = xor_keystream(&ct_spec, &schedule.seed);

    Ok(OpenResult {
        ok: true,
        plaintext: Some(plaintext),
    })
}
