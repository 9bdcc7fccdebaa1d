//! Envelope Sealer (C7): binds plaintext to a context projection, derives
//! context-bound keys, masks the plaintext, and signs the result.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use scbe_crypto_pqc::{DsaProvider, KemProvider};

use crate::context::project;
use crate::envelope::{Attestation, Envelope};
use crate::error::GeosealError;
use crate::keys::{derive_key_schedule, xor_keystream};

/// Seal `plaintext` to `context` using the given KEM public key and DSA
/// secret key. `level_sphere`/`level_cube` default to 0 when the caller has
/// no finer-grained resolution requirement.
pub fn seal(
    plaintext: &[u8],
    context: &[f64],
    kem: &dyn KemProvider,
    dsa: &dyn DsaProvider,
    kem_public_key: &[u8],
    dsa_secret_key: &[u8],
    level_sphere: u32,
    level_cube: u32,
) -> Result<Envelope, GeosealError> {
    let projection = project(context, level_sphere, level_cube)?;

    let (shared_secret, ct_k) = kem.encapsulate(kem_public_key)?;

    let schedule = derive_key_schedule(
        &shared_secret,
        &projection.sphere_id,
        level_sphere,
        &projection.cube_id,
        level_cube,
    )?;

    let ct_spec = xor_keystream(plaintext, &schedule.seed);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    let attest = Attestation {
        h: projection.sphere_id,
        z: projection.cube_id,
        l_s: level_sphere,
        l_c: level_cube,
        p: projection.potentials,
        margin: projection.margin,
        ts,
        path: projection.path.to_string(),
    };

    let mut digest_input = attest.canonical_json().into_bytes();
    digest_input.extend_from_slice(&ct_spec);
    let digest = Sha256::digest(&digest_input);

    let sig = dsa.sign(dsa_secret_key, &digest)?;

    Ok(Envelope {
        ct_k: BASE64.encode(ct_k),
        ct_spec: BASE64.encode(ct_spec),
        attest,
        sig: BASE64.encode(sig),
    })
}
