//! Shared key-schedule step used by both the sealer and the opener: derive
//! `K_s`, `K_c`, `K_msg`, and the XOR keystream seed from a shared secret
//! and the envelope's declared projection ids. Kept in one place so the two
//! sides cannot drift apart.

use sha2::{Digest, Sha256};

use crate::error::GeosealError;
use scbe_crypto_kdf::derive_fixed;

pub struct KeySchedule {
    pub k_msg: [u8; 32],
    pub seed: [u8; 32],
}

fn map_kdf_err(e: scbe_crypto_kdf::HkdfError) -> GeosealError {
    GeosealError::KeyDerivation(e.to_string())
}

/// Derive the message key from a shared secret and the declared
/// `(h, L_s, z, L_c)` ids, per the envelope's key schedule:
/// `K_s = HKDF(ss, "geo:sphere|h|L_s")`, `K_c = HKDF(ss, "geo:cube|z|L_c")`,
/// `K_msg = HKDF(K_s xor K_c, "geo:msg")`, `seed = SHA256(K_msg)`.
pub fn derive_key_schedule(
    shared_secret: &[u8],
    sphere_id: &str,
    level_sphere: u32,
    cube_id: &str,
    level_cube: u32,
) -> Result<KeySchedule, GeosealError> {
    let sphere_info = format!("geo:sphere|{}|{}", sphere_id, level_sphere);
    let cube_info = format!("geo:cube|{}|{}", cube_id, level_cube);

    let k_s: [u8; 32] = derive_fixed(None, shared_secret, sphere_info.as_bytes()).map_err(map_kdf_err)?;
    let k_c: [u8; 32] = derive_fixed(None, shared_secret, cube_info.as_bytes()).map_err(map_kdf_err)?;

    let mut xored = [0u8; 32];
    for i in 0..32 {
        xored[i] = k_s[i] ^ k_c[i];
    }

    let k_msg: [u8; 32] = derive_fixed(None, &xored, b"geo:msg").map_err(map_kdf_err)?;

    let mut hasher = Sha256::new();
    hasher.update(k_msg);
    let seed: [u8; 32] = hasher.finalize().into();

    Ok(KeySchedule { k_msg, seed })
}

/// XOR `data` with the 32-byte `seed` repeated to `data`'s length.
pub fn xor_keystream(data: &[u8], seed: &[u8; 32]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ seed[i % seed.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_deterministic() {
        let ss = b"shared secret bytes";
        let a = derive_key_schedule(ss, "S0:(1,2,3)", 0, "C0:(1,2,3,4,5,6)", 0).unwrap();
        let b = derive_key_schedule(ss, "S0:(1,2,3)", 0, "C0:(1,2,3,4,5,6)", 0).unwrap();
        assert_eq!(a.k_msg, b.k_msg);
        assert_eq!(a.seed, b.seed);
    }

    #[test]
    fn different_ids_yield_different_keys() {
        let ss = b"shared secret bytes";
        let a = derive_key_schedule(ss, "S0:(1,2,3)", 0, "C0:(1,2,3,4,5,6)", 0).unwrap();
        let b = derive_key_schedule(ss, "S0:(9,9,9)", 0, "C0:(1,2,3,4,5,6)", 0).unwrap();
        assert_ne!(a.k_msg, b.k_msg);
    }

    #[test]
    fn keystream_roundtrips() {
        let seed = [7u8; 32];
        let pt = b"hello aethermoore";
        let ct = xor_keystream(pt, &seed);
        let back = xor_keystream(&ct, &seed);
        assert_eq!(back, pt);
    }
}
