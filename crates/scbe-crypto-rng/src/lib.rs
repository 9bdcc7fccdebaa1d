//! HMAC-DRBG randomness source for GeoSeal's KEM encapsulation step.

pub mod drbg;

pub use drbg::{
    generate_random, DrbgError, EntropySource, HmacDrbg, SecureDrbg, SystemEntropySource,
    MAX_BYTES_PER_REQUEST, MIN_ENTROPY, RESEED_INTERVAL, SECURITY_STRENGTH, SEED_LENGTH,
};
