//! HKDF-SHA256 key derivation used by the GeoSeal envelope sealer/opener.

pub mod hkdf;

pub use hkdf::{derive, derive_fixed, Hkdf, HkdfError, Prk, HASH_LENGTH, MAX_OUTPUT_LENGTH};
