use thiserror::Error;

/// A KEM or DSA provider failure. GeoSeal wraps this as `ProviderError` and
/// never substitutes a fallback path when a provider reports one of these.
#[derive(Debug, Error)]
pub enum PqcError {
    #[error("invalid key size")]
    InvalidKeySize,
    #[error("invalid ciphertext")]
    InvalidCiphertext,
    #[error("key encapsulation failed")]
    EncapsulationFailed,
    #[error("key decapsulation failed")]
    DecapsulationFailed,
    #[error("signing failed")]
    SigningFailed,
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("RNG provider failed: {0}")]
    RngFailed(String),
}
