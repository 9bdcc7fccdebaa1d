use thiserror::Error;

/// The seven error kinds GeoSeal distinguishes, per the envelope's failure
/// taxonomy. No variant here is recoverable inside this crate; every one
/// propagates to the caller.
#[derive(Debug, Error)]
pub enum GeosealError {
    #[error("context vector is empty or contains non-finite values")]
    ContextError,

    #[error("envelope signature verification failed")]
    SignatureInvalid,

    #[error("PQ provider failed: {0}")]
    ProviderError(#[from] scbe_crypto_pqc::PqcError),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("malformed base64 or JSON at the envelope boundary: {0}")]
    EncodingError(String),

    #[error("ring classification received a value outside [0, 1]: {0}")]
    RingOutOfRange(f64),
}
