//! Post-quantum KEM/DSA provider interfaces for the GeoSeal envelope.
//!
//! These are capability traits, not algorithm choices. The `Demo*`
//! implementations are explicitly insecure placeholders: adequate for the
//! built-in self-test, unsuitable for any real deployment. See each
//! provider's doc comment for what it does and does not protect against.

pub mod dsa;
pub mod error;
pub mod kem;

pub use dsa::{DemoDsa, DsaProvider, DEMO_KEY_LEN, DEMO_SIGNATURE_LEN};
pub use error::PqcError;
pub use kem::{DemoKem, KemProvider, DEMO_CIPHERTEXT_LEN, DEMO_SECRET_KEY_LEN, DEMO_SHARED_SECRET_LEN};
