//! # SS1 Six-Tongue Tokenizer
//!
//! A bijective, domain-separated binary-to-text codec over six disjoint
//! 256-token vocabularies ([`Tongue::Ko`], [`Tongue::Av`], [`Tongue::Ru`],
//! [`Tongue::Ca`], [`Tongue::Um`], [`Tongue::Dr`]), with byte-preserving
//! cross-tongue translation, interleave/deinterleave, and attested
//! transformation.
//!
//! ## Modules
//!
//! - [`tongue`]: the six channels and their fixed phase/weight constants
//! - [`lexicon`]: C1, the per-tongue byte<->token bijection
//! - [`tokenizer`]: C2, encode/decode/normalize
//! - [`xlate`]: C3, cross-tongue retokenization with HMAC attestation
//! - [`blend`]: C4, periodic-pattern interleave/deinterleave
//!
//! ## Invariants the core never violates
//!
//! - `decode(T, encode(T, b)) == b` for every tongue `T` and byte `b`.
//! - Every tongue's forward table covers all 256 bytes with distinct tokens.
//! - Cross-tongue retokenization preserves the decoded byte string exactly.
//! - `unblend` never silently accepts a tongue that disagrees with the
//!   caller-supplied pattern.
//!
//! Lexicons are immutable once built. There is no "evolving lexicon" here;
//! that research variant breaks every invariant above and lives, if at all,
//! in a layer above this crate that pins a lexicon version id per envelope.

pub mod blend;
pub mod error;
pub mod lexicon;
pub mod tokenizer;
pub mod tongue;
pub mod xlate;

pub use blend::{blend, unblend, BlendedPair};
pub use error::TonguesError;
pub use lexicon::{CustomTable, Lexicons, TongueLexicon};
pub use tokenizer::{decode, encode, normalize, render};
pub use tongue::{Tongue, ALL_TONGUES, PHI};
pub use xlate::{retokenize, retokenize_text, Attestation, Mode, DEFAULT_ATTEST_KEY};
