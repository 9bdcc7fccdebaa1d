//! Built-in self-test, run when `scbe` is invoked with no subcommand.
//!
//! Exercises the universal invariants from the tokenizer's and envelope's
//! testable-properties lists end to end, using the default demo lexicon and
//! the demo PQ providers. Exits non-zero (via the caller) on any failure.

use anyhow::{ensure, Context, Result};

use scbe_crypto_pqc::{DemoDsa, DemoKem, DsaProvider, KemProvider};
use scbe_tongues::{blend, decode, encode, retokenize_text, unblend, Lexicons, Mode, Tongue, ALL_TONGUES};

pub fn run() -> Result<()> {
    byte_sweep().context("default-lexicon byte sweep")?;
    cross_tongue_round_trip().context("cross-tongue round trip")?;
    blend_round_trip().context("blend/unblend round trip")?;
    geoseal_round_trip().context("geoseal envelope round trip")?;
    geoseal_tamper_detection().context("geoseal tamper detection")?;
    eprintln!("self-test: all checks passed");
    Ok(())
}

fn byte_sweep() -> Result<()> {
    let lex = Lexicons::default_demo();
    for tongue in ALL_TONGUES {
        let bytes: Vec<u8> = (0u16..256).map(|b| b as u8).collect();
        let tokens = encode(&lex, tongue, &bytes);
        let distinct: std::collections::HashSet<_> = tokens.iter().collect();
        ensure!(distinct.len() == 256, "tongue {tongue} did not produce 256 distinct tokens");
        let back = decode(&lex, tongue, &tokens)?;
        ensure!(back == bytes, "tongue {tongue} byte sweep did not round-trip");
    }
    Ok(())
}

fn cross_tongue_round_trip() -> Result<()> {
    let lex = Lexicons::default_demo();
    let payload = b"hello aethermoore";
    let t1 = scbe_tongues::render(&encode(&lex, Tongue::Ko, payload));
    let (t2, attest) = retokenize_text(&lex, Tongue::Ko, Tongue::Dr, &t1, Mode::Byte, Some(b"k"), None)?;
    let back = decode(&lex, Tongue::Dr, &scbe_tongues::normalize(&t2))?;
    ensure!(back == payload, "cross-tongue retokenization did not preserve bytes");
    ensure!(!attest.hmac_attest.is_empty(), "attestation missing HMAC");
    Ok(())
}

fn blend_round_trip() -> Result<()> {
    let lex = Lexicons::default_demo();
    let pattern = [Tongue::Ko, Tongue::Ko, Tongue::Av, Tongue::Ru, Tongue::Ca, Tongue::Um, Tongue::Dr];
    let bytes: Vec<u8> = (0u16..1024).map(|i| (i % 256) as u8).collect();
    let pairs = blend(&lex, &pattern, &bytes);
    let back = unblend(&lex, &pattern, &pairs)?;
    ensure!(back == bytes, "blend/unblend did not round-trip");
    Ok(())
}

fn geoseal_round_trip() -> Result<()> {
    let kem = DemoKem::new();
    let dsa = DemoDsa::new();
    let (pk_kem, sk_kem) = kem.generate_keypair()?;
    let (pk_dsa, sk_dsa) = dsa.generate_keypair()?;

    let context = [0.2, -0.3, 0.7, 1.0, -2.0, 0.5, 3.1, -9.9, 0.0];
    let pt = b"hello aethermoore";

    let envelope = scbe_geoseal::seal(pt, &context, &kem, &dsa, &pk_kem, &sk_dsa, 0, 0)?;
    let result = scbe_geoseal::open(&envelope, Some(&context), &kem, &dsa, &sk_kem, &pk_dsa)?;

    ensure!(result.ok, "geoseal open reported not ok");
    ensure!(result.plaintext.as_deref() == Some(pt.as_slice()), "geoseal round trip did not preserve plaintext");
    Ok(())
}

fn geoseal_tamper_detection() -> Result<()> {
    let kem = DemoKem::new();
    let dsa = DemoDsa::new();
    let (pk_kem, sk_kem) = kem.generate_keypair()?;
    let (pk_dsa, sk_dsa) = dsa.generate_keypair()?;

    let context = [0.2, -0.3, 0.7];
    let mut envelope = scbe_geoseal::seal(b"secret", &context, &kem, &dsa, &pk_kem, &sk_dsa, 0, 0)?;

    use base64::Engine;
    let mut raw = base64::engine::general_purpose::STANDARD.decode(&envelope.ct_spec)?;
    raw[0] ^= 0x01;
    envelope.ct_spec = base64::engine::general_purpose::STANDARD.encode(raw);

    let outcome = scbe_geoseal::open(&envelope, None, &kem, &dsa, &sk_kem, &pk_dsa);
    ensure!(
        matches!(outcome, Err(scbe_geoseal::GeosealError::SignatureInvalid)),
        "tampered envelope did not fail signature verification"
    );
    Ok(())
}
