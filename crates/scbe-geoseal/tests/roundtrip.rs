//! Property-based coverage of the envelope round-trip and tamper-detection
//! invariants from the envelope's testable-properties list.

use proptest::prelude::*;

use scbe_crypto_pqc::{DemoDsa, DemoKem, DsaProvider, KemProvider};
use scbe_geoseal::{open, seal};

fn demo_keys() -> (DemoKem, DemoDsa, Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
    let kem = DemoKem::new();
    let dsa = DemoDsa::new();
    let (pk_kem, sk_kem) = kem.generate_keypair().unwrap();
    let (pk_dsa, sk_dsa) = dsa.generate_keypair().unwrap();
    (kem, dsa, pk_kem, sk_kem, pk_dsa, sk_dsa)
}

proptest! {
    #[test]
    fn seal_open_round_trips_arbitrary_plaintext(
        pt in proptest::collection::vec(any::<u8>(), 0..256),
        context in proptest::collection::vec(-100.0f64..100.0, 1..12),
    ) {
        let (kem, dsa, pk_kem, sk_kem, pk_dsa, sk_dsa) = demo_keys();
        let env = seal(&pt, &context, &kem, &dsa, &pk_kem, &sk_dsa, 0, 0).unwrap();
        let result = open(&env, Some(&context), &kem, &dsa, &sk_kem, &pk_dsa).unwrap();
        prop_assert_eq!(result.plaintext.unwrap(), pt);
    }

    #[test]
    fn flipping_any_ct_spec_bit_invalidates_signature(
        pt in proptest::collection::vec(any::<u8>(), 1..64),
        bit_index in 0usize..64,
    ) {
        let (kem, dsa, pk_kem, sk_kem, pk_dsa, sk_dsa) = demo_keys();
        let context = [0.2, -0.3, 0.7, 1.0, -2.0];
        let mut env = seal(&pt, &context, &kem, &dsa, &pk_kem, &sk_dsa, 0, 0).unwrap();

        use base64::Engine;
        let mut raw = base64::engine::general_purpose::STANDARD.decode(&env.ct_spec).unwrap();
        if !raw.is_empty() {
            let idx = bit_index % (raw.len() * 8);
            raw[idx / 8] ^= 1 << (idx % 8);
            env.ct_spec = base64::engine::general_purpose::STANDARD.encode(raw);

            let err = open(&env, None, &kem, &dsa, &sk_kem, &pk_dsa).unwrap_err();
            prop_assert!(matches!(err, scbe_geoseal::GeosealError::SignatureInvalid));
        }
    }
}
