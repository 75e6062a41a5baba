#![allow(unexpected_cfgs)]

use proptest::prelude::*;

use crate::{KeystreamError, Phase, Rc4Keystream, RFC4345_DISCARD_ROUNDS};

// Keep CI runtime bounded. Heavier fuzzing can be enabled by building with
// `RUSTFLAGS="--cfg fuzzing"` (or an equivalent `cfg(fuzzing)` setup).
#[cfg(fuzzing)]
const CASES: u32 = 512;
#[cfg(not(fuzzing))]
const CASES: u32 = 48;

fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=32)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CASES,
        max_shrink_iters: 0,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sbox_stays_a_bijection_under_random_round_sampling(
        key in arb_key(),
        rfc4345 in any::<bool>(),
        rounds in 0usize..4096,
    ) {
        let mut ks = Rc4Keystream::new(&key, key.len() as u32 * 8, rfc4345).unwrap();
        ks.init().unwrap();
        for _ in 0..rounds {
            let _ = ks.next_byte();
        }

        let mut seen = [false; 256];
        for &value in ks.sbox_entries() {
            prop_assert!(!seen[value as usize], "duplicate S-box value {value}");
            seen[value as usize] = true;
        }
    }

    #[test]
    fn keystream_is_a_pure_function_of_the_key(key in arb_key()) {
        let mut a = Rc4Keystream::new(&key, key.len() as u32 * 8, false).unwrap();
        let mut b = Rc4Keystream::new(&key, key.len() as u32 * 8, false).unwrap();
        a.init().unwrap();
        b.init().unwrap();

        let mut out_a = [0u8; 128];
        let mut out_b = [0u8; 128];
        a.fill(&mut out_a).unwrap();
        b.fill(&mut out_b).unwrap();
        prop_assert_eq!(out_a, out_b);
    }

    #[test]
    fn rfc4345_equals_plain_keystream_with_discard_prefix_dropped(key in arb_key()) {
        let bits = key.len() as u32 * 8;
        let discard = RFC4345_DISCARD_ROUNDS as usize;

        let mut plain = Rc4Keystream::new(&key, bits, false).unwrap();
        plain.init().unwrap();
        let mut reference = vec![0u8; discard + 64];
        plain.fill(&mut reference).unwrap();

        let mut skipped = Rc4Keystream::new(&key, bits, true).unwrap();
        skipped.init().unwrap();
        let mut got = [0u8; 64];
        skipped.fill(&mut got).unwrap();

        prop_assert_eq!(&got[..], &reference[discard..]);
    }

    #[test]
    fn withheld_bytes_are_never_surfaced(key in arb_key()) {
        let mut ks = Rc4Keystream::new(&key, key.len() as u32 * 8, true).unwrap();
        ks.init().unwrap();

        let mut withheld = 0usize;
        loop {
            match ks.next_byte() {
                Ok(_) => break,
                Err(KeystreamError::NotReady { phase }) => {
                    prop_assert!(matches!(phase, Phase::KeySchedule | Phase::Discard));
                    withheld += 1;
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }
        prop_assert_eq!(withheld, 256 + RFC4345_DISCARD_ROUNDS as usize);
    }

    #[test]
    fn invalid_key_sizes_are_rejected(key in arb_key(), key_size_bits in any::<u32>()) {
        let valid = key_size_bits != 0
            && key_size_bits % 8 == 0
            && key_size_bits <= 256
            && key.len() * 8 >= key_size_bits as usize;

        let result = Rc4Keystream::new(&key, key_size_bits, false);
        prop_assert_eq!(result.is_ok(), valid);
        if !valid {
            prop_assert_eq!(
                result.err(),
                Some(KeystreamError::InvalidKeySize {
                    key_size_bits,
                    key_len: key.len(),
                })
            );
        }
    }
}
