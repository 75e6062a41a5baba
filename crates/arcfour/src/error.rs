use thiserror::Error;

use crate::keystream::Phase;

/// Errors returned by the keystream engine.
///
/// All variants are local and recoverable: configuration failures leave no
/// partial state behind, and `NotReady` is the expected signal while the
/// engine is still scheduling or discarding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KeystreamError {
    #[error(
        "invalid RC4 key size {key_size_bits} bits with {key_len} key bytes: \
         key size must be a multiple of 8 in 8..=256 bits and covered by the supplied key material"
    )]
    InvalidKeySize { key_size_bits: u32, key_len: usize },

    #[error("no keystream byte available: engine is in the {phase:?} phase")]
    NotReady { phase: Phase },

    #[error("cannot reconfigure key material in the {phase:?} phase: rearm to Idle first")]
    ReconfigureWhileActive { phase: Phase },
}
