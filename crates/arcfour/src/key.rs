//! Configured key material and its cyclic byte addressing.

use core::fmt;

use zeroize::Zeroizing;

use crate::error::KeystreamError;

/// Maximum RC4 key length supported by the engine (256 bits).
pub const MAX_KEY_BYTES: usize = 32;

/// Key material for one keying: 1..=32 bytes, fixed until the next re-key.
///
/// Lookups are cyclic (`index % key_len`), so the key schedule can address it
/// with the raw round index. Stored in [`Zeroizing`] so the bytes are wiped
/// on drop and on re-key.
pub(crate) struct KeyMaterial {
    bytes: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Validate the declared key size and capture the effective key bytes.
    ///
    /// `key_size_bits` must be a multiple of 8 in `8..=256`, and `key` must
    /// supply at least `key_size_bits / 8` bytes. Key bytes beyond the
    /// declared size are ignored.
    pub(crate) fn configure(key: &[u8], key_size_bits: u32) -> Result<Self, KeystreamError> {
        if key_size_bits == 0
            || key_size_bits % 8 != 0
            || key_size_bits > (MAX_KEY_BYTES * 8) as u32
        {
            return Err(KeystreamError::InvalidKeySize {
                key_size_bits,
                key_len: key.len(),
            });
        }
        let key_len = (key_size_bits / 8) as usize;
        if key.len() < key_len {
            return Err(KeystreamError::InvalidKeySize {
                key_size_bits,
                key_len: key.len(),
            });
        }
        Ok(Self {
            bytes: Zeroizing::new(key[..key_len].to_vec()),
        })
    }

    /// Capture pre-validated key bytes (used by the fixed-size RFC 4345
    /// preset constructors, whose array lengths make validation vacuous).
    pub(crate) fn from_bytes(key: &[u8]) -> Self {
        assert!(!key.is_empty() && key.len() <= MAX_KEY_BYTES);
        Self {
            bytes: Zeroizing::new(key.to_vec()),
        }
    }

    /// Cyclic lookup: logical index `n` maps to byte `n % key_len`.
    #[inline]
    pub(crate) fn read(&self, index: u8) -> u8 {
        self.bytes[index as usize % self.bytes.len()]
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact the key bytes.
        f.debug_struct("KeyMaterial")
            .field("key_len", &self.bytes.len())
            .finish()
    }
}
