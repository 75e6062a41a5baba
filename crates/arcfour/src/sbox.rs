//! The RC4 permutation table (S-box).

use zeroize::{Zeroize, ZeroizeOnDrop};

/// 256-entry permutation of `0..=255`.
///
/// The table starts as the identity permutation and is only ever mutated via
/// [`Sbox::swap`], so it stays a bijection for the lifetime of a keying. The
/// table is secret-derived state, hence zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Sbox([u8; 256]);

impl Sbox {
    pub(crate) fn identity() -> Self {
        let mut sbox = Self([0u8; 256]);
        sbox.reset();
        sbox
    }

    /// Reset to the identity permutation. Precedes every key schedule.
    pub(crate) fn reset(&mut self) {
        for (i, v) in self.0.iter_mut().enumerate() {
            *v = i as u8;
        }
    }

    #[inline]
    pub(crate) fn read(&self, index: u8) -> u8 {
        self.0[index as usize]
    }

    /// Exchange two entries. A no-op when `a == b`.
    #[inline]
    pub(crate) fn swap(&mut self, a: u8, b: u8) {
        self.0.swap(a as usize, b as usize);
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[u8; 256] {
        &self.0
    }
}
