//! RC4 ("arcfour") keystream generation with variable key length (8–256 bits)
//! and the RFC 4345 `arcfour128`/`arcfour256` initial-keystream discard.
//!
//! The engine is a step-driven automaton with four phases:
//! - `Idle`: configured but not armed; byte requests report not-ready.
//! - `KeySchedule`: 256 rounds mixing the key into the 256-entry permutation.
//! - `Discard` (RFC 4345 mode only): 1356 generation rounds whose bytes are
//!   computed but withheld, defeating the known biases in RC4's earliest
//!   output bytes.
//! - `Generate`: steady state, one valid keystream byte per round.
//!
//! Each [`Rc4Keystream::next_byte`] call advances exactly one round; withheld
//! bytes are never surfaced to the caller. [`Rc4Keystream::fill`] and
//! [`Rc4Keystream::apply_keystream`] loop through the scheduling/discard
//! rounds internally.
//!
//! RC4 is a legacy cipher with well-known statistical weaknesses; this crate
//! exists for compatibility with protocols and file formats that still
//! mandate it, not for new designs.
//!
//! ```
//! use arcfour::Rc4Keystream;
//!
//! let mut ks = Rc4Keystream::new(b"Key", 24, false)?;
//! ks.init()?;
//! let mut out = [0u8; 4];
//! ks.fill(&mut out)?;
//! assert_eq!(out, [0xEB, 0x9F, 0x77, 0x81]);
//! # Ok::<(), arcfour::KeystreamError>(())
//! ```

mod error;
mod key;
mod keystream;
mod sbox;

pub use crate::error::KeystreamError;
pub use crate::key::MAX_KEY_BYTES;
pub use crate::keystream::{Phase, Rc4Keystream, RFC4345_DISCARD_ROUNDS};

#[cfg(test)]
mod fuzz_tests;
