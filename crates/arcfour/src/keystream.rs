//! The RC4 keystream control automaton.
//!
//! One engine owns one keying: the permutation table, the two PRGA pointers,
//! the phase counter, and the current phase. Every byte request advances the
//! automaton by exactly one round; the phase decides whether the byte the
//! round produced is surfaced or withheld.
//!
//! Phase sequencing:
//!
//! - `Idle` → `KeySchedule` on [`Rc4Keystream::init`]. The key schedule runs
//!   exactly 256 mixing rounds; no output exists during scheduling.
//! - `KeySchedule` → `Discard` (RFC 4345 mode) or `Generate` after round 256.
//! - `Discard` → `Generate` after 1356 withheld generation rounds.
//! - Any phase → `Idle` via [`Rc4Keystream::rearm`], after which the engine
//!   may be re-keyed.
//!
//! Pointer and counter updates commit together per round; an error never
//! leaves the permutation half-mutated.

use core::fmt;

use crate::error::KeystreamError;
use crate::key::KeyMaterial;
use crate::sbox::Sbox;

/// Number of key-scheduling rounds: one per permutation entry.
const KEY_SCHEDULE_ROUNDS: u16 = 256;

/// Initial keystream bytes withheld in RFC 4345 mode (`0x54c`).
///
/// Fixed protocol parameter, not configurable; it exists to defeat the
/// weak-key biases in RC4's earliest output bytes.
pub const RFC4345_DISCARD_ROUNDS: u16 = 0x54c;

/// The automaton's phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Configured but not armed; byte requests report
    /// [`KeystreamError::NotReady`] without performing a round.
    Idle,
    /// Mixing the key into the permutation (256 rounds, no output).
    KeySchedule,
    /// RFC 4345 initial-keystream discard: generation rounds whose bytes are
    /// computed but withheld.
    Discard,
    /// Steady state: one valid keystream byte per round.
    Generate,
}

/// RC4 keystream engine with variable key length (8–256 bits) and optional
/// RFC 4345 initial-keystream discard.
///
/// Not meant for shared concurrent use; instantiate one engine per keystream.
pub struct Rc4Keystream {
    key: KeyMaterial,
    rfc4345: bool,
    sbox: Sbox,
    i: u8,
    j: u8,
    /// Phase counter: the round index while key scheduling, then the count of
    /// withheld rounds while discarding.
    rounds: u16,
    phase: Phase,
}

impl Rc4Keystream {
    /// Configure a new engine. The automaton starts in [`Phase::Idle`] with
    /// the permutation at identity; call [`Self::init`] to arm it.
    ///
    /// Fails with [`KeystreamError::InvalidKeySize`] unless `key_size_bits`
    /// is a multiple of 8 in `8..=256` and `key` supplies at least
    /// `key_size_bits / 8` bytes. Extra key bytes are ignored.
    pub fn new(key: &[u8], key_size_bits: u32, rfc4345: bool) -> Result<Self, KeystreamError> {
        Ok(Self::assemble(KeyMaterial::configure(key, key_size_bits)?, rfc4345))
    }

    /// RFC 4345 `arcfour128`: 128-bit key, discard mode on, already armed.
    pub fn arcfour128(key: &[u8; 16]) -> Self {
        let mut ks = Self::assemble(KeyMaterial::from_bytes(key), true);
        ks.start_key_schedule();
        ks
    }

    /// RFC 4345 `arcfour256`: 256-bit key, discard mode on, already armed.
    pub fn arcfour256(key: &[u8; 32]) -> Self {
        let mut ks = Self::assemble(KeyMaterial::from_bytes(key), true);
        ks.start_key_schedule();
        ks
    }

    fn assemble(key: KeyMaterial, rfc4345: bool) -> Self {
        Self {
            key,
            rfc4345,
            sbox: Sbox::identity(),
            i: 0,
            j: 0,
            rounds: 0,
            phase: Phase::Idle,
        }
    }

    /// Arm the engine: `Idle` → `KeySchedule`.
    ///
    /// Resets the permutation to identity and both pointers to zero. Rejected
    /// with [`KeystreamError::NotReady`] outside `Idle`; use [`Self::rearm`]
    /// to return there first.
    pub fn init(&mut self) -> Result<(), KeystreamError> {
        if self.phase != Phase::Idle {
            return Err(KeystreamError::NotReady { phase: self.phase });
        }
        self.start_key_schedule();
        Ok(())
    }

    /// Return to `Idle` so the engine can be re-keyed or re-armed. The
    /// current keystream position is abandoned; the next [`Self::init`]
    /// starts a fresh key schedule.
    pub fn rearm(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Replace the key material and discard mode. Only legal in `Idle`;
    /// otherwise fails with [`KeystreamError::ReconfigureWhileActive`] and
    /// the current configuration is left untouched.
    pub fn reconfigure(
        &mut self,
        key: &[u8],
        key_size_bits: u32,
        rfc4345: bool,
    ) -> Result<(), KeystreamError> {
        if self.phase != Phase::Idle {
            return Err(KeystreamError::ReconfigureWhileActive { phase: self.phase });
        }
        self.key = KeyMaterial::configure(key, key_size_bits)?;
        self.rfc4345 = rfc4345;
        self.sbox.reset();
        self.i = 0;
        self.j = 0;
        self.rounds = 0;
        Ok(())
    }

    /// The automaton's current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether this keying withholds the first 1356 keystream bytes.
    pub fn rfc4345_mode(&self) -> bool {
        self.rfc4345
    }

    /// Advance the automaton by exactly one round.
    ///
    /// Returns the produced byte only in the `Generate` phase. In `Idle` no
    /// round is performed at all; during `KeySchedule` and `Discard` a round
    /// is performed but the byte is withheld, reported as
    /// [`KeystreamError::NotReady`]. Callers may poll until ready or use
    /// [`Self::fill`] / [`Self::apply_keystream`], which loop internally.
    pub fn next_byte(&mut self) -> Result<u8, KeystreamError> {
        match self.phase {
            Phase::Idle => Err(KeystreamError::NotReady { phase: Phase::Idle }),
            Phase::KeySchedule => {
                self.key_schedule_round();
                Err(KeystreamError::NotReady {
                    phase: Phase::KeySchedule,
                })
            }
            Phase::Discard => {
                // Output gate: the round runs exactly like Generate, but the
                // byte is masked and never surfaced.
                let _withheld = self.generate_round();
                self.rounds += 1;
                if self.rounds == RFC4345_DISCARD_ROUNDS {
                    self.phase = Phase::Generate;
                }
                Err(KeystreamError::NotReady {
                    phase: Phase::Discard,
                })
            }
            Phase::Generate => Ok(self.generate_round()),
        }
    }

    /// Fill `buf` with valid keystream bytes, looping through any remaining
    /// scheduling/discard rounds. Fails with [`KeystreamError::NotReady`] if
    /// the engine is `Idle`.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<(), KeystreamError> {
        if self.phase == Phase::Idle {
            return Err(KeystreamError::NotReady { phase: Phase::Idle });
        }
        for slot in buf.iter_mut() {
            *slot = self.next_valid_byte();
        }
        Ok(())
    }

    /// XOR the keystream into `data`, encrypting or decrypting in place.
    /// Same readiness rules as [`Self::fill`].
    pub fn apply_keystream(&mut self, data: &mut [u8]) -> Result<(), KeystreamError> {
        if self.phase == Phase::Idle {
            return Err(KeystreamError::NotReady { phase: Phase::Idle });
        }
        for b in data.iter_mut() {
            *b ^= self.next_valid_byte();
        }
        Ok(())
    }

    fn start_key_schedule(&mut self) {
        self.sbox.reset();
        self.i = 0;
        self.j = 0;
        self.rounds = 0;
        self.phase = Phase::KeySchedule;
    }

    /// One key-scheduling round. The round counter doubles as the `i` index,
    /// exactly as the classical KSA iterates `i` over `0..=255`; the key byte
    /// is mixed in only here, addressed cyclically by the round index.
    fn key_schedule_round(&mut self) {
        let i = self.rounds as u8;
        let si = self.sbox.read(i);
        self.j = self.j.wrapping_add(si).wrapping_add(self.key.read(i));
        self.sbox.swap(i, self.j);
        self.rounds += 1;
        if self.rounds == KEY_SCHEDULE_ROUNDS {
            // PRGA starts from fresh pointers.
            self.i = 0;
            self.j = 0;
            if self.rfc4345 {
                self.rounds = 0;
                self.phase = Phase::Discard;
            } else {
                self.phase = Phase::Generate;
            }
        }
    }

    /// One generation (PRGA) round: advance both pointers, swap, and read the
    /// output byte only after the swap has committed.
    fn generate_round(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.sbox.read(self.i));
        self.sbox.swap(self.i, self.j);
        let t = self.sbox.read(self.i).wrapping_add(self.sbox.read(self.j));
        self.sbox.read(t)
    }

    /// Next valid keystream byte, driving through at most 256 + 1356 withheld
    /// rounds. Callers guarantee the engine is not `Idle`.
    fn next_valid_byte(&mut self) -> u8 {
        debug_assert!(self.phase != Phase::Idle);
        loop {
            match self.next_byte() {
                Ok(b) => return b,
                Err(_) => continue,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn sbox_entries(&self) -> &[u8; 256] {
        self.sbox.entries()
    }
}

impl fmt::Debug for Rc4Keystream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact secret-derived state: the key bytes, the permutation table,
        // and the `j` pointer (a function of both).
        f.debug_struct("Rc4Keystream")
            .field("key_len", &self.key.len())
            .field("rfc4345", &self.rfc4345)
            .field("phase", &self.phase)
            .field("rounds", &self.rounds)
            .finish()
    }
}
