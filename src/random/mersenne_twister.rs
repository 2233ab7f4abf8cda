//! 64-bit Mersenne Twister PRNG (MT19937-64).
//!
//! Provides a high-period (2^19937 - 1) generator with deterministic
//! output for a fixed seed. Plugs into `rand` through [`RngCore`] and
//! [`SeedableRng`], so it can drive key generation and filler selection
//! wherever a reproducible grille is wanted.

use rand::{Error, RngCore, SeedableRng};

use crate::error::GrilleError;

const NN: usize = 312;
const MM: usize = 156;
const MATRIX_A: u64 = 0xB5026F5AA96619E9;
const UM: u64 = 0xFFFFFFFF80000000; // upper 33 bits
const LM: u64 = 0x7FFFFFFF; // lower 31 bits

/// Key used by [`MersenneTwister64::from_key`] when given an empty key.
const ZERO_KEY: [u64; 1] = [0];

/// Seed used by [`MersenneTwister64::default`], as in the reference code.
const DEFAULT_SEED: u64 = 5489;

/// 64-bit Mersenne Twister PRNG with period 2^19937-1.
///
/// # Examples
///
/// ```
/// use cardano_grille::random::MersenneTwister64;
/// use rand::RngCore;
///
/// let mut a = MersenneTwister64::from_passphrase("shared secret").unwrap();
/// let mut b = MersenneTwister64::from_passphrase("shared secret").unwrap();
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone)]
pub struct MersenneTwister64 {
    mt: [u64; NN],
    mti: usize,
}

impl std::fmt::Debug for MersenneTwister64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister64")
            .field("mti", &self.mti)
            .finish_non_exhaustive()
    }
}

impl Default for MersenneTwister64 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl MersenneTwister64 {
    /// Creates a generator from a single 64-bit seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut mt = [0u64; NN];
        mt[0] = seed;
        for i in 1..NN {
            let prev = mt[i - 1];
            mt[i] = 6364136223846793005u64
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(i as u64);
        }
        MersenneTwister64 { mt, mti: NN }
    }

    /// Creates a generator from a key array (`init_by_array64`).
    ///
    /// An empty key behaves like a single zero word.
    pub fn from_key(key: &[u64]) -> Self {
        let key: &[u64] = if key.is_empty() { &ZERO_KEY } else { key };
        let mut rng = Self::with_seed(19650218);
        let mt = &mut rng.mt;

        let mut i = 1usize;
        let mut j = 0usize;
        for _ in 0..NN.max(key.len()) {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 62)).wrapping_mul(3935559000370003845))
                .wrapping_add(key[j])
                .wrapping_add(j as u64);
            i += 1;
            j += 1;
            if i >= NN {
                mt[0] = mt[NN - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..NN - 1 {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 62)).wrapping_mul(2862933555777941757))
                .wrapping_sub(i as u64);
            i += 1;
            if i >= NN {
                mt[0] = mt[NN - 1];
                i = 1;
            }
        }
        mt[0] = 1 << 63;
        rng
    }

    /// Creates a generator keyed by a passphrase.
    ///
    /// The UTF-8 bytes are packed big-endian into 64-bit words (the last
    /// word zero-padded) and fed to [`from_key`](Self::from_key).
    ///
    /// # Errors
    /// Returns [`GrilleError::PassphraseTooShort`] for an empty passphrase.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, GrilleError> {
        if passphrase.is_empty() {
            return Err(GrilleError::PassphraseTooShort);
        }
        let key: Vec<u64> = passphrase
            .as_bytes()
            .chunks(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word[..chunk.len()].copy_from_slice(chunk);
                u64::from_be_bytes(word)
            })
            .collect();
        Ok(Self::from_key(&key))
    }

    /// Regenerates the whole state vector.
    fn twist(&mut self) {
        let mag01 = |x: u64| if x & 1 == 0 { 0 } else { MATRIX_A };

        for i in 0..NN - MM {
            let x = (self.mt[i] & UM) | (self.mt[i + 1] & LM);
            self.mt[i] = self.mt[i + MM] ^ (x >> 1) ^ mag01(x);
        }
        for i in NN - MM..NN - 1 {
            let x = (self.mt[i] & UM) | (self.mt[i + 1] & LM);
            self.mt[i] = self.mt[i + MM - NN] ^ (x >> 1) ^ mag01(x);
        }
        let x = (self.mt[NN - 1] & UM) | (self.mt[0] & LM);
        self.mt[NN - 1] = self.mt[MM - 1] ^ (x >> 1) ^ mag01(x);
        self.mti = 0;
    }

    /// Generates the next tempered 64-bit value.
    fn next_tempered(&mut self) -> u64 {
        if self.mti >= NN {
            self.twist();
        }
        let mut x = self.mt[self.mti];
        self.mti += 1;

        // Tempering
        x ^= (x >> 29) & 0x5555555555555555;
        x ^= (x << 17) & 0x71D67FFFEDA60000;
        x ^= (x << 37) & 0xFFF7EEE000000000;
        x ^= x >> 43;
        x
    }
}

impl RngCore for MersenneTwister64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_tempered() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_tempered()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_tempered().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MersenneTwister64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::with_seed(state)
    }
}
