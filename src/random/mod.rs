//! Random number generation for the Cardano grille.
//!
//! Every operation that needs randomness takes an injected `rand::Rng`.
//! This module adds a seedable Mersenne Twister so that a grille, its
//! code and its filler can be reproduced from a seed or a passphrase.

pub mod mersenne_twister;

pub use mersenne_twister::MersenneTwister64;
