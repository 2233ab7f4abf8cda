//! Rotating-grille (Cardano) substitution cipher engine.
//!
//! A square grid of even side `d` is split into `(d/2)²` equivalence
//! classes: groups of four cells that map onto one another under 90°
//! rotation about the center. A secret code picks, per class, which of
//! the four cells is a "hole". Encoding writes the message through the
//! holes in row-major order and fills every other cell with random
//! letters; decoding reads the holes back in the same order.
//!
//! This is a classical pen-and-paper cipher. It offers no protection
//! against modern cryptanalysis.
//!
//! # Architecture
//!
//! ```text
//! plan_dimension   (message length → Dimension)
//!     ↓
//! build_grille     (Dimension → LabelGrid + EquivalenceClasses)
//!     ↓
//! generate_code    (classes + injected Rng → Code)
//!     ↓
//! CardanoCipher::encode / decode  (CharacterGrid ↔ message)
//! ```
//!
//! # Examples
//!
//! Seal and open a message in one call:
//!
//! ```
//! use cardano_grille::CardanoCipher;
//!
//! let cipher = CardanoCipher::new();
//! let sealed = cipher.seal("HELLO", &mut rand::thread_rng());
//!
//! assert_eq!(sealed.dimension().get(), 6);
//! assert!(sealed.open().starts_with("HELLO"));
//! ```
//!
//! Drive each stage by hand with a reproducible generator:
//!
//! ```
//! use cardano_grille::random::MersenneTwister64;
//! use cardano_grille::{build_grille, generate_code, plan_dimension, CardanoCipher};
//!
//! let message = "GRILLE";
//! let mut rng = MersenneTwister64::with_seed(2024);
//!
//! let dimension = plan_dimension(message.chars().count());
//! let (labels, classes) = build_grille(dimension);
//! let code = generate_code(&classes, &labels, &mut rng);
//!
//! let cipher = CardanoCipher::new();
//! let grid = cipher.encode(message, &labels, &code, &mut rng);
//! assert!(cipher.decode_with_code(&grid, &labels, &code).starts_with(message));
//! ```

#![deny(clippy::all)]

pub mod error;
pub mod random;

mod cipher;
mod code;
mod dimension;
mod grille;

pub use cipher::{
    decode, encode, Activation, CardanoCipher, CharacterGrid, Sealed, DEFAULT_ALPHABET,
};
pub use code::{generate_code, CellSelector, Code, Hole, LabelSet};
pub use dimension::{plan_dimension, CapacityPolicy, Dimension};
pub use error::GrilleError;
pub use grille::{
    build_grille, derive_classes, Cell, EquivalenceClass, LabelGrid, Quadrant, ROTATIONS,
};
