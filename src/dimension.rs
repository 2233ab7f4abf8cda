//! DimensionPlanner: sizing a grille to a message.
//!
//! A grille of dimension `d` has `(d/2)²` rotational classes, and every
//! class contributes exactly one active cell under the default activation
//! policy, so `(d/2)²` is the number of message characters it can carry.

use std::fmt;

use crate::error::GrilleError;

/// Smallest admissible grid dimension.
const MIN_DIMENSION: usize = 4;

/// Side length of a square grille: even and at least 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dimension(usize);

impl Dimension {
    /// The smallest grille, 4x4.
    pub const MIN: Dimension = Dimension(MIN_DIMENSION);

    /// Validates and wraps a side length.
    ///
    /// # Errors
    /// Returns [`GrilleError::InvalidDimension`] if `side` is odd or
    /// smaller than 4.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::Dimension;
    ///
    /// assert_eq!(Dimension::new(6).unwrap().get(), 6);
    /// assert!(Dimension::new(5).is_err());
    /// assert!(Dimension::new(2).is_err());
    /// ```
    pub fn new(side: usize) -> Result<Self, GrilleError> {
        if side < MIN_DIMENSION || !side.is_multiple_of(2) {
            return Err(GrilleError::InvalidDimension(side));
        }
        Ok(Dimension(side))
    }

    /// Returns the side length.
    pub fn get(self) -> usize {
        self.0
    }

    /// Returns the side length of one quadrant (`d/2`).
    pub fn half(self) -> usize {
        self.0 / 2
    }

    /// Number of rotational equivalence classes, `(d/2)²`.
    pub fn num_classes(self) -> usize {
        self.half() * self.half()
    }

    /// Total number of cells, `d²`.
    pub fn num_cells(self) -> usize {
        self.0 * self.0
    }

    /// Returns the next admissible dimension (`d + 2`).
    fn grow(self) -> Self {
        Dimension(self.0 + 2)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// How the planner estimates a grille's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Smallest dimension whose class count `(d/2)²` holds the message.
    #[default]
    Exact,
    /// Stepping heuristic: capacity starts at 0 for `d = 4` and grows by
    /// 8 per step of 2; the first dimension whose capacity strictly
    /// exceeds the message length wins. Never picks `d = 4`.
    Stepped,
}

impl CapacityPolicy {
    /// Picks a dimension for a message of `message_length` characters.
    ///
    /// Both policies are monotonically non-decreasing in the length and
    /// never return a grille with fewer classes than the message has
    /// characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::CapacityPolicy;
    ///
    /// assert_eq!(CapacityPolicy::Exact.plan(0).get(), 4);
    /// assert_eq!(CapacityPolicy::Stepped.plan(0).get(), 6);
    /// assert_eq!(CapacityPolicy::Exact.plan(20).get(), 10);
    /// assert_eq!(CapacityPolicy::Stepped.plan(20).get(), 10);
    /// ```
    pub fn plan(self, message_length: usize) -> Dimension {
        let mut dimension = Dimension::MIN;
        match self {
            CapacityPolicy::Exact => {
                while dimension.num_classes() < message_length {
                    dimension = dimension.grow();
                }
            }
            CapacityPolicy::Stepped => {
                let mut capacity = 4usize;
                while capacity - 4 <= message_length {
                    dimension = dimension.grow();
                    capacity += 8;
                }
            }
        }
        dimension
    }
}

/// Picks the smallest grille that can carry `message_length` characters.
///
/// Uses [`CapacityPolicy::Exact`]. An empty message still gets the
/// minimum 4x4 grille.
pub fn plan_dimension(message_length: usize) -> Dimension {
    CapacityPolicy::Exact.plan(message_length)
}
