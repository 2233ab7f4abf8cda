//! KeyGenerator: the secret selection of active cells.
//!
//! For every equivalence class the generator picks one of its four
//! member cells uniformly at random. The chosen cell is that class's
//! "hole": the only one of the four rotation images that carries a real
//! message character. The collection of holes is the [`Code`].
//!
//! The operator key is the code written as `label:slot` tokens, one per
//! hole; [`Code::parse`] reads it back against the grille. A [`LabelSet`]
//! is the bare integer view of a selection, matching whole classes.
//! Both implement [`CellSelector`], the rule a decoder uses to pick cells.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use crate::error::GrilleError;
use crate::grille::{Cell, EquivalenceClass, LabelGrid, ROTATIONS};

/// A set of class labels, ordered ascending.
///
/// Parses from and renders to whitespace-separated integers.
///
/// # Examples
///
/// ```
/// use cardano_grille::LabelSet;
///
/// let labels: LabelSet = "3 1  4 1".parse().unwrap();
/// assert_eq!(labels.len(), 3);
/// assert!(labels.contains(4));
/// assert_eq!(labels.to_string(), "1 3 4");
///
/// assert!("1 two 3".parse::<LabelSet>().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeSet<u32>);

impl LabelSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        LabelSet(BTreeSet::new())
    }

    /// Adds a label; returns `false` if it was already present.
    pub fn insert(&mut self, label: u32) -> bool {
        self.0.insert(label)
    }

    /// Returns `true` if `label` is in the set.
    pub fn contains(&self, label: u32) -> bool {
        self.0.contains(&label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no label.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the labels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Returns `true` if the two sets share no label.
    pub fn is_disjoint(&self, other: &LabelSet) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl FromIterator<u32> for LabelSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        LabelSet(iter.into_iter().collect())
    }
}

impl FromStr for LabelSet {
    type Err = GrilleError;

    /// Parses operator input: labels separated by any whitespace.
    ///
    /// # Errors
    /// Returns [`GrilleError::InvalidLabel`] for the first token that is
    /// not a non-negative integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .enumerate()
            .map(|(position, token)| {
                token.parse::<u32>().map_err(|_| GrilleError::InvalidLabel {
                    token: token.to_string(),
                    position,
                })
            })
            .collect()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}

/// The chosen member of one equivalence class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hole {
    /// Label found at the chosen cell.
    pub label: u32,
    /// Rotation slot of the chosen cell within its class (0..4).
    pub slot: usize,
    /// The chosen cell.
    pub cell: Cell,
}

impl Hole {
    /// Selects member `slot` (modulo 4) of `class`.
    pub fn in_class(class: &EquivalenceClass, slot: usize, label_grid: &LabelGrid) -> Self {
        let cell = class.cell(slot);
        Hole {
            label: label_grid.label_at(cell).unwrap_or(class.label()),
            slot: slot % ROTATIONS,
            cell,
        }
    }
}

/// The secret key: one hole per equivalence class, in class order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    holes: Vec<Hole>,
}

impl Code {
    /// Builds a code from an explicit selection of holes.
    pub fn from_holes(holes: Vec<Hole>) -> Self {
        Code { holes }
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Number of entries (one per class for a generated code).
    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Entry labels in class order; duplicates are kept.
    pub fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        self.holes.iter().map(|hole| hole.label)
    }

    /// The distinct labels of the code.
    pub fn labels(&self) -> LabelSet {
        self.entries().collect()
    }

    /// Returns `true` if `cell` is one of the code's holes.
    pub fn is_hole(&self, cell: Cell) -> bool {
        self.holes.iter().any(|hole| hole.cell == cell)
    }

    /// Reads an operator key back into a code for the given grille.
    ///
    /// Tokens are separated by whitespace. A `label:slot` token selects
    /// rotation `slot` (0..4) of the class carrying `label`, which is the
    /// form [`Display`](fmt::Display) writes. A bare `label` selects all
    /// four members of its class. Labels that name no class are skipped.
    ///
    /// # Errors
    /// Returns [`GrilleError::InvalidLabel`] for the first token whose
    /// label is not a non-negative integer or whose slot is not in 0..4.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::{build_grille, Code, Dimension};
    ///
    /// let (grid, classes) = build_grille(Dimension::new(4).unwrap());
    /// let code = Code::parse("1:2 3", &classes, &grid).unwrap();
    /// assert_eq!(code.len(), 5);
    /// assert!(Code::parse("1:4", &classes, &grid).is_err());
    /// ```
    pub fn parse(
        text: &str,
        classes: &[EquivalenceClass],
        label_grid: &LabelGrid,
    ) -> Result<Code, GrilleError> {
        let mut holes = Vec::new();
        for (position, token) in text.split_whitespace().enumerate() {
            let invalid = || GrilleError::InvalidLabel {
                token: token.to_string(),
                position,
            };
            let (label, slots) = match token.split_once(':') {
                Some((label, slot)) => {
                    let slot: usize = slot.parse().map_err(|_| invalid())?;
                    if slot >= ROTATIONS {
                        return Err(invalid());
                    }
                    (label, slot..slot + 1)
                }
                None => (token, 0..ROTATIONS),
            };
            let label: u32 = label.parse().map_err(|_| invalid())?;
            if let Some(class) = classes.iter().find(|class| class.label() == label) {
                holes.extend(slots.map(|slot| Hole::in_class(class, slot, label_grid)));
            }
        }
        Ok(Code { holes })
    }
}

/// The operator key: `label:slot` per hole, in class order.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hole) in self.holes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", hole.label, hole.slot)?;
        }
        Ok(())
    }
}

/// Decides which cells of a label grid a decoder reads.
pub trait CellSelector {
    /// Returns `true` if `cell`, carrying `label`, holds message text.
    fn selects(&self, cell: Cell, label: u32) -> bool;
}

/// Literal label membership: every cell whose label is in the set.
impl CellSelector for LabelSet {
    fn selects(&self, _cell: Cell, label: u32) -> bool {
        self.contains(label)
    }
}

/// Hole membership: only the chosen member of each class.
impl CellSelector for Code {
    fn selects(&self, cell: Cell, _label: u32) -> bool {
        self.is_hole(cell)
    }
}

/// Draws the secret code for a grille.
///
/// For each class, one of the labels found at its four member cells is
/// chosen uniformly at random; the code records the label together with
/// the member cell it came from. The result has one entry per class.
///
/// # Examples
///
/// ```
/// use cardano_grille::{build_grille, generate_code, Dimension};
///
/// let (grid, classes) = build_grille(Dimension::new(6).unwrap());
/// let code = generate_code(&classes, &grid, &mut rand::thread_rng());
/// assert_eq!(code.len(), 9);
/// ```
pub fn generate_code<R: Rng + ?Sized>(
    classes: &[EquivalenceClass],
    label_grid: &LabelGrid,
    rng: &mut R,
) -> Code {
    let holes: Vec<Hole> = classes
        .iter()
        .map(|class| Hole::in_class(class, rng.gen_range(0..ROTATIONS), label_grid))
        .collect();
    debug!(entries = holes.len(), "generated code");
    Code { holes }
}
