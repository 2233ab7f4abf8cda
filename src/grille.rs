//! GrilleBuilder: the rotationally-symmetric label grid.
//!
//! A grille of dimension `d` is split into four `d/2 × d/2` quadrants.
//! Each quadrant is numbered `1..=(d/2)²` by its own traversal, and the
//! four traversals are 90° rotations of one another. The result is that
//! the four cells mapped onto each other by rotating the grid about its
//! center always carry the same label, and each label names exactly one
//! such group of four (an equivalence class).
//!
//! ```text
//!  d = 4          rotation orbit of (0,1):
//!  1 2 3 1        (0,1) → (1,3) → (3,2) → (2,0)
//!  3 4 4 2          2       2       2       2
//!  2 4 4 3
//!  1 3 2 1
//! ```

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::dimension::Dimension;

/// Number of rotation slots (0°, 90°, 180°, 270°) in a class.
pub const ROTATIONS: usize = 4;

/// A `(row, col)` position in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl Cell {
    /// Creates the cell at `(row, col)`.
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Rotates the cell 90° clockwise about the center of a `d × d` grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::{Cell, Dimension};
    ///
    /// let d = Dimension::new(4).unwrap();
    /// assert_eq!(Cell::new(0, 1).rotate(d), Cell::new(1, 3));
    /// ```
    pub fn rotate(self, dimension: Dimension) -> Self {
        Cell {
            row: self.col,
            col: dimension.get() - 1 - self.row,
        }
    }

    /// Returns the quadrant holding this cell.
    pub fn quadrant(self, dimension: Dimension) -> Quadrant {
        let half = dimension.half();
        match (self.row < half, self.col < half) {
            (true, true) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, false) => Quadrant::BottomRight,
            (false, true) => Quadrant::BottomLeft,
        }
    }
}

/// One quarter of the grid, split at `d/2`.
///
/// Variants are listed in clockwise order, which is also rotation-slot
/// order: rotating a top-left cell once lands in the top-right quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Quadrant {
    /// All four quadrants in clockwise order, starting top-left.
    pub const ALL: [Quadrant; ROTATIONS] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
        Quadrant::BottomLeft,
    ];

    /// Iterates the quadrant's cells in row-major order.
    fn cells(self, dimension: Dimension) -> impl Iterator<Item = Cell> {
        let half = dimension.half();
        let (row0, col0) = match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half),
            Quadrant::BottomRight => (half, half),
            Quadrant::BottomLeft => (half, 0),
        };
        (row0..row0 + half)
            .flat_map(move |row| (col0..col0 + half).map(move |col| Cell { row, col }))
    }
}

/// Direction of one loop in a quadrant traversal.
#[derive(Debug, Clone, Copy)]
enum Sweep {
    /// `0, 1, .., d/2 - 1`
    Rising,
    /// `d - 1, d - 2, .., d/2`
    Falling,
}

impl Sweep {
    fn indices(self, dimension: Dimension) -> Vec<usize> {
        let (half, side) = (dimension.half(), dimension.get());
        match self {
            Sweep::Rising => (0..half).collect(),
            Sweep::Falling => (half..side).rev().collect(),
        }
    }
}

/// One numbering pass: outer loop, inner loop, and whether the
/// `(outer, inner)` pair is written transposed as `(inner, outer)`.
struct Traversal {
    outer: Sweep,
    inner: Sweep,
    transposed: bool,
}

/// The four numbering passes. Pass `k` is pass 0 rotated by `k × 90°`
/// (counter-clockwise), so rotationally-corresponding cells receive the
/// same sequence number.
const TRAVERSALS: [Traversal; ROTATIONS] = [
    // top-left, row-major
    Traversal {
        outer: Sweep::Rising,
        inner: Sweep::Rising,
        transposed: false,
    },
    // bottom-left, column-major from the bottom edge up
    Traversal {
        outer: Sweep::Rising,
        inner: Sweep::Falling,
        transposed: true,
    },
    // bottom-right, from the bottom-right corner back
    Traversal {
        outer: Sweep::Falling,
        inner: Sweep::Falling,
        transposed: false,
    },
    // top-right, column-major from the right edge in
    Traversal {
        outer: Sweep::Falling,
        inner: Sweep::Rising,
        transposed: true,
    },
];

/// A `d × d` grid of class labels in `1..=(d/2)²`.
///
/// Within each quadrant every label occurs exactly once, and the four
/// rotation images of any cell share its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    dimension: Dimension,
    labels: Vec<u32>,
}

impl LabelGrid {
    /// Numbers a fresh grid with the four quadrant traversals.
    pub fn new(dimension: Dimension) -> Self {
        let side = dimension.get();
        let mut labels = vec![0u32; dimension.num_cells()];

        for traversal in &TRAVERSALS {
            let mut number = 1u32;
            let inner = traversal.inner.indices(dimension);
            for i in traversal.outer.indices(dimension) {
                for &j in &inner {
                    let (row, col) = if traversal.transposed { (j, i) } else { (i, j) };
                    labels[row * side + col] = number;
                    number += 1;
                }
            }
        }

        LabelGrid { dimension, labels }
    }

    /// Returns the grid dimension.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns the label at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        let side = self.dimension.get();
        if row >= side || col >= side {
            return None;
        }
        Some(self.labels[row * side + col])
    }

    /// Returns the label at `cell`, or `None` outside the grid.
    pub fn label_at(&self, cell: Cell) -> Option<u32> {
        self.get(cell.row, cell.col)
    }

    /// Iterates `(cell, label)` pairs in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        let side = self.dimension.get();
        self.labels
            .iter()
            .enumerate()
            .map(move |(idx, &label)| (Cell::new(idx / side, idx % side), label))
    }

    /// Returns the labels of one row, or `None` outside the grid.
    pub fn row(&self, row: usize) -> Option<&[u32]> {
        let side = self.dimension.get();
        if row >= side {
            return None;
        }
        Some(&self.labels[row * side..(row + 1) * side])
    }

    /// Collects a quadrant's labels in row-major order.
    pub fn quadrant_labels(&self, quadrant: Quadrant) -> Vec<u32> {
        quadrant
            .cells(self.dimension)
            .filter_map(|cell| self.label_at(cell))
            .collect()
    }
}

impl fmt::Display for LabelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.dimension.num_classes().to_string().len();
        for row in 0..self.dimension.get() {
            let Some(labels) = self.row(row) else { break };
            for (col, label) in labels.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:>width$}", label, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The four cells that rotate onto one another, and their shared label.
///
/// `cells()[k]` is the representative cell rotated `k × 90°` clockwise,
/// so slot 0 lies in the top-left quadrant, slot 1 top-right, slot 2
/// bottom-right and slot 3 bottom-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    label: u32,
    cells: [Cell; ROTATIONS],
}

impl EquivalenceClass {
    fn from_representative(representative: Cell, label: u32, dimension: Dimension) -> Self {
        let mut cells = [representative; ROTATIONS];
        let mut current = representative;
        for cell in cells.iter_mut().skip(1) {
            current = current.rotate(dimension);
            *cell = current;
        }
        EquivalenceClass { label, cells }
    }

    /// Label carried by the class's top-left representative.
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Member cells in rotation-slot order.
    pub fn cells(&self) -> &[Cell; ROTATIONS] {
        &self.cells
    }

    /// Member cell at `slot` (taken modulo 4).
    pub fn cell(&self, slot: usize) -> Cell {
        self.cells[slot % ROTATIONS]
    }

    /// Labels found at the member cells, in slot order.
    pub fn member_labels(&self, label_grid: &LabelGrid) -> Vec<u32> {
        self.cells
            .iter()
            .filter_map(|&cell| label_grid.label_at(cell))
            .collect()
    }
}

/// Derives the equivalence classes of a label grid.
///
/// Walks the top-left quadrant in row-major order and emits the rotation
/// orbit of each cell, skipping any whose label was already emitted.
/// The result holds `(d/2)²` classes partitioning all `d²` cells.
pub fn derive_classes(label_grid: &LabelGrid) -> Vec<EquivalenceClass> {
    let dimension = label_grid.dimension();
    let mut seen = BTreeSet::new();
    let mut classes = Vec::with_capacity(dimension.num_classes());

    for cell in Quadrant::TopLeft.cells(dimension) {
        let Some(label) = label_grid.label_at(cell) else {
            continue;
        };
        if !seen.insert(label) {
            continue;
        }
        classes.push(EquivalenceClass::from_representative(cell, label, dimension));
    }
    classes
}

/// Builds the label grid for `dimension` together with its classes.
///
/// # Examples
///
/// ```
/// use cardano_grille::{build_grille, Dimension};
///
/// let (grid, classes) = build_grille(Dimension::new(4).unwrap());
/// assert_eq!(grid.row(0).unwrap(), &[1, 2, 3, 1]);
/// assert_eq!(classes.len(), 4);
/// ```
pub fn build_grille(dimension: Dimension) -> (LabelGrid, Vec<EquivalenceClass>) {
    let label_grid = LabelGrid::new(dimension);
    let classes = derive_classes(&label_grid);
    debug!(%dimension, classes = classes.len(), "built grille");
    (label_grid, classes)
}
