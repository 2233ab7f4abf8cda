//! CipherEngine: writing a message into a grille and reading it back.
//!
//! Both directions scan the grid in the same row-major order (row outer,
//! column inner, both ascending). Encoding places the next message
//! character in each active cell and random filler everywhere else;
//! decoding concatenates whatever the active cells currently hold.
//!
//! [`CardanoCipher`] carries the engine's settings; [`Sealed`] bundles a
//! finished encryption with everything needed to open it again.

use std::fmt;

use rand::Rng;
use tracing::{debug, warn};

use crate::code::{generate_code, CellSelector, Code, LabelSet};
use crate::dimension::{CapacityPolicy, Dimension};
use crate::error::GrilleError;
use crate::grille::{build_grille, Cell, EquivalenceClass, LabelGrid};

/// Default filler alphabet: Latin and Cyrillic letters in both cases, and space.
pub const DEFAULT_ALPHABET: &str = "qwertyuiopasdfghjklzxcvbnm\
    йцукенгшщзхъфывапролджэячсмитьбю \
    ЙЦУКЕНГШЩЗХЪЭЖДЛОРПАВЫФЯЧСМИТЬБЮ\
    QWERTYUIOPLKJHGFDSAZXCVBNM";

/// Rule deciding which cells carry message characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Only the code's holes are active: exactly one cell per class.
    #[default]
    Hole,
    /// Every cell whose label appears in the code is active. Since the
    /// four rotation images of a class share one label, this activates
    /// whole classes at a time.
    Label,
}

/// A `d × d` grid of characters, as produced by encoding.
///
/// Cells can be overwritten after encoding; decoding reads whatever is
/// stored at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterGrid {
    dimension: Dimension,
    cells: Vec<char>,
}

impl CharacterGrid {
    /// Creates a grid with every cell set to `fill`.
    pub fn filled(dimension: Dimension, fill: char) -> Self {
        CharacterGrid {
            dimension,
            cells: vec![fill; dimension.num_cells()],
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns the character at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Overwrites the character at `(row, col)` and returns the old one.
    ///
    /// # Errors
    /// Returns [`GrilleError::CellOutOfBounds`] if the cell is outside
    /// the grid; the grid is left untouched.
    pub fn set(&mut self, row: usize, col: usize, ch: char) -> Result<char, GrilleError> {
        let idx = self.index(row, col).ok_or(GrilleError::CellOutOfBounds {
            row,
            col,
            dimension: self.dimension.get(),
        })?;
        Ok(std::mem::replace(&mut self.cells[idx], ch))
    }

    /// Returns the characters of one row, or `None` outside the grid.
    pub fn row(&self, row: usize) -> Option<&[char]> {
        let side = self.dimension.get();
        if row >= side {
            return None;
        }
        Some(&self.cells[row * side..(row + 1) * side])
    }

    /// Iterates `(cell, char)` pairs in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, char)> + '_ {
        let side = self.dimension.get();
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &ch)| (Cell::new(idx / side, idx % side), ch))
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        let side = self.dimension.get();
        (row < side && col < side).then_some(row * side + col)
    }
}

impl fmt::Display for CharacterGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dimension.get()) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Configured rotating-grille cipher engine.
///
/// # Examples
///
/// ```
/// use cardano_grille::CardanoCipher;
///
/// let cipher = CardanoCipher::new();
/// let sealed = cipher.seal("MEET AT DAWN", &mut rand::thread_rng());
/// assert!(sealed.open().starts_with("MEET AT DAWN"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardanoCipher {
    alphabet: Vec<char>,
    activation: Activation,
    capacity: CapacityPolicy,
}

impl Default for CardanoCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl CardanoCipher {
    /// Creates an engine with the default alphabet, [`Activation::Hole`]
    /// and [`CapacityPolicy::Exact`].
    pub fn new() -> Self {
        CardanoCipher {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            activation: Activation::default(),
            capacity: CapacityPolicy::default(),
        }
    }

    /// Creates an engine drawing filler from `alphabet`.
    ///
    /// # Errors
    /// Returns [`GrilleError::EmptyAlphabet`] if `alphabet` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::CardanoCipher;
    ///
    /// assert!(CardanoCipher::with_alphabet("ABC").is_ok());
    /// assert!(CardanoCipher::with_alphabet("").is_err());
    /// ```
    pub fn with_alphabet(alphabet: &str) -> Result<Self, GrilleError> {
        if alphabet.is_empty() {
            return Err(GrilleError::EmptyAlphabet);
        }
        Ok(CardanoCipher {
            alphabet: alphabet.chars().collect(),
            ..Self::new()
        })
    }

    /// Sets the activation rule.
    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Sets the capacity policy used by [`plan_dimension`](Self::plan_dimension).
    pub fn capacity_policy(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity = capacity;
        self
    }

    /// The filler alphabet.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Picks a dimension for a message of `message_length` characters.
    pub fn plan_dimension(&self, message_length: usize) -> Dimension {
        self.capacity.plan(message_length)
    }

    /// Marks each cell, in row-major order, as active (`true`) or not.
    pub fn active_mask(&self, label_grid: &LabelGrid, code: &Code) -> Vec<bool> {
        active_mask(self.activation, label_grid, code)
    }

    /// Writes `message` into a fresh character grid.
    ///
    /// Active cells take message characters in order until the message
    /// runs out; all other cells, and active cells after that point, get
    /// filler. Characters that find no active cell are dropped.
    pub fn encode<R: Rng + ?Sized>(
        &self,
        message: &str,
        label_grid: &LabelGrid,
        code: &Code,
        rng: &mut R,
    ) -> CharacterGrid {
        let mask = self.active_mask(label_grid, code);
        let active = mask.iter().filter(|&&on| on).count();
        let mut remaining = message.chars();
        let mut placed = 0usize;

        let cells: Vec<char> = mask
            .iter()
            .map(|&on| match on.then(|| remaining.next()).flatten() {
                Some(ch) => {
                    placed += 1;
                    ch
                }
                None => self.filler(rng),
            })
            .collect();

        let dropped = remaining.count();
        if dropped > 0 {
            warn!(placed, dropped, active, "message longer than active cells, excess dropped");
        }
        debug!(dimension = %label_grid.dimension(), active, placed, "encoded message");

        CharacterGrid {
            dimension: label_grid.dimension(),
            cells,
        }
    }

    /// Reads the message back using the same activation rule as
    /// [`encode`](Self::encode).
    ///
    /// Cells are addressed by `(row, col)`; if the grids differ in size,
    /// active cells missing from `characters` are skipped.
    pub fn decode_with_code(
        &self,
        characters: &CharacterGrid,
        label_grid: &LabelGrid,
        code: &Code,
    ) -> String {
        read_with_code(self.activation, characters, label_grid, code)
    }

    /// Produces a grid holding nothing but filler.
    pub fn filler_grid<R: Rng + ?Sized>(&self, dimension: Dimension, rng: &mut R) -> CharacterGrid {
        CharacterGrid {
            dimension,
            cells: (0..dimension.num_cells()).map(|_| self.filler(rng)).collect(),
        }
    }

    /// Runs the whole pipeline: plan, build, generate the code, encode.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardano_grille::CardanoCipher;
    /// use cardano_grille::random::MersenneTwister64;
    ///
    /// let cipher = CardanoCipher::new();
    /// let mut rng = MersenneTwister64::from_passphrase("open sesame").unwrap();
    /// let sealed = cipher.seal("ATTACK", &mut rng);
    ///
    /// assert_eq!(sealed.dimension().get(), 6);
    /// assert!(sealed.open().starts_with("ATTACK"));
    ///
    /// let key = sealed.code().to_string();
    /// let revealed = sealed.reveal(&key).unwrap();
    /// assert!(revealed.starts_with("ATTACK"));
    /// assert_eq!(revealed, sealed.open());
    /// ```
    pub fn seal<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Sealed {
        let dimension = self.plan_dimension(message.chars().count());
        let (label_grid, classes) = build_grille(dimension);
        let code = generate_code(&classes, &label_grid, rng);
        let characters = self.encode(message, &label_grid, &code, rng);
        Sealed {
            label_grid,
            classes,
            code,
            characters,
            activation: self.activation,
        }
    }

    fn filler<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.alphabet[rng.gen_range(0..self.alphabet.len())]
    }
}

/// Writes `message` through the holes of `code` with a default engine.
///
/// [`decode`] given the same grid and code reads the message back.
pub fn encode<R: Rng + ?Sized>(
    message: &str,
    label_grid: &LabelGrid,
    code: &Code,
    rng: &mut R,
) -> CharacterGrid {
    CardanoCipher::new().encode(message, label_grid, code, rng)
}

/// Reads every cell chosen by `selector`, in row-major order.
///
/// With a [`Code`] only its holes are read, which inverts [`encode`].
/// With a [`LabelSet`] every cell whose label is in the set is read.
/// The selector need not be the key the grid was encoded with; an empty
/// one yields an empty string.
///
/// # Examples
///
/// ```
/// use cardano_grille::random::MersenneTwister64;
/// use cardano_grille::{build_grille, decode, encode, generate_code, Dimension, LabelSet};
///
/// let (grid, classes) = build_grille(Dimension::new(4).unwrap());
/// let mut rng = MersenneTwister64::with_seed(1);
/// let code = generate_code(&classes, &grid, &mut rng);
/// let chars = encode("ABCD", &grid, &code, &mut rng);
/// assert_eq!(decode(&chars, &grid, &code), "ABCD");
///
/// let labels: LabelSet = "1".parse().unwrap();
/// assert_eq!(decode(&chars, &grid, &labels).chars().count(), 4);
/// ```
pub fn decode<S: CellSelector + ?Sized>(
    characters: &CharacterGrid,
    label_grid: &LabelGrid,
    selector: &S,
) -> String {
    let text = read_cells(characters, label_grid, selector);
    debug!(read = text.chars().count(), "decoded grid");
    text
}

/// Runs `f` with the selector that `activation` derives from `code`.
fn with_selector<T>(
    activation: Activation,
    code: &Code,
    f: impl FnOnce(&dyn CellSelector) -> T,
) -> T {
    match activation {
        Activation::Hole => f(code),
        Activation::Label => f(&code.labels()),
    }
}

fn active_mask(activation: Activation, label_grid: &LabelGrid, code: &Code) -> Vec<bool> {
    with_selector(activation, code, |selector| {
        label_grid
            .iter()
            .map(|(cell, label)| selector.selects(cell, label))
            .collect()
    })
}

fn read_with_code(
    activation: Activation,
    characters: &CharacterGrid,
    label_grid: &LabelGrid,
    code: &Code,
) -> String {
    with_selector(activation, code, |selector| {
        read_cells(characters, label_grid, selector)
    })
}

/// Walks the label grid and reads each selected cell by position.
fn read_cells<S: CellSelector + ?Sized>(
    characters: &CharacterGrid,
    label_grid: &LabelGrid,
    selector: &S,
) -> String {
    check_dimensions(characters, label_grid);
    label_grid
        .iter()
        .filter(|&(cell, label)| selector.selects(cell, label))
        .filter_map(|(cell, _)| characters.get(cell.row, cell.col))
        .collect()
}

fn check_dimensions(characters: &CharacterGrid, label_grid: &LabelGrid) {
    if characters.dimension() != label_grid.dimension() {
        warn!(
            characters = %characters.dimension(),
            labels = %label_grid.dimension(),
            "character grid and label grid differ in size"
        );
    }
}

/// A sealed message: the grids and key of one encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    label_grid: LabelGrid,
    classes: Vec<EquivalenceClass>,
    code: Code,
    characters: CharacterGrid,
    activation: Activation,
}

impl Sealed {
    pub fn dimension(&self) -> Dimension {
        self.label_grid.dimension()
    }

    pub fn label_grid(&self) -> &LabelGrid {
        &self.label_grid
    }

    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    /// The secret key. Its `Display` form is what [`reveal`](Self::reveal)
    /// accepts.
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn characters(&self) -> &CharacterGrid {
        &self.characters
    }

    /// Overwrites one character cell, as an operator edit.
    ///
    /// # Errors
    /// Returns [`GrilleError::CellOutOfBounds`] outside the grid.
    pub fn edit(&mut self, row: usize, col: usize, ch: char) -> Result<char, GrilleError> {
        self.characters.set(row, col, ch)
    }

    /// Cells active under the stored code, in row-major order.
    pub fn active_cells(&self) -> Vec<Cell> {
        self.label_grid
            .iter()
            .zip(active_mask(self.activation, &self.label_grid, &self.code))
            .filter_map(|((cell, _), on)| on.then_some(cell))
            .collect()
    }

    /// Decodes with the stored code.
    pub fn open(&self) -> String {
        read_with_code(self.activation, &self.characters, &self.label_grid, &self.code)
    }

    /// Decodes with an operator-supplied label set (literal membership).
    pub fn open_with(&self, labels: &LabelSet) -> String {
        decode(&self.characters, &self.label_grid, labels)
    }

    /// Parses an operator key and decodes with it under the sealed
    /// activation rule.
    ///
    /// The key uses the [`Code`] text form: `label:slot` tokens name single
    /// holes and bare labels name whole classes (see [`Code::parse`]).
    ///
    /// # Errors
    /// Returns [`GrilleError::InvalidLabel`] for the first malformed
    /// token; nothing is decoded.
    pub fn reveal(&self, key: &str) -> Result<String, GrilleError> {
        let code = Code::parse(key, &self.classes, &self.label_grid)?;
        Ok(read_with_code(self.activation, &self.characters, &self.label_grid, &code))
    }
}
