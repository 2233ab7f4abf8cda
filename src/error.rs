//! Error types for the Cardano grille library.

use thiserror::Error;

/// Errors produced by the Cardano grille library.
///
/// The five core operations (planning, building, key generation, encoding
/// and decoding) never fail. These variants cover the edges where values
/// enter the engine from outside: hand-built dimensions, operator-entered
/// label text, operator cell edits and generator seeding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrilleError {
    /// Grid dimension is odd or smaller than 4.
    #[error("Dimension {0} is invalid: grids must be even and at least 4")]
    InvalidDimension(usize),
    /// Operator key text contains a token that is neither a label nor a
    /// `label:slot` pair.
    #[error("Label token '{token}' at position {position} is not a label or label:slot pair")]
    InvalidLabel {
        /// The offending token, verbatim.
        token: String,
        /// Zero-based index of the token in the input.
        position: usize,
    },
    /// Filler alphabet has no characters.
    #[error("Filler alphabet must contain at least one character")]
    EmptyAlphabet,
    /// Cell coordinates fall outside the grid.
    #[error("Cell ({row}, {col}) is outside a {dimension}x{dimension} grid")]
    CellOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid dimension.
        dimension: usize,
    },
    /// Passphrase length is less than 1 character.
    #[error("Passphrase must be at least 1 character long")]
    PassphraseTooShort,
}
