//! Regression tests for the public API.
//!
//! Label grid layouts are frozen snapshots: any change in output means the
//! quadrant traversals changed and previously issued codes no longer line
//! up with their grids.
//!
//! Coverage:
//! - `plan_dimension` / `CapacityPolicy`
//! - `build_grille` / `LabelGrid` / `EquivalenceClass`
//! - `generate_code` / `Code` / `LabelSet`
//! - `CardanoCipher` encode, decode and `Sealed`
//! - `random::MersenneTwister64`
//! - `error::GrilleError`

use cardano_grille::error::GrilleError;
use cardano_grille::random::MersenneTwister64;
use cardano_grille::{
    build_grille, decode, encode, generate_code, plan_dimension, Activation, CapacityPolicy,
    CardanoCipher, CharacterGrid, Code, Dimension, Hole, LabelSet,
};

fn dim(side: usize) -> Dimension {
    Dimension::new(side).unwrap()
}

fn rows(side: usize) -> Vec<Vec<u32>> {
    let (grid, _) = build_grille(dim(side));
    (0..side).map(|r| grid.row(r).unwrap().to_vec()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Label grid snapshots
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn label_grid_4x4_frozen() {
    assert_eq!(
        rows(4),
        vec![
            vec![1, 2, 3, 1],
            vec![3, 4, 4, 2],
            vec![2, 4, 4, 3],
            vec![1, 3, 2, 1],
        ]
    );
}

#[test]
fn label_grid_6x6_frozen() {
    assert_eq!(
        rows(6),
        vec![
            vec![1, 2, 3, 7, 4, 1],
            vec![4, 5, 6, 8, 5, 2],
            vec![7, 8, 9, 9, 6, 3],
            vec![3, 6, 9, 9, 8, 7],
            vec![2, 5, 8, 6, 5, 4],
            vec![1, 4, 7, 3, 2, 1],
        ]
    );
}

#[test]
fn label_grid_display_6x6() {
    let (grid, _) = build_grille(dim(6));
    let text = grid.to_string();
    assert_eq!(text.lines().next(), Some("1 2 3 7 4 1"));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn classes_6x6_frozen_cells() {
    let (_, classes) = build_grille(dim(6));
    let first = &classes[0];
    assert_eq!(first.label(), 1);
    let cells: Vec<(usize, usize)> = first.cells().iter().map(|c| (c.row, c.col)).collect();
    assert_eq!(cells, vec![(0, 0), (0, 5), (5, 5), (5, 0)]);

    let centre = &classes[8];
    assert_eq!(centre.label(), 9);
    let cells: Vec<(usize, usize)> = centre.cells().iter().map(|c| (c.row, c.col)).collect();
    assert_eq!(cells, vec![(2, 2), (2, 3), (3, 3), (3, 2)]);
}

// ═══════════════════════════════════════════════════════════════════════
// Dimension planning
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn plan_dimension_empty_message_is_minimum() {
    assert_eq!(plan_dimension(0).get(), 4);
}

#[test]
fn plan_dimension_twenty_characters() {
    assert_eq!(plan_dimension(20).get(), 10);
    assert_eq!(CapacityPolicy::Stepped.plan(20).get(), 10);
}

#[test]
fn cipher_uses_configured_capacity_policy() {
    let cipher = CardanoCipher::new().capacity_policy(CapacityPolicy::Stepped);
    assert_eq!(cipher.plan_dimension(0).get(), 6);
    assert_eq!(CardanoCipher::new().plan_dimension(0).get(), 4);
}

// ═══════════════════════════════════════════════════════════════════════
// Encode / decode scenarios
// ═══════════════════════════════════════════════════════════════════════

/// Two classes of a 4x4 grille, message "AB": the letters land on the
/// first two holes met in row-major order and come back out unchanged.
#[test]
fn two_class_code_places_ab_in_scan_order() {
    let (grid, classes) = build_grille(dim(4));
    // class 3 slot 2 is (2,2); class 2 slot 1 is (0,2)
    let code = Code::from_holes(vec![
        Hole::in_class(&classes[3], 2, &grid),
        Hole::in_class(&classes[2], 1, &grid),
    ]);
    let cipher = CardanoCipher::new();
    let chars = cipher.encode("AB", &grid, &code, &mut MersenneTwister64::with_seed(6));

    assert_eq!(chars.get(0, 2), Some('A'));
    assert_eq!(chars.get(2, 2), Some('B'));
    assert_eq!(cipher.decode_with_code(&chars, &grid, &code), "AB");
}

#[test]
fn operator_labels_decode_whole_classes() {
    let (grid, classes) = build_grille(dim(4));
    let code = Code::from_holes(vec![Hole::in_class(&classes[1], 0, &grid)]);
    let cipher = CardanoCipher::new().activation(Activation::Label);
    let chars = cipher.encode("abcd", &grid, &code, &mut MersenneTwister64::with_seed(1));

    let labels: LabelSet = code.labels().to_string().parse().unwrap();
    assert_eq!(decode(&chars, &grid, &labels), "abcd");
}

#[test]
fn free_encode_then_decode_with_same_code() {
    let (grid, classes) = build_grille(dim(4));
    let mut rng = MersenneTwister64::with_seed(1);
    let code = generate_code(&classes, &grid, &mut rng);
    let chars = encode("ABCD", &grid, &code, &mut rng);
    assert_eq!(decode(&chars, &grid, &code), "ABCD");
}

#[test]
fn sealed_reveal_accepts_displayed_code() {
    let sealed = CardanoCipher::new().seal("HELLO", &mut MersenneTwister64::with_seed(3));
    let key = sealed.code().to_string();
    let revealed = sealed.reveal(&key).unwrap();
    assert!(revealed.starts_with("HELLO"), "revealed {:?}", revealed);
    assert_eq!(revealed.chars().count(), 9);
}

#[test]
fn seal_with_same_passphrase_is_identical() {
    let cipher = CardanoCipher::new();
    let a = cipher.seal(
        "the quick brown fox",
        &mut MersenneTwister64::from_passphrase("correct horse").unwrap(),
    );
    let b = cipher.seal(
        "the quick brown fox",
        &mut MersenneTwister64::from_passphrase("correct horse").unwrap(),
    );
    assert_eq!(a, b);
    assert!(a.open().starts_with("the quick brown fox"));
}

#[test]
fn seal_with_other_passphrase_differs() {
    let cipher = CardanoCipher::new();
    let a = cipher.seal("MESSAGE", &mut MersenneTwister64::from_passphrase("one").unwrap());
    let b = cipher.seal("MESSAGE", &mut MersenneTwister64::from_passphrase("two").unwrap());
    assert_eq!(a.label_grid(), b.label_grid());
    assert_ne!(a.characters(), b.characters());
}

#[test]
fn sealed_edit_changes_open() {
    let cipher = CardanoCipher::new();
    let mut sealed = cipher.seal("ABCD", &mut MersenneTwister64::with_seed(77));
    assert_eq!(sealed.open(), "ABCD");

    let first = sealed.active_cells()[0];
    assert_eq!(sealed.edit(first.row, first.col, 'Z'), Ok('A'));
    assert_eq!(sealed.open(), "ZBCD");

    assert!(matches!(
        sealed.edit(4, 0, 'x'),
        Err(GrilleError::CellOutOfBounds { dimension: 4, .. })
    ));
}

#[test]
fn sealed_reveal_reports_bad_token() {
    let sealed = CardanoCipher::new().seal("HI", &mut MersenneTwister64::with_seed(5));
    assert_eq!(
        sealed.reveal("2 3 x").unwrap_err(),
        GrilleError::InvalidLabel {
            token: "x".to_string(),
            position: 2,
        }
    );
    assert_eq!(
        sealed.reveal("1:0 2:9").unwrap_err(),
        GrilleError::InvalidLabel {
            token: "2:9".to_string(),
            position: 1,
        }
    );
    assert_eq!(sealed.reveal("").unwrap(), "");
}

#[test]
fn generated_code_has_one_entry_per_class() {
    let (grid, classes) = build_grille(dim(12));
    let code = generate_code(&classes, &grid, &mut rand::thread_rng());
    assert_eq!(code.len(), 36);
    let key = code.to_string();
    assert_eq!(key.split(' ').count(), 36);
    assert!(key.split(' ').all(|token| token.contains(':')));
}

#[test]
fn filler_only_grid_decodes_to_alphabet() {
    let cipher = CardanoCipher::new();
    let (grid, _) = build_grille(dim(8));
    let chars = cipher.filler_grid(grid.dimension(), &mut MersenneTwister64::with_seed(3));
    let labels: LabelSet = "1 5 9 16".parse().unwrap();
    let text = decode(&chars, &grid, &labels);
    assert_eq!(text.chars().count(), 16);
    assert!(text.chars().all(|ch| cipher.alphabet().contains(&ch)));
}

#[test]
fn decode_tolerates_mismatched_grids() {
    let (grid, _) = build_grille(dim(6));
    let chars = CharacterGrid::filled(dim(4), 'q');
    let labels: LabelSet = "1".parse().unwrap();
    // of the 6x6 label-1 cells only (0,0) falls inside a 4x4 grid
    let text = decode(&chars, &grid, &labels);
    assert_eq!(text, "q");
}

#[test]
fn decode_with_code_reads_cells_by_position() {
    let (grid, classes) = build_grille(dim(6));
    let code = Code::from_holes(vec![Hole::in_class(&classes[0], 1, &grid)]);
    let mut chars = CharacterGrid::filled(dim(4), '.');
    chars.set(1, 1, 'X').unwrap();
    // the only hole is (0,5), outside the 4x4 grid
    assert_eq!(CardanoCipher::new().decode_with_code(&chars, &grid, &code), "");
}

// ═══════════════════════════════════════════════════════════════════════
// Error surface
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn errors_render_messages() {
    assert_eq!(
        Dimension::new(3).unwrap_err().to_string(),
        "Dimension 3 is invalid: grids must be even and at least 4"
    );
    assert_eq!(
        CardanoCipher::with_alphabet("").unwrap_err(),
        GrilleError::EmptyAlphabet
    );
    assert_eq!(
        MersenneTwister64::from_passphrase("").unwrap_err(),
        GrilleError::PassphraseTooShort
    );
}
