//! Board geometry: squares, pieces, and the 64-value board array.
//!
//! The wire format encodes a board as a flat array of 64 signed integers,
//! row-major, index 0 at the top-left of the canonical orientation (Black's
//! back rank). The magnitude picks the piece kind and the sign picks the
//! side. The types here wrap that encoding so the invariants (64 entries,
//! every value in `-6..=6`, every index in `0..64`) hold for every value
//! that exists in memory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A canonical board index in `0..64`.
///
/// Serialized as a plain integer. Deserializing an integer outside the
/// board fails, so a decoded [`Move`](crate::Move) never points off the
/// board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a square from a canonical index.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidSquare`] if `index >= 64`.
    pub fn new(index: u8) -> Result<Self, ProtocolError> {
        if usize::from(index) < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(ProtocolError::InvalidSquare(i64::from(index)))
        }
    }

    /// The canonical index as a `usize`, ready for slice indexing.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Row from the top of the canonical board (0–7).
    pub fn row(self) -> u8 {
        self.0 / 8
    }

    /// Column from the left of the canonical board (0–7).
    pub fn col(self) -> u8 {
        self.0 % 8
    }

    /// The square at the same spot when the board is rotated 180°.
    pub fn mirrored(self) -> Self {
        Self(63 - self.0)
    }

    /// `true` for the darker squares of the checkerboard pattern.
    pub fn is_dark(self) -> bool {
        (self.row() + self.col()) % 2 == 1
    }

    /// Iterates all 64 squares in canonical order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl TryFrom<i64> for Square {
    type Error = ProtocolError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| usize::from(*v) < Self::COUNT)
            .map(Square)
            .ok_or(ProtocolError::InvalidSquare(value))
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

/// Which side a piece belongs to. Positive board values are White.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

/// Piece kind, numbered by the magnitude used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    fn from_magnitude(magnitude: u8) -> Option<Self> {
        match magnitude {
            1 => Some(Self::Pawn),
            2 => Some(Self::Knight),
            3 => Some(Self::Bishop),
            4 => Some(Self::Rook),
            5 => Some(Self::Queen),
            6 => Some(Self::King),
            _ => None,
        }
    }
}

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    /// Decodes a board value. Returns `None` for an empty square (0) and
    /// for anything outside `-6..=6`.
    pub fn from_value(value: i8) -> Option<Self> {
        let kind = PieceKind::from_magnitude(value.unsigned_abs())?;
        let side = if value > 0 { Side::White } else { Side::Black };
        Some(Self { side, kind })
    }

    /// The signed board value for this piece.
    pub fn value(self) -> i8 {
        let magnitude = self.kind as i8;
        match self.side {
            Side::White => magnitude,
            Side::Black => -magnitude,
        }
    }

    /// FEN-style letter: uppercase for White, lowercase for Black.
    pub fn symbol(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 64-square board, exactly as the peer sends it.
///
/// Serialized as a JSON array of 64 integers. Deserialization goes through
/// `TryFrom<Vec<i8>>`, which rejects the wrong length or any value outside
/// `-6..=6`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct Board([i8; 64]);

/// Largest piece magnitude (the king).
const MAX_PIECE: i8 = 6;

#[rustfmt::skip]
const STANDARD: [i8; 64] = [
    -4, -2, -3, -5, -6, -3, -2, -4,
    -1, -1, -1, -1, -1, -1, -1, -1,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     1,  1,  1,  1,  1,  1,  1,  1,
     4,  2,  3,  5,  6,  3,  2,  4,
];

impl Board {
    /// The standard chess starting position.
    pub fn standard() -> Self {
        Self(STANDARD)
    }

    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self([0; 64])
    }

    /// The raw signed value at `square`.
    pub fn get(&self, square: Square) -> i8 {
        self.0[square.index()]
    }

    /// `true` if nothing stands on `square`.
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.get(square) == 0
    }

    /// The piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::from_value(self.get(square))
    }

    /// The raw values in canonical order.
    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<i8>> for Board {
    type Error = ProtocolError;

    fn try_from(values: Vec<i8>) -> Result<Self, Self::Error> {
        let len = values.len();
        let squares: [i8; 64] = values.try_into().map_err(|_| {
            ProtocolError::InvalidBoard(format!("expected 64 squares, got {len}"))
        })?;
        if let Some((index, value)) = squares
            .iter()
            .enumerate()
            .find(|(_, v)| !(-MAX_PIECE..=MAX_PIECE).contains(*v))
        {
            return Err(ProtocolError::InvalidBoard(format!(
                "value {value} at square {index} is not a piece"
            )));
        }
        Ok(Self(squares))
    }
}

impl From<Board> for Vec<i8> {
    fn from(board: Board) -> Self {
        board.0.to_vec()
    }
}

/// Prints the board as eight rows of FEN letters, `.` for empty squares.
impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board [")?;
        for row in self.0.chunks(8) {
            let line: String = row
                .iter()
                .map(|v| Piece::from_value(*v).map_or('.', Piece::symbol))
                .collect();
            writeln!(f, "  {line}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    // =====================================================================
    // Square
    // =====================================================================

    #[test]
    fn test_square_new_rejects_off_board_index() {
        assert!(Square::new(63).is_ok());
        assert!(matches!(
            Square::new(64),
            Err(ProtocolError::InvalidSquare(64))
        ));
    }

    #[test]
    fn test_square_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&sq(52)).unwrap(), "52");
    }

    #[test]
    fn test_square_deserialize_rejects_negative_and_large() {
        assert!(serde_json::from_str::<Square>("-1").is_err());
        assert!(serde_json::from_str::<Square>("64").is_err());
        assert_eq!(serde_json::from_str::<Square>("0").unwrap(), sq(0));
    }

    #[test]
    fn test_square_row_col() {
        assert_eq!(sq(52).row(), 6);
        assert_eq!(sq(52).col(), 4);
    }

    #[test]
    fn test_square_mirrored_is_involution() {
        for square in Square::all() {
            assert_eq!(square.mirrored().mirrored(), square);
        }
        assert_eq!(sq(0).mirrored(), sq(63));
    }

    #[test]
    fn test_square_is_dark_matches_checkerboard() {
        assert!(!sq(0).is_dark());
        assert!(sq(1).is_dark());
        assert!(sq(8).is_dark());
        assert!(!sq(9).is_dark());
    }

    // =====================================================================
    // Piece
    // =====================================================================

    #[test]
    fn test_piece_from_value_decodes_sign_and_kind() {
        let p = Piece::from_value(-6).unwrap();
        assert_eq!(p.side, Side::Black);
        assert_eq!(p.kind, PieceKind::King);
        assert_eq!(p.value(), -6);
        assert!(Piece::from_value(0).is_none());
        assert!(Piece::from_value(7).is_none());
    }

    #[test]
    fn test_piece_symbol_case_follows_side() {
        assert_eq!(Piece::from_value(4).unwrap().symbol(), 'R');
        assert_eq!(Piece::from_value(-2).unwrap().symbol(), 'n');
    }

    // =====================================================================
    // Board
    // =====================================================================

    #[test]
    fn test_board_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.as_slice().len(), 64);
        assert_eq!(board.get(sq(4)), -6);
        assert_eq!(board.get(sq(60)), 6);
        assert!(board.is_empty_at(sq(36)));
        assert_eq!(board.piece_at(sq(52)).unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn test_board_rejects_wrong_length() {
        let result = Board::try_from(vec![0i8; 63]);
        assert!(matches!(result, Err(ProtocolError::InvalidBoard(_))));
    }

    #[test]
    fn test_board_rejects_value_out_of_range() {
        let mut values = vec![0i8; 64];
        values[10] = 7;
        assert!(Board::try_from(values).is_err());
    }

    #[test]
    fn test_board_json_is_flat_array() {
        let json = serde_json::to_value(Board::standard()).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 64);
        assert_eq!(arr[0], -4);
    }

    #[test]
    fn test_board_decode_rejects_short_array() {
        let result: Result<Board, _> = serde_json::from_str("[1, 2, 3]");
        assert!(result.is_err());
    }
}
