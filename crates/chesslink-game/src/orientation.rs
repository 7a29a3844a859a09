//! Which way up the board is drawn.

use chesslink_protocol::Square;

/// Board perspective.
///
/// `Canonical` draws index 0 in the top-left corner. `Reversed` rotates
/// the board half a turn, so visual position `p` shows index `63 - p`.
/// The mapping is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Canonical,
    Reversed,
}

impl Orientation {
    /// The canonical square drawn at visual position `visual`.
    pub fn to_canonical(self, visual: Square) -> Square {
        match self {
            Self::Canonical => visual,
            Self::Reversed => visual.mirrored(),
        }
    }

    /// The visual position where canonical square `canonical` is drawn.
    pub fn to_visual(self, canonical: Square) -> Square {
        // Half-turn rotation is an involution.
        self.to_canonical(canonical)
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Canonical => Self::Reversed,
            Self::Reversed => Self::Canonical,
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::Reversed)
    }
}
