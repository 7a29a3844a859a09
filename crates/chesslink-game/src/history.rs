//! Move history, paired into numbered turns.

use std::fmt;

use chesslink_protocol::{Move, MoveSearch};

use crate::GameError;

/// One ply and its position in `previousMoves`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyEntry {
    pub index: usize,
    pub mv: Move,
}

/// Renders as `old-new`.
impl fmt::Display for PlyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv)
    }
}

/// A numbered turn: the first side's ply and, once played, the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    /// 1-based turn number.
    pub number: usize,
    pub white: PlyEntry,
    pub black: Option<PlyEntry>,
}

/// Renders as `1. 52-36 12-28`.
impl fmt::Display for HistoryTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.white)?;
        if let Some(black) = &self.black {
            write!(f, " {black}")?;
        }
        Ok(())
    }
}

/// Pairs plies `2k` and `2k+1` into turn `k + 1`.
pub fn turns(previous_moves: &[Move]) -> Vec<HistoryTurn> {
    previous_moves
        .chunks(2)
        .enumerate()
        .filter_map(|(k, pair)| {
            let (white, black) = match pair {
                [white, black] => (white, Some(black)),
                [white] => (white, None),
                _ => return None,
            };
            Some(HistoryTurn {
                number: k + 1,
                white: PlyEntry {
                    index: 2 * k,
                    mv: white.clone(),
                },
                black: black.map(|mv| PlyEntry {
                    index: 2 * k + 1,
                    mv: mv.clone(),
                }),
            })
        })
        .collect()
}

/// The query that asks the server to replay the position after `ply`.
///
/// # Errors
/// [`GameError::NoSuchPly`] if `ply` hasn't been played.
pub fn search_query(previous_moves: &[Move], ply: usize) -> Result<MoveSearch, GameError> {
    if ply >= previous_moves.len() {
        return Err(GameError::NoSuchPly {
            ply,
            len: previous_moves.len(),
        });
    }
    let index = u32::try_from(ply).map_err(|_| GameError::PlyOutOfRange(ply))?;
    Ok(MoveSearch::new(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chesslink_protocol::Square;

    fn mv(from: u8, to: u8) -> Move {
        Move::new("Normal", Square::new(from).unwrap(), Square::new(to).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_history_has_no_turns() {
        assert!(turns(&[]).is_empty());
    }

    #[test]
    fn test_plies_pair_into_turns() {
        let plies = vec![mv(52, 36), mv(12, 28), mv(62, 45)];
        let turns = turns(&plies);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].number, 1);
        assert_eq!(turns[0].white.index, 0);
        assert_eq!(turns[0].black.as_ref().map(|p| p.index), Some(1));
        assert_eq!(turns[1].number, 2);
        assert_eq!(turns[1].white.mv, mv(62, 45));
        assert!(turns[1].black.is_none());
    }

    #[test]
    fn test_turn_display() {
        let plies = vec![mv(52, 36), mv(12, 28), mv(62, 45)];
        let rendered: Vec<String> = turns(&plies).iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1. 52-36 12-28", "2. 62-45"]);
    }

    #[test]
    fn test_search_query_carries_ply_index() {
        let plies = vec![mv(52, 36), mv(12, 28)];
        assert_eq!(search_query(&plies, 1).unwrap(), MoveSearch::new(1));
    }

    #[test]
    fn test_search_query_rejects_unplayed_ply() {
        let plies = vec![mv(52, 36)];
        assert!(matches!(
            search_query(&plies, 1),
            Err(GameError::NoSuchPly { ply: 1, len: 1 })
        ));
    }
}
