use crate::board::Board;
use crate::types::{Color, PieceKind, Position};

/// Index into the board's piece arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceId(pub(crate) usize);

/// One arena entry. The piece stores its own position; the grid stores the
/// occupant id. `Board` keeps the two in agreement on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: PieceKind,
    pub pos: Position,
}

impl Piece {
    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Shared legality base for both variants: the target must be a dark
    /// square, empty, and diagonal to the piece's square.
    fn base_move_allowed(&self, board: &Board, target: Position) -> bool {
        target.in_bounds()
            && target.is_dark()
            && target != self.pos
            && board.square(target).is_empty()
            && self.pos.same_diagonal(target)
    }

    /// `true` iff moving to `target` is legal for this piece in isolation.
    /// The board-wide forced-capture rule is layered on top by
    /// `Board::legal_targets_for`.
    pub fn can_move(&self, board: &Board, target: Position) -> bool {
        if !self.base_move_allowed(board, target) {
            return false;
        }

        match self.kind {
            PieceKind::Man => {
                if self.pos.too_far(target, 2) {
                    return false;
                }
                if self.pos.y.abs_diff(target.y) == 1 {
                    // Simple steps are forward only. Captures are not.
                    match self.color {
                        Color::White => target.y + 1 == self.pos.y,
                        Color::Black => target.y == self.pos.y + 1,
                    }
                } else {
                    self.jump_path_clear(board, target)
                }
            }
            PieceKind::King => {
                let between = board.pieces_between(self.pos, target, self.color);
                between.friendly.is_empty() && between.enemies.len() <= 1
            }
        }
    }

    /// `true` iff moving to `target` jumps over exactly one enemy piece.
    /// Whether that jump is currently mandatory board-wide is the board's
    /// business, not the piece's.
    pub fn must_jump(&self, board: &Board, target: Position) -> bool {
        if !self.base_move_allowed(board, target) {
            return false;
        }

        match self.kind {
            PieceKind::Man => {
                self.pos.y.abs_diff(target.y) == 2 && self.jump_path_clear(board, target)
            }
            PieceKind::King => {
                let between = board.pieces_between(self.pos, target, self.color);
                between.friendly.is_empty() && between.enemies.len() == 1
            }
        }
    }

    /// Man jump check: the single intervening square must hold exactly one
    /// enemy piece and no friendly piece.
    fn jump_path_clear(&self, board: &Board, target: Position) -> bool {
        let between = board.pieces_between(self.pos, target, self.color);
        between.friendly.is_empty() && between.enemies.len() == 1
    }
}
