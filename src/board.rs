use once_cell::sync::Lazy;
use thiserror::Error;

use crate::piece::{Piece, PieceId};
use crate::square::Square;
use crate::types::{Color, PieceKind, Position};

const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Men each side starts with; a captured count reaching this ends the game.
pub const STARTING_PIECES: usize = 12;

/// Starting layout, computed once: each side's men fill the three back rows
/// of dark squares on its side. Black sits on rows 0..3, White on rows 5..8.
static START_LAYOUT: Lazy<Vec<(Color, Position)>> = Lazy::new(|| {
    let mut layout = Vec::with_capacity(2 * STARTING_PIECES);
    for y in 0..8u8 {
        if (3..5).contains(&y) {
            continue;
        }
        let color = if y < 3 { Color::Black } else { Color::White };
        for x in 0..8u8 {
            let pos = Position::new(x, y);
            if pos.is_dark() {
                layout.push((color, pos));
            }
        }
    }
    layout
});

/// `Board::execute_move` contract violation. The controller validates every
/// pair before executing, so reaching this means the caller bypassed it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("no piece on source square ({x}, {y})")]
    EmptySource { x: u8, y: u8 },

    #[error("({x}, {y}) is not a legal target for the selected piece")]
    NotATarget { x: u8, y: u8 },
}

/// What an executed move did, beyond relocating the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Option<PieceId>,
    pub promoted: bool,
}

/// Occupants strictly between two squares of one diagonal, partitioned by
/// their relation to a color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Between {
    pub enemies: Vec<PieceId>,
    pub friendly: Vec<PieceId>,
}

/// The 8x8 grid plus the piece arena and the two captured-piece lists.
/// The grid stores occupant ids; each piece stores its own position. Every
/// mutation goes through this type, which keeps the two views in agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Vec<Square>,
    pieces: Vec<Piece>,
    captured_black: Vec<PieceId>,
    captured_white: Vec<PieceId>,
}

impl Board {
    /// Creates the standard starting position, 12 men per side.
    pub fn new() -> Self {
        let mut board = Self::blank();
        for &(color, pos) in START_LAYOUT.iter() {
            board.spawn(color, PieceKind::Man, pos);
        }
        board
    }

    fn blank() -> Self {
        let mut squares = Vec::with_capacity(NUM_SQUARES);
        for y in 0..BOARD_SIZE as u8 {
            for x in 0..BOARD_SIZE as u8 {
                squares.push(Square::new(Position::new(x, y)));
            }
        }
        Self {
            squares,
            pieces: Vec::new(),
            captured_black: Vec::new(),
            captured_white: Vec::new(),
        }
    }

    fn spawn(&mut self, color: Color, kind: PieceKind, pos: Position) -> PieceId {
        debug_assert!(pos.is_dark(), "pieces only ever sit on dark squares");
        debug_assert!(self.square(pos).is_empty());
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            id,
            color,
            kind,
            pos,
        });
        self.square_mut(pos).occupant = Some(id);
        id
    }

    fn idx(pos: Position) -> usize {
        pos.y as usize * BOARD_SIZE + pos.x as usize
    }

    /// Caller contract: `pos` must be in bounds.
    pub fn square(&self, pos: Position) -> &Square {
        &self.squares[Self::idx(pos)]
    }

    fn square_mut(&mut self, pos: Position) -> &mut Square {
        &mut self.squares[Self::idx(pos)]
    }

    /// 64 squares, row-major: index = `y * 8 + x`.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.in_bounds() {
            return None;
        }
        self.square(pos).occupant().map(|id| self.piece(id))
    }

    /// All dark squares with no occupant. Recomputed on demand, never cached.
    pub fn empty_playable_squares(&self) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|sq| sq.is_dark() && sq.is_empty())
            .collect()
    }

    /// All squares whose occupant belongs to `color`.
    pub fn squares_occupied_by(&self, color: Color) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|sq| {
                sq.occupant()
                    .is_some_and(|id| self.piece(id).color == color)
            })
            .collect()
    }

    /// Occupants strictly between `from` and `to`, split into enemies and
    /// friends of `color`. Caller contract: the two squares share a diagonal.
    pub fn pieces_between(&self, from: Position, to: Position, color: Color) -> Between {
        debug_assert!(from.same_diagonal(to));
        let step_x: i16 = if to.x > from.x { 1 } else { -1 };
        let step_y: i16 = if to.y > from.y { 1 } else { -1 };

        let mut between = Between::default();
        let mut x = from.x as i16 + step_x;
        let mut y = from.y as i16 + step_y;
        while (x, y) != (to.x as i16, to.y as i16) {
            let pos = Position::new(x as u8, y as u8);
            if let Some(id) = self.square(pos).occupant() {
                if self.piece(id).color == color {
                    between.friendly.push(id);
                } else {
                    between.enemies.push(id);
                }
            }
            x += step_x;
            y += step_y;
        }
        between
    }

    /// Empty playable squares the piece on `from` reaches by jumping exactly
    /// one enemy piece.
    pub fn must_jump_targets(&self, from: Position) -> Vec<Position> {
        let Some(&piece) = self.piece_at(from) else {
            return Vec::new();
        };
        self.empty_playable_squares()
            .into_iter()
            .map(|sq| sq.pos())
            .filter(|&target| piece.must_jump(self, target))
            .collect()
    }

    /// The forced-capture rule: does any piece of `color` have a jump?
    pub fn any_mandatory_capture(&self, color: Color) -> bool {
        self.squares_occupied_by(color)
            .iter()
            .any(|sq| !self.must_jump_targets(sq.pos()).is_empty())
    }

    /// The authoritative target set for the piece on `from`. While any
    /// capture is mandatory for that piece's color, only jump targets are
    /// returned; a piece with no jump gets an empty set.
    pub fn legal_targets_for(&self, from: Position) -> Vec<Position> {
        let Some(&piece) = self.piece_at(from) else {
            return Vec::new();
        };
        if self.any_mandatory_capture(piece.color) {
            self.must_jump_targets(from)
        } else {
            self.empty_playable_squares()
                .into_iter()
                .map(|sq| sq.pos())
                .filter(|&target| piece.can_move(self, target))
                .collect()
        }
    }

    /// Executes a validated move: relocates the piece, removes the jumped
    /// enemy piece (if any) into its color's captured list, then applies the
    /// promotion check. Re-validates before touching anything, so an illegal
    /// pair leaves the board unchanged.
    pub fn execute_move(
        &mut self,
        from: Position,
        to: Position,
    ) -> Result<MoveOutcome, IllegalMove> {
        if !from.in_bounds() {
            return Err(IllegalMove::EmptySource { x: from.x, y: from.y });
        }
        let Some(piece_id) = self.square(from).occupant() else {
            return Err(IllegalMove::EmptySource { x: from.x, y: from.y });
        };
        if !to.in_bounds() || !self.legal_targets_for(from).contains(&to) {
            return Err(IllegalMove::NotATarget { x: to.x, y: to.y });
        }

        let color = self.piece(piece_id).color;
        // Legality guarantees at most one enemy on the path.
        let captured = self.pieces_between(from, to, color).enemies.first().copied();

        self.square_mut(from).occupant = None;
        self.square_mut(to).occupant = Some(piece_id);
        self.pieces[piece_id.0].pos = to;

        if let Some(victim) = captured {
            self.capture(victim);
        }
        let promoted = self.promote_if_on_back_rank(piece_id);

        Ok(MoveOutcome { captured, promoted })
    }

    /// Detaches a piece from the grid into its color's captured list. The
    /// arena entry stays; its position is stale from here on and unused.
    fn capture(&mut self, id: PieceId) {
        let pos = self.pieces[id.0].pos;
        self.square_mut(pos).occupant = None;
        match self.pieces[id.0].color {
            Color::Black => self.captured_black.push(id),
            Color::White => self.captured_white.push(id),
        }
    }

    /// Promotes a Man standing on the opposing back rank. Idempotent: a King
    /// is left alone and the move reports no promotion.
    fn promote_if_on_back_rank(&mut self, id: PieceId) -> bool {
        let piece = &mut self.pieces[id.0];
        if piece.kind != PieceKind::Man {
            return false;
        }
        let back_rank = match piece.color {
            Color::White => 0,
            Color::Black => 7,
        };
        if piece.pos.y == back_rank {
            piece.kind = PieceKind::King;
            true
        } else {
            false
        }
    }

    /// Captured pieces of `color`.
    pub fn captured_count(&self, color: Color) -> usize {
        match color {
            Color::Black => self.captured_black.len(),
            Color::White => self.captured_white.len(),
        }
    }

    pub(crate) fn clear_flags(&mut self) {
        for square in &mut self.squares {
            square.clear_flags();
        }
    }

    pub(crate) fn set_selectable(&mut self, pos: Position) {
        self.square_mut(pos).selectable = true;
    }

    pub(crate) fn set_highlighted(&mut self, pos: Position) {
        self.square_mut(pos).highlighted = true;
    }

    #[cfg(test)]
    pub(crate) fn empty_for_test() -> Self {
        Self::blank()
    }

    #[cfg(test)]
    pub(crate) fn place_for_test(
        &mut self,
        color: Color,
        kind: PieceKind,
        pos: Position,
    ) -> PieceId {
        self.spawn(color, kind, pos)
    }

    #[cfg(test)]
    pub(crate) fn capture_for_test(&mut self, id: PieceId) {
        self.capture(id);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
