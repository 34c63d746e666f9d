use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Side identity. Owns both piece color and turn identity.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Piece variant. `King` is reached by promotion and is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PieceKind {
    Man,
    King,
}

/// A board coordinate. `x` is the file (column), `y` the rank (row),
/// both in `0..8`. White's back rank is `y == 7`, Black's is `y == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        self.x < 8 && self.y < 8
    }

    /// Only dark squares take part in play.
    pub fn is_dark(self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// `true` iff `other` lies on one of the two diagonals through `self`.
    pub fn same_diagonal(self, other: Position) -> bool {
        self.x.abs_diff(other.x) == self.y.abs_diff(other.y)
    }

    /// `true` iff the row distance to `other` exceeds `max_step`.
    /// Cheap reach cap checked before any diagonal walk.
    pub fn too_far(self, other: Position, max_step: u8) -> bool {
        self.y.abs_diff(other.y) > max_step
    }
}

/// One entry of the move history. Never mutated after creation; legality
/// decisions never read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub id: u32,
    pub color: Color,
    pub from: Position,
    pub to: Position,
}

/// One occupied cell of the public snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub color: Color,
    pub king: bool,
}

/// One cell of the public snapshot, advisory flags included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquareView {
    pub x: u8,
    pub y: u8,
    pub dark: bool,
    pub piece: Option<PieceView>,
    /// Contract:
    /// - `true` on squares the active player may pick a piece from.
    /// - Purely advisory; recomputed after every accepted command.
    pub selectable: bool,
    /// Contract:
    /// - `true` on legal targets of the currently selected square.
    /// - Empty selection means no square is highlighted.
    pub highlighted: bool,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// 64 cells, row-major: index = `y * 8 + x`.
    pub squares: Vec<SquareView>,
    pub active: Color,
    pub selected: Option<Position>,
    /// Contract:
    /// - `Some(p)` while the piece on `p` must continue a capture chain.
    /// - `None` otherwise; no other piece is selectable while `Some`.
    pub chain_from: Option<Position>,
    pub captured_black: u8,
    pub captured_white: u8,
    pub is_game_over: bool,
    pub winner: Option<Color>,
}
