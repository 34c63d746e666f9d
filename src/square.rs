use crate::piece::PieceId;
use crate::types::Position;

/// Square shade, derived once from the coordinates. Only dark squares are
/// ever playable; light squares never hold a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

/// One cell of the board grid. The board owns all squares; a piece is tied
/// to a square only through `occupant`, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pos: Position,
    shade: Shade,
    pub(crate) occupant: Option<PieceId>,
    /// Advisory flag: the active player may pick a piece from this square.
    pub(crate) selectable: bool,
    /// Advisory flag: legal target of the currently selected square.
    pub(crate) highlighted: bool,
}

impl Square {
    pub(crate) fn new(pos: Position) -> Self {
        let shade = if pos.is_dark() {
            Shade::Dark
        } else {
            Shade::Light
        };
        Self {
            pos,
            shade,
            occupant: None,
            selectable: false,
            highlighted: false,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn shade(&self) -> Shade {
        self.shade
    }

    pub fn is_dark(&self) -> bool {
        self.shade == Shade::Dark
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    pub fn selectable(&self) -> bool {
        self.selectable
    }

    pub fn highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn clear_flags(&mut self) {
        self.selectable = false;
        self.highlighted = false;
    }
}
