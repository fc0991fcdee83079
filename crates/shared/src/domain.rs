use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ParseError};

pub const BOARD_ROWS: usize = 5;
pub const BOARD_COLS: usize = 5;

/// Column order of each owner's home row in the starting layout.
pub const HOME_ROW: [(PieceKind, u8); BOARD_COLS] = [
    (PieceKind::Pawn, 1),
    (PieceKind::Pawn, 2),
    (PieceKind::Hero1, 1),
    (PieceKind::Hero2, 1),
    (PieceKind::Pawn, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    A,
    B,
}

impl Owner {
    pub fn opponent(self) -> Owner {
        match self {
            Owner::A => Owner::B,
            Owner::B => Owner::A,
        }
    }

    /// Row step that carries this owner's pieces forward.
    pub fn forward(self) -> isize {
        match self {
            Owner::A => 1,
            Owner::B => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Owner::A => "A",
            Owner::B => "B",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Owner::A),
            "B" => Ok(Owner::B),
            other => Err(ParseError::UnknownOwner(other.to_string())),
        }
    }
}

/// Movement archetype of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Single orthogonal step.
    Pawn,
    /// Orthogonal jump of two.
    Hero1,
    /// Diagonal jump of two on both axes.
    Hero2,
}

impl PieceKind {
    pub fn token(self) -> &'static str {
        match self {
            PieceKind::Pawn => "P",
            PieceKind::Hero1 => "H1",
            PieceKind::Hero2 => "H2",
        }
    }
}

/// Identity of one piece: owner, kind and instance index.
///
/// Pawns are numbered from 1 and written `P1`, `P2`, ... Each hero kind has a
/// single instance per owner, so heroes always carry index 1 and are written
/// by their bare kind token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId {
    owner: Owner,
    kind: PieceKind,
    index: u8,
}

impl PieceId {
    pub const fn pawn(owner: Owner, index: u8) -> Self {
        Self {
            owner,
            kind: PieceKind::Pawn,
            index,
        }
    }

    pub const fn hero1(owner: Owner) -> Self {
        Self {
            owner,
            kind: PieceKind::Hero1,
            index: 1,
        }
    }

    pub const fn hero2(owner: Owner) -> Self {
        Self {
            owner,
            kind: PieceKind::Hero2,
            index: 1,
        }
    }

    fn from_slot(owner: Owner, (kind, index): (PieceKind, u8)) -> Self {
        match kind {
            PieceKind::Pawn => Self::pawn(owner, index),
            PieceKind::Hero1 => Self::hero1(owner),
            PieceKind::Hero2 => Self::hero2(owner),
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn index(&self) -> u8 {
        self.index
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PieceKind::Pawn => write!(f, "{}-P{}", self.owner, self.index),
            kind => write!(f, "{}-{}", self.owner, kind.token()),
        }
    }
}

impl FromStr for PieceId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, piece) = s
            .split_once('-')
            .ok_or_else(|| ParseError::MissingOwner(s.to_string()))?;
        let owner: Owner = owner.parse()?;
        match piece {
            "H1" => Ok(PieceId::hero1(owner)),
            "H2" => Ok(PieceId::hero2(owner)),
            _ => piece
                .strip_prefix('P')
                .and_then(parse_pawn_index)
                .map(|index| PieceId::pawn(owner, index))
                .ok_or_else(|| ParseError::UnknownPiece(s.to_string())),
        }
    }
}

fn parse_pawn_index(digits: &str) -> Option<u8> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
}

impl Direction {
    pub fn token(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::ForwardLeft => "FL",
            Direction::ForwardRight => "FR",
            Direction::BackwardLeft => "BL",
            Direction::BackwardRight => "BR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "F" => Ok(Direction::Forward),
            "B" => Ok(Direction::Backward),
            "FL" => Ok(Direction::ForwardLeft),
            "FR" => Ok(Direction::ForwardRight),
            "BL" => Ok(Direction::BackwardLeft),
            "BR" => Ok(Direction::BackwardRight),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }
}

/// One square of the grid. On the wire an empty cell is `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell(Option<PieceId>);

impl Cell {
    pub const EMPTY: Cell = Cell(None);

    pub fn occupied(piece: PieceId) -> Self {
        Cell(Some(piece))
    }

    pub fn piece(&self) -> Option<PieceId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.0.map(|piece| piece.to_string()).unwrap_or_default()
    }
}

impl TryFrom<String> for Cell {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Cell::EMPTY)
        } else {
            value.parse().map(Cell::occupied)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangular grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Cell>>", try_from = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::EMPTY; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols).then(|| pos.row * self.cols + pos.col)
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Places `piece` at `pos`, replacing whatever was there. Returns false
    /// when `pos` is off the board.
    pub fn set(&mut self, pos: Position, piece: PieceId) -> bool {
        match self.index_of(pos) {
            Some(idx) => {
                self.cells[idx] = Cell::occupied(piece);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, pos: Position) -> Option<PieceId> {
        let idx = self.index_of(pos)?;
        std::mem::take(&mut self.cells[idx]).piece()
    }

    /// Position of `piece`, or `None` once it has been captured.
    pub fn locate(&self, piece: PieceId) -> Option<Position> {
        self.pieces()
            .find(|(_, candidate)| *candidate == piece)
            .map(|(pos, _)| pos)
    }

    /// `pos` shifted by the given deltas, if the result is still on the board.
    pub fn offset(&self, pos: Position, drow: isize, dcol: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(drow)?;
        let col = pos.col.checked_add_signed(dcol)?;
        let target = Position::new(row, col);
        self.index_of(target).map(|_| target)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Position, PieceId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.piece()
                .map(|piece| (Position::new(idx / self.cols, idx % self.cols), piece))
        })
    }

    pub fn count(&self, owner: Owner) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.owner() == owner)
            .count()
    }

    /// The owner left standing once the other has no pieces.
    pub fn winner(&self) -> Option<Owner> {
        if self.count(Owner::A) == 0 {
            Some(Owner::B)
        } else if self.count(Owner::B) == 0 {
            Some(Owner::A)
        } else {
            None
        }
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        if board.cols == 0 {
            return vec![Vec::new(); board.rows];
        }
        board
            .cells
            .chunks(board.cols)
            .map(<[Cell]>::to_vec)
            .collect()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(grid: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        let mut seen = HashSet::new();
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(BoardError::Ragged {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            for cell in line {
                if let Some(piece) = cell.piece() {
                    if !seen.insert(piece) {
                        return Err(BoardError::DuplicatePiece(piece.to_string()));
                    }
                }
                cells.push(cell);
            }
        }
        Ok(Self { rows, cols, cells })
    }
}

/// The authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid: Board,
    pub current_player: Owner,
    pub move_history: Vec<String>,
    pub winner: Option<Owner>,
}

impl GameState {
    pub fn locate(&self, piece: PieceId) -> Option<Position> {
        self.grid.locate(piece)
    }
}

impl Default for GameState {
    fn default() -> Self {
        initial_layout()
    }
}

/// Starting arrangement: A's home row at the top, B's at the bottom, A to move.
pub fn initial_layout() -> GameState {
    let mut grid = Board::empty(BOARD_ROWS, BOARD_COLS);
    for (col, slot) in HOME_ROW.into_iter().enumerate() {
        grid.set(Position::new(0, col), PieceId::from_slot(Owner::A, slot));
        grid.set(
            Position::new(BOARD_ROWS - 1, col),
            PieceId::from_slot(Owner::B, slot),
        );
    }
    GameState {
        grid,
        current_player: Owner::A,
        move_history: Vec::new(),
        winner: None,
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
