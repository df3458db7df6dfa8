use std::fmt;

use super::player::Player;
use crate::error::BoardError;

pub const STANDARD_HEIGHT: usize = 6;
pub const STANDARD_WIDTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Human,
    Computer,
    /// Transient hover marker drawn by the driver. Never a real occupant.
    Preview,
}

impl Cell {
    /// The player occupying this cell, if it holds a real piece.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Human => Some(Player::Human),
            Cell::Computer => Some(Player::Computer),
            Cell::Empty | Cell::Preview => None,
        }
    }

    /// Character used by [`Board::from_rows`] and the `Display` impl.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Human => 'O',
            Cell::Computer => 'X',
            Cell::Preview => '*',
        }
    }

    fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            'O' => Some(Cell::Human),
            'X' => Some(Cell::Computer),
            '*' => Some(Cell::Preview),
            _ => None,
        }
    }
}

/// A fixed-size drop grid. Row 0 is the top, row `height - 1` the bottom.
///
/// Placement never mutates the board: [`Board::place`] hands back a new
/// snapshot so that callers exploring alternatives (the search engine in
/// particular) can branch freely from a shared parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        let size = height
            .checked_mul(width)
            .filter(|&size| size > 0)
            .ok_or(BoardError::InvalidDimensions { height, width })?;
        Ok(Board {
            height,
            width,
            cells: vec![Cell::Empty; size],
        })
    }

    /// The classic 6 x 7 board
    pub fn standard() -> Self {
        Board {
            height: STANDARD_HEIGHT,
            width: STANDARD_WIDTH,
            cells: vec![Cell::Empty; STANDARD_HEIGHT * STANDARD_WIDTH],
        }
    }

    /// Parse a board from text rows, top row first.
    ///
    /// `.` is empty, `O` the human, `X` the computer and `*` a preview marker.
    /// Every row must have the same width and no piece may float above an
    /// empty cell.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let mut board = Board::new(rows.len(), width)?;

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(BoardError::Parse(format!(
                    "row {row} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    BoardError::Parse(format!("unknown cell '{symbol}' at ({row}, {col})"))
                })?;
                let idx = board.index(row, col);
                board.cells[idx] = cell;
            }
        }

        // Gravity: once a column has an empty cell, everything above it is empty too.
        for col in 0..board.width {
            let mut gap = false;
            for row in (0..board.height).rev() {
                if board.cell(row, col) == Cell::Empty {
                    gap = true;
                } else if gap {
                    return Err(BoardError::Floating { row, col });
                }
            }
        }

        Ok(board)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Unchecked lookup for indices already known to be in bounds.
    fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Get the cell at a specific position
    pub fn at(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        if row >= self.height || col >= self.width {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(self.cell(row, col))
    }

    /// A column accepts a piece when it exists and its top cell is empty.
    pub fn is_column_placeable(&self, col: usize) -> bool {
        col < self.width && self.cell(0, col) == Cell::Empty
    }

    /// Placeable columns in ascending order.
    pub fn placeable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(move |&col| self.is_column_placeable(col))
    }

    /// Row a piece dropped into `col` would settle in.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.width {
            return None;
        }
        (0..self.height)
            .rev()
            .find(|&row| self.cell(row, col) == Cell::Empty)
    }

    /// Drop `piece` into `col`, returning the resulting board.
    pub fn place(&self, col: usize, piece: Cell) -> Result<Board, BoardError> {
        if piece == Cell::Empty {
            return Err(BoardError::InvalidPlayer);
        }
        let row = self
            .landing_row(col)
            .ok_or(BoardError::InvalidMove { column: col })?;

        let mut next = self.clone();
        let idx = next.index(row, col);
        next.cells[idx] = piece;
        Ok(next)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|col| !self.is_column_placeable(col))
    }

    /// Return the player owning a run of four, if any.
    ///
    /// Every run is found from its top (or, for horizontal runs, leftmost)
    /// cell, so it is enough to scan right, down and the two downward
    /// diagonals from each origin. Each scan is bounded separately by the
    /// rows and columns left in its direction.
    pub fn check_winner(&self) -> Option<Player> {
        for row in 0..self.height {
            for col in 0..self.width {
                let Some(player) = self.cell(row, col).player() else {
                    continue;
                };
                let piece = player.to_cell();

                let fits_right = col + 3 < self.width;
                let fits_left = col >= 3;
                let fits_down = row + 3 < self.height;

                let run = |dr: usize, dc: isize| {
                    (1..4).all(|k| {
                        let c = (col as isize + dc * k as isize) as usize;
                        self.cell(row + dr * k, c) == piece
                    })
                };

                if (fits_right && run(0, 1))
                    || (fits_down && run(1, 0))
                    || (fits_down && fits_right && run(1, 1))
                    || (fits_down && fits_left && run(1, -1))
                {
                    return Some(player);
                }
            }
        }
        None
    }

    /// Location of the first preview marker in row-major order.
    pub fn find_preview(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&cell| cell == Cell::Preview)
            .map(|idx| (idx / self.width, idx % self.width))
    }

}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                write!(f, "{}", self.cell(row, col).symbol())?;
            }
        }
        Ok(())
    }
}
