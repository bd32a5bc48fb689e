//! Grid model: the N×N field of one side, stored as two bitboards.
//!
//! A cell's state is derived from whether a ship occupies it and whether it
//! has been fired upon. Both masks only ever gain bits, so the allowed
//! transitions (`Empty→ShipPresent`, `ShipPresent→Hit`, `Empty→Miss`) hold
//! by construction.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoard;
use crate::common::EngineError;
use crate::config::BOARD_SIZE;

/// Bitboard sized for the game grid.
pub type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

const N: usize = BOARD_SIZE as usize;

/// A (row, column) position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate lies inside the grid.
    pub fn in_bounds(self) -> bool {
        self.row < N && self.col < N
    }

    /// The coordinate shifted by `(dr, dc)`, or `None` if that leaves the grid.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Coord::new(row, col);
        next.in_bounds().then_some(next)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    ShipPresent,
    Hit,
    Miss,
}

impl Cell {
    /// True for cells that have not been fired upon yet.
    pub fn is_targetable(self) -> bool {
        matches!(self, Cell::Empty | Cell::ShipPresent)
    }
}

/// One side's field. Cheap to copy; operations return new grids.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    ships: BB,
    shots: BB,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        N
    }

    /// State of the cell at `coord`.
    pub fn get(&self, coord: Coord) -> Result<Cell, EngineError> {
        let ship = self.ships.get(coord.row, coord.col)?;
        let shot = self.shots.get(coord.row, coord.col)?;
        Ok(match (ship, shot) {
            (false, false) => Cell::Empty,
            (true, false) => Cell::ShipPresent,
            (true, true) => Cell::Hit,
            (false, true) => Cell::Miss,
        })
    }

    /// The cell as an observer sees it. Unless `reveal` is set, intact ship
    /// segments read as open water.
    pub fn view(&self, coord: Coord, reveal: bool) -> Result<Cell, EngineError> {
        match self.get(coord)? {
            Cell::ShipPresent if !reveal => Ok(Cell::Empty),
            cell => Ok(cell),
        }
    }

    /// True if `coord` is inside the grid and has not been fired upon.
    pub fn is_targetable(&self, coord: Coord) -> bool {
        self.get(coord).map(Cell::is_targetable).unwrap_or(false)
    }

    /// True if `coord` is inside the grid and holds a hit ship segment.
    pub fn is_hit(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Ok(Cell::Hit))
    }

    /// All coordinates not yet fired upon, in row-major order.
    pub fn targetable(&self) -> Vec<Coord> {
        (!self.shots).iter_set_bits().map(Coord::from).collect()
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: Cell) -> usize {
        match state {
            Cell::Empty => (!(self.ships | self.shots)).count_ones(),
            Cell::ShipPresent => (self.ships & !self.shots).count_ones(),
            Cell::Hit => (self.ships & self.shots).count_ones(),
            Cell::Miss => (self.shots & !self.ships).count_ones(),
        }
    }

    /// Occupancy mask of every ship segment, hit or not.
    pub fn ship_mask(&self) -> BB {
        self.ships
    }

    /// Every cell with its state, row by row.
    pub fn cells(&self, reveal: bool) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        (0..N).flat_map(move |row| {
            (0..N).map(move |col| {
                let coord = Coord::new(row, col);
                // In-range by construction.
                let cell = self.view(coord, reveal).unwrap_or(Cell::Empty);
                (coord, cell)
            })
        })
    }

    /// New grid with the cells of `mask` marked as ship segments.
    pub(crate) fn with_ships(self, mask: BB) -> Grid {
        Grid {
            ships: self.ships | mask,
            shots: self.shots,
        }
    }

    /// New grid with `coord` marked as fired upon.
    pub(crate) fn with_shot(self, coord: Coord) -> Result<Grid, EngineError> {
        Ok(Grid {
            ships: self.ships,
            shots: self.shots.with(coord.row, coord.col)?,
        })
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{")?;
        writeln!(f, "{}", self)?;
        write!(f, "}}")
    }
}

/// Fully revealed text form: `.` water, `S` ship, `X` hit, `o` miss.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for col in 0..N {
                let ch = match self.get(Coord::new(row, col)) {
                    Ok(Cell::Empty) | Err(_) => '.',
                    Ok(Cell::ShipPresent) => 'S',
                    Ok(Cell::Hit) => 'X',
                    Ok(Cell::Miss) => 'o',
                };
                write!(f, "{} ", ch)?;
            }
            if row + 1 < N {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
