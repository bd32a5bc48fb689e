//! Ship records: a straight run of cells with a hit tally.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::common::EngineError;
use crate::config::MAX_SHIP_SIZE;
use crate::grid::{Coord, BB};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Cells share a row; columns grow from the origin.
    Horizontal,
    /// Cells share a column; rows grow from the origin.
    Vertical,
}

impl Orientation {
    /// Row and column step between consecutive ship cells.
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// A placed ship, with hits tracked in a `BitBoard`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    size: usize,
    orientation: Orientation,
    origin: Coord,
    mask: BB,
    hits: BB,
}

impl Ship {
    /// Lay out a ship of `size` cells from `origin` in `orientation`.
    ///
    /// Fails with `InvalidShipSize` for sizes outside `1..=MAX_SHIP_SIZE`
    /// and with `OutOfBounds` (naming the first cell off the grid) if the
    /// ship does not fit.
    pub fn new(origin: Coord, size: usize, orientation: Orientation) -> Result<Self, EngineError> {
        if size == 0 || size > MAX_SHIP_SIZE {
            return Err(EngineError::InvalidShipSize(size));
        }
        let (dr, dc) = orientation.step();
        let mut mask = BB::new();
        for i in 0..size {
            mask.set(origin.row + i * dr, origin.col + i * dc)?;
        }
        Ok(Ship {
            size,
            orientation,
            origin,
            mask,
            hits: BB::new(),
        })
    }

    /// Number of cells the ship occupies.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct segments hit so far.
    pub fn hits(&self) -> usize {
        self.hits.count_ones()
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits() == self.size
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupancy mask of the ship on the board.
    pub fn mask(&self) -> BB {
        self.mask
    }

    /// Occupied cells, starting at the origin.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (dr, dc) = self.orientation.step();
        let origin = self.origin;
        (0..self.size).map(move |i| Coord::new(origin.row + i * dr, origin.col + i * dc))
    }

    /// Whether the ship occupies `coord`.
    pub fn contains(&self, coord: Coord) -> bool {
        self.mask.get(coord.row, coord.col).unwrap_or(false)
    }

    /// Copy of the ship with the segment at `coord` marked as hit. Cells the
    /// ship does not occupy leave it unchanged.
    pub(crate) fn struck(mut self, coord: Coord) -> Ship {
        if self.contains(coord) {
            let _ = self.hits.set(coord.row, coord.col);
        }
        self
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ size: {}, origin: {}, orientation: {:?}, hits: {} }}",
            self.size,
            self.origin,
            self.orientation,
            self.hits(),
        )
    }
}
