//! Fleet placement: validating and committing ships onto a grid.
//!
//! Ships may not overlap and may not touch, not even diagonally. Placement is
//! checked with one mask operation: the candidate ship grown by its Moore
//! neighbourhood must not intersect any existing ship segment.

use log::{debug, warn};
use rand::Rng;

use crate::common::EngineError;
use crate::config::{BOARD_SIZE, PLACEMENT_ATTEMPTS_PER_SHIP, PLACEMENT_RESHUFFLES};
use crate::grid::{Coord, Grid};
use crate::ship::{Orientation, Ship};

const N: usize = BOARD_SIZE as usize;

/// The ships belonging to one side, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Copy of the fleet with `ship` appended.
    pub fn with_ship(&self, ship: Ship) -> Fleet {
        let mut ships = self.ships.clone();
        ships.push(ship);
        Fleet { ships }
    }

    /// Copy of the fleet with the ship at `index` replaced.
    pub(crate) fn with_replaced(&self, index: usize, ship: Ship) -> Fleet {
        let mut ships = self.ships.clone();
        if let Some(slot) = ships.get_mut(index) {
            *slot = ship;
        }
        Fleet { ships }
    }

    /// The ship occupying `coord`, with its index.
    pub fn ship_at(&self, coord: Coord) -> Option<(usize, &Ship)> {
        self.ships.iter().enumerate().find(|(_, s)| s.contains(coord))
    }

    /// Returns `true` when the fleet has ships and all of them are sunk.
    pub fn is_defeated(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// Number of ships still afloat.
    pub fn afloat(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    /// Cells of every sunk ship, for highlighting.
    pub fn sunk_cells(&self) -> Vec<Coord> {
        self.ships
            .iter()
            .filter(|s| s.is_sunk())
            .flat_map(Ship::cells)
            .collect()
    }

    /// Sizes from `sizes` that have no placed counterpart yet.
    pub fn remaining_sizes(&self, sizes: &[usize]) -> Vec<usize> {
        let mut placed: Vec<usize> = self.ships.iter().map(Ship::size).collect();
        let mut remaining = Vec::new();
        for &size in sizes {
            match placed.iter().position(|&p| p == size) {
                Some(i) => {
                    placed.swap_remove(i);
                }
                None => remaining.push(size),
            }
        }
        remaining
    }
}

/// Whether a ship of `size` fits at `origin` without leaving the grid or
/// touching any ship already on it.
pub fn can_place(grid: &Grid, origin: Coord, size: usize, orientation: Orientation) -> bool {
    check_placement(grid, origin, size, orientation).is_ok()
}

fn check_placement(
    grid: &Grid,
    origin: Coord,
    size: usize,
    orientation: Orientation,
) -> Result<Ship, EngineError> {
    let ship = Ship::new(origin, size, orientation)?;
    if !(grid.ship_mask() & ship.mask().dilate()).is_empty() {
        return Err(EngineError::OverlapOrAdjacency);
    }
    Ok(ship)
}

/// Place a ship, returning the updated grid and the new ship record. The
/// input grid is left untouched.
///
/// The grid and the ship belong together: commit the grid only alongside
/// `Fleet::with_ship(ship)`. A segment on the grid that no fleet ship covers
/// cannot be resolved by [`attack`](crate::attack::attack).
pub fn place(
    grid: &Grid,
    origin: Coord,
    size: usize,
    orientation: Orientation,
) -> Result<(Grid, Ship), EngineError> {
    let ship = check_placement(grid, origin, size, orientation)?;
    Ok((grid.with_ships(ship.mask()), ship))
}

/// True iff the fleet's ship sizes are exactly the multiset `sizes`.
pub fn all_placed(fleet: &Fleet, sizes: &[usize]) -> bool {
    let mut placed: Vec<usize> = fleet.ships().iter().map(Ship::size).collect();
    let mut wanted = sizes.to_vec();
    placed.sort_unstable();
    wanted.sort_unstable();
    placed == wanted
}

/// Lay out a whole fleet with uniformly sampled origins and orientations.
///
/// Each ship gets `PLACEMENT_ATTEMPTS_PER_SHIP` tries; when one runs out the
/// board is cleared and drawn again, at most `PLACEMENT_RESHUFFLES` times.
pub fn place_random<R: Rng + ?Sized>(
    sizes: &[usize],
    rng: &mut R,
) -> Result<(Grid, Fleet), EngineError> {
    // Reject bad sizes up front instead of retrying them.
    for &size in sizes {
        Ship::new(Coord::new(0, 0), size, Orientation::Horizontal)?;
    }
    for round in 0..PLACEMENT_RESHUFFLES {
        if let Some(placed) = try_place_all(sizes, rng) {
            debug!("random fleet placed after {} redraw(s)", round);
            return Ok(placed);
        }
        warn!("random placement stalled, redrawing board (round {})", round + 1);
    }
    Err(EngineError::UnableToPlaceFleet)
}

fn try_place_all<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Option<(Grid, Fleet)> {
    let mut grid = Grid::new();
    let mut fleet = Fleet::new();
    for &size in sizes {
        let (next_grid, ship) = random_placement(&grid, size, rng)?;
        grid = next_grid;
        fleet = fleet.with_ship(ship);
    }
    Some((grid, fleet))
}

/// Sample origins for one ship until one fits or the attempt budget runs out.
fn random_placement<R: Rng + ?Sized>(
    grid: &Grid,
    size: usize,
    rng: &mut R,
) -> Option<(Grid, Ship)> {
    for _ in 0..PLACEMENT_ATTEMPTS_PER_SHIP {
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let max_r = if orient == Orientation::Vertical { N - size } else { N - 1 };
        let max_c = if orient == Orientation::Horizontal { N - size } else { N - 1 };
        let origin = Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
        if let Ok(placed) = place(grid, origin, size, orient) {
            return Some(placed);
        }
    }
    None
}
