// Opponent targeting: hunt-and-target search over the opponent's grid.
//
// Targeting only reads the grid through targetability and `Hit` cells, so an
// AI never learns where intact ships are. Memory is a small value that the
// match state machine threads through `select_target` and `AiMemory::observe`.

use core::fmt;
use core::str::FromStr;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{AttackResult, EngineError};
use crate::grid::{Coord, Grid};

/// Strength of a computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random shots.
    Easy,
    /// Fires around the most recent hit.
    #[default]
    Medium,
    /// Fires around the most recent hit and locks onto a ship's axis.
    Hard,
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// Axis the hard AI is following, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HuntDirection {
    #[default]
    Unknown,
    Horizontal,
    Vertical,
}

/// What an AI remembers between shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiMemory {
    /// Most recent hit that has not been followed by a miss.
    pub last_hit: Option<Coord>,
    pub hunt_direction: HuntDirection,
}

impl AiMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory after firing at `coord` with `result`.
    ///
    /// A miss forgets everything. Any hit becomes the new `last_hit`; a sink
    /// also drops the axis, which belonged to the ship that just went down.
    pub fn observe(self, coord: Coord, result: AttackResult) -> AiMemory {
        match result {
            AttackResult::Invalid => self,
            AttackResult::Miss | AttackResult::FleetDefeated => AiMemory::default(),
            AttackResult::Hit => AiMemory {
                last_hit: Some(coord),
                ..self
            },
            AttackResult::HitAndSunk => AiMemory {
                last_hit: Some(coord),
                hunt_direction: HuntDirection::Unknown,
            },
        }
    }
}

/// A chosen shot together with the memory to keep for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targeting {
    pub coord: Coord,
    pub memory: AiMemory,
}

/// Orthogonal scan order: +col, +row, -col, -row.
const NEIGHBOURS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const HORIZONTAL: [(isize, isize); 2] = [(0, 1), (0, -1)];
const VERTICAL: [(isize, isize); 2] = [(1, 0), (-1, 0)];

/// Pick the next cell to fire at on `grid`.
///
/// The returned coordinate is always targetable. Fails with
/// `NoTargetsRemaining` only when every cell has been fired upon.
pub fn select_target<R: Rng + ?Sized>(
    difficulty: Difficulty,
    memory: &AiMemory,
    grid: &Grid,
    rng: &mut R,
) -> Result<Targeting, EngineError> {
    let targeting = match difficulty {
        Difficulty::Easy => Targeting {
            coord: random_target(grid, rng)?,
            memory: *memory,
        },
        Difficulty::Medium => hunt_nearby(memory, grid, rng)?,
        Difficulty::Hard => directional_hunt(memory, grid, rng)?,
    };
    debug!("{} AI targets {}", difficulty, targeting.coord);
    Ok(targeting)
}

/// Uniform choice among the cells not yet fired upon.
pub fn random_target<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Result<Coord, EngineError> {
    let cells = grid.targetable();
    if cells.is_empty() {
        return Err(EngineError::NoTargetsRemaining);
    }
    Ok(cells[rng.random_range(0..cells.len())])
}

fn first_targetable(grid: &Grid, from: Coord, steps: &[(isize, isize)]) -> Option<Coord> {
    steps
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .find(|&c| grid.is_targetable(c))
}

fn hunt_nearby<R: Rng + ?Sized>(
    memory: &AiMemory,
    grid: &Grid,
    rng: &mut R,
) -> Result<Targeting, EngineError> {
    let near = memory
        .last_hit
        .and_then(|last| first_targetable(grid, last, &NEIGHBOURS));
    let coord = match near {
        Some(coord) => coord,
        None => random_target(grid, rng)?,
    };
    Ok(Targeting {
        coord,
        memory: *memory,
    })
}

/// Axis suggested by hits right next to `last`. Only the most recent hit is
/// inspected, so a ship broken up by earlier misses can be misread.
fn detect_axis(grid: &Grid, last: Coord) -> HuntDirection {
    let hit_at = |dr, dc| last.offset(dr, dc).is_some_and(|c| grid.is_hit(c));
    if hit_at(0, 1) || hit_at(0, -1) {
        HuntDirection::Horizontal
    } else if hit_at(1, 0) || hit_at(-1, 0) {
        HuntDirection::Vertical
    } else {
        HuntDirection::Unknown
    }
}

fn directional_hunt<R: Rng + ?Sized>(
    memory: &AiMemory,
    grid: &Grid,
    rng: &mut R,
) -> Result<Targeting, EngineError> {
    let mut memory = *memory;
    let Some(last) = memory.last_hit else {
        return Ok(Targeting {
            coord: random_target(grid, rng)?,
            memory,
        });
    };

    if memory.hunt_direction == HuntDirection::Unknown {
        memory.hunt_direction = detect_axis(grid, last);
    }
    let axis: &[(isize, isize)] = match memory.hunt_direction {
        HuntDirection::Horizontal => &HORIZONTAL,
        HuntDirection::Vertical => &VERTICAL,
        HuntDirection::Unknown => &[],
    };
    if let Some(coord) = first_targetable(grid, last, axis) {
        return Ok(Targeting { coord, memory });
    }
    if memory.hunt_direction != HuntDirection::Unknown {
        debug!("axis {:?} exhausted around {}", memory.hunt_direction, last);
        memory.hunt_direction = HuntDirection::Unknown;
    }

    let coord = match first_targetable(grid, last, &NEIGHBOURS) {
        Some(coord) => coord,
        None => random_target(grid, rng)?,
    };
    Ok(Targeting { coord, memory })
}
