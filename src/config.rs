//! Fixed game parameters.

/// Side length of every grid.
pub const BOARD_SIZE: u8 = 10;

/// Number of ships in the standard fleet.
pub const NUM_SHIPS: usize = 10;

/// Ship sizes each side must place before a match starts.
pub const FLEET_COMPOSITION: [usize; NUM_SHIPS] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// Longest ship allowed on the board.
pub const MAX_SHIP_SIZE: usize = 4;

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = total_cells(&FLEET_COMPOSITION);

const fn total_cells(sizes: &[usize]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < sizes.len() {
        total += sizes[i];
        i += 1;
    }
    total
}

/// Random origins tried for a single ship before the whole board is redrawn.
pub const PLACEMENT_ATTEMPTS_PER_SHIP: usize = 1_000;

/// Whole-board redraws before random placement gives up.
pub const PLACEMENT_RESHUFFLES: usize = 100;

/// Number of entries the leaderboard keeps.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Display name used for computer-controlled sides.
pub const AI_NAME: &str = "Computer";
