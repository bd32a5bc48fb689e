//! Match state machine: placement, alternating turns and the end of a match.
//!
//! A [`Match`] is a plain value. [`Match::transition`] maps a state and a
//! [`Command`] to the next state plus the events it produced, and
//! [`Match::apply`] commits that result in place. Rejected commands leave the
//! match untouched.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{select_target, AiMemory, Difficulty};
use crate::attack::attack;
use crate::common::{AttackResult, EngineError, InvalidAttack};
use crate::config::{AI_NAME, FLEET_COMPOSITION, MAX_SHIP_SIZE};
use crate::fleet::{all_placed, place, place_random, Fleet};
use crate::grid::{Coord, Grid};
use crate::scores::MatchOutcome;
use crate::ship::{Orientation, Ship};

/// One of the two seats of a match. `First` always opens the firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Who makes the decisions for a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai(Difficulty),
}

/// Identity of a side before the match starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contender {
    pub name: String,
    pub controller: Controller,
}

impl Contender {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controller: Controller::Human,
        }
    }

    /// Computer opponent, named [`AI_NAME`].
    pub fn ai(difficulty: Difficulty) -> Self {
        Self {
            name: AI_NAME.to_string(),
            controller: Controller::Ai(difficulty),
        }
    }
}

/// Where the match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The given side is placing its fleet.
    Placement(Side),
    /// The given side is firing.
    InProgress(Side),
    /// The given side sank the opposing fleet.
    Finished(Side),
}

/// Requests from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Throw away the placing side's ships and start its placement over.
    StartPlacement,
    PlaceShip {
        origin: Coord,
        size: usize,
        orientation: Orientation,
    },
    /// Replace the placing side's fleet with a random one.
    PlaceRandom,
    ConfirmPlacement,
    Attack {
        by: Side,
        target: Coord,
    },
    /// Back to a fresh placement phase with the same contenders.
    ResetMatch,
}

/// What happened while applying a command, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    PlacementStarted(Side),
    ShipPlaced {
        side: Side,
        origin: Coord,
        size: usize,
        orientation: Orientation,
    },
    FleetRandomized(Side),
    PlacementConfirmed(Side),
    Shot {
        attacker: Side,
        target: Coord,
        result: AttackResult,
    },
    TurnPassed(Side),
    /// Emitted exactly once per completed match.
    MatchEnded(MatchOutcome),
    MatchReset,
}

/// A grid and fleet with the identity that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSide {
    name: String,
    controller: Controller,
    grid: Grid,
    fleet: Fleet,
    memory: AiMemory,
}

impl MatchSide {
    fn new(contender: Contender) -> Self {
        Self {
            name: contender.name,
            controller: contender.controller,
            grid: Grid::new(),
            fleet: Fleet::new(),
            memory: AiMemory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Targeting memory this side keeps about its opponent.
    pub fn memory(&self) -> &AiMemory {
        &self.memory
    }

    /// Whether the fleet matches the standard composition.
    pub fn is_ready(&self) -> bool {
        all_placed(&self.fleet, &FLEET_COMPOSITION)
    }

    fn clear(&mut self) {
        self.grid = Grid::new();
        self.fleet = Fleet::new();
        self.memory = AiMemory::new();
    }

    fn deploy(
        &mut self,
        origin: Coord,
        size: usize,
        orientation: Orientation,
    ) -> Result<Ship, EngineError> {
        if size == 0 || size > MAX_SHIP_SIZE {
            return Err(EngineError::InvalidShipSize(size));
        }
        let allowed = FLEET_COMPOSITION.iter().filter(|&&s| s == size).count();
        let placed = self.fleet.ships().iter().filter(|s| s.size() == size).count();
        if placed >= allowed {
            return Err(EngineError::CompositionExceeded(size));
        }
        let (grid, ship) = place(&self.grid, origin, size, orientation)?;
        self.grid = grid;
        self.fleet = self.fleet.with_ship(ship);
        Ok(ship)
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        let (grid, fleet) = place_random(&FLEET_COMPOSITION, rng)?;
        self.grid = grid;
        self.fleet = fleet;
        Ok(())
    }
}

/// Two sides and the phase they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    sides: [MatchSide; 2],
    phase: Phase,
}

impl Match {
    /// New match waiting for `first` to place its fleet.
    pub fn new(first: Contender, second: Contender) -> Self {
        Self {
            sides: [MatchSide::new(first), MatchSide::new(second)],
            phase: Phase::Placement(Side::First),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side(&self, side: Side) -> &MatchSide {
        &self.sides[side.index()]
    }

    /// Side whose turn it is to fire, if the match is under way.
    pub fn active_side(&self) -> Option<Side> {
        match self.phase {
            Phase::InProgress(side) => Some(side),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Finished(side) => Some(side),
            _ => None,
        }
    }

    /// Winner and loser names once the match is over.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.winner().map(|side| self.outcome_for(side))
    }

    fn outcome_for(&self, winner: Side) -> MatchOutcome {
        MatchOutcome {
            winner: self.side(winner).name.clone(),
            loser: self.side(winner.other()).name.clone(),
        }
    }

    /// Apply `command` in place. On error nothing changes.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Result<Vec<MatchEvent>, EngineError> {
        let (next, events) = self.transition(command, rng)?;
        *self = next;
        Ok(events)
    }

    /// The state `command` leads to, and the events along the way.
    pub fn transition<R: Rng + ?Sized>(
        &self,
        command: Command,
        rng: &mut R,
    ) -> Result<(Match, Vec<MatchEvent>), EngineError> {
        let mut next = self.clone();
        let mut events = Vec::new();
        next.step(command, rng, &mut events)?;
        Ok((next, events))
    }

    fn step<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), EngineError> {
        match command {
            Command::ResetMatch => {
                for side in self.sides.iter_mut() {
                    side.clear();
                }
                self.phase = Phase::Placement(Side::First);
                events.push(MatchEvent::MatchReset);
                events.push(MatchEvent::PlacementStarted(Side::First));
                Ok(())
            }
            Command::StartPlacement => {
                let side = self.placing_side()?;
                self.sides[side.index()].clear();
                events.push(MatchEvent::PlacementStarted(side));
                Ok(())
            }
            Command::PlaceShip {
                origin,
                size,
                orientation,
            } => {
                let side = self.placing_side()?;
                self.sides[side.index()].deploy(origin, size, orientation)?;
                events.push(MatchEvent::ShipPlaced {
                    side,
                    origin,
                    size,
                    orientation,
                });
                Ok(())
            }
            Command::PlaceRandom => {
                let side = self.placing_side()?;
                self.sides[side.index()].randomize(rng)?;
                events.push(MatchEvent::FleetRandomized(side));
                Ok(())
            }
            Command::ConfirmPlacement => {
                let side = self.placing_side()?;
                self.confirm(side, rng, events)?;
                self.run_ai_turns(rng, events)
            }
            Command::Attack { by, target } => {
                self.check_attack(by, target)?;
                self.fire(by, target, events)?;
                self.run_ai_turns(rng, events)
            }
        }
    }

    fn placing_side(&self) -> Result<Side, EngineError> {
        match self.phase {
            Phase::Placement(side) => Ok(side),
            _ => Err(EngineError::WrongPhase),
        }
    }

    fn confirm<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        rng: &mut R,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), EngineError> {
        let seat = &mut self.sides[side.index()];
        if seat.is_ai() && !seat.is_ready() {
            seat.randomize(rng)?;
            events.push(MatchEvent::FleetRandomized(side));
        }
        if !seat.is_ready() {
            return Err(EngineError::PlacementIncomplete);
        }
        info!("{} confirmed placement", seat.name);
        events.push(MatchEvent::PlacementConfirmed(side));

        match side {
            Side::First => {
                self.phase = Phase::Placement(Side::Second);
                events.push(MatchEvent::PlacementStarted(Side::Second));
                if self.side(Side::Second).is_ai() {
                    self.confirm(Side::Second, rng, events)?;
                }
            }
            Side::Second => {
                self.phase = Phase::InProgress(Side::First);
                info!("match started, {} fires first", self.side(Side::First).name);
            }
        }
        Ok(())
    }

    /// Reject attacks that must never reach the resolver.
    fn check_attack(&self, by: Side, target: Coord) -> Result<(), EngineError> {
        match self.phase {
            Phase::Placement(_) => Err(InvalidAttack::PlacementInProgress.into()),
            Phase::Finished(_) => Err(InvalidAttack::MatchFinished.into()),
            Phase::InProgress(active) if active != by => Err(InvalidAttack::OutOfTurn.into()),
            Phase::InProgress(_) => {
                let cell = self.side(by.other()).grid.get(target)?;
                if cell.is_targetable() {
                    Ok(())
                } else {
                    Err(InvalidAttack::AlreadyFired.into())
                }
            }
        }
    }

    /// Resolve one shot from `attacker` and move the phase along.
    fn fire(
        &mut self,
        attacker: Side,
        target: Coord,
        events: &mut Vec<MatchEvent>,
    ) -> Result<AttackResult, EngineError> {
        let defender = &mut self.sides[attacker.other().index()];
        let outcome = attack(&defender.grid, &defender.fleet, target);
        // The target passed `check_attack`, so only a grid/fleet mismatch
        // can make the resolver refuse it.
        if outcome.result == AttackResult::Invalid {
            return Err(EngineError::UnownedShipCell {
                row: target.row,
                col: target.col,
            });
        }
        defender.grid = outcome.grid;
        defender.fleet = outcome.fleet;

        let shooter = &mut self.sides[attacker.index()];
        shooter.memory = shooter.memory.observe(target, outcome.result);
        events.push(MatchEvent::Shot {
            attacker,
            target,
            result: outcome.result,
        });

        match outcome.result {
            AttackResult::Miss => {
                self.phase = Phase::InProgress(attacker.other());
                events.push(MatchEvent::TurnPassed(attacker.other()));
            }
            AttackResult::FleetDefeated => {
                self.phase = Phase::Finished(attacker);
                let result = self.outcome_for(attacker);
                info!("{} defeated {}", result.winner, result.loser);
                events.push(MatchEvent::MatchEnded(result));
            }
            AttackResult::Hit | AttackResult::HitAndSunk | AttackResult::Invalid => {}
        }
        Ok(outcome.result)
    }

    /// Play computer turns until a human is to move or the match is over.
    fn run_ai_turns<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), EngineError> {
        while let Phase::InProgress(active) = self.phase {
            let Controller::Ai(difficulty) = self.side(active).controller else {
                break;
            };
            self.ai_turn(active, difficulty, rng, events)?;
        }
        Ok(())
    }

    /// One computer turn: keep firing while shots hit.
    fn ai_turn<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        difficulty: Difficulty,
        rng: &mut R,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), EngineError> {
        loop {
            let memory = self.side(side).memory;
            let targeting = select_target(difficulty, &memory, &self.side(side.other()).grid, rng)?;
            self.sides[side.index()].memory = targeting.memory;
            let result = self.fire(side, targeting.coord, events)?;
            if !result.grants_follow_up() {
                debug!("{} ends turn on {:?}", self.side(side).name, result);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ready_match(rng: &mut SmallRng) -> Result<Match, EngineError> {
        let mut game = Match::new(Contender::human("ann"), Contender::human("bob"));
        for _ in 0..2 {
            game.apply(Command::PlaceRandom, rng)?;
            game.apply(Command::ConfirmPlacement, rng)?;
        }
        Ok(game)
    }

    #[test]
    fn shot_at_segment_missing_from_fleet_is_reported() -> Result<(), EngineError> {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut game = ready_match(&mut rng)?;
        // Grid still carries the ships, the fleet forgot them.
        game.sides[Side::Second.index()].fleet = Fleet::new();
        let target = game
            .side(Side::Second)
            .grid()
            .cells(true)
            .find(|(_, cell)| *cell == Cell::ShipPresent)
            .map(|(coord, _)| coord)
            .ok_or(EngineError::NoTargetsRemaining)?;

        let before = game.clone();
        let err = game
            .apply(Command::Attack { by: Side::First, target }, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnownedShipCell {
                row: target.row,
                col: target.col
            }
        );
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn ai_turn_surfaces_unowned_segment() -> Result<(), EngineError> {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut game = Match::new(Contender::human("ann"), Contender::ai(Difficulty::Easy));
        game.apply(Command::PlaceRandom, &mut rng)?;
        game.apply(Command::ConfirmPlacement, &mut rng)?;
        // Leave only ship segments open on the human's grid, then drop the
        // fleet: the computer's first shot lands on an unowned segment.
        let seat = &mut game.sides[Side::First.index()];
        let water: Vec<Coord> = seat
            .grid
            .cells(true)
            .filter(|(_, cell)| *cell == Cell::Empty)
            .map(|(coord, _)| coord)
            .collect();
        for coord in water {
            seat.grid = seat.grid.with_shot(coord)?;
        }
        seat.fleet = Fleet::new();

        let water = game
            .side(Side::Second)
            .grid()
            .cells(true)
            .find(|(_, cell)| *cell == Cell::Empty)
            .map(|(coord, _)| coord)
            .ok_or(EngineError::NoTargetsRemaining)?;
        let result = game.apply(
            Command::Attack {
                by: Side::First,
                target: water,
            },
            &mut rng,
        );
        assert!(matches!(result, Err(EngineError::UnownedShipCell { .. })));
        // Rejected as a whole: the human's miss is not committed either.
        assert_eq!(game.phase(), Phase::InProgress(Side::First));
        assert_eq!(game.side(Side::Second).grid().count(Cell::Miss), 0);
        Ok(())
    }
}
