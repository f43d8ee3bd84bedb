use tracing::{error, trace};

use crate::{
    dungeon::Doorway,
    error::StageError,
    geometry::{Direction, Vector},
    rng::DigRng,
    stage::{Stage, Tile},
};

/// A straight one-wide passage that has passed its footprint scan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Corridor {
    pub entrance: Vector,
    pub heading: Direction,
    /// Number of floor cells, not counting the entrance.
    pub length: i32,
}

/// How a dug corridor finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CorridorEnd {
    /// Ran into open floor; the last cell became a door.
    Joined,
    /// Stopped short of anything open; the last cell was walled back up and
    /// may be reopened from the returned doorway.
    Sealed(Doorway),
}

impl CorridorEnd {
    pub const fn doorway(self) -> Option<Doorway> {
        match self {
            Self::Joined => None,
            Self::Sealed(doorway) => Some(doorway),
        }
    }
}

impl Corridor {
    pub const MIN_LENGTH: i32 = 2;
    pub const MAX_LENGTH: i32 = 6;

    /// Walks up to `length` cells from `entrance`, stopping early at the
    /// first open cell. Returns `None` if the path leaves the stage, brushes
    /// open ground with its flanks, crosses a permawall, ends up one cell or
    /// shorter, or never meets anything open.
    pub fn scan(stage: &Stage, entrance: Vector, heading: Direction, length: i32) -> Option<Self> {
        let (left, right) = (heading.left(), heading.right());
        let mut pos = entrance;
        let mut dug = length;
        let mut intersects = false;

        for step in 0..length {
            pos += heading;
            if !stage.in_bounds(pos) {
                return None;
            }
            if !stage.is_wall(pos) {
                intersects = true;
                dug = step;
                break;
            }
            if !stage.is_wall(pos + left) || !stage.is_wall(pos + right) || stage.is_permawall(pos) {
                return None;
            }
        }

        // A single cell would put two doors back to back.
        if dug <= 1 || !intersects {
            return None;
        }
        Some(Self {
            entrance,
            heading,
            length: dug,
        })
    }

    /// Writes the passage. Only call on the result of [`Corridor::scan`].
    pub fn dig(&self, stage: &mut Stage) -> Result<CorridorEnd, StageError> {
        let heading = self.heading;
        let mut pos = self.entrance;

        for _ in 0..self.length {
            pos += heading;
            stage.set(pos, Tile::Floor)?;
            stage.fill(pos + heading.left())?;
            stage.fill(pos + heading.right())?;

            let next = pos + heading;
            if !stage.in_bounds(next) || !stage.is_wall(next) {
                break;
            }
        }

        let next = pos + heading;
        if !stage.in_bounds(next) || stage.is_wall(next) {
            stage.fill(pos)?;
            Ok(CorridorEnd::Sealed(Doorway::new(pos, heading, false)))
        } else {
            stage.set(pos, Tile::Door)?;
            Ok(CorridorEnd::Joined)
        }
    }
}

/// Tries once to dig a corridor of random length out of `entrance`. On
/// failure the stage is untouched.
pub fn try_place_corridor(
    stage: &mut Stage,
    rng: &mut DigRng,
    entrance: Vector,
    heading: Direction,
) -> Option<CorridorEnd> {
    let length = rng.range(Corridor::MIN_LENGTH, Corridor::MAX_LENGTH);
    let Some(corridor) = Corridor::scan(stage, entrance, heading, length) else {
        trace!(?entrance, ?heading, length, "corridor rejected");
        return None;
    };
    match corridor.dig(stage) {
        Ok(end) => {
            trace!(?entrance, ?heading, length = corridor.length, ?end, "dug corridor");
            Some(end)
        }
        Err(err) => {
            error!(%err, "corridor left the stage after passing its scan");
            None
        }
    }
}
