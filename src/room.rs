use tracing::{error, trace};

use crate::{
    dungeon::Doorway,
    geometry::{Direction, Vector},
    rng::DigRng,
    stage::{Stage, Tile},
};

/// A rectangular room laid out against an entrance.
///
/// ```text
/// ########
/// #......# ^
/// #......# | size.1
/// #......# |
/// #......# v
/// C####+##
///  <---->
///  size.0
/// <---->
/// entrance_offset
/// ```
///
/// `C` is the corner; rows run along `heading`, columns along
/// `heading.right()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub entrance: Vector,
    pub heading: Direction,
    pub corner: Vector,
    /// Interior size, across (`.0`) and along (`.1`) the heading.
    pub size: Vector,
}

impl Room {
    pub const MIN_SIZE: i32 = 3;
    pub const MAX_SIZE: i32 = 6;

    pub fn new(entrance: Vector, heading: Direction, size: Vector, entrance_offset: i32) -> Self {
        Self {
            entrance,
            heading,
            corner: entrance + heading.left() * entrance_offset,
            size,
        }
    }

    /// Draws a size and an entrance offset.
    pub fn random(rng: &mut DigRng, entrance: Vector, heading: Direction) -> Self {
        let sx = rng.range(Self::MIN_SIZE, Self::MAX_SIZE);
        let sy = rng.range(Self::MIN_SIZE, Self::MAX_SIZE);
        let entrance_offset = rng.range(1, sx);
        Self::new(entrance, heading, Vector(sx, sy), entrance_offset)
    }

    /// Positions of a `w` by `h` block starting at `origin`, row by row.
    fn block(&self, origin: Vector, w: i32, h: i32) -> impl Iterator<Item = Vector> {
        let heading = self.heading;
        (0..h).flat_map(move |yi| {
            (0..w).map(move |xi| origin + heading * yi + heading.right() * xi)
        })
    }

    /// The whole footprint, including the surrounding wall ring.
    pub fn outline(&self) -> impl Iterator<Item = Vector> {
        self.block(self.corner, self.size.0 + 2, self.size.1 + 2)
    }

    pub fn interior(&self) -> impl Iterator<Item = Vector> {
        self.block(
            self.corner + self.heading + self.heading.right(),
            self.size.0,
            self.size.1,
        )
    }

    pub fn corners(&self) -> [Vector; 4] {
        let across = self.heading.right() * (self.size.0 + 1);
        let along = self.heading * (self.size.1 + 1);
        [
            self.corner,
            self.corner + across,
            self.corner + along,
            self.corner + across + along,
        ]
    }

    /// Whether the footprint is on the stage and undug, apart from the
    /// entrance. Cells that would become floor or door must not be permawall.
    pub fn fits(&self, stage: &Stage) -> bool {
        for pos in self.outline() {
            if !stage.contains(pos) {
                return false;
            }
            if !stage.is_wall(pos) && pos != self.entrance {
                return false;
            }
        }
        !stage.is_permawall(self.entrance) && !self.interior().any(|pos| stage.is_permawall(pos))
    }

    /// Writes the room. Only call after [`Room::fits`].
    pub fn dig(&self, stage: &mut Stage) -> Result<(), crate::error::StageError> {
        for pos in self.outline() {
            stage.fill(pos)?;
        }
        for pos in self.corners() {
            stage.set(pos, Tile::Permawall)?;
        }
        for pos in self.interior() {
            stage.set(pos, Tile::Floor)?;
        }
        stage.set(self.entrance, Tile::Door)
    }

    /// One new doorway on each of the left, far and right walls.
    pub fn doorways(&self, rng: &mut DigRng) -> [Doorway; 3] {
        let (heading, right) = (self.heading, self.heading.right());
        let (sx, sy) = (self.size.0, self.size.1);

        let left_wall = self.corner + heading * rng.range(1, sy);
        let far_wall = self.corner + heading * (sy + 1) + right * rng.range(1, sx);
        let right_wall = self.corner + right * (sx + 1) + heading * rng.range(1, sy);

        [
            Doorway::new(left_wall, heading.left(), true),
            Doorway::new(far_wall, heading, true),
            Doorway::new(right_wall, right, true),
        ]
    }
}

/// Tries once to dig a random room behind `entrance`. On failure the stage
/// is untouched; on success the room's three new doorways are returned for
/// the caller to queue.
pub fn try_place_room(
    stage: &mut Stage,
    rng: &mut DigRng,
    entrance: Vector,
    heading: Direction,
) -> Option<[Doorway; 3]> {
    let room = Room::random(rng, entrance, heading);
    if !room.fits(stage) {
        trace!(?entrance, ?heading, size = ?room.size, "room does not fit");
        return None;
    }
    if let Err(err) = room.dig(stage) {
        error!(%err, "room left the stage after passing its fit check");
        return None;
    }
    trace!(?entrance, ?heading, size = ?room.size, "dug room");
    Some(room.doorways(rng))
}
