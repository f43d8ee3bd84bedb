use tracing::{debug, debug_span, error, trace};

use crate::{
    corridor::try_place_corridor,
    error::StageError,
    geometry::{Direction, Vector},
    rng::DigRng,
    room::try_place_room,
    stage::{Stage, Tile},
};

/// A pending spot to grow the dungeon from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Doorway {
    pub location: Vector,
    /// Points away from the structure the doorway belongs to.
    pub heading: Direction,
    /// Whether a successful dig here turns the location into a door, or
    /// just reopens it as floor.
    pub produces_door: bool,
}

impl Doorway {
    pub const fn new(location: Vector, heading: Direction, produces_door: bool) -> Self {
        Self {
            location,
            heading,
            produces_door,
        }
    }
}

/// Unordered bag of doorways, drained in uniformly random order.
#[derive(Clone, Debug, Default)]
pub struct Worklist {
    doorways: Vec<Doorway>,
}

impl Worklist {
    pub fn push(&mut self, doorway: Doorway) {
        self.doorways.push(doorway);
    }

    pub fn len(&self) -> usize {
        self.doorways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doorways.is_empty()
    }

    /// Removes and returns an element picked uniformly at random.
    pub fn pop_random(&mut self, rng: &mut DigRng) -> Option<Doorway> {
        if self.doorways.is_empty() {
            return None;
        }
        let which = rng.index(self.doorways.len());
        Some(self.doorways.swap_remove(which))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Doorway> {
        self.doorways.iter()
    }
}

impl Extend<Doorway> for Worklist {
    fn extend<I: IntoIterator<Item = Doorway>>(&mut self, iter: I) {
        self.doorways.extend(iter);
    }
}

/// Counters for one dig run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DigStats {
    pub doorways_popped: u32,
    pub rooms: u32,
    pub corridors: u32,
    pub doorways_dropped: u32,
}

pub struct Dungeon<'a> {
    stage: &'a mut Stage,
    rng: DigRng,
    worklist: Worklist,
    stats: DigStats,
}

impl<'a> Dungeon<'a> {
    /// Room-or-corridor attempts per doorway before it is given up on.
    pub const MAX_TRIES: u32 = 5;

    pub fn new(stage: &'a mut Stage, rng: DigRng) -> Self {
        Self {
            stage,
            rng,
            worklist: Worklist::default(),
            stats: DigStats::default(),
        }
    }

    /// Seeds the entrance at the bottom edge and grows from it until no
    /// doorways remain.
    pub fn generate(&mut self) -> DigStats {
        let span = debug_span!(
            "dig",
            width = self.stage.width(),
            height = self.stage.height(),
            seed = self.rng.seed()
        );
        let _guard = span.enter();

        self.seed();
        while self.step() {}

        debug!(
            popped = self.stats.doorways_popped,
            rooms = self.stats.rooms,
            corridors = self.stats.corridors,
            dropped = self.stats.doorways_dropped,
            "dig finished"
        );
        self.stats
    }

    /// The bottom-centre entrance every run starts from.
    pub fn entrance(&self) -> Vector {
        Vector(self.stage.width() / 2, self.stage.height() - 1)
    }

    /// Queues the entrance, makes it a door and walls in its two sides.
    pub fn seed(&mut self) {
        let entrance = self.entrance();
        if !self.stage.contains(entrance) {
            debug!(?entrance, "stage too small to seed");
            return;
        }
        if let Err(err) = self.seed_entrance(entrance) {
            error!(%err, "failed to seed the entrance");
        }
    }

    fn seed_entrance(&mut self, entrance: Vector) -> Result<(), StageError> {
        self.worklist.push(Doorway::new(entrance, Direction::Up, true));
        self.stage.set(entrance, Tile::Door)?;
        for side in [entrance + Direction::Left, entrance + Direction::Right] {
            if self.stage.contains(side) {
                self.stage.fill(side)?;
            }
        }
        debug!(?entrance, "seeded entrance");
        Ok(())
    }

    /// Pops one doorway and tries to grow from it. Returns `false` once the
    /// worklist is exhausted.
    pub fn step(&mut self) -> bool {
        let Some(doorway) = self.worklist.pop_random(&mut self.rng) else {
            return false;
        };
        self.stats.doorways_popped += 1;
        trace!(?doorway, pending = self.worklist.len(), "popped doorway");

        // Rooms placed since this doorway was queued may have sealed it.
        if self.stage.is_permawall(doorway.location) {
            self.stats.doorways_dropped += 1;
            return true;
        }

        if self.try_growth(doorway.location, doorway.heading) {
            if let Err(err) = self.finalize(doorway) {
                error!(%err, ?doorway, "doorway left the stage");
            }
        } else {
            trace!(?doorway, "dropped doorway");
            self.stats.doorways_dropped += 1;
        }
        true
    }

    fn finalize(&mut self, doorway: Doorway) -> Result<(), StageError> {
        if doorway.produces_door {
            self.stage.set(doorway.location, Tile::Door)
        } else if self.stage.is_wall(doorway.location) {
            self.stage.set(doorway.location, Tile::Floor)
        } else {
            Ok(())
        }
    }

    /// Digs a room or a corridor out of `pos`, retrying with fresh draws up
    /// to [`Self::MAX_TRIES`] times. New doorways go on the worklist.
    pub fn try_growth(&mut self, pos: Vector, heading: Direction) -> bool {
        for _ in 0..Self::MAX_TRIES {
            if self.rng.coin() {
                if let Some(doorways) = try_place_room(self.stage, &mut self.rng, pos, heading) {
                    self.stats.rooms += 1;
                    self.worklist.extend(doorways);
                    return true;
                }
            } else if let Some(end) = try_place_corridor(self.stage, &mut self.rng, pos, heading) {
                self.stats.corridors += 1;
                self.worklist.extend(end.doorway());
                return true;
            }
        }
        false
    }

    pub fn stage(&self) -> &Stage {
        &*self.stage
    }

    pub const fn worklist(&self) -> &Worklist {
        &self.worklist
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn dig(width: i32, height: i32, seed: u64) -> (Stage, DigStats) {
        let mut stage = Stage::new(width, height);
        let stats = Dungeon::new(&mut stage, DigRng::new(seed)).generate();
        (stage, stats)
    }

    #[test]
    fn seeding_opens_the_bottom_entrance() {
        let mut stage = Stage::new(20, 20);
        let mut dungeon = Dungeon::new(&mut stage, DigRng::new(1));
        dungeon.seed();

        assert_eq!(dungeon.entrance(), Vector(10, 19));
        assert_eq!(
            dungeon.worklist().iter().copied().collect::<Vec<_>>(),
            vec![Doorway::new(Vector(10, 19), Direction::Up, true)]
        );
        let stage = dungeon.stage();
        assert_eq!(stage.get(Vector(10, 19)), Ok(Tile::Door));
        assert_eq!(stage.get(Vector(9, 19)), Ok(Tile::Wall));
        assert_eq!(stage.get(Vector(11, 19)), Ok(Tile::Wall));
        assert_eq!(stage.count(Tile::Unknown), 400 - 3);
    }

    /// A 20x20 stage with a floor strip across row 5 and `start` at (10, 8).
    /// From (10, 8) heading up no room fits and only corridors of three or
    /// more cells get through.
    fn stage_below_hall(start: Tile) -> Stage {
        let mut stage = Stage::new(20, 20);
        for x in 2..=17 {
            stage.set(Vector(x, 5), Tile::Floor).unwrap();
        }
        stage.set(Vector(10, 8), start).unwrap();
        stage
    }

    /// Pops a single doorway at (10, 8) over many seeds, returning the
    /// resulting stages of the runs whose corridor went through.
    fn grow_below_hall(start: Tile, produces_door: bool) -> Vec<Stage> {
        let mut grown = Vec::new();
        for seed in 0..40 {
            let mut stage = stage_below_hall(start);
            let mut dungeon = Dungeon::new(&mut stage, DigRng::new(seed));
            dungeon
                .worklist
                .push(Doorway::new(Vector(10, 8), Direction::Up, produces_door));
            assert!(dungeon.step());
            assert!(!dungeon.step());
            let stats = dungeon.stats;
            assert_eq!(stats.rooms, 0);
            assert_eq!(stats.corridors + stats.doorways_dropped, 1);

            if stats.corridors == 1 {
                assert_eq!(stage.get(Vector(10, 7)), Ok(Tile::Floor));
                assert_eq!(stage.get(Vector(10, 6)), Ok(Tile::Door));
                grown.push(stage);
            } else {
                assert_eq!(stage, stage_below_hall(start));
            }
        }
        assert!(!grown.is_empty());
        grown
    }

    #[test]
    fn plain_doorway_on_wall_reopens_as_floor() {
        for stage in grow_below_hall(Tile::Wall, false) {
            assert_eq!(stage.get(Vector(10, 8)), Ok(Tile::Floor));
        }
    }

    #[test]
    fn plain_doorway_on_open_ground_is_left_alone() {
        for start in [Tile::Floor, Tile::Door] {
            for stage in grow_below_hall(start, false) {
                assert_eq!(stage.get(Vector(10, 8)), Ok(start));
            }
        }
    }

    #[test]
    fn door_doorway_becomes_a_door_after_growth() {
        // The corridor never touches its entrance; the door comes from the
        // doorway being finalized.
        for stage in grow_below_hall(Tile::Wall, true) {
            assert_eq!(stage.get(Vector(10, 8)), Ok(Tile::Door));
        }
    }

    #[test]
    fn doorway_on_permawall_is_dropped_without_drawing() {
        for seed in 0..10 {
            let mut stage = stage_below_hall(Tile::Permawall);
            let before = stage.clone();
            let mut dungeon = Dungeon::new(&mut stage, DigRng::new(seed));
            dungeon
                .worklist
                .push(Doorway::new(Vector(10, 8), Direction::Up, true));

            let mut expected = DigRng::new(seed);
            expected.index(1);

            assert!(dungeon.step());
            assert_eq!(
                dungeon.stats,
                DigStats {
                    doorways_popped: 1,
                    doorways_dropped: 1,
                    ..DigStats::default()
                }
            );
            assert!(dungeon.worklist().is_empty());
            for _ in 0..8 {
                assert_eq!(dungeon.rng.range(0, 1_000_000), expected.range(0, 1_000_000));
            }
            assert_eq!(stage, before);
            assert_eq!(stage.get(Vector(10, 8)), Ok(Tile::Permawall));
        }
    }

    #[test]
    fn tiny_stages_do_not_panic() {
        for (w, h) in [(1, 1), (1, 5), (2, 2), (3, 3), (5, 1)] {
            let (stage, stats) = dig(w, h, 9);
            assert_eq!(stage.count(Tile::Floor), 0, "{w}x{h}");
            assert_eq!(stats.doorways_popped, 1);
            assert_eq!(stats.doorways_dropped, 1);
        }
    }

    #[test]
    fn pop_random_never_repeats_or_loses() {
        let mut rng = DigRng::new(99);
        let mut worklist = Worklist::default();
        worklist.extend((0..50).map(|i| Doorway::new(Vector(i, 0), Direction::Up, true)));

        let mut seen = HashSet::new();
        while let Some(doorway) = worklist.pop_random(&mut rng) {
            assert!(seen.insert(doorway.location));
        }
        assert_eq!(seen.len(), 50);
        assert!(worklist.is_empty());
        assert_eq!(worklist.pop_random(&mut rng), None);
    }

    #[test]
    fn pop_random_is_not_fifo_or_lifo() {
        let mut firsts = HashSet::new();
        for seed in 0..40 {
            let mut rng = DigRng::new(seed);
            let mut worklist = Worklist::default();
            worklist.extend((0..8).map(|i| Doorway::new(Vector(i, 0), Direction::Up, true)));
            firsts.insert(worklist.pop_random(&mut rng).unwrap().location.0);
        }
        assert!(firsts.len() > 2);
    }

    #[test]
    fn runs_dig_rooms() {
        let mut rooms = 0;
        for seed in 0..8 {
            let (stage, stats) = dig(80, 40, seed);
            rooms += stats.rooms;
            assert_eq!(stats.rooms > 0, stage.count(Tile::Floor) > 0);
            // Corridors that pass their scan always join existing floor, so
            // only rooms add doorways.
            assert_eq!(stats.doorways_popped, 1 + 3 * stats.rooms);
        }
        assert!(rooms > 8);
    }

    #[test]
    fn border_never_opens() {
        for seed in 0..20 {
            let mut stage = Stage::new(40, 30);
            let mut dungeon = Dungeon::new(&mut stage, DigRng::new(seed));
            let entrance = dungeon.entrance();
            dungeon.generate();
            for (pos, tile) in stage.iter().filter(|&(pos, _)| stage.on_border(pos)) {
                assert_ne!(tile, Tile::Floor, "{pos:?}");
                if pos != entrance {
                    assert_ne!(tile, Tile::Door, "{pos:?}");
                }
            }
            assert_eq!(stage.get(entrance), Ok(Tile::Door));
        }
    }

    #[test]
    fn permawalls_are_permanent() {
        let mut permawalls: HashSet<Vector> = HashSet::new();
        for seed in 70..75 {
            let mut stage = Stage::new(50, 30);
            let mut dungeon = Dungeon::new(&mut stage, DigRng::new(seed));
            dungeon.seed();
            let mut seen: HashSet<Vector> = HashSet::new();
            loop {
                for &pos in &seen {
                    assert!(dungeon.stage().is_permawall(pos), "{pos:?}");
                }
                seen.extend(
                    dungeon
                        .stage()
                        .iter()
                        .filter(|&(_, t)| t == Tile::Permawall)
                        .map(|(pos, _)| pos),
                );
                if !dungeon.step() {
                    break;
                }
            }
            permawalls.extend(seen);
        }
        assert!(!permawalls.is_empty());
    }

    #[test]
    fn same_seed_same_map() {
        let (a, stats_a) = dig(60, 25, 31337);
        let (b, stats_b) = dig(60, 25, 31337);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(stats_a, stats_b);
    }
}
