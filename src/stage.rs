#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation
)]

use std::fmt::Display;

use crate::{error::StageError, geometry::Vector};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Never visited. Diggable, so it counts as wall for placement checks.
    Unknown,
    Floor,
    Wall,
    /// A wall that must never become floor or door.
    Permawall,
    Door,
}

impl Tile {
    pub const fn to_char(self) -> char {
        match self {
            Self::Unknown => ' ',
            Self::Floor => '.',
            Self::Wall | Self::Permawall => '#',
            Self::Door => '+',
        }
    }

    /// Inverse of [`Tile::to_char`]. Permawall and wall share a glyph, so
    /// `#` always reads back as [`Tile::Wall`].
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Unknown),
            '.' => Some(Self::Floor),
            '#' => Some(Self::Wall),
            '+' => Some(Self::Door),
            _ => None,
        }
    }

    pub const fn is_wall_like(self) -> bool {
        match self {
            Self::Unknown | Self::Wall | Self::Permawall => true,
            Self::Floor | Self::Door => false,
        }
    }
}

/// The fixed-size tile grid a dig run works on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Stage {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Unknown; width as usize * height as usize],
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Rebuilds a stage from its text form. Missing cells on short rows are
    /// `Unknown`; characters outside the tile alphabet are rejected.
    pub fn parse(text: &str, width: i32, height: i32) -> Option<Self> {
        let mut stage = Self::new(width, height);
        for (y, line) in text.lines().take(stage.height as usize).enumerate() {
            for (x, c) in line.chars().take(stage.width as usize).enumerate() {
                let tile = Tile::from_char(c)?;
                stage.set(Vector(x as i32, y as i32), tile).ok()?;
            }
        }
        Some(stage)
    }

    fn index(&self, pos: Vector) -> Result<usize, StageError> {
        if !self.contains(pos) {
            return Err(StageError::OutOfBounds {
                x: pos.0,
                y: pos.1,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.1 as usize * self.width as usize + pos.0 as usize)
    }

    pub fn get(&self, pos: Vector) -> Result<Tile, StageError> {
        Ok(self.tiles[self.index(pos)?])
    }

    /// Overwrites unconditionally. Keeping permawalls intact is the caller's job.
    pub fn set(&mut self, pos: Vector, tile: Tile) -> Result<(), StageError> {
        let idx = self.index(pos)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Sets `Wall`, leaving an existing permawall as it is.
    pub fn fill(&mut self, pos: Vector) -> Result<(), StageError> {
        if self.get(pos)? == Tile::Permawall {
            return Ok(());
        }
        self.set(pos, Tile::Wall)
    }

    /// Anywhere on the stage, including the outer ring.
    pub const fn contains(&self, pos: Vector) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    /// Strictly inside the outer ring, leaving room for a surrounding wall.
    pub const fn in_bounds(&self, pos: Vector) -> bool {
        pos.0 >= 1 && pos.0 < self.width - 1 && pos.1 >= 1 && pos.1 < self.height - 1
    }

    pub const fn on_border(&self, pos: Vector) -> bool {
        self.contains(pos) && !self.in_bounds(pos)
    }

    /// Off-stage positions are not wall-like.
    pub fn is_wall(&self, pos: Vector) -> bool {
        self.get(pos).is_ok_and(Tile::is_wall_like)
    }

    pub fn is_permawall(&self, pos: Vector) -> bool {
        self.get(pos) == Ok(Tile::Permawall)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every position paired with its tile, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Vector, Tile)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| (Vector((i % width) as i32, (i / width) as i32), t))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for row in self.tiles.chunks(self.width as usize) {
            for tile in row {
                write!(f, "{}", tile.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stage_is_all_unknown() {
        let stage = Stage::new(7, 4);
        assert_eq!(stage.tiles().len(), 28);
        assert_eq!(stage.count(Tile::Unknown), 28);
    }

    #[test]
    fn size_is_fixed_at_creation() {
        let stage = Stage::new(12, 8);
        assert_eq!((stage.width(), stage.height()), (12, 8));
        let empty = Stage::new(-3, 4);
        assert_eq!((empty.width(), empty.height()), (0, 4));
        assert!(empty.tiles().is_empty());
    }

    #[test]
    fn get_and_set_reject_out_of_bounds() {
        let mut stage = Stage::new(5, 5);
        assert_eq!(
            stage.get(Vector(5, 0)),
            Err(StageError::OutOfBounds {
                x: 5,
                y: 0,
                width: 5,
                height: 5
            })
        );
        assert!(stage.get(Vector(0, -1)).is_err());
        assert!(stage.set(Vector(-1, 2), Tile::Floor).is_err());
        assert_eq!(stage.count(Tile::Unknown), 25);

        stage.set(Vector(4, 4), Tile::Door).unwrap();
        assert_eq!(stage.get(Vector(4, 4)), Ok(Tile::Door));
    }

    #[test]
    fn bounds_predicates() {
        let stage = Stage::new(4, 3);
        assert!(stage.contains(Vector(0, 0)));
        assert!(!stage.in_bounds(Vector(0, 0)));
        assert!(stage.on_border(Vector(3, 2)));
        assert!(stage.in_bounds(Vector(1, 1)));
        assert!(stage.in_bounds(Vector(2, 1)));
        assert!(!stage.in_bounds(Vector(3, 1)));
        assert!(!stage.contains(Vector(4, 1)));
    }

    #[test]
    fn wall_like_tiles() {
        let mut stage = Stage::new(3, 1);
        stage.set(Vector(1, 0), Tile::Permawall).unwrap();
        stage.set(Vector(2, 0), Tile::Door).unwrap();
        assert!(stage.is_wall(Vector(0, 0)));
        assert!(stage.is_wall(Vector(1, 0)));
        assert!(stage.is_permawall(Vector(1, 0)));
        assert!(!stage.is_wall(Vector(2, 0)));
        assert!(!stage.is_wall(Vector(3, 0)));
    }

    #[test]
    fn fill_keeps_permawall() {
        let mut stage = Stage::new(2, 1);
        stage.set(Vector(0, 0), Tile::Permawall).unwrap();
        stage.fill(Vector(0, 0)).unwrap();
        stage.fill(Vector(1, 0)).unwrap();
        assert_eq!(stage.get(Vector(0, 0)), Ok(Tile::Permawall));
        assert_eq!(stage.get(Vector(1, 0)), Ok(Tile::Wall));
        assert!(stage.fill(Vector(2, 0)).is_err());
    }

    #[test]
    fn text_form_uses_fixed_alphabet() {
        let mut stage = Stage::new(5, 2);
        stage.set(Vector(0, 0), Tile::Wall).unwrap();
        stage.set(Vector(1, 0), Tile::Permawall).unwrap();
        stage.set(Vector(2, 0), Tile::Floor).unwrap();
        stage.set(Vector(3, 0), Tile::Door).unwrap();
        assert_eq!(stage.to_string(), "##.+ \n     \n");
    }

    #[test]
    fn parse_reads_back_text_form() {
        let text = "#+#\n#.#\n###\n";
        let stage = Stage::parse(text, 3, 3).unwrap();
        assert_eq!(stage.get(Vector(1, 0)), Ok(Tile::Door));
        assert_eq!(stage.get(Vector(1, 1)), Ok(Tile::Floor));
        assert_eq!(stage.to_string(), text);
        assert!(Stage::parse("#?#\n", 3, 1).is_none());
    }
}
