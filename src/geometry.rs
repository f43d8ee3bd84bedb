use std::ops::{Add, AddAssign, Mul, Sub};

/// A position (or offset) on the stage. `.0` is the column, `.1` the row;
/// rows grow downwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Vector(pub i32, pub i32);

impl Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1)
    }
}
impl Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0, self.1 - other.1)
    }
}
impl Mul<i32> for Vector {
    type Output = Self;

    fn mul(self, other: i32) -> Self {
        Self(self.0 * other, self.1 * other)
    }
}
impl Add<Direction> for Vector {
    type Output = Self;

    fn add(self, dir: Direction) -> Self {
        self + dir.vector()
    }
}
impl Sub<Direction> for Vector {
    type Output = Self;

    fn sub(self, dir: Direction) -> Self {
        self - dir.vector()
    }
}
impl AddAssign<Direction> for Vector {
    fn add_assign(&mut self, dir: Direction) {
        *self = *self + dir;
    }
}

/// One of the four cardinal unit steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

pub static CARDINALS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    pub const fn vector(self) -> Vector {
        match self {
            Self::Up => Vector(0, -1),
            Self::Right => Vector(1, 0),
            Self::Down => Vector(0, 1),
            Self::Left => Vector(-1, 0),
        }
    }

    /// 90 degrees clockwise: `(x, y) -> (-y, x)`.
    pub const fn right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// 90 degrees counter-clockwise: `(x, y) -> (y, -x)`.
    pub const fn left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }
}

impl Mul<i32> for Direction {
    type Output = Vector;

    /// The position `n` steps from the origin in this direction.
    fn mul(self, n: i32) -> Vector {
        self.vector() * n
    }
}
