//! Integer grid geometry: points and the four board orientations.
//!
//! Pure value types with no state. `Point` serializes as an `[x, y]` array so
//! level files stay compact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A position in 2D grid space. Nodes are identified by their point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point::new(0, 0);
    pub const ONE: Point = Point::new(1, 1);
    pub const UP: Point = Point::new(0, 1);
    pub const DOWN: Point = Point::new(0, -1);
    pub const LEFT: Point = Point::new(-1, 0);
    pub const RIGHT: Point = Point::new(1, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sign (-1, 0 or 1).
    pub fn signum(self) -> Point {
        Point::new(self.x.signum(), self.y.signum())
    }

    pub fn abs(self) -> Point {
        Point::new(self.x.abs(), self.y.abs())
    }

    /// The point `length` steps away in `orientation`.
    pub fn next(self, length: i32, orientation: Orientation) -> Point {
        self + orientation.to_point() * length
    }

    /// Manhattan (grid) distance to `other`, saturating at `i32::MAX`.
    pub fn manhattan(self, other: Point) -> i32 {
        let d = self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// The orientation from `self` toward `other` when both share an axis,
    /// `None` otherwise. Compares coordinates, so it cannot overflow.
    pub fn direction_to(self, other: Point) -> Orientation {
        use std::cmp::Ordering::*;
        match (other.x.cmp(&self.x), other.y.cmp(&self.y)) {
            (Equal, Greater) => Orientation::Up,
            (Equal, Less) => Orientation::Down,
            (Less, Equal) => Orientation::Left,
            (Greater, Equal) => Orientation::Right,
            _ => Orientation::None,
        }
    }

    /// True when the point lies on an axis, i.e. it can describe a direction.
    pub fn is_axis_aligned(self) -> bool {
        self.x == 0 || self.y == 0
    }

    /// The orientation this offset points in. Diagonal offsets map to `None`.
    pub fn to_orientation(self) -> Orientation {
        match self.signum() {
            Point::UP => Orientation::Up,
            Point::DOWN => Orientation::Down,
            Point::LEFT => Orientation::Left,
            Point::RIGHT => Orientation::Right,
            _ => Orientation::None,
        }
    }

    /// Bounding-box extents (max − min on each axis). Empty input gives `ZERO`.
    pub fn boundary<I>(points: I) -> Point
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Point::ZERO;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        max - min
    }
}

impl From<[i32; 2]> for Point {
    fn from(v: [i32; 2]) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Point;
    fn mul(self, rhs: i32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Point> for i32 {
    type Output = Point;
    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ── Orientation ─────────────────────────────────────────────────────────

/// One of the four cardinal directions on the board, or `None`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Orientation {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    /// The four real orientations, in slot order.
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Down,
        Orientation::Left,
        Orientation::Right,
    ];

    pub fn opposite(self) -> Orientation {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
            Orientation::Left => Orientation::Right,
            Orientation::Right => Orientation::Left,
            Orientation::None => Orientation::None,
        }
    }

    /// Rotate 90° counter-clockwise `steps` times (negative steps turn clockwise).
    pub fn rotated(self, steps: i32) -> Orientation {
        let turns = steps.rem_euclid(4);
        (0..turns).fold(self, |o, _| match o {
            Orientation::Up => Orientation::Left,
            Orientation::Left => Orientation::Down,
            Orientation::Down => Orientation::Right,
            Orientation::Right => Orientation::Up,
            Orientation::None => Orientation::None,
        })
    }

    /// Unit vector for this orientation (`ZERO` for `None`).
    pub fn to_point(self) -> Point {
        match self {
            Orientation::Up => Point::UP,
            Orientation::Down => Point::DOWN,
            Orientation::Left => Point::LEFT,
            Orientation::Right => Point::RIGHT,
            Orientation::None => Point::ZERO,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }

    /// Down and Left are the "negative" orientations; fields are keyed
    /// from the other side.
    pub fn is_down_left(self) -> bool {
        matches!(self, Orientation::Down | Orientation::Left)
    }

    /// The two orientations perpendicular to this one.
    pub fn orthogonal(self) -> [Orientation; 2] {
        [self.rotated(1), self.rotated(-1)]
    }

    /// Slot index into per-orientation arrays. `None` has no slot.
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            Orientation::Up => Some(0),
            Orientation::Down => Some(1),
            Orientation::Left => Some(2),
            Orientation::Right => Some(3),
            Orientation::None => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::None => "none",
            Orientation::Up => "up",
            Orientation::Down => "down",
            Orientation::Left => "left",
            Orientation::Right => "right",
        };
        f.write_str(name)
    }
}

/// A point paired with an orientation, the way level files address fields and arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDir {
    #[serde(rename = "parent")]
    pub point: Point,
    pub direction: Orientation,
}

impl PointDir {
    pub const fn new(point: Point, direction: Orientation) -> Self {
        Self { point, direction }
    }
}
