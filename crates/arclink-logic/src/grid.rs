//! Node placement and field resolution.
//!
//! `Grid` owns the fixed set of nodes. Fields are not stored: a `Field` is a
//! view computed from two neighboring nodes, plus an occupancy side-table
//! keyed by the field's canonical `FieldKey`.
//!
//! A node's neighbor in an orientation is the nearest node along that ray, so
//! a field's length is the grid distance between the two nodes.

use crate::arc::{Arc, ArcId};
use crate::error::MoveError;
use crate::geometry::{Orientation, Point};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Arena index of a node on its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A fixed vertex on the board.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    position: Point,
    /// Nearest node per orientation slot (Up, Down, Left, Right).
    neighbors: [Option<NodeId>; 4],
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// The nearest node in `orientation`, if any.
    pub fn neighbor(&self, orientation: Orientation) -> Option<NodeId> {
        orientation.slot().and_then(|s| self.neighbors[s])
    }
}

// ── Fields ──────────────────────────────────────────────────────────────

/// Canonical identity of a field: the lower/left endpoint plus `Up` or `Right`.
///
/// Both views of the same slot (from either endpoint) map to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub origin: Point,
    pub orientation: Orientation,
}

impl FieldKey {
    fn between(anchor: Point, orientation: Orientation, neighbor: Point) -> Self {
        if orientation.is_down_left() {
            Self {
                origin: neighbor,
                orientation: orientation.opposite(),
            }
        } else {
            Self {
                origin: anchor,
                orientation,
            }
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.orientation)
    }
}

/// A directional slot between two neighboring nodes, viewed from `position`
/// looking in `direction`.
///
/// Equality and hashing go through the canonical key, so the view from the
/// neighbor in the opposite direction compares equal.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    key: FieldKey,
    position: Point,
    direction: Orientation,
    parent: NodeId,
    connected: NodeId,
    connected_position: Point,
    length: i32,
    arc: Option<ArcId>,
}

impl Field {
    pub fn key(&self) -> FieldKey {
        self.key
    }

    /// Anchor point this view was taken from.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn connected_position(&self) -> Point {
        self.connected_position
    }

    pub fn direction(&self) -> Orientation {
        self.direction
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn parent_node(&self) -> NodeId {
        self.parent
    }

    pub fn connected_node(&self) -> NodeId {
        self.connected
    }

    /// Both endpoints, parent first.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.parent, self.connected)
    }

    pub fn has_arc(&self) -> bool {
        self.arc.is_some()
    }

    /// The arc occupying this field at the time the view was taken.
    pub fn arc(&self) -> Option<ArcId> {
        self.arc
    }

    /// The endpoint this field extends from when travelling in `orientation`.
    pub fn root(&self, orientation: Orientation) -> Option<NodeId> {
        if orientation == self.direction {
            Some(self.parent)
        } else if orientation == self.direction.opposite() {
            Some(self.connected)
        } else {
            None
        }
    }

    /// Check whether `arc` may be placed here: the field must be empty and the
    /// lengths must agree.
    pub fn valid_placement(&self, arc: &Arc) -> Result<(), MoveError> {
        if self.arc.is_some() {
            return Err(MoveError::FieldOccupied(self.key));
        }
        if arc.length() != self.length {
            return Err(MoveError::LengthMismatch {
                arc: arc.length(),
                field: self.length,
            });
        }
        Ok(())
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}]",
            self.position, self.connected_position, self.length
        )
    }
}

// ── Grid ────────────────────────────────────────────────────────────────

/// The set of placed nodes plus field occupancy.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    nodes: Vec<Node>,
    index: HashMap<Point, NodeId>,
    occupancy: HashMap<FieldKey, ArcId>,
    size: Point,
}

impl Grid {
    /// Largest absolute coordinate a node may take. Keeps every distance and
    /// extent on the board well inside `i32`.
    pub const COORD_LIMIT: i32 = 1 << 16;

    pub fn new() -> Self {
        Self::default()
    }

    /// Place a node at `position`.
    ///
    /// Rejected when a coordinate exceeds `COORD_LIMIT`, when a node is
    /// already there, or when the position lies inside an occupied field (the
    /// field would change length under its arc).
    pub fn add_node(&mut self, position: Point) -> Result<NodeId, MoveError> {
        let limit = Self::COORD_LIMIT.unsigned_abs();
        if position.x.unsigned_abs() > limit || position.y.unsigned_abs() > limit {
            return Err(MoveError::OutOfRange(position));
        }
        if self.index.contains_key(&position) {
            return Err(MoveError::NodeOccupied(position));
        }

        let nearest: [Option<NodeId>; 4] = Orientation::ALL.map(|o| self.nearest(position, o));

        // A field spanning this position would be split into two.
        for o in [Orientation::Up, Orientation::Right] {
            let (Some(s), Some(o_slot)) = (o.opposite().slot(), o.slot()) else {
                continue;
            };
            if let (Some(low), Some(high)) = (nearest[s], nearest[o_slot]) {
                let low_node = &self.nodes[low.0];
                if low_node.neighbor(o) == Some(high) {
                    let key = FieldKey {
                        origin: low_node.position,
                        orientation: o,
                    };
                    if self.occupancy.contains_key(&key) {
                        return Err(MoveError::SplitsField(position));
                    }
                }
            }
        }

        let id = NodeId(self.nodes.len());
        for (o, n) in Orientation::ALL.iter().zip(nearest.iter()) {
            if let (Some(n), Some(back)) = (n, o.opposite().slot()) {
                self.nodes[n.0].neighbors[back] = Some(id);
            }
        }
        self.nodes.push(Node {
            id,
            position,
            neighbors: nearest,
        });
        self.index.insert(position, id);
        self.size = Point::boundary(self.nodes.iter().map(|n| n.position));
        Ok(id)
    }

    fn nearest(&self, position: Point, orientation: Orientation) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|n| position.direction_to(n.position) == orientation)
            .min_by_key(|n| n.position.manhattan(position))
            .map(|n| n.id)
    }

    pub fn node_at(&self, position: Point) -> Option<&Node> {
        self.index.get(&position).map(|id| &self.nodes[id.0])
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Position of a node, if `id` belongs to this grid.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(id.0).map(|n| n.position)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bounding extents of all nodes (max − min).
    pub fn size(&self) -> Point {
        self.size
    }

    /// Lowest and highest corner of the node bounding box.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.nodes.first()?.position;
        let bounds = self.nodes.iter().fold((first, first), |(lo, hi), n| {
            let p = n.position;
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(bounds)
    }

    /// The field leaving `node` in `orientation`, if a neighbor exists there.
    pub fn field_from(&self, node: NodeId, orientation: Orientation) -> Option<Field> {
        let parent = self.nodes.get(node.0)?;
        let connected = &self.nodes[parent.neighbor(orientation)?.0];
        let key = FieldKey::between(parent.position, orientation, connected.position);
        Some(Field {
            key,
            position: parent.position,
            direction: orientation,
            parent: parent.id,
            connected: connected.id,
            connected_position: connected.position,
            length: parent.position.manhattan(connected.position),
            arc: self.occupancy.get(&key).copied(),
        })
    }

    /// The field between the node at `position` and its neighbor in `orientation`.
    pub fn field_at(&self, position: Point, orientation: Orientation) -> Option<Field> {
        let id = *self.index.get(&position)?;
        self.field_from(id, orientation)
    }

    /// Resolve a canonical key back to its field.
    pub fn field(&self, key: FieldKey) -> Option<Field> {
        self.field_at(key.origin, key.orientation)
            .filter(|f| f.key == key)
    }

    /// Every field on the grid, each once, in canonical orientation.
    pub fn fields(&self) -> Vec<Field> {
        self.nodes
            .iter()
            .flat_map(|n| {
                [Orientation::Up, Orientation::Right]
                    .into_iter()
                    .filter_map(move |o| self.field_from(n.id, o))
            })
            .collect()
    }

    /// Fields around `node` that currently hold an arc.
    pub fn occupied_fields_of(&self, node: NodeId) -> impl Iterator<Item = Field> + '_ {
        Orientation::ALL
            .into_iter()
            .filter_map(move |o| self.field_from(node, o))
            .filter(|f| f.has_arc())
    }

    /// The arc occupying the field at (`position`, `orientation`).
    pub fn arc_at(&self, position: Point, orientation: Orientation) -> Option<ArcId> {
        self.field_at(position, orientation)?.arc
    }

    pub fn occupant(&self, key: FieldKey) -> Option<ArcId> {
        self.occupancy.get(&key).copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    pub(crate) fn connect_arc(&mut self, key: FieldKey, arc: ArcId) {
        self.occupancy.insert(key, arc);
    }

    pub(crate) fn disconnect_arc(&mut self, key: FieldKey, arc: ArcId) {
        if self.occupancy.get(&key) == Some(&arc) {
            self.occupancy.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(points: &[(i32, i32)]) -> Grid {
        let mut g = Grid::new();
        for &(x, y) in points {
            g.add_node(Point::new(x, y)).unwrap();
        }
        g
    }

    #[test]
    fn test_add_node_rejects_duplicate() {
        let mut g = grid(&[(0, 0)]);
        assert_eq!(
            g.add_node(Point::new(0, 0)),
            Err(MoveError::NodeOccupied(Point::new(0, 0)))
        );
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_size_tracks_extents() {
        let g = grid(&[(1, 1), (4, 1), (1, -2)]);
        assert_eq!(g.size(), Point::new(3, 3));
        assert_eq!(g.bounds(), Some((Point::new(1, -2), Point::new(4, 1))));
        assert_eq!(Grid::new().size(), Point::ZERO);
        assert_eq!(Grid::new().bounds(), None);
    }

    #[test]
    fn test_field_length_is_distance_to_nearest() {
        let g = grid(&[(0, 0), (3, 0), (5, 0)]);
        let f = g.field_at(Point::new(0, 0), Orientation::Right).unwrap();
        assert_eq!(f.length(), 3);
        assert_eq!(f.connected_position(), Point::new(3, 0));
        assert!(g.field_at(Point::new(0, 0), Orientation::Up).is_none());
        assert!(g.field_at(Point::new(9, 9), Orientation::Up).is_none());
    }

    #[test]
    fn test_insert_between_relinks() {
        let g = grid(&[(0, 0), (4, 0), (2, 0)]);
        let f = g.field_at(Point::new(0, 0), Orientation::Right).unwrap();
        assert_eq!(f.length(), 2);
        let back = g.field_at(Point::new(4, 0), Orientation::Left).unwrap();
        assert_eq!(back.connected_position(), Point::new(2, 0));
    }

    #[test]
    fn test_opposite_views_are_equal() {
        let g = grid(&[(0, 0), (0, 2)]);
        let up = g.field_at(Point::new(0, 0), Orientation::Up).unwrap();
        let down = g.field_at(Point::new(0, 2), Orientation::Down).unwrap();
        assert_eq!(up, down);
        assert_eq!(up.key(), down.key());
        assert_eq!(down.key().origin, Point::new(0, 0));
        assert_eq!(down.key().orientation, Orientation::Up);
        assert_eq!(up.root(Orientation::Up), Some(up.parent_node()));
        assert_eq!(up.root(Orientation::Down), Some(up.connected_node()));
        assert_eq!(up.root(Orientation::Left), None);
    }

    #[test]
    fn test_fields_lists_each_once() {
        // 2x2 square: four fields
        let g = grid(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let fields = g.fields();
        assert_eq!(fields.len(), 4);
        let unique: std::collections::HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_field_resolves_from_key() {
        let g = grid(&[(0, 0), (2, 0)]);
        let f = g.field_at(Point::new(2, 0), Orientation::Left).unwrap();
        assert_eq!(g.field(f.key()), Some(f));
    }

    #[test]
    fn test_coordinates_beyond_limit_rejected() {
        let mut g = Grid::new();
        let far = Point::new(i32::MIN, 0);
        assert_eq!(g.add_node(far), Err(MoveError::OutOfRange(far)));
        let edge = Point::new(Grid::COORD_LIMIT + 1, 0);
        assert_eq!(g.add_node(edge), Err(MoveError::OutOfRange(edge)));
        assert_eq!(g.node_count(), 0);

        // Opposite corners of the playable range still link up.
        let lo = g.add_node(Point::new(-Grid::COORD_LIMIT, 0)).unwrap();
        g.add_node(Point::new(Grid::COORD_LIMIT, 0)).unwrap();
        let f = g.field_from(lo, Orientation::Right).unwrap();
        assert_eq!(f.length(), 2 * Grid::COORD_LIMIT);
        assert_eq!(g.size(), Point::new(2 * Grid::COORD_LIMIT, 0));
    }

    #[test]
    fn test_position_of_foreign_id() {
        let g = grid(&[(3, 4)]);
        assert_eq!(g.position(NodeId(0)), Some(Point::new(3, 4)));
        assert_eq!(g.position(NodeId(5)), None);
    }

    #[test]
    fn test_split_of_occupied_field_rejected() {
        let mut g = grid(&[(0, 0), (4, 0)]);
        let key = g.field_at(Point::new(0, 0), Orientation::Right).unwrap().key();
        g.connect_arc(key, ArcId(0));
        assert_eq!(
            g.add_node(Point::new(2, 0)),
            Err(MoveError::SplitsField(Point::new(2, 0)))
        );
        // Off the line is fine
        assert!(g.add_node(Point::new(2, 1)).is_ok());
    }
}
