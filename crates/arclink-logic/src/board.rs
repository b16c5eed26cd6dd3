//! The game board: grid + arcs + islands.
//!
//! `push` and `pull` are the only mutating primitives once the board is built.
//! Each validates fully before writing anything, so a rejected call leaves the
//! board exactly as it was.

use crate::arc::{Arc, ArcId};
use crate::error::MoveError;
use crate::geometry::{Orientation, Point};
use crate::grid::{Field, FieldKey, Grid, Node, NodeId};
use crate::island::{IslandId, IslandSet};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// A grid that keeps track of the arcs connecting its nodes.
#[derive(Debug, Clone, Default)]
pub struct GameBoard {
    grid: Grid,
    /// Every arc ever created, pulled or not.
    arcs: Vec<Arc>,
    /// Arcs currently placed in a field.
    live: BTreeSet<ArcId>,
    islands: IslandSet,
    start_node: Option<NodeId>,
    final_node: Option<NodeId>,
}

impl GameBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Building ────────────────────────────────────────────────────────

    /// Add a node at `position` and track it as its own island.
    pub fn place_node(&mut self, position: Point) -> Result<NodeId, MoveError> {
        let id = self.grid.add_node(position)?;
        self.islands.add(id);
        Ok(id)
    }

    /// Create an arc sized to the field at (`position`, `orientation`) and push it there.
    pub fn create_arc(
        &mut self,
        position: Point,
        orientation: Orientation,
    ) -> Result<ArcId, MoveError> {
        let field = self
            .grid
            .field_at(position, orientation)
            .ok_or(MoveError::NoTarget {
                at: position,
                orientation,
            })?;
        if field.has_arc() {
            return Err(MoveError::FieldOccupied(field.key()));
        }

        let id = ArcId(self.arcs.len());
        self.arcs.push(Arc::new(id, field.length()));
        self.push(id, &field)?;
        Ok(id)
    }

    pub fn set_start_node(&mut self, position: Point) -> Option<NodeId> {
        self.start_node = self.grid.node_at(position).map(Node::id);
        self.start_node
    }

    pub fn set_final_node(&mut self, position: Point) -> Option<NodeId> {
        self.final_node = self.grid.node_at(position).map(Node::id);
        self.final_node
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Place `arc` into `field`.
    ///
    /// An arc still sitting in another field is pulled from it first (with
    /// islands updated), but only after the target has been validated.
    pub fn push(&mut self, arc: ArcId, field: &Field) -> Result<(), MoveError> {
        // Re-resolve so a stale view cannot bypass the occupancy check.
        let field = self
            .grid
            .field(field.key())
            .ok_or(MoveError::NoTarget {
                at: field.position(),
                orientation: field.direction(),
            })?;
        let a = self.arcs.get(arc.0).ok_or(MoveError::UnknownArc(arc.0))?;
        field.valid_placement(a)?;

        if !a.is_pulled() {
            self.pull(arc)?;
        }

        self.arcs[arc.0].push(&mut self.grid, &field);
        self.live.insert(arc);
        self.islands.connect(&field);
        log::debug!("pushed arc #{} into {}", arc.0, field);
        Ok(())
    }

    /// Take `arc` out of its field.
    pub fn pull(&mut self, arc: ArcId) -> Result<(), MoveError> {
        let a = self.arcs.get(arc.0).ok_or(MoveError::UnknownArc(arc.0))?;
        let key = a.field().ok_or(MoveError::AlreadyPulled)?;
        let field = self.grid.field(key).ok_or(MoveError::NoTarget {
            at: key.origin,
            orientation: key.orientation,
        })?;

        self.arcs[arc.0].pull(&mut self.grid);
        self.live.remove(&arc);
        self.islands.disconnect(&self.grid, &field);
        log::debug!("pulled arc #{} from {}", arc.0, field);
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.islands.is_connected(a, b)
    }

    /// Connectivity by position. Unknown positions are never connected.
    pub fn is_connected_at(&self, a: Point, b: Point) -> bool {
        match (self.grid.node_at(a), self.grid.node_at(b)) {
            (Some(na), Some(nb)) => self.is_connected(na.id(), nb.id()),
            _ => false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn node_at(&self, position: Point) -> Option<&Node> {
        self.grid.node_at(position)
    }

    pub fn field_at(&self, position: Point, orientation: Orientation) -> Option<Field> {
        self.grid.field_at(position, orientation)
    }

    pub fn arc_at(&self, position: Point, orientation: Orientation) -> Option<ArcId> {
        self.grid.arc_at(position, orientation)
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id.0)
    }

    /// The field an arc currently occupies.
    pub fn arc_field(&self, id: ArcId) -> Option<Field> {
        self.arc(id)?.field().and_then(|k| self.grid.field(k))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.grid.nodes()
    }

    /// Arcs currently placed on the board.
    pub fn live_arcs(&self) -> impl Iterator<Item = &Arc> {
        self.live.iter().map(|id| &self.arcs[id.0])
    }

    pub fn live_arc_count(&self) -> usize {
        self.live.len()
    }

    /// Every arc created on this board, including pulled ones.
    pub fn all_arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn fields(&self) -> Vec<Field> {
        self.grid.fields()
    }

    /// Fields the given arc could be pushed into right now.
    pub fn push_targets(&self, arc: ArcId) -> Vec<Field> {
        let Some(a) = self.arc(arc) else {
            return Vec::new();
        };
        self.grid
            .fields()
            .into_iter()
            .filter(|f| f.valid_placement(a).is_ok())
            .collect()
    }

    /// Fields holding an arc that could be pulled.
    pub fn pull_sources(&self) -> Vec<Field> {
        self.live
            .iter()
            .filter_map(|&id| self.arc_field(id))
            .collect()
    }

    pub fn size(&self) -> Point {
        self.grid.size()
    }

    pub fn start_node(&self) -> Option<NodeId> {
        self.start_node
    }

    pub fn final_node(&self) -> Option<NodeId> {
        self.final_node
    }

    pub fn start_island(&self) -> Option<IslandId> {
        self.islands.get(self.start_node?)
    }

    pub fn islands(&self) -> &IslandSet {
        &self.islands
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    /// Check the structural invariants, returning one message per violation.
    ///
    /// - each arc occupies at most one field and each field holds at most one arc
    /// - occupancy table and arc state agree, and the live set is exactly the
    ///   placed arcs
    /// - every placed arc's length matches its field
    /// - islands equal the connected components of the placed arcs
    pub fn check_invariants(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen: HashMap<FieldKey, ArcId> = HashMap::new();
        for arc in &self.arcs {
            let Some(key) = arc.field() else {
                if self.live.contains(&arc.id()) {
                    errors.push(format!("pulled arc #{} is in the live set", arc.id().0));
                }
                continue;
            };
            if !self.live.contains(&arc.id()) {
                errors.push(format!("placed arc #{} missing from live set", arc.id().0));
            }
            if let Some(other) = seen.insert(key, arc.id()) {
                errors.push(format!(
                    "field {} claimed by arcs #{} and #{}",
                    key,
                    other.0,
                    arc.id().0
                ));
            }
            if self.grid.occupant(key) != Some(arc.id()) {
                errors.push(format!(
                    "arc #{} thinks it is in {} but the field disagrees",
                    arc.id().0,
                    key
                ));
            }
            match self.grid.field(key) {
                Some(f) if f.length() != arc.length() => errors.push(format!(
                    "arc #{} of length {} sits in {} of length {}",
                    arc.id().0,
                    arc.length(),
                    key,
                    f.length()
                )),
                None => errors.push(format!("arc #{} sits in missing field {}", arc.id().0, key)),
                _ => {}
            }
        }
        if self.grid.occupied_count() != seen.len() {
            errors.push(format!(
                "{} occupied fields but {} placed arcs",
                self.grid.occupied_count(),
                seen.len()
            ));
        }

        errors.extend(self.check_islands());
        errors
    }

    fn check_islands(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.islands.node_count() != self.grid.node_count() {
            errors.push(format!(
                "{} nodes but {} tracked by islands",
                self.grid.node_count(),
                self.islands.node_count()
            ));
            return errors;
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut components = 0;
        for node in self.grid.nodes() {
            if !visited.insert(node.id()) {
                continue;
            }
            components += 1;
            let island = self.islands.get(node.id());
            let mut queue = VecDeque::from([node.id()]);
            let mut size = 0;
            while let Some(current) = queue.pop_front() {
                size += 1;
                if self.islands.get(current) != island {
                    errors.push(format!(
                        "node #{} is reachable from {} but in another island",
                        current.index(),
                        node.position()
                    ));
                }
                for f in self.grid.occupied_fields_of(current) {
                    if visited.insert(f.connected_node()) {
                        queue.push_back(f.connected_node());
                    }
                }
            }
            if let Some(island) = island {
                if self.islands.members(island).len() != size {
                    errors.push(format!(
                        "island of {} has {} members but {} reachable nodes",
                        node.position(),
                        self.islands.members(island).len(),
                        size
                    ));
                }
            }
        }
        if components != self.islands.island_count() {
            errors.push(format!(
                "{} components but {} islands",
                components,
                self.islands.island_count()
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn line3() -> GameBoard {
        let mut b = GameBoard::new();
        for x in 0..3 {
            b.place_node(p(x, 0)).unwrap();
        }
        b
    }

    #[test]
    fn test_place_node_rejects_duplicate() {
        let mut b = line3();
        assert_eq!(b.place_node(p(1, 0)), Err(MoveError::NodeOccupied(p(1, 0))));
        assert_eq!(b.nodes().count(), 3);
        assert_eq!(b.islands().island_count(), 3);
    }

    #[test]
    fn test_size() {
        let mut b = line3();
        b.place_node(p(0, 4)).unwrap();
        assert_eq!(b.size(), p(2, 4));
    }

    #[test]
    fn test_chain_connect_then_split() {
        let mut b = line3();
        let first = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        b.create_arc(p(1, 0), Orientation::Right).unwrap();
        assert!(b.is_connected_at(p(0, 0), p(2, 0)));

        b.pull(first).unwrap();
        assert!(!b.is_connected_at(p(0, 0), p(2, 0)));
        assert!(b.is_connected_at(p(1, 0), p(2, 0)));
        assert!(b.check_invariants().is_empty());
    }

    #[test]
    fn test_create_arc_without_field() {
        let mut b = line3();
        assert_eq!(
            b.create_arc(p(0, 0), Orientation::Up),
            Err(MoveError::NoTarget {
                at: p(0, 0),
                orientation: Orientation::Up
            })
        );
        assert!(b.create_arc(p(7, 7), Orientation::Right).is_err());
        assert!(b.all_arcs().is_empty());
    }

    #[test]
    fn test_create_arc_on_occupied_field() {
        let mut b = line3();
        b.create_arc(p(0, 0), Orientation::Right).unwrap();
        let err = b.create_arc(p(1, 0), Orientation::Left).unwrap_err();
        assert!(err.is_invalid_placement());
        assert_eq!(b.all_arcs().len(), 1);
    }

    #[test]
    fn test_length_mismatch_leaves_field_empty() {
        let mut b = GameBoard::new();
        for pt in [p(0, 0), p(2, 0), p(0, 1)] {
            b.place_node(pt).unwrap();
        }
        let long = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        b.pull(long).unwrap();

        let short = b.field_at(p(0, 0), Orientation::Up).unwrap();
        assert_eq!(
            b.push(long, &short),
            Err(MoveError::LengthMismatch { arc: 2, field: 1 })
        );
        assert!(!b.field_at(p(0, 0), Orientation::Up).unwrap().has_arc());
        assert!(b.arc(long).unwrap().is_pulled());
        assert!(b.check_invariants().is_empty());
    }

    #[test]
    fn test_pull_twice_fails() {
        let mut b = line3();
        let arc = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        assert!(b.pull(arc).is_ok());
        assert_eq!(b.pull(arc), Err(MoveError::AlreadyPulled));
        assert_eq!(b.live_arc_count(), 0);
    }

    #[test]
    fn test_unknown_arc() {
        let mut b = line3();
        let f = b.field_at(p(0, 0), Orientation::Right).unwrap();
        assert_eq!(b.push(ArcId(9), &f), Err(MoveError::UnknownArc(9)));
        assert_eq!(b.pull(ArcId(9)), Err(MoveError::UnknownArc(9)));
    }

    #[test]
    fn test_push_placed_arc_moves_it() {
        let mut b = line3();
        let arc = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        let target = b.field_at(p(1, 0), Orientation::Right).unwrap();
        b.push(arc, &target).unwrap();

        assert!(!b.is_connected_at(p(0, 0), p(1, 0)));
        assert!(b.is_connected_at(p(1, 0), p(2, 0)));
        assert_eq!(b.live_arc_count(), 1);
        assert!(b.check_invariants().is_empty());
    }

    #[test]
    fn test_push_into_own_field_rejected() {
        let mut b = line3();
        let arc = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        let same = b.field_at(p(1, 0), Orientation::Left).unwrap();
        assert!(matches!(b.push(arc, &same), Err(MoveError::FieldOccupied(_))));
        assert!(b.is_connected_at(p(0, 0), p(1, 0)));
    }

    #[test]
    fn test_stale_field_view_still_checked() {
        let mut b = line3();
        let view = b.field_at(p(0, 0), Orientation::Right).unwrap();
        let a = b.create_arc(p(1, 0), Orientation::Right).unwrap();
        b.pull(a).unwrap();
        b.create_arc(p(0, 0), Orientation::Right).unwrap();
        // `view` was taken while empty.
        assert!(!view.has_arc());
        assert!(matches!(b.push(a, &view), Err(MoveError::FieldOccupied(_))));
    }

    #[test]
    fn test_push_targets_and_pull_sources() {
        let mut b = GameBoard::new();
        for pt in [p(0, 0), p(1, 0), p(3, 0), p(0, 1)] {
            b.place_node(pt).unwrap();
        }
        let arc = b.create_arc(p(0, 0), Orientation::Right).unwrap();
        assert_eq!(b.pull_sources().len(), 1);
        b.pull(arc).unwrap();
        assert!(b.pull_sources().is_empty());

        // Length-1 fields: (0,0)-(1,0) and (0,0)-(0,1); (1,0)-(3,0) is length 2.
        let targets = b.push_targets(arc);
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|f| f.length() == 1));
    }

    #[test]
    fn test_start_and_final() {
        let mut b = line3();
        assert!(b.set_start_node(p(0, 0)).is_some());
        assert!(b.set_final_node(p(5, 5)).is_none());
        assert!(b.start_island().is_some());
    }
}
