//! Connected components of the node graph under edge insertion and removal.
//!
//! Union-find handles merges but cannot split. Here every node carries an
//! island id in an arena-indexed array and every island keeps its member list:
//! - `connect` relabels the smaller island into the larger (union by size).
//! - `disconnect` runs a BFS over the remaining placed arcs, confined to the
//!   old island. If the far endpoint is reached nothing changes; otherwise
//!   every unreached member moves to a fresh island.
//!
//! Both operations cost O(island size), which is bounded by the board.

use crate::grid::{Field, Grid, NodeId};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Opaque handle for one connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IslandId(u32);

/// Partition of all nodes into islands.
#[derive(Debug, Clone, Default)]
pub struct IslandSet {
    /// node index → island
    island_of: Vec<IslandId>,
    /// island → member nodes
    members: BTreeMap<IslandId, Vec<NodeId>>,
    next_id: u32,
}

impl IslandSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&mut self) -> IslandId {
        let id = IslandId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Track `node` as a singleton island. Already-tracked nodes keep theirs.
    pub fn add(&mut self, node: NodeId) -> IslandId {
        if let Some(&id) = self.island_of.get(node.0) {
            return id;
        }
        // Node ids are dense arena indices; fill any gap with singletons.
        while self.island_of.len() <= node.0 {
            let id = self.fresh();
            let n = NodeId(self.island_of.len());
            self.island_of.push(id);
            self.members.insert(id, vec![n]);
        }
        self.island_of[node.0]
    }

    /// Merge the islands of both endpoints after an arc was pushed into `field`.
    pub fn connect(&mut self, field: &Field) {
        let (a, b) = field.endpoints();
        let (Some(ia), Some(ib)) = (self.get(a), self.get(b)) else {
            return;
        };
        if ia == ib {
            return;
        }

        let size_a = self.members.get(&ia).map_or(0, Vec::len);
        let size_b = self.members.get(&ib).map_or(0, Vec::len);
        let (keep, absorb) = if size_a >= size_b { (ia, ib) } else { (ib, ia) };

        let moved = self.members.remove(&absorb).unwrap_or_default();
        for n in &moved {
            self.island_of[n.0] = keep;
        }
        log::debug!(
            "islands merged: {:?} absorbed {:?} ({} nodes)",
            keep,
            absorb,
            moved.len()
        );
        self.members.entry(keep).or_default().extend(moved);
    }

    /// Re-partition after an arc was pulled from `field`.
    ///
    /// `grid` must already reflect the removal, so the traversal only follows
    /// the surviving arcs.
    pub fn disconnect(&mut self, grid: &Grid, field: &Field) {
        let (a, b) = field.endpoints();
        let (Some(old), Some(ib)) = (self.get(a), self.get(b)) else {
            return;
        };
        if old != ib {
            return;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(a);
        queue.push_back(a);

        while let Some(current) = queue.pop_front() {
            for f in grid.occupied_fields_of(current) {
                let next = f.connected_node();
                if self.island_of.get(next.0) != Some(&old) {
                    continue;
                }
                if next == b {
                    // Another path survives.
                    return;
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let all = self.members.remove(&old).unwrap_or_default();
        let (kept, split): (Vec<NodeId>, Vec<NodeId>) =
            all.into_iter().partition(|n| visited.contains(n));
        let fresh = self.fresh();
        for n in &split {
            self.island_of[n.0] = fresh;
        }
        log::debug!(
            "island {:?} split: {} nodes stay, {} move to {:?}",
            old,
            kept.len(),
            split.len(),
            fresh
        );
        self.members.insert(old, kept);
        self.members.insert(fresh, split);
    }

    /// True iff both nodes are tracked and share an island.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(ia), Some(ib)) => ia == ib,
            _ => false,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<IslandId> {
        self.island_of.get(node.0).copied()
    }

    /// Members of `island`, in no particular order.
    pub fn members(&self, island: IslandId) -> &[NodeId] {
        self.members.get(&island).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn island_count(&self) -> usize {
        self.members.len()
    }

    pub fn islands(&self) -> impl Iterator<Item = (IslandId, &[NodeId])> {
        self.members.iter().map(|(id, m)| (*id, m.as_slice()))
    }

    pub fn node_count(&self) -> usize {
        self.island_of.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::ArcId;
    use crate::geometry::{Orientation, Point};

    struct Fixture {
        grid: Grid,
        islands: IslandSet,
        next_arc: usize,
    }

    impl Fixture {
        fn new(points: &[(i32, i32)]) -> Self {
            let mut grid = Grid::new();
            let mut islands = IslandSet::new();
            for &(x, y) in points {
                let id = grid.add_node(Point::new(x, y)).unwrap();
                islands.add(id);
            }
            Self {
                grid,
                islands,
                next_arc: 0,
            }
        }

        fn field(&self, x: i32, y: i32, o: Orientation) -> Field {
            self.grid.field_at(Point::new(x, y), o).unwrap()
        }

        fn place(&mut self, x: i32, y: i32, o: Orientation) {
            let f = self.field(x, y, o);
            self.grid.connect_arc(f.key(), ArcId(self.next_arc));
            self.next_arc += 1;
            self.islands.connect(&f);
        }

        fn remove(&mut self, x: i32, y: i32, o: Orientation) {
            let f = self.field(x, y, o);
            let arc = self.grid.occupant(f.key()).unwrap();
            self.grid.disconnect_arc(f.key(), arc);
            self.islands.disconnect(&self.grid, &f);
        }

        fn node(&self, x: i32, y: i32) -> NodeId {
            self.grid.node_at(Point::new(x, y)).unwrap().id()
        }

        fn connected(&self, a: (i32, i32), b: (i32, i32)) -> bool {
            self.islands
                .is_connected(self.node(a.0, a.1), self.node(b.0, b.1))
        }
    }

    #[test]
    fn test_new_nodes_are_singletons() {
        let fx = Fixture::new(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(fx.islands.island_count(), 3);
        assert!(!fx.connected((0, 0), (1, 0)));
        assert!(fx.connected((1, 0), (1, 0)));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut fx = Fixture::new(&[(0, 0)]);
        let n = fx.node(0, 0);
        let first = fx.islands.get(n).unwrap();
        assert_eq!(fx.islands.add(n), first);
        assert_eq!(fx.islands.island_count(), 1);
    }

    #[test]
    fn test_connect_merges() {
        let mut fx = Fixture::new(&[(0, 0), (1, 0), (2, 0)]);
        fx.place(0, 0, Orientation::Right);
        fx.place(1, 0, Orientation::Right);
        assert!(fx.connected((0, 0), (2, 0)));
        assert_eq!(fx.islands.island_count(), 1);
        let island = fx.islands.get(fx.node(0, 0)).unwrap();
        assert_eq!(fx.islands.members(island).len(), 3);
    }

    #[test]
    fn test_disconnect_splits_chain() {
        let mut fx = Fixture::new(&[(0, 0), (1, 0), (2, 0)]);
        fx.place(0, 0, Orientation::Right);
        fx.place(1, 0, Orientation::Right);
        fx.remove(0, 0, Orientation::Right);
        assert!(!fx.connected((0, 0), (2, 0)));
        assert!(fx.connected((1, 0), (2, 0)));
        assert_eq!(fx.islands.island_count(), 2);
    }

    #[test]
    fn test_disconnect_in_cycle_keeps_island() {
        // 2x2 square fully wired: removing one side leaves a path around.
        let mut fx = Fixture::new(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        fx.place(0, 0, Orientation::Right);
        fx.place(0, 0, Orientation::Up);
        fx.place(0, 1, Orientation::Right);
        fx.place(1, 0, Orientation::Up);
        let before = fx.islands.get(fx.node(0, 0));

        fx.remove(0, 0, Orientation::Right);
        assert!(fx.connected((0, 0), (1, 0)));
        assert_eq!(fx.islands.island_count(), 1);
        assert_eq!(fx.islands.get(fx.node(1, 1)), before);
    }

    #[test]
    fn test_split_keeps_id_on_traversal_side() {
        let mut fx = Fixture::new(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        fx.place(0, 0, Orientation::Right);
        fx.place(1, 0, Orientation::Right);
        fx.place(2, 0, Orientation::Right);
        let old = fx.islands.get(fx.node(0, 0)).unwrap();

        // Field viewed from (1,0): (1,0) starts the traversal and keeps the id.
        fx.remove(1, 0, Orientation::Right);
        assert_eq!(fx.islands.get(fx.node(1, 0)), Some(old));
        assert_eq!(fx.islands.get(fx.node(0, 0)), Some(old));
        let other = fx.islands.get(fx.node(2, 0)).unwrap();
        assert_ne!(other, old);
        assert_eq!(fx.islands.get(fx.node(3, 0)), Some(other));
        assert_eq!(fx.islands.members(other).len(), 2);
    }

    #[test]
    fn test_connect_same_island_is_noop() {
        let mut fx = Fixture::new(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        fx.place(0, 0, Orientation::Right);
        fx.place(0, 0, Orientation::Up);
        fx.place(0, 1, Orientation::Right);
        let count = fx.islands.island_count();
        fx.place(1, 0, Orientation::Up);
        assert_eq!(fx.islands.island_count(), count);
    }

    #[test]
    fn test_unknown_nodes_not_connected() {
        let fx = Fixture::new(&[(0, 0)]);
        assert!(!fx.islands.is_connected(NodeId(0), NodeId(7)));
    }
}
