//! Incremental Go board.
//!
//! The board keeps, besides the stone array, a union-find forest of groups.
//! Each group root carries a stone count, an *edge* count and a running XOR
//! of its stones' Zobrist keys. Edges are empty-neighbour incidences summed
//! over the member stones, not distinct liberties: a liberty shared by two
//! stones of the group is counted once per adjacency. The count is cheap to
//! maintain and reaches zero exactly when the group has no liberties left,
//! which is all capture detection needs.
//!
//! Every query the playout loop runs thousands of times per move
//! ([`is_suicide`](Board::is_suicide), [`is_eye_like`](Board::is_eye_like),
//! [`pre_compute_hash`](Board::pre_compute_hash)) is answered from these
//! counters without mutating or flood-filling the board.

use std::sync::Arc;

use crate::colour::Colour;
use crate::zobrist::ZobristTable;

/// A point on the board, as an index `y * size + x`.
pub type Point = usize;

/// Group bookkeeping, valid at union-find roots only.
#[derive(Copy, Clone, Debug, Default)]
struct GroupInfo {
    /// Stones in the group.
    stones: u32,
    /// Empty-neighbour incidences over all member stones. Zero iff the
    /// group has no liberties.
    edges: u32,
    /// XOR of the members' Zobrist keys.
    hash: u64,
}

/// A mutable Go position.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    state: Vec<Colour>,
    /// Union-find parent links; `parent[p] == p` at roots.
    parent: Vec<Point>,
    /// Indexed by point, meaningful at roots.
    groups: Vec<GroupInfo>,
    hash: u64,
    stones: usize,
    zobrist: Arc<ZobristTable>,
}

/// Orthogonal neighbours of `p`, in up, left, down, right order.
#[inline]
fn neighbours(size: usize, p: Point) -> impl Iterator<Item = Point> {
    let x = p % size;
    let y = p / size;
    [
        (y > 0).then(|| p - size),
        (x > 0).then(|| p - 1),
        (y + 1 < size).then(|| p + size),
        (x + 1 < size).then(|| p + 1),
    ]
    .into_iter()
    .flatten()
}

/// Distinct neighbour group roots of an empty point, with the number of
/// adjacencies each has onto it. At most four entries.
#[derive(Default)]
struct NeighbourRoots {
    roots: [Point; 4],
    multiplicity: [u32; 4],
    len: usize,
    empty: u32,
}

impl NeighbourRoots {
    fn add(&mut self, root: Point) {
        for i in 0..self.len {
            if self.roots[i] == root {
                self.multiplicity[i] += 1;
                return;
            }
        }
        self.roots[self.len] = root;
        self.multiplicity[self.len] = 1;
        self.len += 1;
    }

    fn iter(&self) -> impl Iterator<Item = (Point, u32)> + '_ {
        (0..self.len).map(|i| (self.roots[i], self.multiplicity[i]))
    }
}

impl Board {
    /// An empty board. The Zobrist table must already cover `size * size`
    /// points.
    pub fn new(size: usize, zobrist: Arc<ZobristTable>) -> Self {
        assert!(size > 0);
        assert!(zobrist.points() >= size * size);
        let points = size * size;
        let hash = zobrist.initial();
        Board {
            size,
            state: vec![Colour::None; points],
            parent: (0..points).collect(),
            groups: vec![GroupInfo::default(); points],
            hash,
            stones: 0,
            zobrist,
        }
    }

    /// Board side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current position hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of stones on the board.
    #[inline]
    pub fn stones(&self) -> usize {
        self.stones
    }

    /// Colour of a point.
    #[inline]
    pub fn value(&self, p: Point) -> Colour {
        assert!(p < self.state.len());
        self.state[p]
    }

    /// Colour at coordinates.
    #[inline]
    pub fn value_at(&self, x: usize, y: usize) -> Colour {
        assert!(x < self.size && y < self.size);
        self.state[y * self.size + x]
    }

    /// Canonical group id of an occupied point.
    pub fn group_location(&self, p: Point) -> Point {
        debug_assert!(self.state[p].is_player());
        let mut p = p;
        while self.parent[p] != p {
            p = self.parent[p];
        }
        p
    }

    /// Edge count of the group containing `p`.
    pub fn group_edges(&self, p: Point) -> u32 {
        self.groups[self.group_location(p)].edges
    }

    /// Stone count of the group containing `p`.
    pub fn group_stones(&self, p: Point) -> u32 {
        self.groups[self.group_location(p)].stones
    }

    /// Neighbour groups of the empty point `p`, with adjacency counts.
    fn neighbour_roots(&self, p: Point) -> NeighbourRoots {
        let mut acc = NeighbourRoots::default();
        for q in neighbours(self.size, p) {
            if self.state[q] == Colour::None {
                acc.empty += 1;
            } else {
                acc.add(self.group_location(q));
            }
        }
        acc
    }

    /// Would playing `col` at `p` leave the new group without liberties and
    /// capture nothing?
    pub fn is_suicide(&self, p: Point, col: Colour) -> bool {
        assert!(self.state[p] == Colour::None);
        assert!(col.is_player());
        let around = self.neighbour_roots(p);
        let mut edges = around.empty;
        for (root, multiplicity) in around.iter() {
            if self.state[root] == col {
                edges += self.groups[root].edges - multiplicity;
            } else if self.groups[root].edges == multiplicity {
                // An opponent group dies, freeing liberties.
                return false;
            }
        }
        edges == 0
    }

    /// Conservative own-eye test used to keep playouts from filling eyes:
    /// every orthogonal neighbour is a `col` stone and none of those groups
    /// would be left in atari by the fill.
    pub fn is_eye_like(&self, p: Point, col: Colour) -> bool {
        assert!(self.state[p] == Colour::None);
        assert!(col.is_player());
        for q in neighbours(self.size, p) {
            if self.state[q] != col {
                return false;
            }
        }
        let around = self.neighbour_roots(p);
        for (root, multiplicity) in around.iter() {
            if self.groups[root].edges - multiplicity == 0 {
                return false;
            }
        }
        true
    }

    /// Would playing `col` at `p` capture at least one opponent group?
    pub fn is_capture(&self, p: Point, col: Colour) -> bool {
        assert!(self.state[p] == Colour::None);
        assert!(col.is_player());
        let around = self.neighbour_roots(p);
        let result = around.iter().any(|(root, multiplicity)| {
            self.state[root] == col.invert() && self.groups[root].edges == multiplicity
        });
        result
    }

    /// The hash the board would have after `col` plays at `p`, without
    /// mutating anything.
    pub fn pre_compute_hash(&self, p: Point, col: Colour) -> u64 {
        assert!(self.state[p] == Colour::None);
        assert!(col.is_player());
        let mut hash = self.hash ^ self.zobrist.value(p, col);
        let around = self.neighbour_roots(p);
        for (root, multiplicity) in around.iter() {
            if self.state[root] == col.invert() && self.groups[root].edges == multiplicity {
                hash ^= self.groups[root].hash;
            }
        }
        hash
    }

    /// Place a stone of `col` at the empty point `p`, merging friendly
    /// neighbour groups and removing opponent groups left without liberties.
    pub fn play(&mut self, p: Point, col: Colour) {
        assert!(p < self.state.len());
        assert!(self.state[p] == Colour::None);
        assert!(col.is_player());
        debug_assert!(!self.is_suicide(p, col));

        // New singleton group at p.
        let empty = neighbours(self.size, p)
            .filter(|&q| self.state[q] == Colour::None)
            .count() as u32;
        let key = self.zobrist.value(p, col);
        self.state[p] = col;
        self.parent[p] = p;
        self.groups[p] = GroupInfo {
            stones: 1,
            edges: empty,
            hash: key,
        };
        self.hash ^= key;
        self.stones += 1;

        // Each occupied neighbour loses the incidence it held on p. Friendly
        // groups are remembered for merging; opponent groups that hit zero
        // edges die on the spot.
        let mut merge_roots: [Point; 4] = [0; 4];
        let mut merge_len = 0;
        for q in neighbours(self.size, p) {
            match self.state[q] {
                Colour::None => {}
                c => {
                    let root = self.group_location(q);
                    self.groups[root].edges -= 1;
                    if c == col {
                        if !merge_roots[..merge_len].contains(&root) {
                            merge_roots[merge_len] = root;
                            merge_len += 1;
                        }
                    } else if self.groups[root].edges == 0 {
                        self.remove_group(root, q);
                    }
                }
            }
        }

        // Merge the singleton and any friendly neighbours, smaller groups
        // into the largest.
        let mut target = p;
        for &root in &merge_roots[..merge_len] {
            if self.groups[root].stones > self.groups[target].stones {
                target = root;
            }
        }
        for &root in &merge_roots[..merge_len] {
            if root != target {
                self.merge_groups(root, target);
            }
        }
        if target != p {
            self.merge_groups(p, target);
        }
    }

    /// Fold group `from` into group `to`.
    fn merge_groups(&mut self, from: Point, to: Point) {
        self.parent[from] = to;
        self.groups[to].stones += self.groups[from].stones;
        self.groups[to].edges += self.groups[from].edges;
        self.groups[to].hash ^= self.groups[from].hash;
    }

    /// Remove a captured group. `seed` is any member stone. The dissolved
    /// stones hand their incidences back to the surviving groups around
    /// them.
    fn remove_group(&mut self, root: Point, seed: Point) {
        let colour = self.state[seed];
        self.hash ^= self.groups[root].hash;
        self.stones -= self.groups[root].stones as usize;

        let mut members = Vec::with_capacity(self.groups[root].stones as usize);
        let mut stack = vec![seed];
        self.state[seed] = Colour::None;
        members.push(seed);
        while let Some(s) = stack.pop() {
            for t in neighbours(self.size, s) {
                if self.state[t] == colour {
                    self.state[t] = Colour::None;
                    members.push(t);
                    stack.push(t);
                }
            }
        }
        debug_assert_eq!(members.len() as u32, self.groups[root].stones);

        for &s in &members {
            for t in neighbours(self.size, s) {
                if self.state[t].is_player() {
                    let g = self.group_location(t);
                    self.groups[g].edges += 1;
                }
            }
        }
        for &s in &members {
            self.parent[s] = s;
            self.groups[s] = GroupInfo::default();
        }
    }

    /// Area scores as `(black, white)`. Each stone scores one point for its
    /// colour; each empty region scores its size for the single colour
    /// bordering it, or for nobody when both colours touch it.
    pub fn count_points(&self) -> (u32, u32) {
        let points = self.size * self.size;
        let mut black = 0u32;
        let mut white = 0u32;
        let mut visited = vec![false; points];
        for p in 0..points {
            match self.state[p] {
                Colour::Black => black += 1,
                Colour::White => white += 1,
                Colour::None if !visited[p] => {
                    let mut owner = Colour::None;
                    let mut region = 0u32;
                    let mut stack = vec![p];
                    visited[p] = true;
                    while let Some(s) = stack.pop() {
                        region += 1;
                        for t in neighbours(self.size, s) {
                            match self.state[t] {
                                Colour::None => {
                                    if !visited[t] {
                                        visited[t] = true;
                                        stack.push(t);
                                    }
                                }
                                c => {
                                    owner = if owner == Colour::None || owner == c {
                                        c
                                    } else {
                                        Colour::Neutral
                                    };
                                }
                            }
                        }
                    }
                    match owner {
                        Colour::Black => black += region,
                        Colour::White => white += region,
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        (black, white)
    }

    /// Recompute every group record from scratch and compare with the
    /// incremental bookkeeping. Used by tests and debug assertions.
    #[cfg(debug_assertions)]
    pub fn bookkeeping_ok(&self) -> bool {
        let points = self.size * self.size;
        let mut hash = self.zobrist.initial();
        let mut stones = 0usize;
        for p in 0..points {
            if !self.state[p].is_player() {
                continue;
            }
            stones += 1;
            hash ^= self.zobrist.value(p, self.state[p]);
            let root = self.group_location(p);
            if self.state[root] != self.state[p] {
                return false;
            }
        }
        if hash != self.hash || stones != self.stones {
            return false;
        }
        // Per-root recount of stones, edges and hash.
        for p in 0..points {
            if !self.state[p].is_player() || self.group_location(p) != p {
                continue;
            }
            let mut count = 0u32;
            let mut edges = 0u32;
            let mut group_hash = 0u64;
            for q in 0..points {
                if self.state[q] == self.state[p] && self.group_location(q) == p {
                    count += 1;
                    group_hash ^= self.zobrist.value(q, self.state[q]);
                    edges += neighbours(self.size, q)
                        .filter(|&t| self.state[t] == Colour::None)
                        .count() as u32;
                }
            }
            let info = &self.groups[p];
            if info.stones != count || info.edges != edges || info.hash != group_hash {
                return false;
            }
            if edges == 0 {
                return false;
            }
        }
        true
    }

    #[cfg(not(debug_assertions))]
    pub fn bookkeeping_ok(&self) -> bool {
        true
    }
}

impl PartialEq for Board {
    /// Positions are equal when their stone arrays are; group structure and
    /// hash follow from the stones.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.state == other.state
    }
}

impl Eq for Board {}
