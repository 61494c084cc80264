//! Pedestrian network representation and builder.
//!
//! # Data layout
//!
//! Nodes are interned in insertion order: `NodeId(i)` owns `keys[i]` and
//! `locations[i]`, and `index` maps a key back to its id.  Edges are stored
//! in **Compressed Sparse Row (CSR)** format; the neighbours of node `n`
//! occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! with the matching weights in `edge_weight_m`.  Every walkway is stored as
//! two half-edges with identical weight, so the adjacency is symmetric.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest node, so callers
//! can start a query from a raw coordinate instead of an exact key.

use std::ops::Range;

use log::debug;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use cp_core::{GeoPoint, KeyPrecision, NodeId, NodeKey};

// ── NodeLocation ──────────────────────────────────────────────────────────────

/// Position and label of a node.  `name` is reserved and currently empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeLocation {
    pub lat:  f64,
    pub lon:  f64,
    pub name: String,
}

impl NodeLocation {
    /// Location reported for keys the graph does not contain.
    pub const UNKNOWN: NodeLocation = NodeLocation { lat: 0.0, lon: 0.0, name: String::new() };

    pub fn new(pos: GeoPoint) -> Self {
        Self { lat: pos.lat, lon: pos.lon, name: String::new() }
    }

    #[inline]
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

static UNKNOWN_LOCATION: NodeLocation = NodeLocation::UNKNOWN;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// nearest node across a campus; not a metric distance.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── SpatialGraph ──────────────────────────────────────────────────────────────

/// Undirected, distance-weighted walking graph.
///
/// Immutable once built; share it by reference (or `Arc`) between any number
/// of search engines and threads.  Construct with [`SpatialGraphBuilder`] or
/// one of the GeoJSON loaders.
pub struct SpatialGraph {
    keys:      Vec<NodeKey>,
    locations: Vec<NodeLocation>,
    index:     FxHashMap<NodeKey, NodeId>,

    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    edge_to:        Vec<NodeId>,
    edge_weight_m:  Vec<f64>,

    precision:   KeyPrecision,
    spatial_idx: RTree<NodeEntry>,
}

impl SpatialGraph {
    /// Construct a graph with no nodes or edges.
    pub fn empty() -> Self {
        SpatialGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of stored half-edges (twice the number of walkways).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Precision the node keys were formatted with.
    pub fn precision(&self) -> KeyPrecision {
        self.precision
    }

    // ── Key-level access ──────────────────────────────────────────────────

    pub fn contains_node(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Location of `key`, or [`NodeLocation::UNKNOWN`] (all zero) when the key
    /// is not in the graph.  Use [`contains_node`](Self::contains_node) when
    /// absence matters.
    pub fn node_location(&self, key: &str) -> &NodeLocation {
        match self.node_id(key) {
            Some(id) => &self.locations[id.index()],
            None => &UNKNOWN_LOCATION,
        }
    }

    /// Neighbours of `key` with walkway lengths in metres.  Empty for unknown
    /// or isolated nodes.
    pub fn neighbors(&self, key: &str) -> Neighbors<'_> {
        let range = self.node_id(key).map_or(0..0, |id| self.edge_range(id));
        Neighbors { graph: self, range }
    }

    /// Every node with its neighbour list, in node insertion order.
    pub fn adjacency(&self) -> impl ExactSizeIterator<Item = (&NodeKey, Neighbors<'_>)> + '_ {
        self.keys.iter().enumerate().map(move |(i, key)| {
            let range = self.edge_range(NodeId(i as u32));
            (key, Neighbors { graph: self, range })
        })
    }

    /// All node keys in insertion order.
    pub fn node_keys(&self) -> &[NodeKey] {
        &self.keys
    }

    // ── Index-level access (hot path for search) ──────────────────────────

    #[inline]
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Key of an interned node.  Panics if `id` is out of range.
    #[inline]
    pub fn key(&self, id: NodeId) -> &NodeKey {
        &self.keys[id.index()]
    }

    /// Location of an interned node.  Panics if `id` is out of range.
    #[inline]
    pub fn location(&self, id: NodeId) -> &NodeLocation {
        &self.locations[id.index()]
    }

    /// `(neighbour, weight_m)` pairs for `id`.  Contiguous slice scan, no
    /// allocation.
    #[inline]
    pub fn neighbors_of(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let range = self.edge_range(id);
        self.edge_to[range.clone()]
            .iter()
            .copied()
            .zip(self.edge_weight_m[range].iter().copied())
    }

    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.edge_range(id).len()
    }

    #[inline]
    fn edge_range(&self, id: NodeId) -> Range<usize> {
        let start = self.node_out_start[id.index()] as usize;
        let end   = self.node_out_start[id.index() + 1] as usize;
        start..end
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Key of the node nearest to `pos`.  `None` only for an empty graph.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<&NodeKey> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| self.key(e.id))
    }

    /// Up to `k` nearest node keys to `pos`, closest first.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<&NodeKey> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| self.key(e.id))
            .collect()
    }
}

impl std::fmt::Debug for SpatialGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("precision", &self.precision)
            .finish()
    }
}

// ── Neighbors ─────────────────────────────────────────────────────────────────

/// Iterator over `(neighbour_key, weight_m)` for one node.
#[derive(Clone)]
pub struct Neighbors<'a> {
    graph: &'a SpatialGraph,
    range: Range<usize>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = (&'a NodeKey, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.range.next()?;
        let to = self.graph.edge_to[e];
        Some((self.graph.key(to), self.graph.edge_weight_m[e]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

// ── SpatialGraphBuilder ───────────────────────────────────────────────────────

/// Construct a [`SpatialGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes are deduplicated by their formatted key, so adding the same
/// coordinate twice (or two coordinates that format identically under the
/// builder's [`KeyPrecision`]) yields the same `NodeId`.
///
/// # Example
///
/// ```
/// use cp_core::GeoPoint;
/// use cp_spatial::SpatialGraphBuilder;
///
/// let mut b = SpatialGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(34.0689, -118.4452));
/// let c = b.add_node(GeoPoint::new(34.0700, -118.4452));
/// b.add_walkway(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // both directions
/// ```
pub struct SpatialGraphBuilder {
    precision: KeyPrecision,
    keys:      Vec<NodeKey>,
    locations: Vec<NodeLocation>,
    index:     FxHashMap<NodeKey, NodeId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    weight_m: f64,
}

impl SpatialGraphBuilder {
    pub fn new() -> Self {
        Self::with_precision(KeyPrecision::default())
    }

    pub fn with_precision(precision: KeyPrecision) -> Self {
        Self {
            precision,
            keys:      Vec::new(),
            locations: Vec::new(),
            index:     FxHashMap::default(),
            raw_edges: Vec::new(),
        }
    }

    /// Add a node at `pos` and return its id.  If a node with the same key
    /// already exists its id is returned and the first location is kept.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let key = NodeKey::from_point(pos, self.precision);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.keys.len() as u32);
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.locations.push(NodeLocation::new(pos));
        id
    }

    /// Add an undirected walkway weighted by the great-circle distance
    /// between the two nodes.  Returns the weight, or `None` when `a == b`
    /// (no self-loop is stored).
    pub fn add_walkway(&mut self, a: NodeId, b: NodeId) -> Option<f64> {
        let weight_m = self.node_pos(a).distance_m(self.node_pos(b));
        self.add_walkway_with_weight(a, b, weight_m).then_some(weight_m)
    }

    /// Add an undirected walkway with an explicit length.
    ///
    /// Heuristic search stays optimal only while every weight is at least the
    /// great-circle distance between its endpoints.
    pub fn add_walkway_with_weight(&mut self, a: NodeId, b: NodeId, weight_m: f64) -> bool {
        debug_assert!(weight_m >= 0.0, "negative walkway weight {weight_m}");
        if a == b {
            debug!("skipping zero-length walkway at {}", self.keys[a.index()]);
            return false;
        }
        self.raw_edges.push(RawEdge { from: a, to: b, weight_m });
        self.raw_edges.push(RawEdge { from: b, to: a, weight_m });
        true
    }

    /// Position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.locations[id.index()].pos()
    }

    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn precision(&self) -> KeyPrecision { self.precision }
    pub fn node_count(&self) -> usize { self.keys.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`SpatialGraph`].
    ///
    /// The edge sort is stable, so each node's neighbours keep the order in
    /// which their walkways were added.
    pub fn build(self) -> SpatialGraph {
        let node_count = self.keys.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight_m: Vec<f64>    = raw.iter().map(|e| e.weight_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let entries: Vec<NodeEntry> = self
            .locations
            .iter()
            .enumerate()
            .map(|(i, loc)| NodeEntry { point: [loc.lat, loc.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        SpatialGraph {
            keys: self.keys,
            locations: self.locations,
            index: self.index,
            node_out_start,
            edge_to,
            edge_weight_m,
            precision: self.precision,
            spatial_idx,
        }
    }
}

impl Default for SpatialGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
