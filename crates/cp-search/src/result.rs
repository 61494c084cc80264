//! Query result record.

use std::fmt;

use cp_core::NodeKey;

/// Why a query produced no path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Unreachable {
    /// The start key is not a node of the graph.
    UnknownStart,
    /// The start is known but the end key is not.
    UnknownEnd,
    /// Both nodes exist but no walkway sequence connects them.
    NoPath,
}

impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unreachable::UnknownStart => "start node not in graph",
            Unreachable::UnknownEnd => "end node not in graph",
            Unreachable::NoPath => "no path between nodes",
        })
    }
}

/// Outcome of one shortest-path query.
///
/// `reachable`, `path`, and `weight` carry the whole contract; `reason` is a
/// diagnostic extra that is `None` exactly when `reachable` is `true`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub reachable:  bool,
    /// Node keys from start to end inclusive; empty when unreachable.
    pub path:       Vec<NodeKey>,
    /// Total length in metres; `0.0` when unreachable.
    pub weight:     f64,
    /// Wall-clock time spent finding the path, in milliseconds; `0.0` when
    /// unreachable.
    pub elapsed_ms: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reason:     Option<Unreachable>,
}

impl PathResult {
    pub fn found(path: Vec<NodeKey>, weight: f64, elapsed_ms: f64) -> Self {
        Self { reachable: true, path, weight, elapsed_ms, reason: None }
    }

    pub fn unreachable(reason: Unreachable, elapsed_ms: f64) -> Self {
        Self { reachable: false, path: Vec::new(), weight: 0.0, elapsed_ms, reason: Some(reason) }
    }

    /// Number of walkways traversed.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// `true` if start and end are the same node.
    pub fn is_trivial(&self) -> bool {
        self.reachable && self.path.len() == 1
    }

    /// Same reachability, path, and weight; timing is ignored.
    pub fn same_route(&self, other: &PathResult) -> bool {
        self.reachable == other.reachable && self.path == other.path && self.weight == other.weight
    }
}

impl fmt::Display for PathResult {
    /// `a -> b -> c (123.456 m)`, or `unreachable (<reason>)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.reachable {
            return match self.reason {
                Some(reason) => write!(f, "unreachable ({reason})"),
                None => f.write_str("unreachable"),
            };
        }
        for (i, key) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, " ({:.3} m)", self.weight)
    }
}
