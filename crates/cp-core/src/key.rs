//! Textual node identity.
//!
//! A node is identified by its coordinates formatted as `"<lat>,<lon>"`.  Two
//! positions that format to the same text are the same node: this is how
//! separate line features that share an endpoint become connected.  The
//! formatting precision therefore decides which endpoints merge, and is
//! configurable through [`KeyPrecision`].

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, GeoPoint};

/// Largest supported number of decimals for [`KeyPrecision::Fixed`].
pub const MAX_DECIMALS: usize = 17;

// ── KeyPrecision ──────────────────────────────────────────────────────────────

/// How coordinates are rendered into a [`NodeKey`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyPrecision {
    /// Shortest decimal text that round-trips the `f64`, always with a
    /// fractional part: `1.0`, `34.0689`, `-118.44`.
    #[default]
    Shortest,
    /// Exactly this many decimals.  `Fixed(6)` gives `1.000000`.
    Fixed(usize),
}

impl KeyPrecision {
    /// Render one coordinate component.
    ///
    /// Negative zero is normalised to zero so `-0.0` and `0.0` merge.
    pub fn format(self, value: f64) -> String {
        let value = value + 0.0;
        match self {
            KeyPrecision::Shortest => {
                let mut s = value.to_string();
                if value.is_finite() && !s.contains('.') {
                    s.push_str(".0");
                }
                s
            }
            KeyPrecision::Fixed(decimals) => format!("{value:.decimals$}"),
        }
    }
}

impl FromStr for KeyPrecision {
    type Err = CoreError;

    /// Accepts `"shortest"`, `"fixed:<n>"`, or a bare decimal count `"<n>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("shortest") {
            return Ok(KeyPrecision::Shortest);
        }
        let digits = s
            .strip_prefix("fixed:")
            .or_else(|| s.strip_prefix("FIXED:"))
            .unwrap_or(s);
        let decimals: usize = digits
            .parse()
            .map_err(|_| CoreError::Parse(format!("unrecognised key precision {s:?}")))?;
        if decimals > MAX_DECIMALS {
            return Err(CoreError::PrecisionOutOfRange(decimals));
        }
        Ok(KeyPrecision::Fixed(decimals))
    }
}

impl fmt::Display for KeyPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPrecision::Shortest => f.write_str("shortest"),
            KeyPrecision::Fixed(n) => write!(f, "fixed:{n}"),
        }
    }
}

// ── NodeKey ───────────────────────────────────────────────────────────────────

/// String identity of a network node, `"<lat>,<lon>"`.
///
/// Hashes and compares like the underlying `str`, so maps keyed by
/// `NodeKey` can be queried with a plain `&str`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeKey(String);

impl NodeKey {
    /// Wrap an existing key string without validation.
    pub fn new(key: impl Into<String>) -> Self {
        NodeKey(key.into())
    }

    /// Build the key for a coordinate pair.
    pub fn from_coords(lat: f64, lon: f64, precision: KeyPrecision) -> Self {
        let mut key = precision.format(lat);
        key.push(',');
        key.push_str(&precision.format(lon));
        NodeKey(key)
    }

    pub fn from_point(pos: GeoPoint, precision: KeyPrecision) -> Self {
        Self::from_coords(pos.lat, pos.lon, precision)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        NodeKey(s.to_owned())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        NodeKey(s)
    }
}

impl PartialEq<str> for NodeKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
