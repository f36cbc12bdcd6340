use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a shape in a registry.
///
/// Assigned monotonically by `ShapeRegistry` and never reused within one
/// registry. Rendered as `shape-N`, which is also the tag the page shim puts
/// on the shape's DOM element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    const PREFIX: &'static str = "shape-";

    pub const fn new(n: u64) -> Self {
        ShapeId(n)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse a `shape-N` tag back into an id.
    pub fn parse(tag: &str) -> Option<Self> {
        tag.strip_prefix(Self::PREFIX)?.parse().ok().map(ShapeId)
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ShapeId::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid shape id: {s}")))
    }
}
