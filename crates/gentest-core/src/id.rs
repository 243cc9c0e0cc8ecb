use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for node handles.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned variable name of a layout node inside a generated test
/// (`root`, `root_child0`, `root_child0_child1`, ...).
///
/// 4 bytes, Copy, Eq, Hash in O(1). Every backend uses the same name as its
/// local variable, so generated files read alike side by side.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeName(Spur);

impl NodeName {
    /// Intern a string as a NodeName, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeName(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The name of every test case's top node.
    pub fn root() -> Self {
        Self::intern("root")
    }

    /// Name of the `index`-th child of this node, e.g. `root_child0`.
    pub fn child(&self, index: usize) -> Self {
        Self::intern(&format!("{}_child{index}", self.as_str()))
    }
}

impl fmt::Debug for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeName::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeName::intern("root_child0");
        let b = NodeName::intern("root_child0");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "root_child0");
    }

    #[test]
    fn child_names_nest() {
        let grandchild = NodeName::root().child(0).child(1);
        assert_eq!(grandchild.as_str(), "root_child0_child1");
    }
}
