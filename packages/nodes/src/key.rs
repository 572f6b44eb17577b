use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

const ROOT_KEY: &str = "root";

/// Stable identifier of a node within one tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// Key reserved for the tree root
    pub fn root() -> Self {
        Self(ROOT_KEY.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Generate a namespace seed using CRC32
pub fn namespace_seed(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential key generator for nodes within a tree
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    seed: String,
    count: u32,
}

impl KeyGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: namespace_seed(namespace),
            count: 0,
        }
    }

    /// Generate next sequential key. Never yields the root key.
    pub fn next_key(&mut self) -> NodeKey {
        self.count += 1;
        NodeKey(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_seed_is_stable() {
        assert_eq!(namespace_seed("folio"), namespace_seed("folio"));
        assert_ne!(namespace_seed("folio"), namespace_seed("other"));
    }

    #[test]
    fn test_sequential_keys() {
        let mut keys = KeyGenerator::new("test");

        let k1 = keys.next_key();
        let k2 = keys.next_key();

        assert!(k1.as_str().ends_with("-1"));
        assert!(k2.as_str().ends_with("-2"));
        assert!(k1.as_str().starts_with(keys.seed()));
        assert!(!k1.is_root());
        assert!(NodeKey::root().is_root());
    }
}
