use crate::domain::errors::FieldConflict;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Separator between the segments of a field path.
pub const PATH_SEPARATOR: char = '.';

/// One node of the field tree: either a nested object or a JSON leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    Object(BTreeMap<String, FieldNode>),
    Leaf(Value),
}

impl Serialize for FieldNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldNode::Object(children) => serialize_object(children, serializer),
            FieldNode::Leaf(value) => value.serialize(serializer),
        }
    }
}

fn serialize_object<S: Serializer>(
    children: &BTreeMap<String, FieldNode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(children.len()))?;
    for (key, node) in children {
        map.serialize_entry(key, node)?;
    }
    map.end()
}

/// Nested request fields keyed by dot-separated paths.
///
/// `person.name=brett` and `person.age:=100` end up as
/// `{"person": {"age": 100, "name": "brett"}}`. Keys are kept sorted so the
/// encoded body is stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTree {
    root: BTreeMap<String, FieldNode>,
}

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Stores `value` at `path`, creating intermediate objects as needed.
    ///
    /// Fails when a prefix of `path` already holds a leaf, or when `path` itself
    /// is already occupied. A failed insert leaves the tree unchanged: objects
    /// are only created below a vacant slot, where nothing can collide.
    pub fn insert(&mut self, path: &str, value: Value) -> Result<(), FieldConflict> {
        let (parents, last): (Vec<&str>, &str) = match path.rsplit_once(PATH_SEPARATOR) {
            Some((prefix, last)) => (prefix.split(PATH_SEPARATOR).collect(), last),
            None => (Vec::new(), path),
        };
        let conflict = |existing: String| FieldConflict {
            path: path.to_string(),
            existing,
        };

        let mut level = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let node = level
                .entry((*segment).to_string())
                .or_insert_with(|| FieldNode::Object(BTreeMap::new()));
            level = match node {
                FieldNode::Object(children) => children,
                FieldNode::Leaf(_) => return Err(conflict(parents[..=depth].join("."))),
            };
        }

        match level.entry(last.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(FieldNode::Leaf(value));
                Ok(())
            }
            Entry::Occupied(_) => Err(conflict(path.to_string())),
        }
    }

    /// Encodes the tree as a compact JSON document. An empty tree is `{}`.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl Serialize for FieldTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_object(&self.root, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(tree: &FieldTree) -> Value {
        serde_json::from_slice(&tree.to_json().unwrap()).unwrap()
    }

    #[test]
    fn empty_tree_encodes_as_empty_object() {
        let tree = FieldTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.to_json().unwrap(), b"{}");
    }

    #[test]
    fn nested_paths_create_intermediate_objects() {
        let mut tree = FieldTree::new();
        tree.insert("person.name", json!("brett")).unwrap();
        tree.insert("person.age", json!(100)).unwrap();
        tree.insert("type", json!("person")).unwrap();

        assert_eq!(
            encoded(&tree),
            json!({"type": "person", "person": {"name": "brett", "age": 100}})
        );
    }

    #[test]
    fn deep_paths_share_existing_objects() {
        let mut tree = FieldTree::new();
        tree.insert("a.b.c", json!(1)).unwrap();
        tree.insert("a.b.d", json!(2)).unwrap();
        tree.insert("a.e", json!(3)).unwrap();

        assert_eq!(encoded(&tree), json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}));
    }

    #[test]
    fn descending_through_a_leaf_is_a_conflict() {
        let mut tree = FieldTree::new();
        tree.insert("a", json!("1")).unwrap();

        let err = tree.insert("a.b", json!("2")).unwrap_err();
        assert_eq!(err.path, "a.b");
        assert_eq!(err.existing, "a");
        assert_eq!(encoded(&tree), json!({"a": "1"}));
    }

    #[test]
    fn overwriting_an_object_is_a_conflict() {
        let mut tree = FieldTree::new();
        tree.insert("a.b", json!("2")).unwrap();

        let err = tree.insert("a", json!("1")).unwrap_err();
        assert_eq!(err.existing, "a");
        assert_eq!(encoded(&tree), json!({"a": {"b": "2"}}));
    }

    #[test]
    fn repeating_a_leaf_is_a_conflict() {
        let mut tree = FieldTree::new();
        tree.insert("name", json!("one")).unwrap();

        let err = tree.insert("name", json!("two")).unwrap_err();
        assert_eq!(err.to_string(), "field `name` conflicts with the existing value at `name`");
    }

    #[test]
    fn json_leaves_are_opaque() {
        let mut tree = FieldTree::new();
        tree.insert("obj", json!({"inner": true})).unwrap();

        assert!(tree.insert("obj.inner", json!(false)).is_err());
        assert!(tree.insert("obj.other", json!(false)).is_err());
    }

    #[test]
    fn encoding_is_repeatable() {
        let mut tree = FieldTree::new();
        tree.insert("z", json!(1)).unwrap();
        tree.insert("a.y", json!([1, 2])).unwrap();
        tree.insert("a.x", json!(null)).unwrap();

        assert_eq!(tree.to_json().unwrap(), tree.to_json().unwrap());
        assert_eq!(tree.to_json().unwrap(), br#"{"a":{"x":null,"y":[1,2]},"z":1}"#);
    }
}
