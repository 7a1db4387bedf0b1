//! Key-path addressing for fields inside a résumé document.
//!
//! A key-path is a list of segments, each a field name or an array index.
//! Its string form joins names with `.` and appends indices as `[n]`, so
//! `sections[2].content[0]` is `[Field("sections"), Index(2), Field("content"), Index(0)]`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed key-path '{path}': {reason}")]
    Malformed { path: String, reason: &'static str },

    /// An intermediate segment is absent, or the final container has the wrong shape.
    #[error("key-path '{path}' does not resolve: no {segment} in the document")]
    Unresolved { path: String, segment: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<Segment>);

/// The resolved write target of a key-path: the container plus the final key.
#[derive(Debug)]
pub enum Slot<'a> {
    Field {
        map: &'a mut Map<String, Value>,
        key: String,
    },
    Index {
        items: &'a mut Vec<Value>,
        index: usize,
    },
}

impl<'a> Slot<'a> {
    /// Current value at the slot. `None` for a field not yet present on its object.
    pub fn get(&self) -> Option<&Value> {
        match self {
            Slot::Field { map, key } => map.get(key),
            Slot::Index { items, index } => items.get(*index),
        }
    }

    /// Overwrites the slot, returning the previous value.
    pub fn set(self, value: Value) -> Option<Value> {
        match self {
            Slot::Field { map, key } => map.insert(key, value),
            Slot::Index { items, index } => Some(std::mem::replace(&mut items[index], value)),
        }
    }
}

impl KeyPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![Segment::Field(name.into())])
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(Segment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses the string form. Inverse of [`KeyPath::encode`].
    pub fn decode(path: &str) -> Result<Self, PathError> {
        let malformed = |reason| PathError::Malformed {
            path: path.to_string(),
            reason,
        };

        if path.is_empty() {
            return Err(malformed("path is empty"));
        }

        let mut segments = Vec::new();
        let mut rest = path;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(|| malformed("unterminated index"))?;
                let digits = &after[..end];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed("index is not a non-negative integer"));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| malformed("index is out of range"))?;
                segments.push(Segment::Index(index));
                rest = &after[end + 1..];
                continue;
            }

            let name_src = if segments.is_empty() {
                rest
            } else {
                rest.strip_prefix('.')
                    .ok_or_else(|| malformed("expected '.' or '[' between segments"))?
            };
            let end = name_src
                .find(|c: char| c == '.' || c == '[')
                .unwrap_or(name_src.len());
            let name = &name_src[..end];
            if name.is_empty() {
                return Err(malformed("empty field name"));
            }
            if name.contains(']') {
                return Err(malformed("unexpected ']'"));
            }
            segments.push(Segment::Field(name.to_string()));
            rest = &name_src[end..];
        }

        Ok(Self(segments))
    }

    /// Reads the value at this path, if every segment exists.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(root, |current, segment| match segment {
            Segment::Field(name) => current.as_object()?.get(name),
            Segment::Index(index) => current.as_array()?.get(*index),
        })
    }

    /// Walks to the container of the final segment without creating anything.
    ///
    /// Fails if an intermediate segment is absent or is not a container. The final
    /// segment may name a missing field of an existing object, but an index must
    /// point inside an existing array.
    pub fn resolve<'a>(&self, root: &'a mut Value) -> Result<Slot<'a>, PathError> {
        let (last, parents) = self.0.split_last().ok_or_else(|| PathError::Malformed {
            path: String::new(),
            reason: "path is empty",
        })?;

        let mut current = root;
        for segment in parents {
            let next = match (segment, current) {
                (Segment::Field(name), Value::Object(map)) => map.get_mut(name),
                (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
                _ => None,
            };
            current = match next {
                Some(Value::Null) | None => return Err(self.unresolved(segment)),
                Some(value) => value,
            };
        }

        match (last, current) {
            (Segment::Field(name), Value::Object(map)) => Ok(Slot::Field {
                map,
                key: name.clone(),
            }),
            (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
                Ok(Slot::Index {
                    items,
                    index: *index,
                })
            }
            _ => Err(self.unresolved(last)),
        }
    }

    fn unresolved(&self, segment: &Segment) -> PathError {
        PathError::Unresolved {
            path: self.to_string(),
            segment: match segment {
                Segment::Field(name) => format!("field '{name}'"),
                Segment::Index(index) => format!("index [{index}]"),
            },
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_string())
    }

    #[test]
    fn test_encode_mixed_segments() {
        let path = KeyPath::root("sections").index(2).field("content").index(0);
        assert_eq!(path.encode(), "sections[2].content[0]");
    }

    #[test]
    fn test_decode_mixed_segments() {
        let path = KeyPath::decode("a.b[2].c").unwrap();
        assert_eq!(
            path.segments(),
            &[field("a"), field("b"), Segment::Index(2), field("c")]
        );
    }

    #[test]
    fn test_decode_consecutive_indices() {
        let path: KeyPath = "grid[1][3]".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[field("grid"), Segment::Index(1), Segment::Index(3)]
        );
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for bad in ["", "a..b", "a.", ".a", "a[", "a[x]", "a[-1]", "a[1]b", "a]"] {
            assert!(
                matches!(KeyPath::decode(bad), Err(PathError::Malformed { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_and_set_nested() {
        let mut doc = json!({"sections": [{"content": ["one", "two"]}]});
        let path = KeyPath::decode("sections[0].content[1]").unwrap();
        let previous = path.resolve(&mut doc).unwrap().set(json!("TWO"));
        assert_eq!(previous, Some(json!("two")));
        assert_eq!(doc["sections"][0]["content"][1], json!("TWO"));
    }

    #[test]
    fn test_resolve_inserts_missing_final_field() {
        let mut doc = json!({"contact_info": {}});
        let path = KeyPath::decode("contact_info.phone").unwrap();
        path.resolve(&mut doc).unwrap().set(json!("555"));
        assert_eq!(doc["contact_info"]["phone"], json!("555"));
    }

    #[test]
    fn test_resolve_never_creates_intermediates() {
        let mut doc = json!({"candidate_name": "A"});
        let path = KeyPath::decode("contact_info.email").unwrap();
        assert!(matches!(
            path.resolve(&mut doc),
            Err(PathError::Unresolved { .. })
        ));
        assert_eq!(doc, json!({"candidate_name": "A"}));
    }

    #[test]
    fn test_resolve_rejects_index_past_end() {
        let mut doc = json!({"sections": [{"content": ["only"]}]});
        let path = KeyPath::decode("sections[0].content[1]").unwrap();
        assert!(path.resolve(&mut doc).is_err());
        let path = KeyPath::decode("sections[3].content").unwrap();
        assert!(path.resolve(&mut doc).is_err());
    }

    #[test]
    fn test_resolve_through_null_fails() {
        let mut doc = json!({"contact_info": null});
        let path = KeyPath::decode("contact_info.email").unwrap();
        assert!(path.resolve(&mut doc).is_err());
    }

    #[test]
    fn test_get_reads_leaf() {
        let doc = json!({"sections": [{"content": "text"}]});
        let path = KeyPath::decode("sections[0].content").unwrap();
        assert_eq!(path.get(&doc), Some(&json!("text")));
        assert_eq!(KeyPath::decode("sections[1]").unwrap().get(&doc), None);
    }

    fn segment_strategy() -> impl Strategy<Value = Segment> {
        prop_oneof![
            "[a-z_][a-z0-9_]{0,8}".prop_map(Segment::Field),
            (0usize..10_000).prop_map(Segment::Index),
        ]
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(segments in prop::collection::vec(segment_strategy(), 1..8)) {
            let path = KeyPath(segments);
            let decoded = KeyPath::decode(&path.encode()).unwrap();
            prop_assert_eq!(decoded, path);
        }
    }
}
