use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde_json::Value;

/// Structural keys of a storage row; everything else is an attribute.
const RESERVED_KEYS: [&str; 3] = ["id", "type", "index"];

/// One entity row as returned by a storage translator.
///
/// Translators speak loosely-shaped JSON: a row is an object with the
/// reserved keys `id`, `type` and `index`, plus one key per attribute whose
/// value carries at least a `values` array. This newtype preserves the
/// translator's key order and exposes the structural parts through
/// accessors; the response normalizer never touches the map directly.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(pub IndexMap<String, Value, FxBuildHasher>);

impl EntityRecord {
    /// The entity id, when the row carries one.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The entity type, when the row carries one.
    pub fn entity_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// The row's own time axis, when the row carries one.
    pub fn index(&self) -> Option<&[Value]> {
        self.0.get("index").and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Attribute names present on the row, alphabetically sorted, with the
    /// reserved structural keys excluded.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .0
            .keys()
            .map(String::as_str)
            .filter(|key| !RESERVED_KEYS.contains(key))
            .collect();
        names.sort_unstable();
        names
    }

    /// The `values` array of one attribute, metadata stripped.
    ///
    /// A missing or non-array `values` member projects as empty rather than
    /// failing the row.
    pub fn values_of(&self, attribute: &str) -> Vec<Value> {
        self.0
            .get(attribute)
            .and_then(|attr| attr.get("values"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

impl std::ops::Deref for EntityRecord {
    type Target = IndexMap<String, Value, FxBuildHasher>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<(String, Value)> for EntityRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

impl IntoIterator for EntityRecord {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
