//! Field/value pairs and the ordered field map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A labeled piece of extracted data, e.g. `("Date", "7/23/25")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub field: String,
    pub value: String,
}

impl FieldPair {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl<F: Into<String>, V: Into<String>> From<(F, V)> for FieldPair {
    fn from((field, value): (F, V)) -> Self {
        FieldPair::new(field, value)
    }
}

/// Ordered field/value pairs with unique field names.
///
/// Inserting an existing field replaces its value but keeps the position of
/// the first occurrence, so iteration order is the order in which fields
/// were first seen in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldPair>", into = "Vec<FieldPair>")]
pub struct FieldMap {
    pairs: Vec<FieldPair>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; the last value for a field wins.
    ///
    /// Returns the previous value if the field was already present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let field = field.into();
        let value = value.into();
        match self.index.get(&field) {
            Some(&pos) => Some(std::mem::replace(&mut self.pairs[pos].value, value)),
            None => {
                self.index.insert(field.clone(), self.pairs.len());
                self.pairs.push(FieldPair { field, value });
                None
            }
        }
    }

    /// Look up the value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.index
            .get(field)
            .map(|&pos| self.pairs[pos].value.as_str())
    }

    /// Check if a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Ordered pairs.
    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    /// Iterate over field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.field.as_str())
    }

    /// Iterate over the ordered pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldPair> {
        self.pairs.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Equivalent unordered mapping.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.pairs
            .iter()
            .map(|p| (p.field.clone(), p.value.clone()))
            .collect()
    }

    /// Consume the map into its ordered pairs.
    pub fn into_pairs(self) -> Vec<FieldPair> {
        self.pairs
    }
}

impl From<Vec<FieldPair>> for FieldMap {
    fn from(pairs: Vec<FieldPair>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<FieldMap> for Vec<FieldPair> {
    fn from(map: FieldMap) -> Self {
        map.pairs
    }
}

impl FromIterator<FieldPair> for FieldMap {
    fn from_iter<I: IntoIterator<Item = FieldPair>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for pair in iter {
            map.insert(pair.field, pair.value);
        }
        map
    }
}

impl Extend<FieldPair> for FieldMap {
    fn extend<I: IntoIterator<Item = FieldPair>>(&mut self, iter: I) {
        for pair in iter {
            self.insert(pair.field, pair.value);
        }
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a FieldPair;
    type IntoIter = std::slice::Iter<'a, FieldPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_value_wins() {
        let mut map = FieldMap::new();
        assert_eq!(map.insert("A", "1"), None);
        map.insert("B", "x");
        assert_eq!(map.insert("A", "2"), Some("1".to_string()));

        assert_eq!(map.get("A"), Some("2"));
        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_to_map() {
        let map: FieldMap = vec![FieldPair::new("Date", "7/1/25")].into();
        let plain = map.to_map();
        assert_eq!(plain.get("Date").map(String::as_str), Some("7/1/25"));
    }

    #[test]
    fn test_serde_as_pair_list() {
        let map: FieldMap = vec![
            FieldPair::new("Name", "Jane Doe"),
            FieldPair::new("Date", "7/1/25"),
        ]
        .into();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"[{"field":"Name","value":"Jane Doe"},{"field":"Date","value":"7/1/25"}]"#
        );

        let back: FieldMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
