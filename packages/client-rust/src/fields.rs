//! Ordered result of a multi-field lookup.

use std::collections::HashMap;

/// Field → value pairs in the order the fields were requested.
///
/// Missing fields are kept with a `None` value. A field requested more than
/// once appears once, at its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    entries: Vec<(String, Option<String>)>,
}

impl FieldValues {
    pub(crate) fn from_lookup(fields: Vec<String>, values: Vec<Option<String>>) -> Self {
        fields.into_iter().zip(values).collect()
    }

    /// Value stored for `field`, or `None` if it is missing or was not
    /// requested.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.position(field)
            .and_then(|index| self.entries[index].1.as_deref())
    }

    /// Whether `field` was part of the lookup.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Number of distinct fields looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no fields were looked up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(field, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_deref()))
    }

    /// Requested fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    /// Only the fields that exist, as a map.
    #[must_use]
    pub fn present(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(field, value)| value.clone().map(|value| (field.clone(), value)))
            .collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<(String, Option<String>)> {
        self.entries
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == field)
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for FieldValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut entries: Vec<(String, Option<String>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (field, value) in iter {
            let field = field.into();
            let value = value.map(Into::into);
            match index.get(&field) {
                Some(&at) => entries[at].1 = value,
                None => {
                    index.insert(field.clone(), entries.len());
                    entries.push((field, value));
                }
            }
        }
        Self { entries }
    }
}

impl IntoIterator for FieldValues {
    type Item = (String, Option<String>);
    type IntoIter = std::vec::IntoIter<(String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
