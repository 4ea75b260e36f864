use std::collections::BTreeMap;

/// Logical field name -> column index, built once per file from the header.
/// A field that was looked up but not found is recorded as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap(BTreeMap<String, Option<usize>>);

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, index: Option<usize>) {
        self.0.insert(field.into(), index);
    }

    /// Column index of `field`, `None` when absent or never resolved
    pub fn get(&self, field: &str) -> Option<usize> {
        self.0.get(field).copied().flatten()
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Fields that were resolved without a matching column
    pub fn missing(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields() {
        let mut map = ColumnMap::new();
        map.insert("id", Some(0));
        map.insert("meta_title_en", None);

        assert_eq!(map.get("id"), Some(0));
        assert_eq!(map.get("meta_title_en"), None);
        assert_eq!(map.get("never_resolved"), None);
        assert_eq!(map.missing(), vec!["meta_title_en"]);
    }
}
