use ahash::AHashSet;

/// Set of selected roof ids.
///
/// Ids are opaque: nothing checks them against the store, so a selection
/// restored from a URL may name roofs that have not been fetched yet.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    ids: AHashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self { Self::default() }

    /// Parse the comma-separated value of the selection parameter.
    /// A missing or empty value gives an empty set; empty tokens are skipped.
    pub fn restore(param: Option<&str>) -> Self {
        param.map(|value| {
            value.split(',').filter(|id| !id.is_empty()).map(str::to_string).collect()
        }).unwrap_or_default()
    }

    /// Comma-joined ids, in set iteration order.
    pub fn serialize(&self) -> String {
        self.ids.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }

    /// Flip membership of `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    #[inline] pub fn contains(&self, id: &str) -> bool { self.ids.contains(id) }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ { self.ids.iter().map(String::as_str) }
}

impl FromIterator<String> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
