//! Ordered CFI lookup table
//!
//! Keeps entries (table-of-contents items, bookmarks, page markers) sorted in
//! document order so a reading position can be mapped to the entry it falls
//! under.

use std::cmp::Ordering;

use super::comparator::document_order;
use super::types::Cfi;

/// Entries keyed by CFI, kept in document order
#[derive(Debug, Clone)]
pub struct LocationIndex<T> {
    entries: Vec<(Cfi, T)>,
}

impl<T> Default for LocationIndex<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> LocationIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after any entries that compare equal, so insertion order is
    /// preserved among equal keys
    pub fn insert(&mut self, cfi: Cfi, value: T) {
        let at = self
            .entries
            .partition_point(|(key, _)| document_order(key, &cfi) != Ordering::Greater);
        self.entries.insert(at, (cfi, value));
    }

    /// Index of the last entry not after `cfi`
    pub fn position_of(&self, cfi: &Cfi) -> Option<usize> {
        self.entries
            .partition_point(|(key, _)| document_order(key, cfi) != Ordering::Greater)
            .checked_sub(1)
    }

    /// The last entry not after `cfi`, e.g. the chapter a position is in
    pub fn locate(&self, cfi: &Cfi) -> Option<&T> {
        self.position_of(cfi).map(|i| &self.entries[i].1)
    }

    pub fn get(&self, index: usize) -> Option<(&Cfi, &T)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cfi, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<T> FromIterator<(Cfi, T)> for LocationIndex<T> {
    fn from_iter<I: IntoIterator<Item = (Cfi, T)>>(iter: I) -> Self {
        let mut entries: Vec<(Cfi, T)> = iter.into_iter().collect();
        entries.sort_by(|a, b| document_order(&a.0, &b.0));
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfi::parse;

    fn toc() -> LocationIndex<&'static str> {
        [
            ("epubcfi(/6/6!/4/2)", "Chapter 2"),
            ("epubcfi(/6/4!/4/2)", "Chapter 1"),
            ("epubcfi(/6/4!/4/10)", "Chapter 1, part 2"),
            ("epubcfi(/6/8!/4)", "Chapter 3"),
        ]
        .into_iter()
        .map(|(cfi, label)| (parse(cfi).unwrap(), label))
        .collect()
    }

    #[test]
    fn test_entries_sorted() {
        let labels: Vec<_> = toc().iter().map(|(_, label)| *label).collect();
        assert_eq!(
            labels,
            vec!["Chapter 1", "Chapter 1, part 2", "Chapter 2", "Chapter 3"]
        );
    }

    #[test]
    fn test_locate() {
        let index = toc();
        let at = |s: &str| index.locate(&parse(s).unwrap()).copied();

        assert_eq!(at("epubcfi(/6/4!/4/6/1:20)"), Some("Chapter 1"));
        assert_eq!(at("epubcfi(/6/4!/4/10)"), Some("Chapter 1, part 2"));
        assert_eq!(at("epubcfi(/6/4!/4/12/1:0)"), Some("Chapter 1, part 2"));
        assert_eq!(at("epubcfi(/6/10!/4/2)"), Some("Chapter 3"));
        assert_eq!(at("epubcfi(/6/2!/4/2)"), None);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut index = toc();
        index.insert(parse("epubcfi(/6/6!/4/8)").unwrap(), "Chapter 2, part 2");
        index.insert(parse("epubcfi(/6/6!/4/8)").unwrap(), "Chapter 2, duplicate");

        assert_eq!(index.len(), 6);
        assert_eq!(index.get(3).map(|(_, v)| *v), Some("Chapter 2, part 2"));
        assert_eq!(index.get(4).map(|(_, v)| *v), Some("Chapter 2, duplicate"));
        assert_eq!(
            index.locate(&parse("epubcfi(/6/6!/4/8/1:3)").unwrap()).copied(),
            Some("Chapter 2, duplicate")
        );
    }
}
