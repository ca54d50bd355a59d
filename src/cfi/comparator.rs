//! CFI Comparison and Ordering
//!
//! Implements comparison logic for CFIs to enable sorting annotations
//! and determining reading progress order.
//!
//! `Cfi` has no `Ord` impl. This ordering ignores assertions, so it
//! disagrees with `==`, and it is not antisymmetric for unreadable steps.
//! Sort with `sort_by(document_order)`.
//!
//! Precedence: spine position, then step indices along the path (a range
//! contributes its start continuation), then the terminal offset. ID and
//! text assertions never take part in ordering.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::parser::parse;
use super::types::*;
use super::CfiError;

/// Either a parsed CFI or its string form
#[derive(Debug, Clone, Copy)]
pub enum CfiRef<'a> {
    Text(&'a str),
    Value(&'a Cfi),
}

impl<'a> From<&'a str> for CfiRef<'a> {
    fn from(s: &'a str) -> Self {
        CfiRef::Text(s)
    }
}

impl<'a> From<&'a String> for CfiRef<'a> {
    fn from(s: &'a String) -> Self {
        CfiRef::Text(s.as_str())
    }
}

impl<'a> From<&'a Cfi> for CfiRef<'a> {
    fn from(cfi: &'a Cfi) -> Self {
        CfiRef::Value(cfi)
    }
}

impl<'a> CfiRef<'a> {
    fn resolve(self) -> Result<Cow<'a, Cfi>, CfiError> {
        match self {
            CfiRef::Text(s) => parse(s).map(Cow::Owned),
            CfiRef::Value(cfi) => Ok(Cow::Borrowed(cfi)),
        }
    }
}

impl Cfi {
    /// Steps and terminal used for ordering: `path + start` for a range,
    /// `path` otherwise
    fn ordering_key(&self) -> (Vec<Option<&Step>>, &Terminal) {
        let steps = self.path.steps.iter().map(Option::as_ref);
        match self.range {
            Some(ref range) => (
                steps.chain(range.start.steps.iter().map(Option::as_ref)).collect(),
                &range.start.terminal,
            ),
            None => (steps.collect(), &self.path.terminal),
        }
    }
}

/// Document order of two parsed CFIs.
///
/// For CFIs containing unreadable steps this is not antisymmetric: an
/// empty slot on the left-hand side sorts first even when the right-hand
/// side has an empty slot at the same position.
pub fn document_order(a: &Cfi, b: &Cfi) -> Ordering {
    let spine = a.spine_key().cmp(&b.spine_key());
    if spine != Ordering::Equal {
        return spine;
    }

    let (steps_a, terminal_a) = a.ordering_key();
    let (steps_b, terminal_b) = b.ordering_key();

    let len = steps_a.len().max(steps_b.len());
    for i in 0..len {
        let Some(a) = steps_a.get(i).copied().flatten() else {
            return Ordering::Less;
        };
        let Some(b) = steps_b.get(i).copied().flatten() else {
            return Ordering::Greater;
        };
        let cmp = a.index.cmp(&b.index);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    terminal_a.offset.cmp(&terminal_b.offset)
}

/// Compare two CFIs given as values or strings
///
/// Strings are parsed first; a malformed string is an error.
pub fn compare<'a, 'b>(
    a: impl Into<CfiRef<'a>>,
    b: impl Into<CfiRef<'b>>,
) -> Result<Ordering, CfiError> {
    let a = a.into().resolve()?;
    let b = b.into().resolve()?;
    Ok(document_order(&a, &b))
}

/// Compare two CFI strings, returning their ordering
/// Returns None if either CFI is invalid
pub fn compare_cfi_strings(a: &str, b: &str) -> Option<Ordering> {
    compare(a, b).ok()
}

/// Determine if CFI `a` comes before CFI `b` in reading order
pub fn is_before(a: &Cfi, b: &Cfi) -> bool {
    document_order(a, b) == Ordering::Less
}

/// Determine if CFI `a` comes after CFI `b` in reading order
pub fn is_after(a: &Cfi, b: &Cfi) -> bool {
    document_order(a, b) == Ordering::Greater
}

/// Check if a CFI falls within a range (inclusive)
pub fn is_in_range(cfi: &Cfi, start: &Cfi, end: &Cfi) -> bool {
    document_order(cfi, start) != Ordering::Less && document_order(cfi, end) != Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfi(s: &str) -> Cfi {
        parse(s).unwrap()
    }

    #[test]
    fn test_cfi_ordering_same_chapter() {
        let a = cfi("epubcfi(/6/4!/4/2/1:10)");
        let b = cfi("epubcfi(/6/4!/4/2/1:20)");

        assert!(is_before(&a, &b));
        assert!(is_after(&b, &a));
    }

    #[test]
    fn test_spine_position_first() {
        assert_eq!(
            compare("epubcfi(/6/2!/4:0)", "epubcfi(/6/4!/4:0)").unwrap(),
            Ordering::Less
        );
        // Spine dominates whatever the path says
        assert_eq!(
            compare("epubcfi(/6/2!/40/20/1:99)", "epubcfi(/6/4!/2:0)").unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_cfi_ordering_different_elements() {
        let a = cfi("epubcfi(/6/4!/4/2)");
        let b = cfi("epubcfi(/6/4!/4/4)");

        assert_eq!(document_order(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_shorter_path_sorts_first() {
        let a = cfi("epubcfi(/6/4!/4/2)");
        let b = cfi("epubcfi(/6/4!/4/2/1:0)");

        assert_eq!(document_order(&a, &b), Ordering::Less);
        assert_eq!(document_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_assertions_ignored() {
        let a = cfi("epubcfi(/6/4[chap]!/4[body]/2/1:42[abc])");
        let b = cfi("epubcfi(/6/4!/4/2/1:42)");

        assert_ne!(a, b);
        assert_eq!(document_order(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_equal_position_distinct_values() {
        // Same position, different id assertion: equal in document order
        // but distinct values, so both survive in a location index
        let a = cfi("epubcfi(/6/4!/4[a]/1:3)");
        let b = cfi("epubcfi(/6/4!/4/1:3)");
        assert_ne!(a, b);
        assert_eq!(document_order(&a, &b), Ordering::Equal);
        assert_eq!(document_order(&b, &a), Ordering::Equal);

        let index: crate::cfi::LocationIndex<&str> =
            [(a.clone(), "first"), (b.clone(), "second")].into_iter().collect();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).map(|(k, v)| (k.clone(), *v)), Some((a, "first")));
        assert_eq!(index.locate(&b).copied(), Some("second"));
    }

    #[test]
    fn test_kind_is_not_compared() {
        // Raw 3 and 4 both decode to index 1
        assert_eq!(
            compare("epubcfi(/6/4!/4/3)", "epubcfi(/6/4!/4/4)").unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_range_uses_start() {
        let range = cfi("epubcfi(/6/4!/4/2,/1:5,/3:2)");
        let before = cfi("epubcfi(/6/4!/4/2/1:4)");
        let after = cfi("epubcfi(/6/4!/4/2/1:6)");

        assert!(is_before(&before, &range));
        assert!(is_before(&range, &after));
        assert_eq!(
            document_order(&range, &cfi("epubcfi(/6/4!/4/2/1:5)")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_missing_offset_sorts_first() {
        let a = cfi("epubcfi(/6/4!/4/2/1)");
        let b = cfi("epubcfi(/6/4!/4/2/1:0)");
        // A missing offset orders before 0 rather than tying with it
        assert!(is_before(&a, &b));
        assert!(!is_before(&b, &a));
    }

    #[test]
    fn test_unreadable_step_left_side_wins() {
        // Literal tie-break: an empty slot on the left sorts first, even
        // against an empty slot on the right.
        let a = cfi("epubcfi(/6/4!/4/x/1:0)");
        let b = cfi("epubcfi(/6/4!/4/y/1:0)");
        assert_eq!(document_order(&a, &b), Ordering::Less);
        assert_eq!(document_order(&b, &a), Ordering::Less);

        let readable = cfi("epubcfi(/6/4!/4/2/1:0)");
        assert_eq!(document_order(&readable, &a), Ordering::Greater);
    }

    #[test]
    fn test_cfi_in_range() {
        let start = cfi("epubcfi(/6/4!/4/2/1:0)");
        let end = cfi("epubcfi(/6/4!/4/2/1:100)");
        let middle = cfi("epubcfi(/6/4!/4/2/1:50)");
        let outside = cfi("epubcfi(/6/4!/4/2/1:150)");

        assert!(is_in_range(&middle, &start, &end));
        assert!(is_in_range(&start, &start, &end));
        assert!(!is_in_range(&outside, &start, &end));
    }

    #[test]
    fn test_sort_cfis() {
        let mut cfis = vec![
            cfi("epubcfi(/6/8!/4/2/1:50)"),
            cfi("epubcfi(/6/4!/4/2/1:10)"),
            cfi("epubcfi(/6/6!/4/2/1:30)"),
            cfi("epubcfi(/6/4!/4/2/1:5)"),
        ];

        cfis.sort_by(document_order);

        assert_eq!(cfis[0].to_string(), "epubcfi(/6/4!/4/2/1:5)");
        assert_eq!(cfis[1].to_string(), "epubcfi(/6/4!/4/2/1:10)");
        assert_eq!(cfis[2].to_string(), "epubcfi(/6/6!/4/2/1:30)");
        assert_eq!(cfis[3].to_string(), "epubcfi(/6/8!/4/2/1:50)");
    }

    #[test]
    fn test_compare_mixed_inputs() {
        let value = cfi("epubcfi(/6/4!/4/2/1:20)");
        assert_eq!(
            compare("epubcfi(/6/4!/4/2/1:10)", &value).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_cfi_strings() {
        assert_eq!(
            compare_cfi_strings("epubcfi(/6/4!/4/2/1:10)", "epubcfi(/6/4!/4/2/1:20)"),
            Some(Ordering::Less)
        );

        assert_eq!(compare_cfi_strings("invalid", "epubcfi(/6/4!/4/2)"), None);
    }
}
