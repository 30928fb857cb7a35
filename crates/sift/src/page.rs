//! Pagination and its serializable result envelope.

use serde::Serialize;

/// One page of results plus the figures a client needs to request the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Number of matching items across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub has_next: bool,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            has_next: self.has_next,
        }
    }
}

impl<T: Clone> PageResult<&T> {
    /// Clones the borrowed items into an owned page.
    pub fn cloned(self) -> PageResult<T> {
        self.map(Clone::clone)
    }
}

/// Slices `items` to page `page` (1-based) of size `limit`.
///
/// Pages past the end are empty. `total` is the length before slicing.
///
/// ```
/// use sift::paginate;
///
/// let page = paginate((1..=25).collect::<Vec<_>>(), 3, 10);
/// assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
/// assert!(!page.has_next);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> PageResult<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);
    let items = items.into_iter().skip(start).take(end - start).collect();
    PageResult {
        items,
        total,
        page,
        limit,
        has_next: end < total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 1, 10);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert!(page.has_next);
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn exact_boundary_has_no_next() {
        let page = paginate((1..=20).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items.len(), 10);
        assert!(!page.has_next);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let page = paginate(vec![1, 2], usize::MAX, usize::MAX);
        assert!(page.items.is_empty());
    }

    #[test]
    fn serializes_envelope() {
        let page = paginate(vec!["a", "b", "c"], 1, 2);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": ["a", "b"],
                "total": 3,
                "page": 1,
                "limit": 2,
                "has_next": true
            })
        );
    }

    #[test]
    fn cloned_page() {
        let data = vec![String::from("x")];
        let borrowed = paginate(data.iter().collect(), 1, 5);
        let owned: PageResult<String> = borrowed.cloned();
        assert_eq!(owned.items, data);
    }
}
