//! Execution options for parameter-driven queries.

use serde::{Deserialize, Serialize};

use crate::ordering::OrderBy;

/// Page size used when neither the request nor the options give one.
pub const DEFAULT_LIMIT: usize = 20;

/// Defaults and limits applied when compiling a query from parameters.
///
/// ```
/// use sift::{OrderBy, QueryOptions};
///
/// let options = QueryOptions::default()
///     .with_default_limit(50)
///     .with_max_limit(200)
///     .with_default_sort(OrderBy::desc("created_at"));
/// assert_eq!(options.max_limit, Some(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Page size when the `limit` parameter is absent.
    pub default_limit: usize,
    /// Largest accepted `limit`. `None` means unbounded.
    pub max_limit: Option<usize>,
    /// Ordering when the `sort` parameter is absent.
    pub default_sort: Option<OrderBy>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
            default_sort: None,
        }
    }
}

impl QueryOptions {
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_max_limit(mut self, max: usize) -> Self {
        self.max_limit = Some(max);
        self
    }

    pub fn with_default_sort(mut self, order: OrderBy) -> Self {
        self.default_sort = Some(order);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = QueryOptions::default();
        assert_eq!(options.default_limit, 20);
        assert_eq!(options.max_limit, None);
        assert_eq!(options.default_sort, None);
    }

    #[test]
    fn deserializes_partial_config() {
        let options: QueryOptions = serde_json::from_str(r#"{"max_limit": 100}"#).unwrap();
        assert_eq!(options.default_limit, DEFAULT_LIMIT);
        assert_eq!(options.max_limit, Some(100));
    }

    #[test]
    fn deserializes_default_sort() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"default_sort": {"field": "name", "dir": "asc"}}"#).unwrap();
        assert_eq!(options.default_sort, Some(OrderBy::asc("name")));
    }
}
