//! Per-type registry of query-exposed fields.
//!
//! A record type declares its fields through [`Record::descriptors`], usually
//! generated by `#[derive(Record)]` from `#[query(...)]` annotations. The
//! registry maps each external column name to a descriptor. It is built once
//! per type and shared read-only afterwards.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::path::FieldPath;
use crate::record::Record;
use crate::value::Kind;

/// Query metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Path used to read the field from a record.
    pub path: FieldPath,
    /// External name override. `None` derives a snake_case name from the path.
    pub column: Option<String>,
    pub filterable: bool,
    pub sortable: bool,
    /// Declared kind, used to coerce parameter text.
    pub kind: Kind,
}

impl FieldDescriptor {
    /// Creates a descriptor that is neither filterable nor sortable.
    pub fn new(path: impl Into<FieldPath>, kind: Kind) -> Self {
        FieldDescriptor {
            path: path.into(),
            column: None,
            filterable: false,
            sortable: false,
            kind,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// The external name: the explicit column, or the snake_case path.
    pub fn column_name(&self) -> String {
        match &self.column {
            Some(column) => column.clone(),
            None => self
                .path
                .segments()
                .iter()
                .map(|segment| to_snake_case(segment))
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

/// Fields of one record type, keyed by external name.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    by_column: HashMap<String, usize>,
}

static REGISTRIES: Lazy<RwLock<HashMap<TypeId, Arc<FieldRegistry>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

impl FieldRegistry {
    /// Builds a registry from descriptors. A later column with the same name replaces an earlier one.
    pub fn from_descriptors(type_name: &'static str, descriptors: Vec<FieldDescriptor>) -> Self {
        let mut by_column = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            by_column.insert(descriptor.column_name(), index);
        }
        FieldRegistry {
            type_name,
            fields: descriptors,
            by_column,
        }
    }

    /// Returns the shared registry for `T`, building it on first use.
    pub fn of<T: Record + 'static>() -> Arc<FieldRegistry> {
        let id = TypeId::of::<T>();
        if let Some(registry) = REGISTRIES.read().get(&id) {
            return Arc::clone(registry);
        }

        let mut registries = REGISTRIES.write();
        let registry = registries.entry(id).or_insert_with(|| {
            let registry = FieldRegistry::from_descriptors(type_name::<T>(), T::descriptors());
            tracing::debug!(
                record = registry.type_name,
                fields = registry.len(),
                "built field registry"
            );
            Arc::new(registry)
        });
        Arc::clone(registry)
    }

    /// Name of the record type this registry describes.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Looks up a field by external name.
    pub fn get(&self, column: &str) -> Option<&FieldDescriptor> {
        self.by_column.get(column).map(|&index| &self.fields[index])
    }

    /// Looks up a field that may be filtered on.
    pub fn filterable(&self, column: &str) -> Option<&FieldDescriptor> {
        self.get(column).filter(|field| field.filterable)
    }

    /// Looks up a field that may be sorted on.
    pub fn sortable(&self, column: &str) -> Option<&FieldDescriptor> {
        self.get(column).filter(|field| field.sortable)
    }

    /// All registered fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Converts an identifier to snake_case.
///
/// Runs of capitals are kept together as one word, so acronyms survive.
///
/// ```
/// use sift::to_snake_case;
///
/// assert_eq!(to_snake_case("FirstName"), "first_name");
/// assert_eq!(to_snake_case("UserID"), "user_id");
/// assert_eq!(to_snake_case("HTMLParser"), "html_parser");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::value::Value;

    #[test]
    fn snake_case_conversions() {
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("UserID"), "user_id");
        assert_eq!(to_snake_case("HTMLParser"), "html_parser");
        assert_eq!(to_snake_case("FirstName"), "first_name");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("age"), "age");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn column_name_defaults_to_snake_path() {
        let plain = FieldDescriptor::new("createdAt", Kind::Timestamp);
        assert_eq!(plain.column_name(), "created_at");

        let nested = FieldDescriptor::new("address.zipCode", Kind::String);
        assert_eq!(nested.column_name(), "address_zip_code");

        let named = FieldDescriptor::new("age", Kind::U8).column("years");
        assert_eq!(named.column_name(), "years");
    }

    #[test]
    fn lookup_respects_flags() {
        let registry = FieldRegistry::from_descriptors(
            "Test",
            vec![
                FieldDescriptor::new("name", Kind::String).filterable().sortable(),
                FieldDescriptor::new("age", Kind::U8).filterable(),
                FieldDescriptor::new("rank", Kind::U32).sortable(),
            ],
        );
        assert!(registry.filterable("name").is_some());
        assert!(registry.sortable("name").is_some());
        assert!(registry.sortable("age").is_none());
        assert!(registry.filterable("rank").is_none());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_column_last_wins() {
        let registry = FieldRegistry::from_descriptors(
            "Test",
            vec![
                FieldDescriptor::new("a", Kind::String).column("x"),
                FieldDescriptor::new("b", Kind::Bool).column("x"),
            ],
        );
        assert_eq!(registry.get("x").map(|f| f.kind.clone()), Some(Kind::Bool));
    }

    struct Cached {
        score: u16,
    }

    impl Record for Cached {
        fn field(&self, name: &str) -> Option<Value<'_>> {
            (name == "score").then(|| self.score.to_value())
        }

        fn descriptors() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::new("score", Kind::U16).filterable()]
        }
    }

    #[test]
    fn registry_is_cached_per_type() {
        let first = FieldRegistry::of::<Cached>();
        let second = FieldRegistry::of::<Cached>();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.type_name().ends_with("Cached"));
        assert!(first.filterable("score").is_some());
    }
}
