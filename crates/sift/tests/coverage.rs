//! Additional tests covering operators and helpers end to end.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sift::{
    coerce, parse_date, sort_by_distance, BoundingBox, CoercionError, Coordinates, FieldError,
    FieldPath, FieldValue, Kind, MatchMode, MatchOptions, Number, Op, Operand, Point, Predicate,
    QueryError, Record, Value,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone)]
struct Store {
    name: String,
    lat: f64,
    lng: f64,
    opened: String,
    tags: Vec<String>,
    stock: BTreeMap<String, u32>,
    manager: Option<Manager>,
}

#[derive(Debug, Clone)]
struct Manager {
    email: String,
}

impl Record for Manager {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "email" => Some(self.email.to_value()),
            _ => None,
        }
    }
}

impl FieldValue for Manager {
    fn to_value(&self) -> Value<'_> {
        Value::Record(self)
    }
}

impl Record for Store {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "name" => Some(self.name.to_value()),
            "lat" => Some(self.lat.to_value()),
            "lng" => Some(self.lng.to_value()),
            "opened" => Some(self.opened.to_value()),
            "tags" => Some(self.tags.to_value()),
            "stock" => Some(self.stock.to_value()),
            "manager" => Some(self.manager.to_value()),
            _ => None,
        }
    }
}

fn store(name: &str, lat: f64, lng: f64, opened: &str, tags: &[&str]) -> Store {
    Store {
        name: name.into(),
        lat,
        lng,
        opened: opened.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        stock: BTreeMap::new(),
        manager: None,
    }
}

fn stores() -> Vec<Store> {
    let mut lisbon = store("Lisbon Central", 38.7223, -9.1393, "2019-03-01", &["flagship", "Food"]);
    lisbon.stock.insert("apples".into(), 40);
    lisbon.stock.insert("pears".into(), 0);
    lisbon.manager = Some(Manager {
        email: "ana@example.com".into(),
    });

    let mut porto = store("Porto Ribeira", 41.1496, -8.6109, "06/15/2021", &["food"]);
    porto.stock.insert("apples".into(), 5);

    let madrid = store("Madrid Sol", 40.4168, -3.7038, "not a date", &[]);

    vec![lisbon, porto, madrid]
}

fn names(found: &[&Store]) -> Vec<String> {
    found.iter().map(|s| s.name.clone()).collect()
}

fn coordinates() -> Coordinates {
    Coordinates::new("lat", "lng")
}

// ============================================================================
// Geo
// ============================================================================

#[test]
fn radius_and_outside_radius_partition() {
    let data = stores();
    let lisbon = Point::new(38.7223, -9.1393);

    let near = Predicate::within_radius(coordinates(), lisbon, 300.0);
    let far = Predicate::outside_radius(coordinates(), lisbon, 300.0);

    assert_eq!(names(&near.filter(&data)), vec!["Lisbon Central", "Porto Ribeira"]);
    assert_eq!(names(&far.filter(&data)), vec!["Madrid Sol"]);
}

#[test]
fn bounding_box_covering_portugal() {
    let data = stores();
    let portugal = BoundingBox::new(Point::new(36.9, -9.6), Point::new(42.2, -6.1));
    let inside = Predicate::within_bounding_box(coordinates(), portugal);
    assert_eq!(inside.count(&data), 2);
}

#[test]
fn distance_sort_from_madrid() {
    let data = stores();
    let sorted = sort_by_distance(&data, &coordinates(), Point::new(40.4168, -3.7038));
    assert_eq!(
        names(&sorted),
        vec!["Madrid Sol", "Porto Ribeira", "Lisbon Central"]
    );
}

#[test]
fn distance_sort_skips_unlocatable_records() {
    let data = stores();
    let sorted = sort_by_distance(&data, &Coordinates::new("lat", "missing"), Point::new(0.0, 0.0));
    assert!(sorted.is_empty());
}

// ============================================================================
// Strings and dates
// ============================================================================

#[test]
fn text_modes() {
    let data = stores();
    let suffix = Predicate::text(
        "name",
        "SOL",
        MatchOptions::new(MatchMode::Suffix).ignore_case(),
    );
    assert_eq!(names(&suffix.filter(&data)), vec!["Madrid Sol"]);
    assert_eq!(Predicate::starts_with("name", "Porto").count(&data), 1);
    assert_eq!(Predicate::eq_ignore_case("name", "lisbon central").count(&data), 1);
}

#[test]
fn regex_and_invalid_regex() {
    let data = stores();
    assert_eq!(Predicate::regex("name", r"^\w+ \w+$").count(&data), 3);
    assert_eq!(Predicate::regex("name", "(").count(&data), 0);
}

#[test]
fn string_dates_in_several_layouts() {
    let data = stores();
    let cutoff = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(names(&Predicate::date_before("opened", cutoff).filter(&data)), vec!["Lisbon Central"]);
    assert_eq!(names(&Predicate::date_after("opened", cutoff).filter(&data)), vec!["Porto Ribeira"]);

    let day = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(Predicate::date_between("opened", day, day).count(&data), 1);
    assert!(parse_date("not a date").is_none());
}

// ============================================================================
// Sequences and mappings
// ============================================================================

#[test]
fn sequence_operators() {
    let data = stores();
    assert_eq!(Predicate::array_contains("tags", "food").count(&data), 1);
    assert_eq!(Predicate::array_contains_ignore_case("tags", "food").count(&data), 2);
    assert_eq!(Predicate::array_contains_any("tags", ["flagship", "food"]).count(&data), 2);
    assert_eq!(Predicate::array_contains_all("tags", ["flagship", "Food"]).count(&data), 1);
    assert_eq!(Predicate::is_zero("tags").count(&data), 1);
}

#[test]
fn element_tests_on_empty_sequences() {
    let data = stores();
    let all_lower = Predicate::array_all("tags", |v: &Value<'_>| {
        v.as_str().is_some_and(|s| s.chars().all(|c| c.is_lowercase()))
    });
    assert_eq!(names(&all_lower.filter(&data)), vec!["Porto Ribeira"]);
}

#[test]
fn mapping_operators() {
    let data = stores();
    assert_eq!(Predicate::has_key("stock", "pears").count(&data), 1);
    assert_eq!(Predicate::has_value("stock", 5u32).count(&data), 1);
    assert_eq!(Predicate::key_value_equals("stock", "apples", 40).count(&data), 1);
    assert_eq!(
        Predicate::map_contains_all("stock", [("apples", 40), ("pears", 0)]).count(&data),
        1
    );
    assert_eq!(
        Predicate::map_contains_any("stock", [("apples", 5), ("pears", 0)]).count(&data),
        2
    );
    assert_eq!(Predicate::map_size_equals("stock", 0).count(&data), 1);
    assert_eq!(Predicate::map_size_greater_than("stock", 1).count(&data), 1);
    assert_eq!(Predicate::map_size_less_than("stock", 2).count(&data), 2);
    assert_eq!(Predicate::has_key("name", "x").count(&data), 0);
}

// ============================================================================
// Nullable nested records
// ============================================================================

#[test]
fn optional_nested_record() {
    let data = stores();
    assert_eq!(Predicate::is_nil("manager").count(&data), 2);
    assert_eq!(Predicate::is_not_nil("manager").count(&data), 1);
    assert_eq!(Predicate::ends_with("manager.email", "@example.com").count(&data), 1);
    assert_eq!(
        Predicate::not(Predicate::ends_with("manager.email", "@example.com")).count(&data),
        2
    );
}

#[test]
fn resolve_errors_name_the_segment() {
    let data = stores();
    assert_eq!(
        sift::resolve(&data[1], &FieldPath::parse("manager.email")).unwrap_err(),
        FieldError::NilReference {
            segment: "manager".into()
        }
    );
    assert_eq!(
        sift::resolve(&data[0], &FieldPath::parse("name.first")).unwrap_err(),
        FieldError::NotComposite {
            segment: "name".into(),
            kind: "string"
        }
    );
}

// ============================================================================
// Custom predicates
// ============================================================================

#[test]
fn custom_predicate_composes() {
    let data = stores();
    let stocked = Predicate::custom(|s: &Store| s.stock.values().sum::<u32>() > 10);
    let both = Predicate::and(vec![stocked, Predicate::array_contains("tags", "flagship")]);
    assert_eq!(names(&both.filter(&data)), vec!["Lisbon Central"]);
}

// ============================================================================
// Float widths
// ============================================================================

struct Item {
    price: f32,
}

impl Record for Item {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "price" => Some(self.price.to_value()),
            _ => None,
        }
    }

    fn descriptors() -> Vec<sift::FieldDescriptor> {
        vec![sift::FieldDescriptor::new("price", Kind::F32).filterable()]
    }
}

#[test]
fn f32_fields_match_f64_literals() {
    let items = vec![Item { price: 19.99 }, Item { price: 0.1 }];

    assert_eq!(Predicate::eq("price", 0.1).count(&items), 1);
    assert_eq!(Predicate::eq("price", 19.99).count(&items), 1);
    assert_eq!(Predicate::lte("price", 19.99).count(&items), 2);
    assert_eq!(Predicate::lt("price", 19.99).count(&items), 1);

    let params: sift::Params = [("price", "19.99")].into_iter().collect();
    let query = sift::compile::<Item>(&params, &sift::QueryOptions::default()).unwrap();
    assert_eq!(query.apply(&items).len(), 1);
}

// ============================================================================
// Coercion, operators and errors
// ============================================================================

#[test]
fn coercion_per_kind() {
    assert_eq!(coerce("-3", &Kind::I16), Ok(Operand::Number(Number::I16(-3))));
    assert_eq!(coerce("T", &Kind::Bool), Ok(Operand::Bool(true)));
    assert_eq!(
        coerce("x", &Kind::Optional(Box::new(Kind::U32))),
        Err(CoercionError {
            raw: "x".into(),
            expected: "u32".into()
        })
    );
    assert!(coerce("2024-02-30", &Kind::Timestamp).is_err());
    assert!(coerce("anything", &Kind::Mapping).is_err());
}

#[test]
fn operator_suffixes() {
    assert_eq!(Op::split_key("created_at_gte"), ("created_at", Op::Gte));
    assert_eq!(Op::split_key("price_between"), ("price", Op::Between));
    assert_eq!(Op::split_key("status"), ("status", Op::Eq));
    assert_eq!(Op::split_key("_in"), ("_in", Op::Eq));
}

#[test]
fn error_messages() {
    assert_eq!(
        QueryError::FieldNotFilterable("secret".into()).to_string(),
        "field 'secret' is not filterable"
    );
    assert_eq!(
        QueryError::LimitExceeded {
            requested: 500,
            max: 100
        }
        .to_string(),
        "limit 500 exceeds maximum of 100"
    );
    assert_eq!(
        CoercionError {
            raw: "abc".into(),
            expected: "i64".into()
        }
        .to_string(),
        "cannot parse 'abc' as i64"
    );
}
