//! Row filters applied while loading tables
//!
//! A [`FilterSet`] holds at most one [`Filter`] per column. Column names are
//! matched case-insensitively and a column without a filter accepts every
//! value.

use std::cmp::Ordering;

use ahash::AHashMap;
use rowcsv::{FieldValue, RowCursor};

/// Condition a column value must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Equals(FieldValue),
    NotEquals(FieldValue),
    Greater(FieldValue),
    GreaterOrEqual(FieldValue),
    Less(FieldValue),
    LessOrEqual(FieldValue),
    /// Equal to any of the listed values
    In(Vec<FieldValue>),
    /// Inclusive range
    Between(FieldValue, FieldValue),
    /// Case-insensitive substring match on the value's text
    Contains(String),
}

/// A condition bound to a column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    column: String,
    condition: FilterCondition,
}

impl Filter {
    pub fn new<S: Into<String>>(column: S, condition: FilterCondition) -> Self {
        Self {
            column: column.into(),
            condition,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    /// Whether a value satisfies the condition
    pub fn matches(&self, value: &FieldValue) -> bool {
        match &self.condition {
            FilterCondition::Equals(other) => compare_values(value, other).is_eq(),
            FilterCondition::NotEquals(other) => compare_values(value, other).is_ne(),
            FilterCondition::Greater(other) => compare_values(value, other).is_gt(),
            FilterCondition::GreaterOrEqual(other) => compare_values(value, other).is_ge(),
            FilterCondition::Less(other) => compare_values(value, other).is_lt(),
            FilterCondition::LessOrEqual(other) => compare_values(value, other).is_le(),
            FilterCondition::In(values) => values
                .iter()
                .any(|other| compare_values(value, other).is_eq()),
            FilterCondition::Between(low, high) => {
                compare_values(value, low).is_ge() && compare_values(value, high).is_le()
            }
            FilterCondition::Contains(needle) => value
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// Filters keyed by column name
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: AHashMap<String, Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any previous filter on the same column
    pub fn add(&mut self, filter: Filter) {
        self.filters.insert(filter.column.to_lowercase(), filter);
    }

    /// Builder-style [`add`](Self::add)
    pub fn with<S: Into<String>>(mut self, column: S, condition: FilterCondition) -> Self {
        self.add(Filter::new(column, condition));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter registered for a column
    pub fn get(&self, column: &str) -> Option<&Filter> {
        self.filters.get(&column.to_lowercase())
    }

    /// Whether a column value passes its filter (always true without one)
    pub fn evaluate(&self, column: &str, value: &FieldValue) -> bool {
        self.get(column).map_or(true, |filter| filter.matches(value))
    }

    /// Whether the cursor's current row passes every filter
    ///
    /// Filters naming columns the cursor does not have are ignored.
    pub fn matches<C: RowCursor + ?Sized>(&self, cursor: &C) -> bool {
        if self.is_empty() {
            return true;
        }
        (0..cursor.column_count()).all(|index| match cursor.column_name(index) {
            Some(name) => self.evaluate(name, cursor.value(index)),
            None => true,
        })
    }
}

/// Total order used by the comparison conditions
///
/// Null sorts before everything. Integers and decimals compare numerically,
/// timestamps and booleans by value; anything else compares as
/// case-insensitive text.
pub fn compare_values(left: &FieldValue, right: &FieldValue) -> Ordering {
    match (left, right) {
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Less,
        (_, FieldValue::Null) => Ordering::Greater,
        (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
        (FieldValue::Int(_) | FieldValue::Decimal(_), FieldValue::Int(_) | FieldValue::Decimal(_)) => {
            let a = left.as_f64().unwrap_or_default();
            let b = right.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
        (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
        _ => left
            .to_string()
            .to_lowercase()
            .cmp(&right.to_string().to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> FieldValue {
        FieldValue::Timestamp(
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&FieldValue::Null, &FieldValue::Int(0)), Ordering::Less);
        assert_eq!(compare_values(&FieldValue::Null, &FieldValue::Null), Ordering::Equal);
        assert_eq!(compare_values(&FieldValue::Int(2), &FieldValue::Decimal(1.5)), Ordering::Greater);
        assert_eq!(compare_values(&FieldValue::Decimal(2.0), &FieldValue::Int(2)), Ordering::Equal);
        assert_eq!(compare_values(&day(1), &day(2)), Ordering::Less);
        assert_eq!(
            compare_values(&FieldValue::text("apple"), &FieldValue::text("APPLE")),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&FieldValue::text("b"), &FieldValue::text("A")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_conditions() {
        let value = FieldValue::Int(5);
        let check = |condition| Filter::new("n", condition).matches(&value);

        assert!(check(FilterCondition::Equals(FieldValue::Decimal(5.0))));
        assert!(check(FilterCondition::NotEquals(FieldValue::Int(4))));
        assert!(check(FilterCondition::Greater(FieldValue::Int(4))));
        assert!(check(FilterCondition::GreaterOrEqual(FieldValue::Int(5))));
        assert!(!check(FilterCondition::Less(FieldValue::Int(5))));
        assert!(check(FilterCondition::LessOrEqual(FieldValue::Int(5))));
        assert!(check(FilterCondition::In(vec![FieldValue::Int(1), FieldValue::Int(5)])));
        assert!(!check(FilterCondition::In(Vec::new())));
        assert!(check(FilterCondition::Between(FieldValue::Int(5), FieldValue::Int(9))));
        assert!(!check(FilterCondition::Between(FieldValue::Int(6), FieldValue::Int(9))));
    }

    #[test]
    fn test_contains_ignores_case() {
        let filter = Filter::new("name", FilterCondition::Contains("ALI".into()));
        assert!(filter.matches(&FieldValue::text("Alice")));
        assert!(!filter.matches(&FieldValue::text("Bob")));
        assert!(!filter.matches(&FieldValue::Null));
    }

    #[test]
    fn test_null_against_conditions() {
        let less = Filter::new("x", FilterCondition::Less(FieldValue::Int(0)));
        assert!(less.matches(&FieldValue::Null));
        let equals = Filter::new("x", FilterCondition::Equals(FieldValue::Null));
        assert!(equals.matches(&FieldValue::Null));
    }

    #[test]
    fn test_filter_set_lookup() {
        let filters = FilterSet::new()
            .with("City", FilterCondition::Equals(FieldValue::text("madrid")))
            .with("CITY", FilterCondition::Equals(FieldValue::text("sevilla")));

        assert_eq!(filters.len(), 1);
        assert!(filters.evaluate("city", &FieldValue::text("Sevilla")));
        assert!(!filters.evaluate("city", &FieldValue::text("Madrid")));
        assert!(filters.evaluate("other", &FieldValue::Null));
    }
}
