//! Filters: predicates that decide whether a handler applies to a need

use crate::need::Need;
use crate::types::{Operation, Value, ValueKind};

/// A predicate over a [`Need`]
///
/// Handlers combine filters with logical AND. Any `Fn(&Need) -> bool`
/// closure is also a filter.
pub trait NeedFilter {
    /// Check whether the need passes this filter
    fn check_filter(&self, need: &Need) -> bool;
}

impl<F> NeedFilter for F
where
    F: Fn(&Need) -> bool,
{
    fn check_filter(&self, need: &Need) -> bool {
        self(need)
    }
}

/// Boxed filter for type-erased storage
pub type BoxedFilter = Box<dyn NeedFilter>;

/// Matches when the address path equals the given path exactly
#[derive(Debug, Clone)]
pub struct AddressPathExactFilter(pub Vec<String>);

impl AddressPathExactFilter {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(path.into_iter().map(Into::into).collect())
    }
}

impl NeedFilter for AddressPathExactFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.address_path == self.0
    }
}

/// Matches when the address path contains the given element
#[derive(Debug, Clone)]
pub struct AddressPathContainsFilter(pub String);

impl AddressPathContainsFilter {
    pub fn new(element: impl Into<String>) -> Self {
        Self(element.into())
    }
}

impl NeedFilter for AddressPathContainsFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.address_path.contains(&self.0)
    }
}

/// Matches when the parent states equal the given chain exactly
#[derive(Debug, Clone)]
pub struct ParentStatesExactFilter(pub Vec<String>);

impl ParentStatesExactFilter {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(states.into_iter().map(Into::into).collect())
    }
}

impl NeedFilter for ParentStatesExactFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.parent_states == self.0
    }
}

/// Matches when the parent states contain the given state name
#[derive(Debug, Clone)]
pub struct ParentStatesContainsFilter(pub String);

impl ParentStatesContainsFilter {
    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }
}

impl NeedFilter for ParentStatesContainsFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.parent_states.contains(&self.0)
    }
}

/// Matches on the attribute name
#[derive(Debug, Clone)]
pub struct AttributeFilter(pub String);

impl AttributeFilter {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self(attribute.into())
    }
}

impl NeedFilter for AttributeFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.attribute == self.0
    }
}

/// Matches on the operation
#[derive(Debug, Clone, Copy)]
pub struct OperationFilter(pub Operation);

impl NeedFilter for OperationFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.operation == self.0
    }
}

/// Matches when the need carries a value of the given kind
///
/// Needs without a value never match.
#[derive(Debug, Clone, Copy)]
pub struct ValueTypeFilter(pub ValueKind);

impl NeedFilter for ValueTypeFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.value.as_ref().is_some_and(|v| v.kind() == self.0)
    }
}

/// Matches when the need's value equals the given one
///
/// `ValueIsFilter(None)` matches needs without a value.
#[derive(Debug, Clone)]
pub struct ValueIsFilter(pub Option<Value>);

impl ValueIsFilter {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Some(value.into()))
    }
}

impl NeedFilter for ValueIsFilter {
    fn check_filter(&self, need: &Need) -> bool {
        need.value == self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn need_at(path: &[&str]) -> Need {
        Need::new("test", Operation::Set).with_address_path(path.iter().copied())
    }

    #[test]
    fn test_address_path_exact_filter() {
        let filter = AddressPathExactFilter::new(["one", "two"]);
        assert!(filter.check_filter(&need_at(&["one", "two"])));
    }

    #[test]
    fn test_address_path_exact_filter_negative() {
        let filter = AddressPathExactFilter::new(["one"]);
        assert!(!filter.check_filter(&need_at(&["one", "two"])));
    }

    #[test]
    fn test_address_path_contains_filter() {
        let filter = AddressPathContainsFilter::new("three");
        assert!(filter.check_filter(&need_at(&["one", "two", "three"])));
        assert!(!filter.check_filter(&need_at(&["one", "two"])));
    }

    #[test]
    fn test_parent_states_filters() {
        let need = Need::new("test", Operation::Set).with_parent_states(["root", "server"]);
        assert!(ParentStatesExactFilter::new(["root", "server"]).check_filter(&need));
        assert!(!ParentStatesExactFilter::new(["server"]).check_filter(&need));
        assert!(ParentStatesContainsFilter::new("server").check_filter(&need));
        assert!(!ParentStatesContainsFilter::new("client").check_filter(&need));
    }

    #[test]
    fn test_attribute_filter() {
        let need = Need::new("test", Operation::Set);
        assert!(AttributeFilter::new("test").check_filter(&need));
        assert!(!AttributeFilter::new("test2").check_filter(&need));
    }

    #[test]
    fn test_operation_filter() {
        assert!(OperationFilter(Operation::Set).check_filter(&Need::new("test", Operation::Set)));
        assert!(
            !OperationFilter(Operation::Set).check_filter(&Need::new("test", Operation::Delete))
        );
    }

    #[test]
    fn test_value_type_filter() {
        let need = Need::new("test", Operation::Set).with_value(false);
        assert!(ValueTypeFilter(ValueKind::Bool).check_filter(&need));
        assert!(!ValueTypeFilter(ValueKind::Str).check_filter(&need));
        let valueless = Need::new("test", Operation::Delete);
        assert!(!ValueTypeFilter(ValueKind::Bool).check_filter(&valueless));
    }

    #[test]
    fn test_value_is_filter() {
        let need = Need::new("test", Operation::Set).with_value("on");
        assert!(ValueIsFilter::new("on").check_filter(&need));
        assert!(!ValueIsFilter::new("off").check_filter(&need));
        assert!(ValueIsFilter(None).check_filter(&Need::new("test", Operation::Delete)));
    }

    #[test]
    fn test_closure_filter() {
        let filter = |need: &Need| need.attribute.starts_with("db_");
        assert!(filter.check_filter(&Need::new("db_url", Operation::Set)));
        assert!(!filter.check_filter(&Need::new("url", Operation::Set)));
    }
}
