//! Handlers: filter-guarded actions that apply needs

use crate::error::{Error, Result};
use crate::filter::{BoxedFilter, NeedFilter};
use crate::need::Need;
use std::fmt;

type Action = Box<dyn FnMut(&Need) -> anyhow::Result<()>>;

/// A filter-guarded action
///
/// Invoking a handler checks every filter (logical AND). If all pass, the
/// action runs; otherwise [`Error::NoMatch`] is returned and nothing happens.
/// A handler with no filters accepts every need.
///
/// # Example
///
/// ```ignore
/// use needystates::{AttributeFilter, Handler, OperationFilter, Operation};
///
/// let handler = Handler::new(|need| {
///     println!("setting {} to {:?}", need.attribute, need.value);
///     Ok(())
/// })
/// .filter(AttributeFilter::new("url"))
/// .filter(OperationFilter(Operation::Set));
/// ```
pub struct Handler {
    name: String,
    filters: Vec<BoxedFilter>,
    action: Action,
}

impl Handler {
    /// Create a handler with no filters
    pub fn new<F>(action: F) -> Self
    where
        F: FnMut(&Need) -> anyhow::Result<()> + 'static,
    {
        Self {
            name: "handler".to_string(),
            filters: Vec::new(),
            action: Box::new(action),
        }
    }

    /// Create a handler from a list of filters and an action
    pub fn with_filters<F>(filters: Vec<BoxedFilter>, action: F) -> Self
    where
        F: FnMut(&Need) -> anyhow::Result<()> + 'static,
    {
        Self {
            filters,
            ..Self::new(action)
        }
    }

    /// Name used in log output
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a filter
    pub fn filter(mut self, filter: impl NeedFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether every filter accepts the need
    pub fn matches(&self, need: &Need) -> bool {
        self.filters.iter().all(|f| f.check_filter(need))
    }

    /// Run the action if every filter accepts the need
    ///
    /// Returns [`Error::NoMatch`] when a filter rejects the need and
    /// [`Error::HandlerFailed`] when the action itself fails.
    pub fn invoke(&mut self, need: &Need) -> Result<()> {
        if !self.matches(need) {
            return Err(Error::NoMatch);
        }
        (self.action)(need).map_err(|source| Error::HandlerFailed {
            need: need.short_label(),
            source,
        })
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AddressPathContainsFilter, AddressPathExactFilter, AttributeFilter};
    use crate::types::Operation;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn need() -> Need {
        Need::new("test", Operation::Set)
            .with_address_path(["addr"])
            .with_value("testval")
    }

    #[test]
    fn test_invoke_runs_action_when_all_filters_pass() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut handler = Handler::new(move |need| {
            sink.borrow_mut().push(need.attribute.clone());
            Ok(())
        })
        .filter(AddressPathExactFilter::new(["addr"]))
        .filter(AddressPathContainsFilter::new("addr"));

        handler.invoke(&need()).unwrap();
        assert_eq!(*seen.borrow(), vec!["test".to_string()]);
    }

    #[test]
    fn test_invoke_no_match_has_no_side_effect() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut handler = Handler::with_filters(
            vec![
                Box::new(AddressPathContainsFilter::new("addr")),
                Box::new(AttributeFilter::new("other")),
            ],
            move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            },
        );

        let result = handler.invoke(&need());
        assert!(matches!(result, Err(Error::NoMatch)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_named_handler() {
        let handler = Handler::new(|_| Ok(())).named("url-setter");
        assert_eq!(handler.name(), "url-setter");
        assert!(format!("{:?}", handler).contains("url-setter"));

        assert_eq!(Handler::new(|_| Ok(())).name(), "handler");
    }

    #[test]
    fn test_invoke_without_filters_accepts_everything() {
        let mut handler = Handler::new(|_| Ok(()));
        assert!(handler.invoke(&Need::new("anything", Operation::Get)).is_ok());
    }

    #[test]
    fn test_invoke_wraps_action_failure() {
        let mut handler = Handler::new(|_| anyhow::bail!("Test Exception"));
        match handler.invoke(&need()) {
            Err(Error::HandlerFailed { need, source }) => {
                assert_eq!(need, "addr|test.SET=testval");
                assert_eq!(source.to_string(), "Test Exception");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
