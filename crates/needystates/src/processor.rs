//! Dispatch engine - matches pending needs to registered handlers

use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::need::Need;

/// Summary of one dispatch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Needs a handler accepted during this pass
    pub satisfied: usize,
    /// Needs no handler matched; they stay pending
    pub unmatched: usize,
}

impl DispatchSummary {
    /// Total number of needs looked at
    pub fn total(&self) -> usize {
        self.satisfied + self.unmatched
    }

    /// Check if every need found a handler
    pub fn is_complete(&self) -> bool {
        self.unmatched == 0
    }
}

/// Holds pending and satisfied needs plus the handlers that apply them
///
/// Handlers are tried in registration order and the first one that accepts a
/// need wins. A processor is meant to be driven from a single thread.
#[derive(Debug, Default)]
pub struct NeedProcessor {
    unsatisfied: Vec<Need>,
    satisfied: Vec<Need>,
    handlers: Vec<Handler>,
}

impl NeedProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a need
    pub fn add_need(&mut self, need: Need) {
        self.unsatisfied.push(need);
    }

    /// Queue several needs, preserving their order
    pub fn add_needs(&mut self, needs: impl IntoIterator<Item = Need>) {
        self.unsatisfied.extend(needs);
    }

    /// Register a handler after the existing ones
    pub fn add_handler(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// Needs still waiting for a handler
    pub fn unsatisfied(&self) -> &[Need] {
        &self.unsatisfied
    }

    /// Needs a handler has applied
    pub fn satisfied(&self) -> &[Need] {
        &self.satisfied
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Check if nothing is pending
    pub fn is_complete(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    /// Move the first pending need equal to `need` to the satisfied list
    pub fn mark_satisfied(&mut self, need: &Need) -> Result<()> {
        let index = self
            .unsatisfied
            .iter()
            .position(|pending| pending == need)
            .ok_or_else(|| Error::NotPending(need.short_label()))?;
        let need = self.unsatisfied.remove(index);
        self.satisfied.push(need);
        Ok(())
    }

    /// Offer every pending need to the handlers
    ///
    /// A need nobody matches stays pending and is not an error. If a matching
    /// handler's action fails, the pass stops and the error is returned; needs
    /// satisfied earlier in the pass stay satisfied and the failing need stays
    /// pending.
    pub fn handle_needs(&mut self) -> Result<DispatchSummary> {
        let mut sated = Vec::new();
        let mut summary = DispatchSummary::default();
        let mut failure = None;

        'needs: for need in &self.unsatisfied {
            for handler in &mut self.handlers {
                match handler.invoke(need) {
                    Ok(()) => {
                        log::debug!("{} satisfied {}", handler.name(), need);
                        sated.push(need.clone());
                        summary.satisfied += 1;
                        continue 'needs;
                    }
                    Err(Error::NoMatch) => {
                        log::trace!("{} skipped {}", handler.name(), need);
                    }
                    Err(e) => {
                        log::warn!("{} failed: {}", handler.name(), e);
                        failure = Some(e);
                        break 'needs;
                    }
                }
            }
            log::debug!("No handler matched {}", need);
            summary.unmatched += 1;
        }

        for need in &sated {
            self.mark_satisfied(need)?;
        }

        if let Some(e) = failure {
            return Err(e);
        }

        log::info!(
            "Dispatch pass: {} satisfied, {} unmatched",
            summary.satisfied,
            summary.unmatched
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AddressPathContainsFilter, AddressPathExactFilter, AttributeFilter};
    use crate::types::Operation;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn need(attribute: &str) -> Need {
        Need::new(attribute, Operation::Set)
            .with_address_path(["addr"])
            .with_value("testval")
    }

    #[test]
    fn test_add_need() {
        let mut processor = NeedProcessor::new();
        processor.add_need(need("test"));
        assert_eq!(processor.unsatisfied(), &[need("test")]);
    }

    #[test]
    fn test_add_multiple_needs() {
        let mut processor = NeedProcessor::new();
        processor.add_needs(vec![need("test1"), need("test2")]);
        assert_eq!(processor.unsatisfied(), &[need("test1"), need("test2")]);
    }

    #[test]
    fn test_need_handler_execution() {
        let mut processor = NeedProcessor::new();
        processor.add_handler(
            Handler::new(|_| Ok(()))
                .filter(AddressPathExactFilter::new(["addr"]))
                .filter(AddressPathContainsFilter::new("addr")),
        );
        processor.add_need(need("test"));

        let summary = processor.handle_needs().unwrap();

        assert!(processor.unsatisfied().is_empty());
        assert_eq!(processor.satisfied(), &[need("test")]);
        assert_eq!(summary, DispatchSummary { satisfied: 1, unmatched: 0 });
    }

    #[test]
    fn test_unmatched_need_stays_pending() {
        let mut processor = NeedProcessor::new();
        processor.add_handler(Handler::new(|_| Ok(())).filter(AttributeFilter::new("other")));
        processor.add_need(need("test"));

        let summary = processor.handle_needs().unwrap();

        assert_eq!(processor.unsatisfied(), &[need("test")]);
        assert!(processor.satisfied().is_empty());
        assert!(!summary.is_complete());
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_first_matching_handler_wins() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&calls);
        let second = Rc::clone(&calls);

        let mut processor = NeedProcessor::new();
        processor.add_handler(
            Handler::new(move |_| {
                first.borrow_mut().push("first");
                Ok(())
            })
            .named("first"),
        );
        processor.add_handler(
            Handler::new(move |_| {
                second.borrow_mut().push("second");
                Ok(())
            })
            .named("second"),
        );
        processor.add_needs(vec![need("a"), need("b")]);
        assert_eq!(processor.handler_count(), 2);

        processor.handle_needs().unwrap();

        assert_eq!(*calls.borrow(), vec!["first", "first"]);
        assert!(processor.is_complete());
    }

    #[test]
    fn test_handlers_routed_by_filter() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let url_calls = Rc::clone(&calls);
        let port_calls = Rc::clone(&calls);

        let mut processor = NeedProcessor::new();
        processor.add_handler(
            Handler::new(move |need| {
                url_calls.borrow_mut().push(format!("url:{}", need.attribute));
                Ok(())
            })
            .filter(AttributeFilter::new("url")),
        );
        processor.add_handler(
            Handler::new(move |need| {
                port_calls.borrow_mut().push(format!("port:{}", need.attribute));
                Ok(())
            })
            .filter(AttributeFilter::new("port")),
        );
        processor.add_needs(vec![need("port"), need("url")]);

        processor.handle_needs().unwrap();

        assert_eq!(*calls.borrow(), vec!["port:port", "url:url"]);
    }

    #[test]
    fn test_exception_handling() {
        let mut processor = NeedProcessor::new();
        processor.add_handler(
            Handler::new(|_| anyhow::bail!("Test Exception"))
                .filter(AddressPathExactFilter::new(["addr"]))
                .filter(AddressPathContainsFilter::new("addr")),
        );
        processor.add_need(need("test"));

        let result = processor.handle_needs();

        match result {
            Err(Error::HandlerFailed { need: label, source }) => {
                assert_eq!(label, "addr|test.SET=testval");
                assert_eq!(source.to_string(), "Test Exception");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(processor.unsatisfied(), &[need("test")]);
        assert!(processor.satisfied().is_empty());
    }

    #[test]
    fn test_failure_keeps_earlier_progress() {
        let mut processor = NeedProcessor::new();
        processor.add_handler(
            Handler::new(|_| anyhow::bail!("boom")).filter(AttributeFilter::new("broken")),
        );
        processor.add_handler(Handler::new(|_| Ok(())));
        processor.add_needs(vec![need("fine"), need("broken"), need("later")]);

        assert!(processor.handle_needs().is_err());

        assert_eq!(processor.satisfied(), &[need("fine")]);
        assert_eq!(processor.unsatisfied(), &[need("broken"), need("later")]);
    }

    #[test]
    fn test_mark_satisfied() {
        let mut processor = NeedProcessor::new();
        processor.add_needs(vec![need("a"), need("b")]);

        processor.mark_satisfied(&need("b")).unwrap();

        assert_eq!(processor.unsatisfied(), &[need("a")]);
        assert_eq!(processor.satisfied(), &[need("b")]);
    }

    #[test]
    fn test_mark_satisfied_requires_pending_need() {
        let mut processor = NeedProcessor::new();
        let result = processor.mark_satisfied(&need("missing"));
        assert!(matches!(
            result,
            Err(Error::NotPending(label)) if label == "addr|missing.SET=testval"
        ));
    }

    #[test]
    fn test_satisfied_needs_are_not_reprocessed() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let mut processor = NeedProcessor::new();
        processor.add_handler(Handler::new(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }));
        processor.add_need(need("once"));

        processor.handle_needs().unwrap();
        let summary = processor.handle_needs().unwrap();

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(summary.total(), 0);
    }
}
