//! # Needystates
//!
//! Compute the changes ("needs") that turn a current configuration into a
//! desired one, then dispatch those needs to the handlers that apply them.
//!
//! ## Core Concepts
//!
//! - **State**: a nested configuration deserialized into a tree for comparison
//! - **Need**: one required change (attribute, operation, location, values)
//! - **NeedFilter**: a predicate deciding whether a handler applies to a need
//! - **Handler**: a filter-guarded action that applies needs
//! - **NeedProcessor**: holds pending needs and dispatches them to handlers
//!
//! ## Example
//!
//! ```ignore
//! use needystates::{
//!     AttributeFilter, Handler, NeedProcessor, Operation, OperationFilter, State,
//!     StateOptions,
//! };
//!
//! let desired = State::from_mapping(&desired_config, StateOptions::new().name("server"));
//! let current = State::from_mapping(&current_config, StateOptions::new().name("server"));
//!
//! let mut processor = NeedProcessor::new();
//! processor.add_needs(desired.determine_needs(&current, true));
//! processor.add_handler(
//!     Handler::new(|need| {
//!         apply_url(need.value.as_ref())?;
//!         Ok(())
//!     })
//!     .filter(AttributeFilter::new("url"))
//!     .filter(OperationFilter(Operation::Set)),
//! );
//!
//! let summary = processor.handle_needs()?;
//! ```
//!
//! Nothing here applies changes itself, persists state or orders handlers
//! beyond registration order; handlers should be idempotent.

pub mod describe;
pub mod error;
pub mod filter;
pub mod handler;
pub mod need;
pub mod processor;
pub mod state;
pub mod types;

// Re-export main types at crate root
pub use describe::AttributeDescriptors;
pub use error::{Error, Result};
pub use filter::{
    AddressPathContainsFilter, AddressPathExactFilter, AttributeFilter, BoxedFilter, NeedFilter,
    OperationFilter, ParentStatesContainsFilter, ParentStatesExactFilter, ValueIsFilter,
    ValueTypeFilter,
};
pub use handler::Handler;
pub use need::{DEFAULT_DESCRIPTION, Need};
pub use processor::{DispatchSummary, NeedProcessor};
pub use state::{ListItem, Slot, State, StateOptions};
pub use types::{Mapping, Operation, Value, ValueKind};
