//! Per-attribute description templates for generated needs

use crate::types::Operation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Lookup table from attribute name and operation to a description template
///
/// Templates may use `#<field>` tokens, see [`crate::Need::render_description`].
///
/// ```ignore
/// let descriptors = AttributeDescriptors::new()
///     .describe("url", Operation::Set, "Point the service at #value")
///     .describe("url", Operation::Delete, "Stop using #old_value");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeDescriptors {
    entries: IndexMap<String, IndexMap<Operation, String>>,
}

impl AttributeDescriptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template for an attribute/operation pair
    pub fn describe(
        mut self,
        attribute: impl Into<String>,
        operation: Operation,
        template: impl Into<String>,
    ) -> Self {
        self.insert(attribute, operation, template);
        self
    }

    /// Register the template for an attribute/operation pair, replacing any existing one
    pub fn insert(
        &mut self,
        attribute: impl Into<String>,
        operation: Operation,
        template: impl Into<String>,
    ) {
        self.entries
            .entry(attribute.into())
            .or_default()
            .insert(operation, template.into());
    }

    /// Template for an attribute/operation pair, if one was registered
    pub fn lookup(&self, attribute: &str, operation: Operation) -> Option<&str> {
        self.entries
            .get(attribute)
            .and_then(|ops| ops.get(&operation))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
