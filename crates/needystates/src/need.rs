//! Needs: one required change between a current and a desired state

use crate::types::{Mapping, Operation, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Description used when nothing more specific is known
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Separator between the short label and the description in a long label
const LONG_LABEL_SEPARATOR: &str = "----------";

/// Field names that may appear as `#<field>` tokens in a description
const TEMPLATE_FIELDS: [&str; 8] = [
    "attribute",
    "operation",
    "address_path",
    "parent_states",
    "old_value",
    "value",
    "description",
    "metadata",
];

/// A single change required to move a system towards its desired state
///
/// Needs are plain values: two needs are equal when every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Need {
    /// Attribute of the state on which the operation is performed
    pub attribute: String,
    /// Operation to perform
    pub operation: Operation,
    /// Which provider/environment the need targets
    #[serde(default)]
    pub address_path: Vec<String>,
    /// Chain of ancestor states locating the attribute in its tree
    #[serde(default)]
    pub parent_states: Vec<String>,
    /// New value, for operations that take one
    #[serde(default)]
    pub value: Option<Value>,
    /// Previous value, only used for display
    #[serde(default)]
    pub old_value: Option<Value>,
    /// Description template, see [`Need::render_description`]
    #[serde(default = "default_description")]
    pub description: String,
    /// Free-form data for downstream consumers
    #[serde(default)]
    pub metadata: Mapping,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl Need {
    /// Create a need with empty paths, no values and the default description
    pub fn new(attribute: impl Into<String>, operation: Operation) -> Self {
        Self {
            attribute: attribute.into(),
            operation,
            address_path: Vec::new(),
            parent_states: Vec::new(),
            value: None,
            old_value: None,
            description: default_description(),
            metadata: Mapping::new(),
        }
    }

    pub fn with_address_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_old_value(mut self, old_value: impl Into<Value>) -> Self {
        self.old_value = Some(old_value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Mapping) -> Self {
        self.metadata = metadata;
        self
    }

    /// One-line label, detailed enough for a user to grasp the intent
    ///
    /// Example: `dbconfmodule.dbConfigManager|server.url.SET=https://example.com`
    pub fn short_label(&self) -> String {
        let mut label = String::new();
        if !self.address_path.is_empty() {
            label.push_str(&self.address_path.join("."));
            label.push('|');
        }
        if !self.parent_states.is_empty() {
            label.push_str(&self.parent_states.join("."));
            label.push('.');
        }
        label.push_str(&self.attribute);
        label.push('.');
        label.push_str(self.operation.name());
        // `false` is a legitimate value and must still be shown
        if let Some(value) = self.value.as_ref().filter(|v| v.is_presentable()) {
            label.push('=');
            label.push_str(&value.to_string());
        }
        label
    }

    /// Description with every `#<field>` token replaced by that field's value
    ///
    /// Tokens whose field is absent are left as written. Substituted text is
    /// not scanned again.
    pub fn render_description(&self) -> String {
        let mut rendered = String::with_capacity(self.description.len());
        let mut rest = self.description.as_str();

        while let Some(pos) = rest.find('#') {
            rendered.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let substitution = TEMPLATE_FIELDS
                .iter()
                .find(|field| after.starts_with(**field))
                .and_then(|field| self.field_text(field).map(|text| (field.len(), text)));
            match substitution {
                Some((consumed, text)) => {
                    rendered.push_str(&text);
                    rest = &after[consumed..];
                }
                None => {
                    rendered.push('#');
                    rest = after;
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }

    /// Short label, a separator line, then the rendered description
    pub fn long_label(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.short_label(),
            LONG_LABEL_SEPARATOR,
            self.render_description()
        )
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "attribute" => Some(self.attribute.clone()),
            "operation" => Some(self.operation.name().to_string()),
            "address_path" => Some(format!("[{}]", self.address_path.join(", "))),
            "parent_states" => Some(format!("[{}]", self.parent_states.join(", "))),
            "value" => self.value.as_ref().map(ToString::to_string),
            "old_value" => self.old_value.as_ref().map(ToString::to_string),
            "description" => Some(self.description.clone()),
            "metadata" => Some(Value::Map(self.metadata.clone()).to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_label())
    }
}
