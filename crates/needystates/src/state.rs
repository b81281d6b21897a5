//! State trees - nested configuration deserialized for comparison
//!
//! A [`State`] is built from a [`Mapping`]: nested mappings become child
//! states, lists keep their literals but turn mapping members into child
//! states named by position, and everything else is stored as a scalar.
//! [`State::determine_needs`] compares a desired tree against a current one
//! and returns the [`Need`]s that would make the current tree match.

use crate::describe::AttributeDescriptors;
use crate::need::Need;
use crate::types::{Mapping, Operation, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// One attribute of a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A bool, integer or string
    Scalar(Value),
    /// A nested mapping
    Child(State),
    /// A list; mapping members are child states, everything else is literal
    List(Vec<ListItem>),
}

/// One member of a list-valued attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Literal(Value),
    Child(State),
}

impl Slot {
    /// Render the slot back into a plain value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Child(state) => Value::Map(state.to_mapping()),
            Self::List(items) => Value::List(items.iter().map(ListItem::to_value).collect()),
        }
    }
}

impl ListItem {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Child(state) => Value::Map(state.to_mapping()),
        }
    }
}

/// Context a state is built in
///
/// Everything here is handed down to child states; `name` extends the
/// parent chain children see.
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    pub name: Option<String>,
    pub parent_states: Vec<String>,
    pub address_path: Vec<String>,
    pub metadata: Mapping,
    pub descriptors: Arc<AttributeDescriptors>,
}

impl StateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parent_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn address_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn metadata(mut self, metadata: Mapping) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn descriptors(mut self, descriptors: AttributeDescriptors) -> Self {
        self.descriptors = Arc::new(descriptors);
        self
    }
}

/// A level of nested configuration
///
/// Equality only looks at the attributes; name, paths, metadata and
/// descriptors are bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct State {
    name: String,
    parent_states: Vec<String>,
    address_path: Vec<String>,
    metadata: Mapping,
    descriptors: Arc<AttributeDescriptors>,
    slots: IndexMap<String, Slot>,
}

impl State {
    /// Build an unnamed state with no paths
    pub fn new(mapping: &Mapping) -> Self {
        Self::from_mapping(mapping, StateOptions::default())
    }

    /// Build a state, and all its children, from a mapping
    pub fn from_mapping(mapping: &Mapping, options: StateOptions) -> Self {
        let StateOptions {
            name,
            parent_states,
            address_path,
            metadata,
            descriptors,
        } = options;
        let name = name.unwrap_or_default();

        let mut chain = parent_states.clone();
        if !name.is_empty() {
            chain.push(name.clone());
        }
        let child = |child_name: String, child_mapping: &Mapping| {
            Self::from_mapping(
                child_mapping,
                StateOptions {
                    name: Some(child_name),
                    parent_states: chain.clone(),
                    address_path: address_path.clone(),
                    metadata: metadata.clone(),
                    descriptors: Arc::clone(&descriptors),
                },
            )
        };

        let slots = mapping
            .iter()
            .map(|(key, value)| {
                let slot = match value {
                    Value::Map(child_mapping) => Slot::Child(child(key.clone(), child_mapping)),
                    Value::List(items) => Slot::List(
                        items
                            .iter()
                            .enumerate()
                            .map(|(index, item)| match item {
                                Value::Map(child_mapping) => {
                                    ListItem::Child(child(index.to_string(), child_mapping))
                                }
                                literal => ListItem::Literal(literal.clone()),
                            })
                            .collect(),
                    ),
                    scalar => Slot::Scalar(scalar.clone()),
                };
                (key.clone(), slot)
            })
            .collect();

        Self {
            name,
            parent_states,
            address_path,
            metadata,
            descriptors,
            slots,
        }
    }

    /// Render the state back into the mapping it was built from
    pub fn to_mapping(&self) -> Mapping {
        self.slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.to_value()))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ancestor state names, not including this state's own name
    pub fn parent_states(&self) -> &[String] {
        &self.parent_states
    }

    pub fn address_path(&self) -> &[String] {
        &self.address_path
    }

    pub fn metadata(&self) -> &Mapping {
        &self.metadata
    }

    /// Attribute names in source order
    pub fn config_keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn get(&self, attribute: &str) -> Option<&Slot> {
        self.slots.get(attribute)
    }

    /// Scalar value of an attribute
    pub fn value(&self, attribute: &str) -> Option<&Value> {
        match self.slots.get(attribute)? {
            Slot::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Child state of an attribute
    pub fn child(&self, attribute: &str) -> Option<&State> {
        match self.slots.get(attribute)? {
            Slot::Child(state) => Some(state),
            _ => None,
        }
    }

    /// List members of an attribute
    pub fn list(&self, attribute: &str) -> Option<&[ListItem]> {
        match self.slots.get(attribute)? {
            Slot::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Parent chain as seen by this state's attributes and children
    fn chain(&self) -> Vec<String> {
        let mut chain = self.parent_states.clone();
        if !self.name.is_empty() {
            chain.push(self.name.clone());
        }
        chain
    }

    /// Needs that would turn `other` (the current state) into `self` (the desired state)
    ///
    /// Needs follow the order of this state's attributes, with each child's
    /// needs kept together. Booleans are compared exactly; integers and
    /// strings only produce a need when the desired value is truthy. Lists
    /// are never compared. With `strict`, attributes of `other` missing from
    /// `self` produce a [`Operation::Delete`] need, at every depth.
    pub fn determine_needs(&self, other: &State, strict: bool) -> Vec<Need> {
        let mut needs = Vec::new();

        for (attribute, slot) in &self.slots {
            match slot {
                Slot::Child(child) => {
                    needs.extend(self.child_needs(attribute, child, other, strict));
                }
                Slot::Scalar(Value::Bool(ours)) => {
                    needs.extend(self.bool_need(attribute, *ours, other));
                }
                Slot::Scalar(ours @ (Value::Int(_) | Value::Str(_))) => {
                    needs.extend(self.scalar_need(attribute, ours, other));
                }
                _ => {}
            }
        }

        if strict {
            for (attribute, slot) in &other.slots {
                if !self.slots.contains_key(attribute) {
                    needs.push(self.create_need(
                        attribute,
                        Operation::Delete,
                        None,
                        Some(slot.to_value()),
                    ));
                }
            }
        }

        needs
    }

    fn child_needs(
        &self,
        attribute: &str,
        child: &State,
        other: &State,
        strict: bool,
    ) -> Vec<Need> {
        match other.child(attribute) {
            Some(theirs) => child.determine_needs(theirs, strict),
            None => child.determine_needs(&State::default(), strict),
        }
    }

    fn bool_need(&self, attribute: &str, ours: bool, other: &State) -> Option<Need> {
        let theirs = other.get(attribute).map(Slot::to_value);
        if theirs == Some(Value::Bool(ours)) {
            return None;
        }
        Some(self.create_need(attribute, Operation::Set, Some(Value::Bool(ours)), theirs))
    }

    fn scalar_need(&self, attribute: &str, ours: &Value, other: &State) -> Option<Need> {
        // Falsy integers and strings are never managed
        if !ours.is_truthy() {
            return None;
        }
        let theirs = other.get(attribute).map(Slot::to_value);
        if theirs.as_ref() == Some(ours) {
            return None;
        }
        Some(self.create_need(attribute, Operation::Set, Some(ours.clone()), theirs))
    }

    fn create_need(
        &self,
        attribute: &str,
        operation: Operation,
        value: Option<Value>,
        old_value: Option<Value>,
    ) -> Need {
        let mut need = Need::new(attribute, operation);
        need.address_path = self.address_path.clone();
        need.parent_states = self.chain();
        need.value = value.filter(Value::is_presentable);
        need.old_value = old_value.filter(Value::is_presentable);
        need.metadata = self.metadata.clone();
        if let Some(template) = self.descriptors.lookup(attribute, operation) {
            need.description = template.to_string();
        }
        log::debug!("Need: {}", need);
        need
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl Eq for State {}
