use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::{Blackboard, BlackboardError, NodeError};

/// Where a port reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortValue {
    /// Constant text, parsed with `FromStr` on every read.
    Literal(String),
    /// Name of a blackboard entry.
    Entry(String),
}

/// Immutable per-node configuration: the node name and its port bindings.
///
/// Built by whatever assembles the tree. A port without a binding falls back to the blackboard
/// entry of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    name: String,
    ports: BTreeMap<String, PortValue>,
}

impl NodeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: BTreeMap::new(),
        }
    }

    pub fn with_literal(mut self, port: impl Into<String>, value: impl ToString) -> Self {
        self.ports
            .insert(port.into(), PortValue::Literal(value.to_string()));
        self
    }

    pub fn with_entry(mut self, port: impl Into<String>, key: impl Into<String>) -> Self {
        self.ports.insert(port.into(), PortValue::Entry(key.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self, port: &str) -> Option<&PortValue> {
        self.ports.get(port)
    }

    /// Read a required input.
    ///
    /// Blackboard entries are taken as `T` when stored with that type; entries stored as `String`
    /// are parsed like literals.
    pub fn get_input<T>(&self, port: &str, blackboard: &Blackboard) -> Result<T, NodeError>
    where
        T: FromStr + Clone + 'static,
        T::Err: Display,
    {
        match self.ports.get(port) {
            Some(PortValue::Literal(text)) => self.parse(port, text),
            Some(PortValue::Entry(key)) => self.read_entry(port, key, blackboard),
            None => self.read_entry(port, port, blackboard),
        }
    }

    /// Like `get_input`, but an absent value is `Ok(None)` instead of `MissingInput`.
    pub fn get_optional_input<T>(
        &self,
        port: &str,
        blackboard: &Blackboard,
    ) -> Result<Option<T>, NodeError>
    where
        T: FromStr + Clone + 'static,
        T::Err: Display,
    {
        match self.get_input(port, blackboard) {
            Ok(value) => Ok(Some(value)),
            Err(NodeError::MissingInput { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn set_output<T: 'static>(
        &self,
        port: &str,
        value: T,
        blackboard: &mut Blackboard,
    ) -> Result<(), NodeError> {
        match self.ports.get(port) {
            Some(PortValue::Literal(_)) => Err(NodeError::OutputNotWritable {
                node: self.name.clone(),
                port: port.to_owned(),
            }),
            Some(PortValue::Entry(key)) => {
                blackboard.set_entry(key.clone(), value);
                Ok(())
            }
            None => {
                blackboard.set_entry(port, value);
                Ok(())
            }
        }
    }

    fn read_entry<T>(&self, port: &str, key: &str, blackboard: &Blackboard) -> Result<T, NodeError>
    where
        T: FromStr + Clone + 'static,
        T::Err: Display,
    {
        match blackboard.entry::<T>(key) {
            Ok(value) => Ok(value.clone()),
            Err(BlackboardError::TypeMismatch { .. }) => match blackboard.entry::<String>(key) {
                Ok(text) => self.parse(port, text),
                Err(_) => Err(NodeError::TypeMismatch {
                    node: self.name.clone(),
                    port: port.to_owned(),
                }),
            },
            Err(err) => Err(NodeError::from_blackboard(&self.name, port, err)),
        }
    }

    fn parse<T>(&self, port: &str, text: &str) -> Result<T, NodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        text.trim()
            .parse::<T>()
            .map_err(|err| NodeError::MalformedInput {
                node: self.name.clone(),
                port: port.to_owned(),
                reason: err.to_string(),
            })
    }
}
