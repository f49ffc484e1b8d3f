use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Hierarchical key/value document node.
///
/// A node has a name, an ordered list of key/value leaves (keys may repeat) and
/// an ordered list of named child nodes (names may repeat). Modules that persist
/// into a host-owned tree own one or more uniquely named children and must leave
/// every sibling alone, so the child-replacement helpers here never reorder or
/// touch nodes with other names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigNode {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nodes: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the node has neither values nor children.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.nodes.is_empty()
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// First value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    /// Parse the first value under `key`.
    ///
    /// `None` when the key is absent, `Some(Err(_))` when it is present but does
    /// not parse as `T`.
    pub fn parse_value<T: FromStr>(&self, key: &str) -> Option<Result<T>> {
        self.get_value(key).map(|raw| {
            raw.trim().parse::<T>().map_err(|_| CoreError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            })
        })
    }

    /// Overwrite the first value under `key`, or append it.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    /// Append a value even if the key already exists.
    pub fn add_value(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.push((key.into(), value.to_string()));
    }

    /// Remove every value under `key`, returning how many were removed.
    pub fn remove_value(&mut self, key: &str) -> usize {
        let before = self.values.len();
        self.values.retain(|(k, _)| k != key);
        before - self.values.len()
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // =========================================================================
    // Child nodes
    // =========================================================================

    /// First child named `name`.
    pub fn get_node(&self, name: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn get_node_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ConfigNode> {
        self.nodes.iter()
    }

    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// Append a child, allowing duplicate names.
    pub fn add_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Install `node` as the only child with its name.
    ///
    /// An existing child of the same name is replaced in place (keeping sibling
    /// order); any further duplicates are dropped. Otherwise the node is appended.
    pub fn set_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        let index = match self.nodes.iter().position(|n| n.name == node.name) {
            Some(first) => {
                let mut seen = 0usize;
                let name = node.name.clone();
                self.nodes.retain(|n| {
                    if n.name != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
                self.nodes[first] = node;
                first
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[index]
    }

    /// First child named `name`, created empty if absent.
    pub fn get_or_create_node(&mut self, name: &str) -> &mut ConfigNode {
        match self.nodes.iter().position(|n| n.name == name) {
            Some(index) => &mut self.nodes[index],
            None => self.add_node(ConfigNode::new(name)),
        }
    }

    /// Remove every child named `name`, returning how many were removed.
    pub fn remove_nodes(&mut self, name: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.name != name);
        before - self.nodes.len()
    }

    // =========================================================================
    // JSON
    // =========================================================================

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
