//! Tool registry.
//!
//! Tools are contributed in groups by [`ToolFactory`] implementations and
//! flattened into one name-indexed registry at startup. Duplicate names and
//! unparseable schema documents are rejected here, before any request is
//! served.

use crate::schema::SchemaError;
use crate::server::Tool;
use crate::types::ToolDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Registry composition errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid input schema for tool {tool}: {source}")]
    InvalidSchema {
        tool: String,
        #[source]
        source: SchemaError,
    },
}

/// A group of related tools.
pub trait ToolFactory: Send + Sync {
    /// Group name, used for categorizing and logging.
    fn group(&self) -> &'static str;

    /// Build the group's tools.
    fn tools(&self) -> Vec<Arc<dyn Tool>>;
}

struct Entry {
    tool: Arc<dyn Tool>,
    descriptor: ToolDescriptor,
}

/// Flattened, name-indexed set of tools.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single tool, parsing its schema.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let definition = tool.definition();
        if self.index.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        let descriptor = definition
            .specification()
            .map_err(|source| RegistryError::InvalidSchema {
                tool: definition.name.clone(),
                source,
            })?;

        debug!(tool = %descriptor.name, "Registered tool");
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(Entry { tool, descriptor });
        Ok(())
    }

    /// Build a registry from every tool of every factory, in order.
    pub fn from_factories(factories: &[Box<dyn ToolFactory>]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for factory in factories {
            let tools = factory.tools();
            debug!(group = factory.group(), count = tools.len(), "Registering tool group");
            for tool in tools {
                registry.register(tool)?;
            }
        }
        info!(tools = registry.len(), "Tool registry ready");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.entries[i].tool)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.descriptor.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
