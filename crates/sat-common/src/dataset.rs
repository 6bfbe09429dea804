//! In-memory collection of named arrays plus global attributes.

use std::collections::BTreeMap;

use crate::array::DataArray;
use crate::attrs::{AttrValue, Attributes};
use crate::error::{CommonError, CommonResult};

/// Named variables and global attributes loaded from one file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    variables: BTreeMap<String, DataArray>,
    attrs: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, variable: DataArray) -> Self {
        self.insert_variable(name, variable);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn insert_variable(&mut self, name: impl Into<String>, variable: DataArray) {
        self.variables.insert(name.into(), variable);
    }

    pub fn variable(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Fetch a global attribute that must be a string.
    pub fn attr_str(&self, key: &str) -> CommonResult<&str> {
        let value = self
            .attrs
            .get(key)
            .ok_or_else(|| CommonError::MissingAttribute(key.to_string()))?;
        value.as_str().ok_or_else(|| CommonError::AttributeType {
            key: key.to_string(),
            expected: "string",
        })
    }
}
