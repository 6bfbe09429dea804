//! Final packaging of a derived channel into a composite product.

use sat_common::attrs::keys;
use sat_common::{AttrValue, Attributes, DataArray};

/// Identity and static attributes of a configured composite.
#[derive(Debug, Clone, Default)]
pub struct GenericCompositor {
    /// Composite name written to the output `name` attribute.
    pub name: String,
    /// CF standard name of the product, if configured.
    pub standard_name: Option<String>,
    /// Names of the input datasets, in input order.
    pub prerequisites: Vec<String>,
    /// Additional static attributes copied onto every product.
    pub extra_attrs: Attributes,
}

impl GenericCompositor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_standard_name(mut self, standard_name: impl Into<String>) -> Self {
        self.standard_name = Some(standard_name.into());
        self
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.extra_attrs.insert(key.into(), value.into());
        self
    }

    /// Attach composite identity to a single derived channel.
    ///
    /// Precedence, lowest first: the channel's own attrs, static extra attrs,
    /// the compositor identity, then the call-time `attrs`.
    pub fn finalize(&self, channel: DataArray, attrs: Attributes) -> DataArray {
        let mut merged = channel.attrs().clone();
        merged.extend(self.extra_attrs.clone());

        merged.insert(keys::NAME.to_string(), self.name.clone().into());
        if let Some(standard_name) = &self.standard_name {
            merged.insert(keys::STANDARD_NAME.to_string(), standard_name.clone().into());
        }
        if !self.prerequisites.is_empty() {
            merged.insert(
                keys::PREREQUISITES.to_string(),
                AttrValue::StrList(self.prerequisites.clone()),
            );
        }
        merged.insert(keys::MODE.to_string(), "L".into());

        merged.extend(attrs);
        channel.with_attrs(merged)
    }
}
