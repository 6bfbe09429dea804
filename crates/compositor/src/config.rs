//! Composite definitions loaded from YAML.
//!
//! ```yaml
//! sensor_name: visir/ahi
//! composites:
//!   hybrid_green:
//!     compositor: hybrid_green
//!     fraction: 0.07
//!     prerequisites: [B02, B04]
//!     standard_name: toa_bidirectional_reflectance
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{CompositorError, Result};
use crate::generic::GenericCompositor;
use crate::spectral::{BlendMethod, SpectralBlender};

/// A file of composite definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Sensor these composites apply to.
    #[serde(default)]
    pub sensor_name: Option<String>,
    pub composites: BTreeMap<String, CompositeDefinition>,
}

/// One composite: which blend, over which inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeDefinition {
    #[serde(flatten)]
    pub method: BlendMethod,
    /// Input dataset names, in the order the blend expects them.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub standard_name: Option<String>,
}

impl CompositeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        for (name, definition) in &config.composites {
            definition
                .method
                .validate()
                .map_err(|e| CompositorError::invalid_config(format!("{}: {}", name, e)))?;
        }
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(
            path = %path.display(),
            composites = config.composites.len(),
            "Loaded composite definitions"
        );
        Ok(config)
    }

    pub fn definition(&self, name: &str) -> Result<&CompositeDefinition> {
        self.composites
            .get(name)
            .ok_or_else(|| CompositorError::NotFound(name.to_string()))
    }

    /// Build the compositor registered under `name`.
    pub fn blender(&self, name: &str) -> Result<SpectralBlender> {
        self.definition(name)?.build(name)
    }
}

impl CompositeDefinition {
    /// Build a ready-to-call compositor named `name`.
    ///
    /// For a weighted blend the number of fractions must match the number of
    /// prerequisites when both are given.
    pub fn build(&self, name: &str) -> Result<SpectralBlender> {
        if let BlendMethod::Weighted(params) = &self.method {
            if !self.prerequisites.is_empty() && params.fractions.len() != self.prerequisites.len()
            {
                return Err(CompositorError::FractionCountMismatch {
                    fractions: params.fractions.len(),
                    projectables: self.prerequisites.len(),
                });
            }
        }

        let mut compositor =
            GenericCompositor::new(name).with_prerequisites(self.prerequisites.iter().cloned());
        if let Some(standard_name) = &self.standard_name {
            compositor = compositor.with_standard_name(standard_name.clone());
        }
        SpectralBlender::new(compositor, self.method.clone())
    }
}
