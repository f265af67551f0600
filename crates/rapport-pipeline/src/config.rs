//! Configuration for pipeline runs
//!
//! Defines iteration count, canvas size, clustering and force coefficients.

use rapport_domain::{CanvasBounds, LayoutConfig, DEFAULT_ITERATIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::PipelineError;

/// Upper bound on layout steps per run
pub const MAX_ITERATIONS: usize = 10_000;

/// Configuration for one build-and-layout run
///
/// # Examples
///
/// ```
/// use rapport_pipeline::PipelineConfig;
///
/// // Default configuration (300 iterations on 1000x800)
/// let config = PipelineConfig::default();
/// assert_eq!(config.iterations, 300);
///
/// // Tighter layout
/// let config = PipelineConfig::compact();
/// assert!(config.forces.spring_length < PipelineConfig::default().forces.spring_length);
///
/// // Looser layout
/// let config = PipelineConfig::spacious();
/// assert!(config.forces.repulsion > PipelineConfig::default().forces.repulsion);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of layout steps
    /// Default: 300
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Canvas width in layout units
    /// Default: 1000
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,

    /// Canvas height in layout units
    /// Default: 800
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,

    /// Use household and business contexts as layout clusters
    /// Default: true
    #[serde(default = "default_cluster_contexts")]
    pub cluster_contexts: bool,

    /// Force coefficients
    #[serde(default)]
    pub forces: ForceConfig,
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_canvas_width() -> f64 {
    1000.0
}

fn default_canvas_height() -> f64 {
    800.0
}

fn default_cluster_contexts() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            cluster_contexts: default_cluster_contexts(),
            forces: ForceConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Tighter layout preset
    pub fn compact() -> Self {
        Self {
            forces: ForceConfig::from(LayoutConfig::compact()),
            ..Self::default()
        }
    }

    /// Looser layout preset
    pub fn spacious() -> Self {
        Self {
            forces: ForceConfig::from(LayoutConfig::spacious()),
            ..Self::default()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "compact" => Some(Self::compact()),
            "spacious" => Some(Self::spacious()),
            _ => None,
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(s)?;
        config.validate().map_err(PipelineError::Config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            return Err("canvas_width must be greater than 0".to_string());
        }
        if !(self.canvas_height.is_finite() && self.canvas_height > 0.0) {
            return Err("canvas_height must be greater than 0".to_string());
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(format!("iterations must not exceed {}", MAX_ITERATIONS));
        }
        // A step longer than the canvas skips the force balance entirely
        let extent = self.canvas_width.max(self.canvas_height);
        if self.forces.max_speed > extent {
            return Err(format!("max_speed must not exceed the canvas size ({})", extent));
        }
        self.layout_config().validate()
    }

    /// Layout settings for the domain engine
    pub fn layout_config(&self) -> LayoutConfig {
        self.forces.clone().into()
    }

    /// Canvas bounds for the domain engine
    pub fn canvas(&self) -> CanvasBounds {
        CanvasBounds::new(self.canvas_width, self.canvas_height)
    }
}

/// Serializable mirror of [`LayoutConfig`]
///
/// Missing fields take their value from `LayoutConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Repulsion constant
    pub repulsion: f64,
    /// Spring stiffness per unit of edge weight
    pub spring_strength: f64,
    /// Spring rest length
    pub spring_length: f64,
    /// Pull toward cluster centroids
    pub cluster_strength: f64,
    /// Pull toward the canvas center
    pub gravity: f64,
    /// Per-step velocity damping in (0, 1)
    pub damping: f64,
    /// Integration time step
    pub time_step: f64,
    /// Initial speed cap
    pub max_speed: f64,
    /// Repulsion distance floor
    pub min_distance: f64,
    /// Canvas margin
    pub padding: f64,
    /// Seed for initial positions
    pub seed: u64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        LayoutConfig::default().into()
    }
}

impl From<LayoutConfig> for ForceConfig {
    fn from(c: LayoutConfig) -> Self {
        Self {
            repulsion: c.repulsion,
            spring_strength: c.spring_strength,
            spring_length: c.spring_length,
            cluster_strength: c.cluster_strength,
            gravity: c.gravity,
            damping: c.damping,
            time_step: c.time_step,
            max_speed: c.max_speed,
            min_distance: c.min_distance,
            padding: c.padding,
            seed: c.seed,
        }
    }
}

impl From<ForceConfig> for LayoutConfig {
    fn from(f: ForceConfig) -> Self {
        Self {
            repulsion: f.repulsion,
            spring_strength: f.spring_strength,
            spring_length: f.spring_length,
            cluster_strength: f.cluster_strength,
            gravity: f.gravity,
            damping: f.damping,
            time_step: f.time_step,
            max_speed: f.max_speed,
            min_distance: f.min_distance,
            padding: f.padding,
            seed: f.seed,
        }
    }
}
