//! Trait definitions for external interactions
//!
//! The domain never reads files or talks to a data store. Infrastructure
//! implements these traits and hands the engine plain values.

use crate::builder::GraphInput;

/// Source of people and relationship facts for one graph build
///
/// Implemented by the infrastructure layer (rapport-cli reads JSON files)
pub trait GraphSource {
    /// Error type for load operations
    type Error;

    /// Load every person and fact needed to build the graph
    fn load_input(&self) -> Result<GraphInput, Self::Error>;
}

/// Any already-built input is a source of itself
impl GraphSource for GraphInput {
    type Error = std::convert::Infallible;

    fn load_input(&self) -> Result<GraphInput, Self::Error> {
        Ok(self.clone())
    }
}
