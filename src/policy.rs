//! Engine policy configuration

use serde::{Deserialize, Serialize};

/// The global palette-generation knobs. The defaults are the production
/// profile; hosts may deserialize overrides from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Uniform scale on all target and anchor chroma (1.0 = unmodified).
    pub chroma_factor: f64,
    /// Space the lightness stops linearly in appearance-space lightness
    /// instead of through the CIELAB L* curve.
    pub linear_lightness: bool,
    /// Re-derive chroma per shade so extremes stay in gamut, instead of
    /// reusing one flat chroma for all twelve shades.
    pub accurate_shades: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            chroma_factor: 1.0,
            linear_lightness: false,
            accurate_shades: true,
        }
    }
}
