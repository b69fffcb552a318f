//! Configuration for triangulation and contact construction.
//!
//! Both configs are built through a validating builder, in the same spirit
//! as a builder that rejects bad parameters at `build()` time rather than
//! deep inside the algorithm.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ApollotaError, Result};

/// Parameters controlling a single `triangulate` call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationConfig {
    /// Level-0 bucket edge length for the bounding-sphere hierarchy.
    pub bsh_radius_r0: f64,
    /// Global numeric tolerance used for "touching", "intersecting", and
    /// "equal" comparisons throughout the triangulator.
    pub epsilon: f64,
    /// Whether to run the co-spherical surplus pass after the main
    /// face-growing search.
    pub include_surplus: bool,
    /// Whether a quadruple may keep two tangent spheres instead of being
    /// forced down to the single best one.
    pub allow_two_tangents: bool,
    /// Bound on how many disconnected-component restarts the driver will
    /// attempt before giving up on ignored balls (not a fatal condition).
    pub max_traversal_radius: usize,
}

impl TriangulationConfig {
    pub fn builder() -> TriangulationConfigBuilder {
        TriangulationConfigBuilder::new()
    }
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        TriangulationConfigBuilder::new().build().unwrap()
    }
}

/// Builder for [`TriangulationConfig`] with validation.
#[derive(Debug, Clone)]
pub struct TriangulationConfigBuilder {
    bsh_radius_r0: f64,
    epsilon: f64,
    include_surplus: bool,
    allow_two_tangents: bool,
    max_traversal_radius: usize,
}

impl TriangulationConfigBuilder {
    pub fn new() -> Self {
        Self {
            bsh_radius_r0: 3.5,
            epsilon: 1e-8,
            include_surplus: false,
            allow_two_tangents: true,
            max_traversal_radius: 50,
        }
    }

    /// Sets the level-0 BSH bucket edge length.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `r0 <= 0.0`.
    pub fn bsh_radius_r0(mut self, r0: f64) -> Result<Self> {
        if r0 <= 0.0 {
            return Err(ApollotaError::InvalidConfig(format!(
                "bsh_radius_r0 must be positive (got {})",
                r0
            )));
        }
        self.bsh_radius_r0 = r0;
        Ok(self)
    }

    /// Sets the global numeric tolerance.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `epsilon <= 0.0`.
    pub fn epsilon(mut self, epsilon: f64) -> Result<Self> {
        if epsilon <= 0.0 {
            return Err(ApollotaError::InvalidConfig(format!(
                "epsilon must be positive (got {})",
                epsilon
            )));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    pub fn include_surplus(mut self, include: bool) -> Self {
        self.include_surplus = include;
        self
    }

    pub fn allow_two_tangents(mut self, allow: bool) -> Self {
        self.allow_two_tangents = allow;
        self
    }

    /// # Errors
    /// Returns `InvalidConfig` if `radius == 0` (restart would never make
    /// progress).
    pub fn max_traversal_radius(mut self, radius: usize) -> Result<Self> {
        if radius == 0 {
            return Err(ApollotaError::InvalidConfig(
                "max_traversal_radius must be at least 1".to_string(),
            ));
        }
        self.max_traversal_radius = radius;
        Ok(self)
    }

    pub fn build(self) -> Result<TriangulationConfig> {
        Ok(TriangulationConfig {
            bsh_radius_r0: self.bsh_radius_r0,
            epsilon: self.epsilon,
            include_surplus: self.include_surplus,
            allow_two_tangents: self.allow_two_tangents,
            max_traversal_radius: self.max_traversal_radius,
        })
    }
}

impl Default for TriangulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters controlling `contact_contour` and `contact_remainder`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConfig {
    /// Solvent probe radius.
    pub probe: f64,
    /// Contour sampling step length.
    pub step: f64,
    /// Number of alternating-projection iterations used when mending a
    /// contour arc.
    pub projections: usize,
    /// Subdivision depth of the icosahedron used for solvent caps.
    pub sih_depth: usize,
}

impl ContactConfig {
    pub fn builder() -> ContactConfigBuilder {
        ContactConfigBuilder::new()
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        ContactConfigBuilder::new().build().unwrap()
    }
}

/// Builder for [`ContactConfig`] with validation.
#[derive(Debug, Clone)]
pub struct ContactConfigBuilder {
    probe: f64,
    step: f64,
    projections: usize,
    sih_depth: usize,
}

impl ContactConfigBuilder {
    pub fn new() -> Self {
        Self {
            probe: 1.4,
            step: 0.2,
            projections: 3,
            sih_depth: 3,
        }
    }

    /// # Errors
    /// Returns `InvalidConfig` if `probe < 0.0`.
    pub fn probe(mut self, probe: f64) -> Result<Self> {
        if probe < 0.0 {
            return Err(ApollotaError::InvalidConfig(format!(
                "probe must be non-negative (got {})",
                probe
            )));
        }
        self.probe = probe;
        Ok(self)
    }

    /// # Errors
    /// Returns `InvalidConfig` if `step <= 0.0`.
    pub fn step(mut self, step: f64) -> Result<Self> {
        if step <= 0.0 {
            return Err(ApollotaError::InvalidConfig(format!(
                "step must be positive (got {})",
                step
            )));
        }
        self.step = step;
        Ok(self)
    }

    /// # Errors
    /// Returns `InvalidConfig` if `projections == 0`.
    pub fn projections(mut self, projections: usize) -> Result<Self> {
        if projections == 0 {
            return Err(ApollotaError::InvalidConfig(
                "projections must be at least 1".to_string(),
            ));
        }
        self.projections = projections;
        Ok(self)
    }

    pub fn sih_depth(mut self, depth: usize) -> Self {
        self.sih_depth = depth;
        self
    }

    pub fn build(self) -> Result<ContactConfig> {
        Ok(ContactConfig {
            probe: self.probe,
            step: self.step,
            projections: self.projections,
            sih_depth: self.sih_depth,
        })
    }
}

impl Default for ContactConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangulation_config_defaults() {
        let config = TriangulationConfig::default();
        assert!(config.bsh_radius_r0 > 0.0);
        assert!(config.epsilon > 0.0);
    }

    #[test]
    fn triangulation_config_rejects_non_positive_r0() {
        assert!(TriangulationConfigBuilder::new().bsh_radius_r0(0.0).is_err());
        assert!(TriangulationConfigBuilder::new().bsh_radius_r0(-1.0).is_err());
    }

    #[test]
    fn triangulation_config_rejects_non_positive_epsilon() {
        assert!(TriangulationConfigBuilder::new().epsilon(0.0).is_err());
    }

    #[test]
    fn contact_config_defaults() {
        let config = ContactConfig::default();
        assert!(config.probe >= 0.0);
        assert!(config.step > 0.0);
        assert!(config.projections >= 1);
    }

    #[test]
    fn contact_config_rejects_negative_probe() {
        assert!(ContactConfigBuilder::new().probe(-0.1).is_err());
    }

    #[test]
    fn contact_config_rejects_non_positive_step() {
        assert!(ContactConfigBuilder::new().step(0.0).is_err());
    }

    #[test]
    fn contact_config_custom_build() {
        let config = ContactConfigBuilder::new()
            .probe(0.5)
            .unwrap()
            .step(0.1)
            .unwrap()
            .projections(5)
            .unwrap()
            .sih_depth(4)
            .build()
            .unwrap();
        assert_eq!(config.probe, 0.5);
        assert_eq!(config.sih_depth, 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn triangulation_config_serialization_round_trips() {
        let config = TriangulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: TriangulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
