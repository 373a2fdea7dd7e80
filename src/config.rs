//! Creature configuration.
//!
//! [`MedusaConfig`] gathers every tunable of the generator into four groups
//! (head, tentacles, grid, animation). Defaults reproduce the stock creature.
//! Configurations can be stored as RON files:
//!
//! ```no_run
//! use medusa::config::MedusaConfig;
//!
//! let config = MedusaConfig::load("medusa.ron").unwrap();
//! config.validate().unwrap();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MedusaError, Result};

/// Shape of the head surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Base radius of the head.
    pub radius: f64,
    /// Horizontal (x/z) scale applied to the radius.
    pub radius_scale: f64,
    /// Vertical (y) scale applied to the radius.
    pub length_scale: f64,
    /// Number of spike ridges around the azimuth.
    pub num_spike_waves: u32,
    /// Relative amplitude of the spike ridges.
    pub spike_amplitude: f64,
    /// Radius multiplier for the tail cap.
    pub rvec_mult: f64,
    /// Width of the indentation band below the clamp angle, in degrees.
    pub smooth_angle_range_deg: f64,
    /// Polar angle where the main dome ends, in degrees.
    pub clamp_angle_deg: f64,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            radius: 130.0,
            radius_scale: 1.0,
            length_scale: 1.0,
            num_spike_waves: 6,
            spike_amplitude: 0.175,
            rvec_mult: 0.75,
            smooth_angle_range_deg: 60.0,
            clamp_angle_deg: 120.0,
        }
    }
}

impl HeadConfig {
    /// Clamp angle in radians.
    #[inline]
    pub fn clamp_angle(&self) -> f64 {
        self.clamp_angle_deg.to_radians()
    }

    /// Smoothing band width in radians.
    #[inline]
    pub fn smooth_angle_range(&self) -> f64 {
        self.smooth_angle_range_deg.to_radians()
    }
}

/// Tentacle count, tube resolution and length variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TentacleConfig {
    /// Number of tentacles around the head.
    pub count: u32,
    /// Rings per tentacle.
    pub segments: u32,
    /// Quads around each ring.
    pub sides: u32,
    /// Radius of the tube at its root.
    pub radius: f64,
    /// Nominal curve length before variation.
    pub length: f64,
    /// Attachment row offset from the head's middle row.
    pub y_offset: i32,
    /// Angular frequency of the length variation.
    pub variation_frequency: f64,
    /// Scale of the length variation.
    pub variation_amplitude: f64,
    /// Constant added to the length variation before scaling.
    pub variation_offset: f64,
}

impl Default for TentacleConfig {
    fn default() -> Self {
        Self {
            count: 4,
            segments: 20,
            sides: 4,
            radius: 20.0,
            length: 250.0,
            y_offset: 1,
            variation_frequency: 4.0,
            variation_amplitude: 1.0,
            variation_offset: 0.5,
        }
    }
}

impl TentacleConfig {
    /// Curve length multiplier for a tentacle rooted at azimuth `phi`.
    pub fn length_multiplier(&self, phi: f64) -> f64 {
        ((phi * self.variation_frequency).sin() + self.variation_offset) * self.variation_amplitude
    }

    /// Number of vertices in one tentacle tube.
    pub fn vertex_count(&self) -> usize {
        self.segments as usize * (self.sides as usize + 1)
    }
}

/// Resolution of the head's (theta, phi) grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns around the azimuth.
    pub sides: u32,
    /// Rows from pole to tail.
    pub segments: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sides: 20,
            segments: 10,
        }
    }
}

impl GridConfig {
    /// Number of head vertices, including the duplicated seam column.
    pub fn vertex_count(&self) -> usize {
        (self.segments as usize + 1) * (self.sides as usize + 1)
    }
}

/// Breathing animation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Whether per-frame updates displace the mesh.
    pub enabled: bool,
    /// Spatial frequency of the wave along the head axis.
    pub frequency: f64,
    /// Temporal speed of the wave.
    pub speed: f64,
    /// Displacement amplitude along the vertex normal.
    pub amount: f64,
    /// Extra scale applied to tentacle vertices.
    pub tentacle_multiplier: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: 1.0,
            speed: 4.0,
            amount: 3.0,
            tentacle_multiplier: 0.5,
        }
    }
}

/// Complete creature configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedusaConfig {
    /// Head surface shape.
    pub head: HeadConfig,
    /// Tentacle generation.
    pub tentacles: TentacleConfig,
    /// Head grid resolution.
    pub grid: GridConfig,
    /// Vertex animation.
    pub animation: AnimationConfig,
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for MedusaConfig {
    fn default() -> Self {
        Self {
            head: HeadConfig::default(),
            tentacles: TentacleConfig::default(),
            grid: GridConfig::default(),
            animation: AnimationConfig::default(),
            parallel: true,
        }
    }
}

impl MedusaConfig {
    /// Set the head grid resolution.
    pub fn with_grid(mut self, sides: u32, segments: u32) -> Self {
        self.grid = GridConfig { sides, segments };
        self
    }

    /// Set the number of tentacles.
    pub fn with_tentacle_count(mut self, count: u32) -> Self {
        self.tentacles.count = count;
        self
    }

    /// Set the tentacle tube resolution.
    pub fn with_tentacle_resolution(mut self, segments: u32, sides: u32) -> Self {
        self.tentacles.segments = segments;
        self.tentacles.sides = sides;
        self
    }

    /// Turn per-frame animation on or off.
    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.animation.enabled = enabled;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Grid row where tentacles are rooted.
    pub fn attachment_row(&self) -> i64 {
        i64::from(self.grid.segments / 2) + i64::from(self.tentacles.y_offset)
    }

    /// Grid columns between two consecutive tentacles.
    pub fn attachment_stride(&self) -> u32 {
        self.grid.sides / self.tentacles.count.max(1)
    }

    /// Total vertex count of the combined mesh.
    pub fn total_vertex_count(&self) -> usize {
        self.grid.vertex_count() + self.tentacles.count as usize * self.tentacles.vertex_count()
    }

    /// Check that the configuration can be built.
    ///
    /// Every rejection happens here, before any buffer is allocated.
    pub fn validate(&self) -> Result<()> {
        let head = &self.head;
        let tentacles = &self.tentacles;
        let grid = &self.grid;

        if grid.sides == 0 {
            return Err(MedusaError::invalid_param("grid.sides", grid.sides, "must be at least 1"));
        }
        if grid.segments == 0 {
            return Err(MedusaError::invalid_param(
                "grid.segments",
                grid.segments,
                "must be at least 1",
            ));
        }
        if tentacles.count == 0 {
            return Err(MedusaError::invalid_param(
                "tentacles.count",
                tentacles.count,
                "must be at least 1",
            ));
        }
        if tentacles.segments < 2 {
            return Err(MedusaError::invalid_param(
                "tentacles.segments",
                tentacles.segments,
                "must be at least 2",
            ));
        }
        if tentacles.sides == 0 {
            return Err(MedusaError::invalid_param(
                "tentacles.sides",
                tentacles.sides,
                "must be at least 1",
            ));
        }
        if grid.sides % tentacles.count != 0 {
            return Err(MedusaError::invalid_param(
                "grid.sides",
                grid.sides,
                "must be a multiple of tentacles.count",
            ));
        }
        let row = self.attachment_row();
        if row < 0 || row > i64::from(grid.segments) {
            return Err(MedusaError::invalid_param(
                "tentacles.y_offset",
                tentacles.y_offset,
                "attachment row falls outside the head grid",
            ));
        }

        if !(head.radius.is_finite() && head.radius > 0.0) {
            return Err(MedusaError::invalid_param("head.radius", head.radius, "must be positive"));
        }
        if !(head.smooth_angle_range_deg.is_finite() && head.smooth_angle_range_deg > 0.0) {
            return Err(MedusaError::invalid_param(
                "head.smooth_angle_range_deg",
                head.smooth_angle_range_deg,
                "must be positive",
            ));
        }
        if !(0.0..=180.0).contains(&head.clamp_angle_deg) {
            return Err(MedusaError::invalid_param(
                "head.clamp_angle_deg",
                head.clamp_angle_deg,
                "must lie in [0, 180]",
            ));
        }
        for (name, value) in [
            ("head.radius_scale", head.radius_scale),
            ("head.length_scale", head.length_scale),
            ("head.spike_amplitude", head.spike_amplitude),
            ("head.rvec_mult", head.rvec_mult),
            ("tentacles.length", tentacles.length),
            ("tentacles.variation_frequency", tentacles.variation_frequency),
            ("tentacles.variation_amplitude", tentacles.variation_amplitude),
            ("tentacles.variation_offset", tentacles.variation_offset),
            ("animation.frequency", self.animation.frequency),
            ("animation.speed", self.animation.speed),
            ("animation.amount", self.animation.amount),
            ("animation.tentacle_multiplier", self.animation.tentacle_multiplier),
        ] {
            if !value.is_finite() {
                return Err(MedusaError::invalid_param(name, value, "must be finite"));
            }
        }
        if !(tentacles.radius.is_finite() && tentacles.radius >= 0.0) {
            return Err(MedusaError::invalid_param(
                "tentacles.radius",
                tentacles.radius,
                "must be non-negative",
            ));
        }

        let total = self.grid_vertex_count_u64()
            + u64::from(tentacles.count)
                * u64::from(tentacles.segments)
                * (u64::from(tentacles.sides) + 1);
        if total > u64::from(u32::MAX) {
            return Err(MedusaError::invalid_param(
                "vertex count",
                total,
                "exceeds the 32-bit index range",
            ));
        }

        Ok(())
    }

    fn grid_vertex_count_u64(&self) -> u64 {
        (u64::from(self.grid.segments) + 1) * (u64::from(self.grid.sides) + 1)
    }

    /// Load a configuration from a RON file.
    ///
    /// Missing fields take their default values. The result is not validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::from_ron(&data).map_err(|message| MedusaError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Save the configuration to a RON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_ron().map_err(|message| MedusaError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Parse a configuration from RON text.
    pub fn from_ron(data: &str) -> std::result::Result<Self, String> {
        ron::from_str(data).map_err(|e| e.to_string())
    }

    /// Serialize the configuration as pretty-printed RON.
    pub fn to_ron(&self) -> std::result::Result<String, String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| e.to_string())
    }
}
