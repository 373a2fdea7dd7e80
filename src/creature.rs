//! Stateful creature driver.
//!
//! [`Medusa`] owns a configuration, the buffers built from it and a frame
//! buffer for animated positions. A host loop calls [`Medusa::set_config`]
//! whenever parameters change and [`Medusa::update`] once per frame.
//!
//! ```
//! use medusa::config::MedusaConfig;
//! use medusa::creature::Medusa;
//!
//! let mut medusa = Medusa::new(MedusaConfig::default().with_animation(true)).unwrap();
//! for frame in 0..3 {
//!     let positions = medusa.update(frame as f64 / 30.0);
//!     assert_eq!(positions.len(), medusa.buffers().num_vertices());
//! }
//! ```

use nalgebra::Point3;

use crate::animate::animate_into;
use crate::config::MedusaConfig;
use crate::error::Result;
use crate::generate::{build, MeshBuffers};

/// A built creature and its current animation frame.
#[derive(Debug, Clone)]
pub struct Medusa {
    config: MedusaConfig,
    buffers: MeshBuffers,
    frame: Vec<Point3<f64>>,
}

impl Medusa {
    /// Build a creature from `config`.
    pub fn new(config: MedusaConfig) -> Result<Self> {
        let buffers = build(&config)?;
        let frame = buffers.vertices.clone();
        Ok(Self {
            config,
            buffers,
            frame,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &MedusaConfig {
        &self.config
    }

    /// Buffers of the latest build (rest pose).
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Positions produced by the latest [`update`](Self::update).
    pub fn frame(&self) -> &[Point3<f64>] {
        &self.frame
    }

    /// Replace the configuration and rebuild.
    ///
    /// On error the previous configuration and buffers are kept.
    pub fn set_config(&mut self, config: MedusaConfig) -> Result<()> {
        let buffers = build(&config)?;
        log::debug!(
            "Rebuilt creature: {} vertices ({} head)",
            buffers.num_vertices(),
            buffers.head_vertex_count
        );
        self.frame.clone_from(&buffers.vertices);
        self.buffers = buffers;
        self.config = config;
        Ok(())
    }

    /// Rebuild from the current configuration.
    pub fn rebuild(&mut self) -> Result<()> {
        self.set_config(self.config.clone())
    }

    /// Advance to `time` and return the positions to render.
    ///
    /// With animation disabled this is the rest pose.
    pub fn update(&mut self, time: f64) -> &[Point3<f64>] {
        if self.config.animation.enabled {
            animate_into(&self.buffers, time, &self.config, &mut self.frame);
        } else if self.frame.len() != self.buffers.vertices.len() {
            self.frame.clone_from(&self.buffers.vertices);
        }
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::animate;

    #[test]
    fn test_static_update_returns_rest_pose() {
        let mut medusa = Medusa::new(MedusaConfig::default()).unwrap();
        let rest = medusa.buffers().vertices.clone();
        assert_eq!(medusa.update(3.0), &rest[..]);
    }

    #[test]
    fn test_animated_update_matches_animate() {
        let config = MedusaConfig::default().with_animation(true);
        let mut medusa = Medusa::new(config.clone()).unwrap();
        let expected = animate(medusa.buffers(), 1.5, &config);
        assert_eq!(medusa.update(1.5), &expected[..]);
        assert_eq!(medusa.frame(), &expected[..]);
    }

    #[test]
    fn test_set_config_rebuilds() {
        let mut medusa = Medusa::new(MedusaConfig::default()).unwrap();
        medusa
            .set_config(MedusaConfig::default().with_grid(12, 6))
            .unwrap();
        assert_eq!(medusa.buffers().head_vertex_count, 7 * 13);
        assert_eq!(medusa.frame().len(), medusa.buffers().num_vertices());
        assert_eq!(medusa.config().grid.sides, 12);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_state() {
        let mut medusa = Medusa::new(MedusaConfig::default()).unwrap();
        let before = medusa.buffers().clone();

        let bad = MedusaConfig::default().with_tentacle_count(0);
        assert!(medusa.set_config(bad).is_err());

        assert_eq!(medusa.buffers(), &before);
        assert_eq!(medusa.config(), &MedusaConfig::default());
    }

    #[test]
    fn test_turning_animation_off_restores_rest_pose() {
        let mut medusa = Medusa::new(MedusaConfig::default().with_animation(true)).unwrap();
        medusa.update(0.8);
        assert_ne!(medusa.frame(), &medusa.buffers().vertices[..]);

        medusa
            .set_config(medusa.config().clone().with_animation(false))
            .unwrap();
        let rest = medusa.buffers().vertices.clone();
        assert_eq!(medusa.update(0.8), &rest[..]);
    }
}
