//! # Medusa
//!
//! Procedural generation of a jellyfish-like creature mesh.
//!
//! A medusa is a parametric head (a bell with an oscillating rim and an
//! optional tail) carrying a ring of tube-shaped tentacles that droop under
//! gravity. Everything is built on the CPU into plain vertex and index
//! buffers that a renderer can upload directly.
//!
//! ## Features
//!
//! - **Parametric head**: ellipsoid crown, rim pinch and spikes, mapped tail
//! - **Tentacles**: curve walk with gravity, tapering radius, per-tentacle
//!   length variation
//! - **Attributes**: area-weighted normals, tangents with handedness, bounds
//! - **Animation**: a breathing displacement along rest normals
//! - **Export**: OBJ, STL, PLY
//! - **Configuration**: RON files via serde
//!
//! ## Quick Start
//!
//! ```
//! use medusa::prelude::*;
//!
//! let config = MedusaConfig::default();
//! let buffers = build(&config).unwrap();
//!
//! println!("Vertices: {}", buffers.num_vertices());
//! println!("Triangles: {}", buffers.num_triangles());
//!
//! // Displace the rest pose for one frame
//! let frame = animate(&buffers, 0.5, &config);
//! assert_eq!(frame.len(), buffers.num_vertices());
//! ```
//!
//! ## Driving a creature per frame
//!
//! ```
//! use medusa::prelude::*;
//!
//! let mut medusa = Medusa::new(MedusaConfig::default().with_animation(true)).unwrap();
//! let positions = medusa.update(1.0 / 30.0);
//! assert_eq!(positions.len(), medusa.buffers().num_vertices());
//!
//! // Changing parameters rebuilds the mesh
//! medusa.set_config(medusa.config().clone().with_tentacle_count(5)).unwrap();
//! assert_eq!(medusa.buffers().tentacles.len(), 5);
//! ```
//!
//! ## Parallelism
//!
//! Tentacle meshes and animation frames are computed with rayon by default.
//! Use [`MedusaConfig::sequential`](config::MedusaConfig::sequential) for
//! single-threaded execution; the output is identical either way.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animate;
pub mod config;
pub mod creature;
pub mod error;
pub mod generate;
pub mod io;
pub mod math;
pub mod mesh;
pub mod progress;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use medusa::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animate::{animate, animate_into};
    pub use crate::config::{
        AnimationConfig, GridConfig, HeadConfig, MedusaConfig, TentacleConfig,
    };
    pub use crate::creature::Medusa;
    pub use crate::error::{MedusaError, Result};
    pub use crate::generate::{build, build_with_progress, MeshBuffers, TentacleAttachment};
    pub use crate::mesh::Aabb;
    pub use crate::progress::Progress;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
